//! Domains module containing business logic organized by bounded contexts.
//!
//! - **tools**: the registry, schemas and invocation of callable tools
//! - **scoring**: the score predictor behind `predict_score`

pub mod scoring;
pub mod tools;
