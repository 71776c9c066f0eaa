//! JSON-RPC envelope layer.
//!
//! This module owns everything that touches the wire format:
//! - `message.rs` - request/response envelopes and the fixed error codes
//! - `codec.rs` - conversion between wire text and envelopes
//!
//! The dispatcher in `core::server` only ever sees decoded [`Request`]s and
//! produces [`Response`]s; transports only ever see strings.

mod codec;
mod message;

pub use codec::{DecodeError, MessageCodec};
pub use message::{
    ErrorObject, JSONRPC_VERSION, PROTOCOL_VERSION, Payload, Request, Response, error_codes,
};
