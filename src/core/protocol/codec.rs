//! Wire codec: text frames to envelopes and back.
//!
//! Decoding never panics and never returns a partially-understood request:
//! anything that is not a JSON object becomes a [`DecodeError`], which the
//! dispatcher answers with a parse error and a `null` id.

use serde_json::Value;
use thiserror::Error;

use super::message::{Request, Response};

/// Why a frame could not be turned into a [`Request`].
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The frame is not valid JSON.
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// The frame is valid JSON but not an object.
    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),

    /// A binary frame that is not UTF-8 text.
    #[error("frame is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Stateless JSON envelope codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageCodec;

impl MessageCodec {
    /// Decode one text frame.
    pub fn decode(text: &str) -> Result<Request, DecodeError> {
        let value: Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(DecodeError::NotAnObject(kind_of(&value)));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Decode one binary frame as UTF-8 text.
    pub fn decode_bytes(bytes: &[u8]) -> Result<Request, DecodeError> {
        Self::decode(std::str::from_utf8(bytes)?)
    }

    /// Encode a response envelope.
    pub fn encode(response: &Response) -> Result<String, serde_json::Error> {
        serde_json::to_string(response)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
