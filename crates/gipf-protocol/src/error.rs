//! Error types for the protocol layer.
//!
//! Every variant means the same thing to a caller: the bytes did not form
//! a valid message, so the connection they came from can't be trusted.

use crate::MessageKind;

/// Errors that can occur while encoding or decoding messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The buffer is too short to even hold a two-byte tag.
    #[error("buffer of {0} bytes has no message tag")]
    MissingTag(usize),

    /// The tag is not one of the seven known kinds.
    #[error("unknown message kind {:?}", String::from_utf8_lossy(.0))]
    UnknownMessageKind([u8; 2]),

    /// Fewer payload bytes than the kind's fixed width.
    #[error("{kind} payload truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        kind: MessageKind,
        expected: usize,
        actual: usize,
    },

    /// More payload bytes than the kind's fixed width.
    #[error("{kind} payload has trailing bytes: expected {expected}, got {actual}")]
    TrailingBytes {
        kind: MessageKind,
        expected: usize,
        actual: usize,
    },

    /// A `JoinGame` name that is not valid UTF-8.
    #[error("player name is not valid UTF-8: {0}")]
    InvalidPlayerName(#[source] std::string::FromUtf8Error),

    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
