//! Wire protocol for GIPF.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Types** ([`Message`], [`MessageKind`]): the seven messages that
//!   travel on the wire.
//! - **Codec** ([`Codec`] trait, [`BinaryCodec`], [`JsonCodec`]): how
//!   those messages are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong during decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and the game
//! session. It knows nothing about boards or connections.
//!
//! ```text
//! Transport (bytes) → Protocol (Message) → Session / Client
//! ```

mod codec;
mod error;
mod types;

pub use codec::{BinaryCodec, Codec, TAG_LEN};
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{Message, MessageKind, GAME_FULL};
