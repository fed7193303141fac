//! Codec trait and implementations for turning messages into bytes.
//!
//! The server and client only need *something* that implements [`Codec`].
//! [`BinaryCodec`] is the real wire format; [`JsonCodec`] is a readable
//! stand-in for debugging tools and tests.
//!
//! # Binary layout
//!
//! ```text
//! +-----+-----+---------------------------------+
//! | tag (2 B) | payload                         |
//! +-----+-----+---------------------------------+
//!   "JG"        player name bytes (rest of buffer)
//!   "TM"        letter, number, direction        (3 x i8)
//!   "QG"        -
//!   "SD"        -
//!   "SG"        color                            (1 x i8)
//!   "MM"        letter, number, direction, color (4 x i8)
//!   "DW"        winner                           (1 x i8)
//! ```
//!
//! There is no length prefix. One stream read is expected to carry one
//! message, but [`Codec::decode_all`] can split a read that carries
//! several, since every kind except `JoinGame` has a fixed width.

use crate::{Message, MessageKind, ProtocolError};

/// Length of the ASCII tag that opens every message.
pub const TAG_LEN: usize = 2;

/// A codec that can encode messages to bytes and decode them back.
///
/// `Send + Sync + 'static` so a single codec can be shared by every
/// connection task.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a message.
    ///
    /// # Errors
    /// Returns a [`ProtocolError`] if the message can't be represented.
    fn encode(&self, msg: &Message) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes exactly one message from `data`.
    ///
    /// # Errors
    /// Returns a [`ProtocolError`] if the bytes are not exactly one valid
    /// message.
    fn decode(&self, data: &[u8]) -> Result<Message, ProtocolError>;

    /// Deserializes every message in `data`, in order.
    ///
    /// The default treats the whole buffer as a single message.
    ///
    /// # Errors
    /// Fails if any message in the buffer is invalid.
    fn decode_all(&self, data: &[u8]) -> Result<Vec<Message>, ProtocolError> {
        Ok(vec![self.decode(data)?])
    }
}

// ---------------------------------------------------------------------------
// BinaryCodec
// ---------------------------------------------------------------------------

/// The compact tag-plus-signed-bytes format spoken on the wire.
///
/// ## Example
///
/// ```rust
/// use gipf_protocol::{BinaryCodec, Codec, Message};
///
/// let codec = BinaryCodec;
/// let msg = Message::TryMove { letter: 0, number: 0, direction: 2 };
///
/// let bytes = codec.encode(&msg).unwrap();
/// assert_eq!(bytes, b"TM\x00\x00\x02");
///
/// assert_eq!(codec.decode(&bytes).unwrap(), msg);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryCodec;

impl Codec for BinaryCodec {
    fn encode(&self, msg: &Message) -> Result<Vec<u8>, ProtocolError> {
        let mut out = Vec::with_capacity(TAG_LEN + 4);
        out.extend_from_slice(&msg.kind().tag());
        match msg {
            Message::JoinGame { player_name } => {
                out.extend_from_slice(player_name.as_bytes());
            }
            Message::TryMove {
                letter,
                number,
                direction,
            } => push_signed(&mut out, &[*letter, *number, *direction]),
            Message::QuitGame | Message::Shutdown => {}
            Message::StartGame { color } => push_signed(&mut out, &[*color]),
            Message::MakeMove {
                letter,
                number,
                direction,
                color,
            } => push_signed(&mut out, &[*letter, *number, *direction, *color]),
            Message::DeclareWinner { winner } => push_signed(&mut out, &[*winner]),
        }
        Ok(out)
    }

    fn decode(&self, data: &[u8]) -> Result<Message, ProtocolError> {
        let kind = read_kind(data)?;
        let payload = &data[TAG_LEN..];

        if let Some(expected) = kind.payload_len() {
            if payload.len() < expected {
                return Err(ProtocolError::Truncated {
                    kind,
                    expected,
                    actual: payload.len(),
                });
            }
            if payload.len() > expected {
                return Err(ProtocolError::TrailingBytes {
                    kind,
                    expected,
                    actual: payload.len(),
                });
            }
        }

        let b = |i: usize| payload[i] as i8;
        let msg = match kind {
            MessageKind::JoinGame => Message::JoinGame {
                player_name: String::from_utf8(payload.to_vec())
                    .map_err(ProtocolError::InvalidPlayerName)?,
            },
            MessageKind::TryMove => Message::TryMove {
                letter: b(0),
                number: b(1),
                direction: b(2),
            },
            MessageKind::QuitGame => Message::QuitGame,
            MessageKind::Shutdown => Message::Shutdown,
            MessageKind::StartGame => Message::StartGame { color: b(0) },
            MessageKind::MakeMove => Message::MakeMove {
                letter: b(0),
                number: b(1),
                direction: b(2),
                color: b(3),
            },
            MessageKind::DeclareWinner => Message::DeclareWinner { winner: b(0) },
        };
        Ok(msg)
    }

    fn decode_all(&self, data: &[u8]) -> Result<Vec<Message>, ProtocolError> {
        let mut messages = Vec::new();
        let mut rest = data;
        while !rest.is_empty() {
            let kind = read_kind(rest)?;
            let len = match kind.payload_len() {
                Some(payload) => TAG_LEN + payload,
                None => rest.len(),
            };
            if rest.len() < len {
                return Err(ProtocolError::Truncated {
                    kind,
                    expected: len - TAG_LEN,
                    actual: rest.len() - TAG_LEN,
                });
            }
            let (frame, tail) = rest.split_at(len);
            messages.push(self.decode(frame)?);
            rest = tail;
        }
        Ok(messages)
    }
}

fn read_kind(data: &[u8]) -> Result<MessageKind, ProtocolError> {
    let tag: [u8; TAG_LEN] = data
        .get(..TAG_LEN)
        .and_then(|t| t.try_into().ok())
        .ok_or(ProtocolError::MissingTag(data.len()))?;
    MessageKind::from_tag(tag).ok_or(ProtocolError::UnknownMessageKind(tag))
}

fn push_signed(out: &mut Vec<u8>, values: &[i8]) {
    out.extend(values.iter().map(|&v| v as u8));
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// Handy for inspecting traffic by eye. Not wire-compatible with
/// [`BinaryCodec`]; both ends must agree on the codec.
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode(&self, msg: &Message) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(msg).map_err(ProtocolError::Encode)
    }

    fn decode(&self, data: &[u8]) -> Result<Message, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<Message> {
        vec![
            Message::JoinGame {
                player_name: "ada".into(),
            },
            Message::JoinGame {
                player_name: "Grace Hopper".into(),
            },
            Message::JoinGame {
                player_name: String::new(),
            },
            Message::TryMove {
                letter: 0,
                number: 3,
                direction: 2,
            },
            Message::QuitGame,
            Message::Shutdown,
            Message::StartGame { color: 2 },
            Message::MakeMove {
                letter: 8,
                number: 4,
                direction: 5,
                color: 1,
            },
            Message::DeclareWinner { winner: 1 },
            Message::TryMove {
                letter: -1,
                number: -128,
                direction: 127,
            },
        ]
    }

    #[test]
    fn test_binary_round_trip_every_kind() {
        let codec = BinaryCodec;
        for msg in samples() {
            let bytes = codec.encode(&msg).unwrap();
            assert_eq!(codec.decode(&bytes).unwrap(), msg);
        }
    }

    #[test]
    fn test_binary_layout_matches_wire_format() {
        let codec = BinaryCodec;
        assert_eq!(codec.encode(&Message::QuitGame).unwrap(), b"QG");
        assert_eq!(
            codec.encode(&Message::StartGame { color: 1 }).unwrap(),
            b"SG\x01"
        );
        assert_eq!(
            codec
                .encode(&Message::MakeMove {
                    letter: 1,
                    number: 0,
                    direction: 2,
                    color: 2,
                })
                .unwrap(),
            b"MM\x01\x00\x02\x02"
        );
        assert_eq!(
            codec
                .encode(&Message::JoinGame {
                    player_name: "bo b".into()
                })
                .unwrap(),
            b"JGbo b"
        );
    }

    #[test]
    fn test_negative_values_use_twos_complement() {
        let bytes = BinaryCodec
            .encode(&Message::DeclareWinner { winner: -1 })
            .unwrap();
        assert_eq!(bytes, b"DW\xff");
    }

    #[test]
    fn test_decode_unknown_tag() {
        let err = BinaryCodec.decode(b"XX\x01").unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownMessageKind(tag) if &tag == b"XX"));
    }

    #[test]
    fn test_decode_game_full_denial_is_unknown() {
        let err = BinaryCodec.decode(crate::GAME_FULL).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownMessageKind(_)));
    }

    #[test]
    fn test_decode_missing_tag() {
        assert!(matches!(
            BinaryCodec.decode(b"").unwrap_err(),
            ProtocolError::MissingTag(0)
        ));
        assert!(matches!(
            BinaryCodec.decode(b"T").unwrap_err(),
            ProtocolError::MissingTag(1)
        ));
    }

    #[test]
    fn test_decode_short_payload_is_truncated() {
        let err = BinaryCodec.decode(b"TM\x01\x02").unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::Truncated {
                kind: MessageKind::TryMove,
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_decode_long_payload_has_trailing_bytes() {
        let err = BinaryCodec.decode(b"QG\x00").unwrap_err();
        assert!(matches!(err, ProtocolError::TrailingBytes { .. }));
    }

    #[test]
    fn test_decode_invalid_utf8_name() {
        let err = BinaryCodec.decode(b"JG\xff\xfe").unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidPlayerName(_)));
    }

    #[test]
    fn test_decode_all_splits_coalesced_reads() {
        let codec = BinaryCodec;
        let first = Message::StartGame { color: 1 };
        let second = Message::MakeMove {
            letter: 0,
            number: 0,
            direction: 2,
            color: 1,
        };
        let mut bytes = codec.encode(&first).unwrap();
        bytes.extend(codec.encode(&second).unwrap());

        assert_eq!(codec.decode_all(&bytes).unwrap(), vec![first, second]);
    }

    #[test]
    fn test_decode_all_join_game_takes_the_rest() {
        let codec = BinaryCodec;
        let mut bytes = codec.encode(&Message::TryMove {
            letter: 1,
            number: 0,
            direction: 1,
        })
        .unwrap();
        bytes.extend_from_slice(b"JGname QG");

        let msgs = codec.decode_all(&bytes).unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(
            msgs[1],
            Message::JoinGame {
                player_name: "name QG".into()
            }
        );
    }

    #[test]
    fn test_decode_all_rejects_partial_tail() {
        let err = BinaryCodec.decode_all(b"QGMM\x01").unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::Truncated {
                kind: MessageKind::MakeMove,
                ..
            }
        ));
    }

    #[test]
    fn test_decode_all_empty_buffer_is_empty() {
        assert!(BinaryCodec.decode_all(b"").unwrap().is_empty());
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_round_trip_every_kind() {
        let codec = JsonCodec;
        for msg in samples() {
            let bytes = codec.encode(&msg).unwrap();
            assert_eq!(codec.decode(&bytes).unwrap(), msg);
        }
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_is_internally_tagged() {
        let bytes = JsonCodec.encode(&Message::StartGame { color: 1 }).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, r#"{"type":"StartGame","color":1}"#);
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_decode_garbage_fails() {
        assert!(matches!(
            JsonCodec.decode(b"not json").unwrap_err(),
            ProtocolError::Decode(_)
        ));
    }
}
