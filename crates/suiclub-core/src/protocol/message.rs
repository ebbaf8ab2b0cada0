//! Club message codec (panic-free).
//!
//! Wire layout: `[type: u8][payload...]`
//! - `Raw` (0): payload is the UTF-8 text as is.
//! - `Xor` (1): payload is the UTF-8 text XORed with [`XOR_KEY`], repeated by
//!   byte position (keystream byte `i` = `XOR_KEY[i % XOR_KEY.len()]`).
//!
//! The XOR variant is obfuscation, not encryption: the key is public and
//! there is no nonce, so the same text always yields the same bytes.
//!
//! Parsing rules:
//! - Never index (`buf[0]`) — always use `Buf` and `has_remaining()` checks.
//! - The whole payload after the type byte must be valid UTF-8. Trailing
//!   garbage is rejected, never truncated.

use std::fmt;
use std::str::FromStr;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Result, SuiClubError};

/// Fixed keystream seed for [`MessageType::Xor`].
pub const XOR_KEY: &[u8] = b"suia";

/// Transform applied to a message payload. The discriminant is the first
/// byte on the wire, so variants must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    /// Plain UTF-8.
    Raw = 0,
    /// UTF-8 XORed with the repeating [`XOR_KEY`].
    Xor = 1,
}

impl MessageType {
    /// Wire discriminant.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Lowercase name used in config files and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageType::Raw => "raw",
            MessageType::Xor => "xor",
        }
    }
}

impl TryFrom<u8> for MessageType {
    type Error = SuiClubError;

    fn try_from(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(MessageType::Raw),
            1 => Ok(MessageType::Xor),
            other => Err(SuiClubError::UnsupportedType(other)),
        }
    }
}

impl FromStr for MessageType {
    type Err = SuiClubError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "raw" => Ok(MessageType::Raw),
            "xor" => Ok(MessageType::Xor),
            other => Err(SuiClubError::Config(format!(
                "unknown message type: {other} (expected raw or xor)"
            ))),
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// XOR `buf` in place with the repeating key. Applying it twice is identity.
pub fn apply_keystream(buf: &mut [u8]) {
    for (b, k) in buf.iter_mut().zip(XOR_KEY.iter().cycle()) {
        *b ^= k;
    }
}

/// Encode `message` as `[ty][payload]`. Output length is `message.len() + 1`.
pub fn encode(message: &str, ty: MessageType) -> Bytes {
    let mut payload = message.as_bytes().to_vec();
    if ty == MessageType::Xor {
        apply_keystream(&mut payload);
    }

    let mut out = BytesMut::with_capacity(payload.len() + 1);
    out.put_u8(ty.as_u8());
    out.put_slice(&payload);
    out.freeze()
}

/// Encode with an untyped discriminant, e.g. one read from user input.
/// Unknown tags fail before any output is produced.
pub fn encode_tagged(message: &str, tag: u8) -> Result<Bytes> {
    let ty = MessageType::try_from(tag)?;
    Ok(encode(message, ty))
}

/// Decode a message produced by [`encode`].
pub fn decode(mut buf: Bytes) -> Result<String> {
    if !buf.has_remaining() {
        return Err(SuiClubError::InvalidEncoding(
            "empty message: missing type byte".into(),
        ));
    }

    let ty = MessageType::try_from(buf.get_u8())?;

    let mut payload = buf.to_vec();
    if ty == MessageType::Xor {
        apply_keystream(&mut payload);
    }

    String::from_utf8(payload)
        .map_err(|e| SuiClubError::InvalidEncoding(format!("{ty} payload is not utf-8: {e}")))
}

/// [`decode`] over a borrowed slice.
pub fn decode_slice(encoded: &[u8]) -> Result<String> {
    decode(Bytes::copy_from_slice(encoded))
}
