//! # Encoding
//!
//! Immutable configuration describing how raw bytes are interpreted: whether
//! numbers are signed, which charset strings use and in which order the bytes
//! of a number are stored. An `Encoding` has no behaviour of its own beyond
//! byte reordering and charset decoding; it is threaded through every token
//! and expression evaluation and overridden per token where a grammar asks
//! for it.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sign {
    Signed,
    #[default]
    Unsigned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ByteOrder {
    #[default]
    BigEndian,
    LittleEndian,
}

impl ByteOrder {
    /// Returns `bytes` in big-endian order.
    ///
    /// Little-endian input is reversed, big-endian input is copied as is.
    pub fn apply(&self, bytes: &[u8]) -> Vec<u8> {
        match self {
            ByteOrder::BigEndian => bytes.to_vec(),
            ByteOrder::LittleEndian => bytes.iter().rev().copied().collect(),
        }
    }
}

/// Character sets supported for string interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Charset {
    #[default]
    Ascii,
    Latin1,
    Utf8,
}

impl Charset {
    /// Decodes `bytes`, replacing anything the charset cannot represent with U+FFFD.
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Charset::Ascii => bytes
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { char::REPLACEMENT_CHARACTER })
                .collect(),
            Charset::Latin1 => bytes.iter().map(|&b| b as char).collect(),
            Charset::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        }
    }

    /// Encodes `text`. Characters outside the charset become `?`.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Charset::Ascii => text
                .chars()
                .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                .collect(),
            Charset::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                .collect(),
            Charset::Utf8 => text.as_bytes().to_vec(),
        }
    }
}

/// How a value's bytes are interpreted.
///
/// # Examples
///
/// ```rust
/// use strata::encoding::{ByteOrder, Encoding, Sign};
/// let enc = Encoding::default().with_sign(Sign::Signed).with_byte_order(ByteOrder::LittleEndian);
/// assert!(enc.is_signed());
/// assert_eq!(enc.byte_order, ByteOrder::LittleEndian);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Encoding {
    pub sign: Sign,
    pub charset: Charset,
    pub byte_order: ByteOrder,
}

impl Encoding {
    pub fn new(sign: Sign, charset: Charset, byte_order: ByteOrder) -> Self {
        Self {
            sign,
            charset,
            byte_order,
        }
    }

    pub fn signed() -> Self {
        Self::default().with_sign(Sign::Signed)
    }

    pub fn little_endian() -> Self {
        Self::default().with_byte_order(ByteOrder::LittleEndian)
    }

    pub fn with_sign(self, sign: Sign) -> Self {
        Self { sign, ..self }
    }

    pub fn with_charset(self, charset: Charset) -> Self {
        Self { charset, ..self }
    }

    pub fn with_byte_order(self, byte_order: ByteOrder) -> Self {
        Self { byte_order, ..self }
    }

    pub fn is_signed(&self) -> bool {
        self.sign == Sign::Signed
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{:?}/{:?}", self.sign, self.charset, self.byte_order)
    }
}
