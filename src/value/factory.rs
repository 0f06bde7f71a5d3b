//! Constructors for values computed by expressions.
//!
//! Numeric and bit-set results are always stored big-endian; the rest of the
//! requested encoding is kept.

use num_bigint::{BigInt, BigUint};
use num_traits::Zero;

use super::Value;
use crate::encoding::{ByteOrder, Encoding};

/// Minimal two's-complement representation of `value`.
///
/// Under an unsigned encoding, leading zero bytes are stripped as long as
/// more than one byte remains to strip from.
pub fn from_numeric(value: &BigInt, encoding: &Encoding) -> Value {
    let bytes = value.to_signed_bytes_be();
    let bytes = if encoding.is_signed() || bytes.len() < 2 {
        bytes
    } else {
        let zeros = bytes.iter().take_while(|&&b| b == 0).count();
        bytes[zeros..].to_vec()
    };
    Value::new(bytes, big_endian(encoding))
}

pub fn from_string(value: &str, encoding: &Encoding) -> Value {
    Value::new(encoding.charset.encode(value), *encoding)
}

/// A value holding `bits`, at least `min_size` bytes wide.
pub fn from_bit_set(bits: &BigUint, min_size: usize, encoding: &Encoding) -> Value {
    let bytes = if bits.is_zero() {
        Vec::new()
    } else {
        bits.to_bytes_be()
    };
    let mut out = vec![0u8; min_size.saturating_sub(bytes.len())];
    out.extend_from_slice(&bytes);
    Value::new(out, big_endian(encoding))
}

/// A single byte holding 1 or 0.
pub fn from_bool(value: bool, encoding: &Encoding) -> Value {
    Value::new(vec![u8::from(value)], big_endian(encoding))
}

fn big_endian(encoding: &Encoding) -> Encoding {
    encoding.with_byte_order(ByteOrder::BigEndian)
}
