//! Bitwise operators over the bit-set interpretation.
//!
//! Results are at least as wide as the left operand. Only a left shift may
//! widen them further, and never by more than [`MAX_SHIFT`] bits.

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive};

use crate::diagnostics::Result;
use crate::encoding::Encoding;
use crate::value::{from_bit_set, OptionalValue, Value};

/// Left shifts wider than this yield an absent value.
const MAX_SHIFT: usize = 1 << 16;

fn width(value: &Value) -> usize {
    usize::try_from(value.length()).unwrap_or(usize::MAX)
}

pub(super) fn and(left: &Value, right: &Value, encoding: &Encoding) -> Result<OptionalValue> {
    let bits = left.as_bit_set()? & right.as_bit_set()?;
    Ok(Some(from_bit_set(&bits, width(left), encoding)))
}

pub(super) fn or(left: &Value, right: &Value, encoding: &Encoding) -> Result<OptionalValue> {
    let bits = left.as_bit_set()? | right.as_bit_set()?;
    Ok(Some(from_bit_set(&bits, width(left), encoding)))
}

/// Inverts every bit within the operand's width.
pub(super) fn not(value: &Value, encoding: &Encoding) -> Result<OptionalValue> {
    let size = width(value);
    let mask = (BigUint::one() << (size * 8)) - BigUint::one();
    let bits = mask ^ value.as_bit_set()?;
    Ok(Some(from_bit_set(&bits, size, encoding)))
}

pub(super) fn shift_left(value: &Value, positions: &Value, encoding: &Encoding) -> Result<OptionalValue> {
    let shift = match positions.as_numeric()?.to_usize() {
        Some(shift) if shift <= MAX_SHIFT => shift,
        _ => return Ok(None),
    };
    let bits = value.as_bit_set()? << shift;
    Ok(Some(from_bit_set(&bits, width(value), encoding)))
}

pub(super) fn shift_right(value: &Value, positions: &Value, encoding: &Encoding) -> Result<OptionalValue> {
    let Some(shift) = positions.as_numeric()?.to_usize() else {
        return Ok(None);
    };
    if shift >= width(value).saturating_mul(8) {
        return Ok(Some(from_bit_set(&BigUint::default(), width(value), encoding)));
    }
    let bits = value.as_bit_set()? >> shift;
    Ok(Some(from_bit_set(&bits, width(value), encoding)))
}
