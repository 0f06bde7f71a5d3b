//! Arithmetic over numeric interpretations. Undefined results are absent.

use num_bigint::{BigInt, Sign};
use num_traits::{One, Zero};

use crate::diagnostics::Result;
use crate::encoding::Encoding;
use crate::value::{from_numeric, OptionalValue, Value};

pub(super) fn neg(value: &Value, encoding: &Encoding) -> Result<OptionalValue> {
    Ok(Some(from_numeric(&-value.as_numeric()?, encoding)))
}

pub(super) fn add(left: &Value, right: &Value, encoding: &Encoding) -> Result<OptionalValue> {
    Ok(Some(from_numeric(&(left.as_numeric()? + right.as_numeric()?), encoding)))
}

pub(super) fn sub(left: &Value, right: &Value, encoding: &Encoding) -> Result<OptionalValue> {
    Ok(Some(from_numeric(&(left.as_numeric()? - right.as_numeric()?), encoding)))
}

pub(super) fn mul(left: &Value, right: &Value, encoding: &Encoding) -> Result<OptionalValue> {
    Ok(Some(from_numeric(&(left.as_numeric()? * right.as_numeric()?), encoding)))
}

/// Truncating division.
pub(super) fn div(left: &Value, right: &Value, encoding: &Encoding) -> Result<OptionalValue> {
    let divisor = right.as_numeric()?;
    if divisor.is_zero() {
        return Ok(None);
    }
    Ok(Some(from_numeric(&(left.as_numeric()? / divisor), encoding)))
}

/// Division rounded towards positive infinity.
pub(super) fn div_ceil(left: &Value, right: &Value, encoding: &Encoding) -> Result<OptionalValue> {
    let divisor = right.as_numeric()?;
    if divisor.is_zero() {
        return Ok(None);
    }
    let dividend = left.as_numeric()?;
    let quotient = &dividend / &divisor;
    let remainder = &dividend % &divisor;
    // The truncated remainder carries the dividend's sign.
    let quotient = if !remainder.is_zero() && remainder.sign() == divisor.sign() {
        quotient + BigInt::one()
    } else {
        quotient
    };
    Ok(Some(from_numeric(&quotient, encoding)))
}

/// Non-negative remainder; absent for a divisor that is not positive.
pub(super) fn modulo(left: &Value, right: &Value, encoding: &Encoding) -> Result<OptionalValue> {
    let divisor = right.as_numeric()?;
    if divisor.sign() != Sign::Plus {
        return Ok(None);
    }
    let remainder = left.as_numeric()? % &divisor;
    let remainder = if remainder.sign() == Sign::Minus {
        remainder + divisor
    } else {
        remainder
    };
    Ok(Some(from_numeric(&remainder, encoding)))
}
