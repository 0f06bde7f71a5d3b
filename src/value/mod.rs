//! # Values
//!
//! A [`Value`] is a fixed-size, immutable byte sequence plus the
//! [`Encoding`] that says how to read it: as an arbitrary-precision integer,
//! as a string or as a bit set. Values never own their bytes directly; they
//! sit on a [`Slice`], so a value bound while parsing does not touch the
//! input until something interprets it.
//!
//! Expression results are [`OptionalValueList`]s: ordered lists in which any
//! element may be absent.

mod factory;
mod list;

pub use factory::{from_bit_set, from_bool, from_numeric, from_string};
pub use list::OptionalValueList;

use std::fmt;
use std::rc::Rc;

use num_bigint::{BigInt, BigUint, Sign as BigSign};

use crate::data::Slice;
use crate::diagnostics::Result;
use crate::encoding::{Encoding, Sign};

/// A value that may be absent.
pub type OptionalValue = Option<Value>;

#[derive(Clone, PartialEq)]
pub struct Value {
    slice: Slice,
    encoding: Encoding,
}

impl Value {
    /// A constant value over `bytes`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use strata::encoding::Encoding;
    /// use strata::value::Value;
    /// let v = Value::new(vec![0x01, 0x00], Encoding::little_endian());
    /// assert_eq!(v.as_numeric().unwrap(), num_bigint::BigInt::from(1));
    /// ```
    pub fn new(bytes: impl Into<Rc<[u8]>>, encoding: Encoding) -> Self {
        Self {
            slice: Slice::from_bytes(bytes),
            encoding,
        }
    }

    pub fn from_slice(slice: Slice, encoding: Encoding) -> Self {
        Self { slice, encoding }
    }

    pub fn slice(&self) -> &Slice {
        &self.slice
    }

    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    /// Size in bytes. Never reads.
    pub fn length(&self) -> u64 {
        self.slice.length()
    }

    /// The raw bytes, materialised on first use.
    pub fn bytes(&self) -> Result<Rc<[u8]>> {
        self.slice.data()
    }

    /// Input position of a value read while parsing; `None` for constants and
    /// computed values.
    pub fn parsed_offset(&self) -> Option<u64> {
        (!self.slice.source().is_constant()).then(|| self.slice.offset())
    }

    pub fn as_numeric(&self) -> Result<BigInt> {
        let data = self.encoding.byte_order.apply(&self.bytes()?);
        Ok(match self.encoding.sign {
            Sign::Signed => BigInt::from_signed_bytes_be(&data),
            Sign::Unsigned => BigInt::from_bytes_be(BigSign::Plus, &data),
        })
    }

    pub fn as_string(&self) -> Result<String> {
        Ok(self.encoding.charset.decode(&self.bytes()?))
    }

    /// The bits of this value, numbered from the least significant bit of the
    /// numerically least significant byte regardless of stored byte order.
    pub fn as_bit_set(&self) -> Result<BigUint> {
        let data = self.encoding.byte_order.apply(&self.bytes()?);
        Ok(BigUint::from_bytes_be(&data))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slice.is_materialized().then(|| self.slice.data()) {
            Some(Ok(data)) => write!(f, "0x{}", hex(&data)),
            _ => write!(f, "{:?}", self.slice),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Lowercase hex rendering of `bytes`.
pub(crate) fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
