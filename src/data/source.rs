//! Byte providers.
//!
//! A [`Source`] is an addressable, possibly very large provider of bytes. The
//! engine never reads from it eagerly: tokens only ask whether a range is
//! *available*, and a [`Slice`](super::Slice) over the range fetches the bytes
//! the first time something actually looks at them.

use std::fmt;
use std::io;
use std::rc::Rc;

use once_cell::unsync::OnceCell;

use crate::data::Environment;
use crate::diagnostics::{EngineError, Result};
use crate::encoding::Encoding;
use crate::expression::ValueExpression;
use crate::value::hex;

// ============================================================================
// BYTE STREAM CONTRACT
// ============================================================================

/// The raw input contract the engine requires from a collaborator.
///
/// Implementations report problems through `io::Error`; the engine treats
/// every such error as fatal to the current parse.
pub trait ByteStream: fmt::Debug {
    /// Reads exactly `length` bytes starting at `offset`.
    fn read(&self, offset: u64, length: usize) -> io::Result<Vec<u8>>;

    /// Whether `length` bytes starting at `offset` can be read.
    fn is_available(&self, offset: u64, length: u64) -> io::Result<bool>;
}

/// A `ByteStream` over bytes held in memory.
#[derive(Debug, Clone)]
pub struct InMemoryByteStream {
    data: Rc<[u8]>,
}

impl InMemoryByteStream {
    pub fn new(data: impl Into<Rc<[u8]>>) -> Self {
        Self { data: data.into() }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl ByteStream for InMemoryByteStream {
    fn read(&self, offset: u64, length: usize) -> io::Result<Vec<u8>> {
        let range = checked_range(offset, length as u64, self.data.len())
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "read past end of data"))?;
        Ok(self.data[range].to_vec())
    }

    fn is_available(&self, offset: u64, length: u64) -> io::Result<bool> {
        Ok(checked_range(offset, length, self.data.len()).is_some())
    }
}

fn checked_range(offset: u64, length: u64, size: usize) -> Option<std::ops::Range<usize>> {
    let start = usize::try_from(offset).ok()?;
    let end = start.checked_add(usize::try_from(length).ok()?)?;
    (end <= size).then_some(start..end)
}

// ============================================================================
// SOURCE
// ============================================================================

/// Where the bytes of a slice come from.
#[derive(Clone)]
pub enum Source {
    /// The raw input being parsed.
    Stream(Rc<dyn ByteStream>),
    /// The bytes of a constant, never part of the input.
    Constant(Rc<[u8]>),
    /// Bytes computed by evaluating an expression against an earlier state.
    DataExpression(Rc<DataExpressionSource>),
}

impl Source {
    pub fn from_stream(stream: impl ByteStream + 'static) -> Self {
        Source::Stream(Rc::new(stream))
    }

    pub fn from_bytes(bytes: impl Into<Rc<[u8]>>) -> Self {
        Source::from_stream(InMemoryByteStream::new(bytes))
    }

    pub fn constant(bytes: impl Into<Rc<[u8]>>) -> Self {
        Source::Constant(bytes.into())
    }

    /// Whether bytes from this source belong to a constant rather than to parsed data.
    pub fn is_constant(&self) -> bool {
        matches!(self, Source::Constant(_))
    }

    pub fn is_available(&self, offset: u64, length: u64) -> Result<bool> {
        match self {
            Source::Stream(stream) => stream
                .is_available(offset, length)
                .map_err(|e| EngineError::io(offset, length, e)),
            Source::Constant(bytes) => Ok(checked_range(offset, length, bytes.len()).is_some()),
            Source::DataExpression(source) => {
                Ok(checked_range(offset, length, source.data()?.len()).is_some())
            }
        }
    }

    pub fn read(&self, offset: u64, length: u64) -> Result<Vec<u8>> {
        let eof = || {
            EngineError::io(
                offset,
                length,
                io::Error::new(io::ErrorKind::UnexpectedEof, "read past end of source"),
            )
        };
        match self {
            Source::Stream(stream) => {
                let count = usize::try_from(length).map_err(|_| eof())?;
                stream
                    .read(offset, count)
                    .map_err(|e| EngineError::io(offset, length, e))
            }
            Source::Constant(bytes) => checked_range(offset, length, bytes.len())
                .map(|range| bytes[range].to_vec())
                .ok_or_else(eof),
            Source::DataExpression(source) => {
                let data = source.data()?;
                checked_range(offset, length, data.len())
                    .map(|range| data[range].to_vec())
                    .ok_or_else(eof)
            }
        }
    }

    /// Identity comparison: two sources are the same if they are the same provider.
    pub fn same_as(&self, other: &Source) -> bool {
        match (self, other) {
            (Source::Stream(a), Source::Stream(b)) => std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b)),
            (Source::Constant(a), Source::Constant(b)) => a == b,
            (Source::DataExpression(a), Source::DataExpression(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Stream(stream) => write!(f, "Stream({:?})", stream),
            Source::Constant(bytes) => write!(f, "Constant(0x{})", hex(bytes)),
            Source::DataExpression(source) => write!(f, "{:?}", source),
        }
    }
}

// ============================================================================
// DERIVED SOURCES
// ============================================================================

/// Bytes of the `index`-th result (most recent first) of an expression.
///
/// The expression is evaluated once, against the environment captured at
/// construction, the first time any byte is requested.
pub struct DataExpressionSource {
    expression: ValueExpression,
    index: usize,
    environment: Environment,
    encoding: Encoding,
    cache: OnceCell<Rc<[u8]>>,
}

impl DataExpressionSource {
    pub fn new(
        expression: ValueExpression,
        index: usize,
        environment: Environment,
        encoding: Encoding,
    ) -> Self {
        Self {
            expression,
            index,
            environment,
            encoding,
            cache: OnceCell::new(),
        }
    }

    pub fn data(&self) -> Result<Rc<[u8]>> {
        self.cache
            .get_or_try_init(|| {
                let results = self.expression.eval(&self.environment, &self.encoding)?;
                if results.len() <= self.index {
                    return Err(crate::err_msg!(
                        Invariant,
                        "Data expression yields {} result(s), expected at least {}.",
                        results.len(),
                        self.index + 1
                    ));
                }
                match results.get(self.index) {
                    Some(Some(value)) => value.bytes(),
                    _ => Err(crate::err_msg!(
                        Invariant,
                        "Data expression yields an absent value at index {}.",
                        self.index
                    )),
                }
            })
            .map(Rc::clone)
    }
}

impl fmt::Debug for DataExpressionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DataExpression({:?}[{}]@{})",
            self.expression, self.index, self.environment.offset
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_availability() {
        let stream = InMemoryByteStream::new(vec![1, 2, 3]);
        assert!(stream.is_available(0, 3).unwrap());
        assert!(stream.is_available(3, 0).unwrap());
        assert!(!stream.is_available(2, 2).unwrap());
        assert!(!stream.is_available(u64::MAX, 1).unwrap());
    }

    #[test]
    fn constant_read_past_end_is_io_error() {
        let source = Source::constant(vec![1, 2]);
        assert_eq!(source.read(0, 2).unwrap(), vec![1, 2]);
        let err = source.read(1, 2).unwrap_err();
        assert!(matches!(err, EngineError::Io { offset: 1, length: 2, .. }));
    }

    #[test]
    fn stream_identity() {
        let a = Source::from_bytes(vec![0]);
        let b = Source::from_bytes(vec![0]);
        assert!(a.same_as(&a.clone()));
        assert!(!a.same_as(&b));
    }
}
