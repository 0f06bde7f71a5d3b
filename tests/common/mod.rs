//! # Strata Test Helpers
//!
//! Byte streams with observable behaviour and shorthands for running a
//! grammar over a buffer.

#![allow(dead_code)]

use std::cell::Cell;
use std::io;
use std::rc::Rc;

use strata::data::{ByteStream, InMemoryByteStream};
use strata::{parse, Environment, ParseResult, Source, Token};

/// An environment at offset zero over `bytes`.
pub fn env(bytes: &[u8]) -> Environment {
    Environment::new(Source::from_bytes(bytes.to_vec()))
}

/// Parses `bytes` with `token`, panicking on a fatal error.
pub fn run(token: &Token, bytes: &[u8]) -> ParseResult {
    parse(token, &env(bytes)).unwrap()
}

/// Parses `bytes` with `token`, panicking unless the parse succeeds.
pub fn parsed(token: &Token, bytes: &[u8]) -> Environment {
    run(token, bytes)
        .success()
        .unwrap_or_else(|| panic!("{:?} did not match {:?}", token, bytes))
}

/// A stream that counts how many reads reach it.
#[derive(Debug, Clone)]
pub struct TrackingStream {
    inner: InMemoryByteStream,
    reads: Rc<Cell<usize>>,
}

impl TrackingStream {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            inner: InMemoryByteStream::new(bytes.to_vec()),
            reads: Rc::new(Cell::new(0)),
        }
    }

    /// A shared handle on the read counter; stays valid after the stream is moved.
    pub fn counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.reads)
    }
}

impl ByteStream for TrackingStream {
    fn read(&self, offset: u64, length: usize) -> io::Result<Vec<u8>> {
        self.reads.set(self.reads.get() + 1);
        self.inner.read(offset, length)
    }

    fn is_available(&self, offset: u64, length: u64) -> io::Result<bool> {
        self.inner.is_available(offset, length)
    }
}

/// A stream of `size` bytes that claims every range is available but fails
/// every read.
#[derive(Debug, Clone, Copy)]
pub struct BrokenStream {
    pub size: u64,
}

impl ByteStream for BrokenStream {
    fn read(&self, _offset: u64, _length: usize) -> io::Result<Vec<u8>> {
        Err(io::Error::new(io::ErrorKind::Other, "device unplugged"))
    }

    fn is_available(&self, offset: u64, length: u64) -> io::Result<bool> {
        Ok(offset.checked_add(length).is_some_and(|end| end <= self.size))
    }
}
