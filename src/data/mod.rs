//! # Parse Data
//!
//! Everything a parse reads from and produces: byte [`Source`]s and lazy
//! [`Slice`]s over them, the [`ParseGraph`] trace with its [`ParseValue`]
//! and [`ParseReference`] items, and the [`Environment`] threaded from token
//! to token.

mod callback;
mod environment;
mod graph;
mod parse_value;
pub mod selection;
mod slice;
mod source;

pub use callback::{Callback, Callbacks};
pub use environment::{Environment, ParseResult};
pub use graph::{Items, Iter, ParseGraph, ParseItem};
pub use parse_value::{ParseReference, ParseValue, SEPARATOR};
pub use slice::Slice;
pub use source::{ByteStream, DataExpressionSource, InMemoryByteStream, Source};
