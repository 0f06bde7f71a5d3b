//! # Strata
//!
//! A declarative engine for parsing binary data formats. A format is a tree
//! of [`Token`]s built from a handful of primitives (fields, sequences,
//! choices, repetitions, jumps to other offsets) whose sizes and conditions
//! are [expressions](expression) over what has been parsed so far.
//!
//! Parsing threads an immutable [`Environment`] from token to token. Each
//! successful token returns a new environment whose [`ParseGraph`] records
//! what was bound, and a failing token hands back the environment it was
//! given, so choices and repetitions can backtrack freely. Bytes are read
//! lazily: binding a field records where it lives, not what it contains.
//!
//! ```rust
//! use strata::builder::*;
//! use strata::{parse, Environment, Source};
//!
//! let grammar = seq("pstring", vec![def("len", con(1)), def("text", reference("len"))]);
//! let env = Environment::new(Source::from_bytes(b"\x05Hello".to_vec()));
//! let parsed = parse(&grammar, &env).unwrap().success().unwrap();
//! assert_eq!(parsed.graph.get("text").unwrap().as_string().unwrap(), "Hello");
//! ```
//!
//! ## Errors
//!
//! A token that does not match is a [`ParseResult::Failure`], never an
//! error. [`EngineError`] is reserved for conditions that abort the parse;
//! see [`diagnostics`].

pub mod builder;
pub mod config;
pub mod data;
pub mod diagnostics;
pub mod encoding;
pub mod engine;
pub mod expression;
pub mod token;
pub mod value;

#[cfg(test)]
mod testing;

pub use config::EngineOptions;
pub use data::{Callbacks, Environment, ParseGraph, ParseItem, ParseReference, ParseResult, ParseValue, Slice, Source};
pub use diagnostics::{EngineError, ErrorType, Result};
pub use encoding::Encoding;
pub use engine::{parse, Engine};
pub use expression::{Expression, ValueExpression};
pub use token::{ParseContext, Token, TokenKind};
pub use value::{OptionalValue, OptionalValueList, Value};
