//! # Engine Diagnostics
//!
//! This module defines the single, `miette`-based error type of the engine.
//!
//! Only *fatal* conditions are errors. A token that does not match its input
//! is not an error: it returns [`ParseResult::Failure`](crate::data::ParseResult)
//! and an enclosing choice or repetition is free to try something else. An
//! expression that cannot produce a value is not an error either: it yields
//! an absent element in its [`OptionalValueList`](crate::value::OptionalValueList).
//!
//! What remains, and therefore aborts the whole parse, is:
//!
//! - **I/O**: the byte source could not satisfy a read
//! - **Invariant violations**: malformed grammars, reducers returning more or
//!   fewer than one value, closing a branch that is not open, references that
//!   do not resolve
//! - **Unresolved token references**: a named back-reference whose name is not
//!   reachable from the graph
//! - **Recursion limit**: nesting deeper than the configured maximum
//! - **Configuration**: options that could not be deserialized
//!
//! # Error Construction
//!
//! Use `err_msg!` for message-only variants:
//!
//! ```rust
//! use strata::err_msg;
//! let err = err_msg!(Invariant, "Cannot close branch that is not open.");
//! assert!(matches!(err, strata::EngineError::Invariant { .. }));
//! ```

use miette::Diagnostic;
use thiserror::Error;

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Type-safe error classification enum that corresponds to `EngineError` variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// The byte source failed.
    Io,
    /// The grammar or the engine broke one of its own rules.
    Invariant,
    /// Options or grammar wiring are wrong before any byte is read.
    Configuration,
    /// A configured limit was exceeded.
    Limit,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Io => "Io",
            ErrorType::Invariant => "Invariant",
            ErrorType::Configuration => "Configuration",
            ErrorType::Limit => "Limit",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unified error type for every fatal engine condition.
#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    #[error("I/O error reading {length} byte(s) at offset {offset}")]
    #[diagnostic(
        code(strata::io),
        help("the byte source could not satisfy the read; the parse was aborted")
    )]
    Io {
        offset: u64,
        length: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("Invariant violated: {message}")]
    #[diagnostic(code(strata::invariant))]
    Invariant { message: String },

    #[error("Token reference '{name}' does not resolve to a definition")]
    #[diagnostic(
        code(strata::unresolved_token),
        help("a named reference must point at an enclosing token that carries that name")
    )]
    UnresolvedToken { name: String },

    #[error("Recursion limit of {limit} exceeded")]
    #[diagnostic(
        code(strata::recursion_limit),
        help("raise `max_depth` in the engine options or bound the grammar's nesting")
    )]
    RecursionLimit { limit: usize },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(strata::config))]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
}

impl EngineError {
    /// Returns the type-safe error classification for this error.
    pub fn error_type(&self) -> ErrorType {
        match self {
            EngineError::Io { .. } => ErrorType::Io,
            EngineError::Invariant { .. } => ErrorType::Invariant,
            EngineError::UnresolvedToken { .. } => ErrorType::Configuration,
            EngineError::RecursionLimit { .. } => ErrorType::Limit,
            EngineError::Config { .. } => ErrorType::Configuration,
        }
    }

    pub(crate) fn io(offset: u64, length: u64, source: std::io::Error) -> Self {
        EngineError::Io {
            offset,
            length,
            source,
        }
    }
}

/// Constructs a message-only `EngineError` variant with a formatted message.
///
/// Supports `Invariant` and `Config`; the latter gets no underlying source.
#[macro_export]
macro_rules! err_msg {
    (Config, $msg:expr $(, $arg:expr)* $(,)?) => {
        $crate::EngineError::Config {
            message: format!($msg $(, $arg)*),
            source: None,
        }
    };
    ($variant:ident, $msg:expr $(, $arg:expr)* $(,)?) => {
        $crate::EngineError::$variant {
            message: format!($msg $(, $arg)*),
        }
    };
}
