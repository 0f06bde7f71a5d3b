//! # Engine
//!
//! The top-level entry point: a grammar's root token applied to an initial
//! environment, under a set of [`EngineOptions`] and optional [`Callbacks`].
//!
//! ```rust
//! use strata::builder::{con, def, reference, seq};
//! use strata::{Engine, Environment, Source};
//!
//! let grammar = seq("record", vec![def("length", con(1)), def("body", reference("length"))]);
//! let env = Environment::new(Source::from_bytes(vec![2, b'h', b'i']));
//! let parsed = Engine::default().parse(&grammar, &env).unwrap().success().unwrap();
//! assert_eq!(parsed.graph.get("record.body").unwrap().as_string().unwrap(), "hi");
//! ```
//!
//! A failed parse hands back the environment it was given and exposes no
//! partial graph. Tooling that needs to see why a parse failed registers
//! callbacks instead.

use log::debug;

use crate::config::EngineOptions;
use crate::data::{Callbacks, Environment, ParseResult, Source};
use crate::diagnostics::Result;
use crate::token::{ParseContext, Token};

// ============================================================================
// ENGINE
// ============================================================================

#[derive(Debug, Default)]
pub struct Engine {
    options: EngineOptions,
    callbacks: Callbacks,
}

impl Engine {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            options,
            callbacks: Callbacks::new(),
        }
    }

    /// Replaces the callbacks invoked after every token attempt.
    pub fn with_callbacks(self, callbacks: Callbacks) -> Self {
        Self { callbacks, ..self }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn callbacks(&self) -> &Callbacks {
        &self.callbacks
    }

    /// Parses `env` with `token` as the root of the grammar.
    pub fn parse(&self, token: &Token, env: &Environment) -> Result<ParseResult> {
        let context = ParseContext::new(&self.callbacks, self.options.max_depth);
        let result = token.parse_with(env, &self.options.encoding, &context)?;
        debug!(
            "{:?} from offset {}: {}",
            token,
            env.offset,
            if result.succeeded() { "parsed" } else { "no match" }
        );
        Ok(result)
    }

    /// Parses an in-memory buffer from its first byte.
    pub fn parse_bytes(&self, token: &Token, bytes: impl Into<std::rc::Rc<[u8]>>) -> Result<ParseResult> {
        self.parse(token, &Environment::new(Source::from_bytes(bytes)))
    }
}

/// Parses `env` with `token` using default options and no callbacks.
pub fn parse(token: &Token, env: &Environment) -> Result<ParseResult> {
    Engine::default().parse(token, env)
}
