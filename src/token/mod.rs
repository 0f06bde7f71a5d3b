//! # Tokens
//!
//! A [`Token`] is a grammar primitive. Given an [`Environment`] it either
//! succeeds with a new environment, whose graph is extended and whose offset
//! may have moved, or fails and hands back the environment it was given.
//! Composite tokens drive their children and group what they produce in a
//! branch of the parse graph.
//!
//! Tokens are immutable and shared through `Rc`. Two tokens are equal only
//! if they are the same definition; grammars are compared by identity, not
//! by shape.
//!
//! ## Scopes
//!
//! Every named token adds its name to the scope its children are parsed in,
//! separated by `.`. A value token's own name ends that scope, so `b` inside
//! a token named `a` is bound as `a.b`.

mod composite;
mod conditional;
mod repetition;
mod structure;
mod value;

use std::fmt;
use std::rc::Rc;

use log::trace;
use num_traits::ToPrimitive;

use crate::data::{Callbacks, Environment, ParseResult, SEPARATOR};
use crate::diagnostics::{EngineError, Result};
use crate::encoding::Encoding;
use crate::expression::{Expression, ValueExpression};

/// Default nesting limit for a parse.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

// ============================================================================
// TOKEN DEFINITIONS
// ============================================================================

/// What a token does.
#[derive(Debug, Clone)]
pub enum TokenKind {
    /// Binds `size` bytes as a value, then requires `predicate` to hold.
    Def {
        size: ValueExpression,
        predicate: Expression,
    },
    /// Skips `size` bytes.
    Nod { size: ValueExpression },
    /// Every child in order.
    Seq(Vec<Token>),
    /// The first child that succeeds.
    Cho(Vec<Token>),
    /// The child as many times as it succeeds, possibly none.
    Rep(Token),
    /// The child exactly `n` times.
    RepN { token: Token, n: ValueExpression },
    /// The child as long as `predicate` holds.
    While { token: Token, predicate: Expression },
    /// The child, or nothing.
    Opt(Token),
    /// The child if `predicate` holds beforehand, nothing otherwise.
    Pre { token: Token, predicate: Expression },
    /// The child, after which `predicate` must hold.
    Post { token: Token, predicate: Expression },
    /// The child at `address`, leaving the offset where it was.
    Sub { token: Token, address: ValueExpression },
    /// The child over each value `data` yields, leaving the offset where it was.
    Tie { token: Token, data: ValueExpression },
    /// The nearest token named `reference` in the graph being built.
    TokenRef { reference: String },
}

impl TokenKind {
    pub fn label(&self) -> &'static str {
        match self {
            TokenKind::Def { .. } => "Def",
            TokenKind::Nod { .. } => "Nod",
            TokenKind::Seq(_) => "Seq",
            TokenKind::Cho(_) => "Cho",
            TokenKind::Rep(_) => "Rep",
            TokenKind::RepN { .. } => "RepN",
            TokenKind::While { .. } => "While",
            TokenKind::Opt(_) => "Opt",
            TokenKind::Pre { .. } => "Pre",
            TokenKind::Post { .. } => "Post",
            TokenKind::Sub { .. } => "Sub",
            TokenKind::Tie { .. } => "Tie",
            TokenKind::TokenRef { .. } => "TokenRef",
        }
    }
}

/// The shared definition behind a [`Token`].
#[derive(Debug)]
pub struct TokenDef {
    pub name: String,
    pub encoding: Option<Encoding>,
    pub kind: TokenKind,
}

/// A grammar primitive, cheap to clone and compared by identity.
#[derive(Clone)]
pub struct Token(Rc<TokenDef>);

impl Token {
    pub fn new(name: impl Into<String>, kind: TokenKind) -> Self {
        Self::with_encoding(name, kind, None)
    }

    /// A token whose children are parsed under `encoding` instead of the
    /// caller's.
    pub fn with_encoding(name: impl Into<String>, kind: TokenKind, encoding: Option<Encoding>) -> Self {
        Token(Rc::new(TokenDef {
            name: name.into(),
            encoding,
            kind,
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn encoding(&self) -> Option<&Encoding> {
        self.0.encoding.as_ref()
    }

    pub fn kind(&self) -> &TokenKind {
        &self.0.kind
    }

    /// Parses `env` without callbacks and with the default nesting limit.
    pub fn parse(&self, env: &Environment, encoding: &Encoding) -> Result<ParseResult> {
        let callbacks = Callbacks::new();
        self.parse_with(env, encoding, &ParseContext::new(&callbacks, DEFAULT_MAX_DEPTH))
    }

    /// Parses `env` at the top-level scope.
    pub fn parse_with(&self, env: &Environment, encoding: &Encoding, context: &ParseContext) -> Result<ParseResult> {
        self.parse_scoped("", env, encoding, context)
    }

    pub(crate) fn parse_scoped(
        &self,
        scope: &str,
        env: &Environment,
        encoding: &Encoding,
        context: &ParseContext,
    ) -> Result<ParseResult> {
        if context.depth > context.max_depth {
            return Err(EngineError::RecursionLimit {
                limit: context.max_depth,
            });
        }
        let scope = self.make_scope(scope);
        let frame = Frame {
            token: self,
            scope: &scope,
            encoding: self.0.encoding.unwrap_or(*encoding),
            context: context.nested(),
        };
        let result = match self.kind() {
            TokenKind::Def { size, predicate } => value::def(&frame, size, predicate, env),
            TokenKind::Nod { size } => value::nod(&frame, size, env),
            TokenKind::Seq(tokens) => composite::seq(&frame, tokens, env),
            TokenKind::Cho(tokens) => composite::cho(&frame, tokens, env),
            TokenKind::Rep(token) => repetition::rep(&frame, token, env),
            TokenKind::RepN { token, n } => repetition::rep_n(&frame, token, n, env),
            TokenKind::While { token, predicate } => repetition::rep_while(&frame, token, predicate, env),
            TokenKind::Opt(token) => conditional::opt(&frame, token, env),
            TokenKind::Pre { token, predicate } => conditional::pre(&frame, token, predicate, env),
            TokenKind::Post { token, predicate } => conditional::post(&frame, token, predicate, env),
            TokenKind::Sub { token, address } => structure::sub(&frame, token, address, env),
            TokenKind::Tie { token, data } => structure::tie(&frame, token, data, env),
            TokenKind::TokenRef { reference } => structure::token_ref(&frame, reference, env),
        }?;
        trace!(
            "{:?} at {}: {}",
            self,
            env.offset,
            if result.succeeded() { "success" } else { "failure" }
        );
        context.callbacks.handle(self, &result);
        Ok(result)
    }

    fn make_scope(&self, scope: &str) -> String {
        match (scope.is_empty(), self.0.name.is_empty()) {
            (_, true) => scope.to_string(),
            (true, false) => self.0.name.clone(),
            (false, false) => format!("{}{}{}", scope, SEPARATOR, self.0.name),
        }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Token {}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.name.is_empty() {
            f.write_str(self.kind().label())
        } else {
            write!(f, "{}({})", self.kind().label(), self.0.name)
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ============================================================================
// PARSE CONTEXT
// ============================================================================

/// Per-parse settings threaded through every token invocation.
#[derive(Clone, Copy)]
pub struct ParseContext<'a> {
    pub callbacks: &'a Callbacks,
    pub depth: usize,
    pub max_depth: usize,
}

impl<'a> ParseContext<'a> {
    pub fn new(callbacks: &'a Callbacks, max_depth: usize) -> Self {
        Self {
            callbacks,
            depth: 0,
            max_depth,
        }
    }

    /// Helper to increment depth for nested tokens.
    pub fn next_depth(&self) -> usize {
        self.depth + 1
    }

    fn nested(&self) -> Self {
        Self {
            depth: self.next_depth(),
            ..*self
        }
    }
}

/// The state of one token invocation, shared with the functions that
/// implement each kind.
pub(crate) struct Frame<'a> {
    token: &'a Token,
    scope: &'a str,
    encoding: Encoding,
    context: ParseContext<'a>,
}

impl Frame<'_> {
    /// Parses a child token in this frame's scope and encoding.
    fn parse(&self, child: &Token, env: &Environment) -> Result<ParseResult> {
        child.parse_scoped(self.scope, env, &self.encoding, &self.context)
    }
}

/// Evaluates `expression` expecting exactly one present, non-negative value
/// that fits in 64 bits.
fn single_count(expression: &ValueExpression, env: &Environment, encoding: &Encoding) -> Result<Option<u64>> {
    let values = expression.eval(env, encoding)?;
    if values.len() != 1 {
        return Ok(None);
    }
    match values.head() {
        Some(Some(value)) => Ok(value.as_numeric()?.to_u64()),
        _ => Ok(None),
    }
}

fn failure(env: &Environment) -> Result<ParseResult> {
    Ok(ParseResult::Failure(env.clone()))
}

fn success(env: Environment) -> Result<ParseResult> {
    Ok(ParseResult::Success(env))
}
