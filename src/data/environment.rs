use std::fmt;

use crate::data::{ParseGraph, ParseReference, ParseValue, Source};
use crate::diagnostics::Result;
use crate::token::Token;

/// The immutable state threaded through a parse.
///
/// Every step produces a new environment; none is ever changed in place.
/// `sequence_id` grows by one with each graph operation and records the
/// order in which items were produced.
#[derive(Clone)]
pub struct Environment {
    pub graph: ParseGraph,
    pub source: Source,
    pub offset: u64,
    pub sequence_id: u64,
}

impl Environment {
    /// A fresh environment at the start of `source`.
    pub fn new(source: Source) -> Self {
        Self::at(source, 0)
    }

    /// A fresh environment positioned at `offset`.
    pub fn at(source: Source, offset: u64) -> Self {
        Self {
            graph: ParseGraph::empty(),
            source,
            offset,
            sequence_id: 0,
        }
    }

    /// The sequence id the next bound item receives.
    pub fn next_sequence_id(&self) -> u64 {
        self.sequence_id + 1
    }

    fn step(&self, graph: ParseGraph, offset: u64) -> Self {
        Self {
            graph,
            source: self.source.clone(),
            offset,
            sequence_id: self.next_sequence_id(),
        }
    }

    pub fn add_value(&self, value: ParseValue) -> Self {
        self.step(self.graph.add_value(value), self.offset)
    }

    pub fn add_reference(&self, reference: ParseReference) -> Self {
        self.step(self.graph.add_reference(reference), self.offset)
    }

    pub fn add_branch(&self, definition: &Token) -> Self {
        self.step(self.graph.add_branch(definition.clone()), self.offset)
    }

    pub fn close_branch(&self) -> Result<Self> {
        Ok(self.step(self.graph.close_branch()?, self.offset))
    }

    /// Moves the cursor without touching the graph.
    pub fn seek(&self, offset: u64) -> Self {
        Self {
            offset,
            ..self.clone()
        }
    }

    /// Continues on another source at `offset`, keeping the graph.
    pub fn with_source(&self, source: Source, offset: u64) -> Self {
        Self {
            source,
            offset,
            ..self.clone()
        }
    }
}

impl PartialEq for Environment {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset
            && self.sequence_id == other.sequence_id
            && self.source.same_as(&other.source)
            && self.graph == other.graph
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "source: {:?}; offset: {}; graph: {:?}",
            self.source, self.offset, self.graph
        )
    }
}

/// Outcome of a token attempt.
///
/// A failure always carries the environment the token was given, unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseResult {
    Success(Environment),
    Failure(Environment),
}

impl ParseResult {
    pub fn succeeded(&self) -> bool {
        matches!(self, ParseResult::Success(_))
    }

    pub fn environment(&self) -> &Environment {
        match self {
            ParseResult::Success(environment) | ParseResult::Failure(environment) => environment,
        }
    }

    pub fn into_environment(self) -> Environment {
        match self {
            ParseResult::Success(environment) | ParseResult::Failure(environment) => environment,
        }
    }

    /// The resulting environment, if the attempt succeeded.
    pub fn success(self) -> Option<Environment> {
        match self {
            ParseResult::Success(environment) => Some(environment),
            ParseResult::Failure(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::any;

    #[test]
    fn every_graph_step_advances_sequence() {
        let t = any("t");
        let env = Environment::new(Source::from_bytes(vec![1, 2]));
        let branched = env.add_branch(&t);
        assert_eq!(branched.sequence_id, 1);
        let closed = branched.close_branch().unwrap();
        assert_eq!(closed.sequence_id, 2);
        assert_eq!(closed.seek(1).sequence_id, 2);
        assert_eq!(env.sequence_id, 0);
    }

    #[test]
    fn closing_without_branch_is_fatal() {
        let env = Environment::new(Source::from_bytes(vec![]));
        assert!(env.close_branch().is_err());
    }

    #[test]
    fn result_accessors() {
        let env = Environment::at(Source::from_bytes(vec![1]), 1);
        let failure = ParseResult::Failure(env.clone());
        assert!(!failure.succeeded());
        assert_eq!(failure.environment(), &env);
        assert!(failure.success().is_none());
        assert_eq!(ParseResult::Success(env.clone()).success(), Some(env));
    }
}
