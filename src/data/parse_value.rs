use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use crate::data::{ParseGraph, Slice};
use crate::encoding::Encoding;
use crate::token::Token;
use crate::value::Value;

/// Separator between the scopes of a dotted value name.
pub const SEPARATOR: char = '.';

/// A named leaf binding, created exactly once when a value token succeeds.
///
/// `offset` and `sequence_id` are independent: the first says where in the
/// input the bytes are, the second in which order they were bound.
#[derive(Clone, PartialEq)]
pub struct ParseValue {
    name: Rc<str>,
    definition: Token,
    value: Value,
    sequence_id: u64,
}

impl ParseValue {
    pub fn new(
        name: impl Into<Rc<str>>,
        definition: Token,
        slice: Slice,
        encoding: Encoding,
        sequence_id: u64,
    ) -> Self {
        Self {
            name: name.into(),
            definition,
            value: Value::from_slice(slice, encoding),
            sequence_id,
        }
    }

    /// Full dotted name, scope included.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The enclosing scope, empty at top level.
    pub fn scope(&self) -> &str {
        self.name
            .rsplit_once(SEPARATOR)
            .map_or("", |(scope, _)| scope)
    }

    /// Whether `name` equals this value's full name or one of its dotted suffixes.
    pub fn matches(&self, name: &str) -> bool {
        match self.name.strip_suffix(name) {
            Some(prefix) => prefix.is_empty() || prefix.ends_with(SEPARATOR),
            None => false,
        }
    }

    pub fn definition(&self) -> &Token {
        &self.definition
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn offset(&self) -> u64 {
        self.value.slice().offset()
    }

    pub fn size(&self) -> u64 {
        self.value.length()
    }

    pub fn sequence_id(&self) -> u64 {
        self.sequence_id
    }
}

impl Deref for ParseValue {
    type Target = Value;

    fn deref(&self) -> &Value {
        &self.value
    }
}

impl fmt::Debug for ParseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pval({}:{:?})", self.name, self.value)
    }
}

/// A back-pointer to a subgraph that is already present, by its offset.
///
/// Appended instead of parsing the same structure again; resolving it is a
/// graph lookup, never a re-parse.
#[derive(Clone, PartialEq)]
pub struct ParseReference {
    location: u64,
    definition: Token,
}

impl ParseReference {
    pub fn new(location: u64, definition: Token) -> Self {
        Self {
            location,
            definition,
        }
    }

    pub fn location(&self) -> u64 {
        self.location
    }

    pub fn definition(&self) -> &Token {
        &self.definition
    }

    /// The graph this reference points at within `root`, if any.
    pub fn resolve(&self, root: &ParseGraph) -> Option<ParseGraph> {
        root.graph_at(self.location)
    }
}

impl fmt::Debug for ParseReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ref(@{})", self.location)
    }
}
