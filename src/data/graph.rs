//! # Parse Graph
//!
//! The parse graph is the trace of a parse: a persistent cons-list whose
//! items are bound values, nested graphs and back-references. Every
//! operation returns a new graph and shares the untouched nodes with the old
//! one, so a failed attempt is rolled back by simply dropping it.
//!
//! ## Branches
//!
//! Composite tokens group the items they produce by opening a *branch*: an
//! empty nested graph pushed as the new head and flagged open. While a
//! branch is open, every addition is delegated to the innermost open branch.
//! `close_branch` clears the flag of that innermost branch.
//!
//! All traversals below walk an explicit stack; none of them recurse through
//! the tail of a graph.

use std::fmt;
use std::rc::Rc;

use crate::data::{ParseReference, ParseValue};
use crate::diagnostics::Result;
use crate::token::Token;

// ============================================================================
// ITEMS
// ============================================================================

/// One entry in a parse graph.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseItem {
    Value(ParseValue),
    Graph(ParseGraph),
    Reference(ParseReference),
}

impl ParseItem {
    pub fn is_value(&self) -> bool {
        matches!(self, ParseItem::Value(_))
    }

    pub fn is_graph(&self) -> bool {
        matches!(self, ParseItem::Graph(_))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, ParseItem::Reference(_))
    }

    pub fn as_value(&self) -> Option<&ParseValue> {
        match self {
            ParseItem::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_graph(&self) -> Option<&ParseGraph> {
        match self {
            ParseItem::Graph(graph) => Some(graph),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&ParseReference> {
        match self {
            ParseItem::Reference(reference) => Some(reference),
            _ => None,
        }
    }

    /// The token that produced this item.
    pub fn definition(&self) -> Option<&Token> {
        match self {
            ParseItem::Value(value) => Some(value.definition()),
            ParseItem::Graph(graph) => graph.definition(),
            ParseItem::Reference(reference) => Some(reference.definition()),
        }
    }
}

// ============================================================================
// GRAPH
// ============================================================================

struct GraphNode {
    head: ParseItem,
    tail: ParseGraph,
    branched: bool,
    size: usize,
}

/// A persistent, append-at-head list of [`ParseItem`]s.
///
/// The empty graph is the only terminal. Cloning is O(1).
#[derive(Clone, Default)]
pub struct ParseGraph {
    definition: Option<Token>,
    node: Option<Rc<GraphNode>>,
}

impl ParseGraph {
    pub fn empty() -> Self {
        Self::default()
    }

    /// An empty graph produced by `definition`.
    pub fn with_definition(definition: Token) -> Self {
        Self {
            definition: Some(definition),
            node: None,
        }
    }

    pub fn definition(&self) -> Option<&Token> {
        self.definition.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.node.is_none()
    }

    /// Number of direct items.
    pub fn len(&self) -> usize {
        self.node.as_ref().map_or(0, |node| node.size)
    }

    /// The most recently added direct item.
    pub fn head(&self) -> Option<&ParseItem> {
        self.node.as_deref().map(|node| &node.head)
    }

    /// Everything but the head; the empty graph stays empty.
    pub fn tail(&self) -> ParseGraph {
        match self.node.as_deref() {
            Some(node) => node.tail.clone(),
            None => self.clone(),
        }
    }

    /// Whether this graph's head is an open branch.
    pub fn is_branched(&self) -> bool {
        self.node.as_deref().is_some_and(|node| node.branched)
    }

    // ------------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------------

    pub fn add_value(&self, value: ParseValue) -> ParseGraph {
        self.add_innermost(ParseItem::Value(value), false)
    }

    pub fn add_reference(&self, reference: ParseReference) -> ParseGraph {
        self.add_innermost(ParseItem::Reference(reference), false)
    }

    /// Opens a new branch produced by `definition` inside the innermost open branch.
    pub fn add_branch(&self, definition: Token) -> ParseGraph {
        self.add_innermost(ParseItem::Graph(ParseGraph::with_definition(definition)), true)
    }

    /// Seals the innermost open branch.
    pub fn close_branch(&self) -> Result<ParseGraph> {
        let (mut path, _) = self.open_path();
        let Some(innermost) = path.pop() else {
            return Err(crate::err_msg!(Invariant, "Cannot close branch that is not open."));
        };
        let head = innermost.head().cloned().unwrap_or_else(|| ParseItem::Graph(ParseGraph::empty()));
        let closed = innermost.with_head(head, false);
        Ok(Self::rebuild(path, closed))
    }

    fn add_innermost(&self, item: ParseItem, branched: bool) -> ParseGraph {
        let (path, target) = self.open_path();
        Self::rebuild(path, target.prepend(item, branched))
    }

    /// The chain of open graphs from `self` inwards, and the graph the next
    /// item belongs to.
    fn open_path(&self) -> (Vec<&ParseGraph>, &ParseGraph) {
        let mut path = Vec::new();
        let mut graph = self;
        while let Some(node) = graph.node.as_deref().filter(|node| node.branched) {
            let ParseItem::Graph(inner) = &node.head else {
                break;
            };
            path.push(graph);
            graph = inner;
        }
        (path, graph)
    }

    /// Re-links `inner` under each open graph of `path`, innermost first.
    fn rebuild(path: Vec<&ParseGraph>, inner: ParseGraph) -> ParseGraph {
        path.into_iter()
            .rev()
            .fold(inner, |inner, outer| outer.with_head(ParseItem::Graph(inner), true))
    }

    fn prepend(&self, head: ParseItem, branched: bool) -> ParseGraph {
        ParseGraph {
            definition: self.definition.clone(),
            node: Some(Rc::new(GraphNode {
                head,
                tail: self.clone(),
                branched,
                size: self.len() + 1,
            })),
        }
    }

    fn with_head(&self, head: ParseItem, branched: bool) -> ParseGraph {
        self.tail().prepend(head, branched)
    }

    // ------------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------------

    /// Direct items, most recent first.
    pub fn iter(&self) -> Iter<'_> {
        Iter { graph: self }
    }

    /// Every item at any depth, depth-first, most recent first. A nested
    /// graph is yielded before its own items.
    pub fn items(&self) -> Items<'_> {
        Items { stack: vec![self] }
    }

    /// Like [`items`](Self::items), paired with the graph directly holding each item.
    pub(crate) fn items_with_parent(&self) -> ItemsWithParent<'_> {
        ItemsWithParent { stack: vec![self] }
    }

    /// This graph followed by every nested graph.
    pub fn graphs(&self) -> impl Iterator<Item = &ParseGraph> {
        std::iter::once(self).chain(self.items().filter_map(ParseItem::as_graph))
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// The most recently bound value matching `name`.
    pub fn get(&self, name: &str) -> Option<&ParseValue> {
        self.values().find(|value| value.matches(name))
    }

    /// Every value matching `name`, most recent first.
    pub fn get_all(&self, name: &str) -> Vec<&ParseValue> {
        self.values().filter(|value| value.matches(name)).collect()
    }

    /// The most recently bound value. References are skipped.
    pub fn current(&self) -> Option<&ParseValue> {
        self.values().next()
    }

    /// All values at any depth, most recent first.
    pub fn flatten(&self) -> Vec<&ParseValue> {
        self.values().collect()
    }

    fn values(&self) -> impl Iterator<Item = &ParseValue> {
        self.items().filter_map(ParseItem::as_value)
    }

    /// The direct value with the lowest offset; nested graphs are not searched.
    pub fn lowest_offset_value(&self) -> Option<&ParseValue> {
        self.iter()
            .filter_map(ParseItem::as_value)
            .fold(None, |lowest: Option<&ParseValue>, value| match lowest {
                Some(lowest) if lowest.offset() < value.offset() => Some(lowest),
                _ => Some(value),
            })
    }

    pub fn has_graph_at(&self, offset: u64) -> bool {
        self.graphs().any(|graph| starts_at(graph, offset))
    }

    /// The earliest graph, this one included, whose lowest direct value sits at `offset`.
    pub fn graph_at(&self, offset: u64) -> Option<ParseGraph> {
        self.graphs()
            .filter(|graph| starts_at(graph, offset))
            .last()
            .cloned()
    }
}

fn starts_at(graph: &ParseGraph, offset: u64) -> bool {
    graph
        .lowest_offset_value()
        .is_some_and(|value| value.offset() == offset)
}

impl Drop for ParseGraph {
    fn drop(&mut self) {
        // Unlink uniquely owned tails one at a time instead of recursively.
        let mut next = self.node.take();
        while let Some(node) = next {
            match Rc::try_unwrap(node) {
                Ok(mut node) => next = node.tail.node.take(),
                Err(_) => break,
            }
        }
    }
}

impl PartialEq for ParseGraph {
    fn eq(&self, other: &Self) -> bool {
        let (mut left, mut right) = (self, other);
        loop {
            if left.definition != right.definition {
                return false;
            }
            match (left.node.as_ref(), right.node.as_ref()) {
                (None, None) => return true,
                (Some(a), Some(b)) if Rc::ptr_eq(a, b) => return true,
                (Some(a), Some(b)) => {
                    if a.size != b.size || a.branched != b.branched || a.head != b.head {
                        return false;
                    }
                    left = &a.tail;
                    right = &b.tail;
                }
                _ => return false,
            }
        }
    }
}

impl fmt::Debug for ParseGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_branched() {
            f.write_str("open ")?;
        }
        f.debug_list().entries(self.iter()).finish()
    }
}

// ============================================================================
// ITERATORS
// ============================================================================

/// Direct items of a graph, most recent first.
pub struct Iter<'a> {
    graph: &'a ParseGraph,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a ParseItem;

    fn next(&mut self) -> Option<&'a ParseItem> {
        let node = self.graph.node.as_deref()?;
        self.graph = &node.tail;
        Some(&node.head)
    }
}

/// Depth-first walk over every item of a graph.
pub struct Items<'a> {
    stack: Vec<&'a ParseGraph>,
}

impl<'a> Iterator for Items<'a> {
    type Item = &'a ParseItem;

    fn next(&mut self) -> Option<&'a ParseItem> {
        while let Some(graph) = self.stack.pop() {
            let Some(node) = graph.node.as_deref() else {
                continue;
            };
            self.stack.push(&node.tail);
            if let ParseItem::Graph(inner) = &node.head {
                self.stack.push(inner);
            }
            return Some(&node.head);
        }
        None
    }
}

pub(crate) struct ItemsWithParent<'a> {
    stack: Vec<&'a ParseGraph>,
}

impl<'a> Iterator for ItemsWithParent<'a> {
    type Item = (&'a ParseGraph, &'a ParseItem);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(graph) = self.stack.pop() {
            let Some(node) = graph.node.as_deref() else {
                continue;
            };
            self.stack.push(&node.tail);
            if let ParseItem::Graph(inner) = &node.head {
                self.stack.push(inner);
            }
            return Some((graph, &node.head));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::any;
    use crate::data::Slice;
    use crate::encoding::Encoding;

    fn value(name: &str, offset: u64, token: &Token) -> ParseValue {
        let source = crate::data::Source::from_bytes(vec![0; 16]);
        let slice = Slice::create(source, offset, 1).unwrap().unwrap();
        ParseValue::new(name, token.clone(), slice, Encoding::default(), offset)
    }

    #[test]
    fn additions_go_into_innermost_open_branch() {
        let t = any("t");
        let graph = ParseGraph::empty()
            .add_value(value("a", 0, &t))
            .add_branch(t.clone())
            .add_value(value("b", 1, &t))
            .add_branch(t.clone())
            .add_value(value("c", 2, &t));
        assert_eq!(graph.len(), 2);
        let inner = graph.head().and_then(ParseItem::as_graph).unwrap();
        assert!(inner.is_branched());
        assert_eq!(inner.len(), 2);

        let graph = graph.close_branch().unwrap();
        assert!(graph.is_branched());
        let graph = graph.close_branch().unwrap();
        assert!(!graph.is_branched());
        assert!(graph.close_branch().is_err());
        assert_eq!(graph.current().map(ParseValue::name), Some("c"));
    }

    #[test]
    fn closing_leaves_original_untouched() {
        let t = any("t");
        let open = ParseGraph::empty().add_branch(t.clone()).add_value(value("a", 0, &t));
        let closed = open.close_branch().unwrap();
        assert!(open.is_branched());
        assert!(!closed.is_branched());
        assert_ne!(open, closed);
    }

    #[test]
    fn lowest_offset_ignores_nested_values() {
        let t = any("t");
        let graph = ParseGraph::empty()
            .add_value(value("a", 5, &t))
            .add_branch(t.clone())
            .add_value(value("b", 1, &t))
            .close_branch()
            .unwrap()
            .add_value(value("c", 3, &t));
        assert_eq!(graph.lowest_offset_value().map(ParseValue::offset), Some(3));
        assert!(graph.has_graph_at(1));
        assert!(graph.has_graph_at(3));
        assert!(!graph.has_graph_at(5));
    }

    #[test]
    fn get_returns_latest_binding() {
        let t = any("t");
        let graph = ParseGraph::empty()
            .add_value(value("x", 0, &t))
            .add_value(value("x", 1, &t));
        assert_eq!(graph.get("x").map(ParseValue::offset), Some(1));
        let all: Vec<u64> = graph.get_all("x").into_iter().map(ParseValue::offset).collect();
        assert_eq!(all, vec![1, 0]);
        assert!(graph.get("y").is_none());
    }

    #[test]
    fn long_graphs_drop_without_overflow() {
        let t = any("t");
        let item = value("v", 0, &t);
        let mut graph = ParseGraph::empty();
        for _ in 0..200_000 {
            graph = graph.add_value(item.clone());
        }
        assert_eq!(graph.len(), 200_000);
        assert_eq!(graph.flatten().len(), 200_000);
        drop(graph);
    }
}
