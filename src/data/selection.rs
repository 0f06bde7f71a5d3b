//! Queries over a parse graph by defining token and by item kind.
//!
//! Name-based lookups live on [`ParseGraph`] itself; the functions here
//! serve tools that inspect a finished trace.

use crate::data::{ParseGraph, ParseItem, ParseValue};
use crate::diagnostics::Result;
use crate::token::Token;

/// The most recent item produced by `definition`; the graph itself if it was.
pub fn get(graph: &ParseGraph, definition: &Token) -> Option<ParseItem> {
    if graph.definition() == Some(definition) {
        return Some(ParseItem::Graph(graph.clone()));
    }
    graph
        .items()
        .find(|item| item.definition() == Some(definition))
        .cloned()
}

/// Every item produced by `definition`, most recent first.
pub fn get_all(graph: &ParseGraph, definition: &Token) -> Vec<ParseItem> {
    let root = (graph.definition() == Some(definition)).then(|| ParseItem::Graph(graph.clone()));
    root.into_iter()
        .chain(
            graph
                .items()
                .filter(|item| item.definition() == Some(definition))
                .cloned(),
        )
        .collect()
}

/// Every value produced by `definition`, most recent first.
pub fn get_all_values(graph: &ParseGraph, definition: &Token) -> Vec<ParseValue> {
    graph
        .items()
        .filter_map(ParseItem::as_value)
        .filter(|value| value.definition() == definition)
        .cloned()
        .collect()
}

/// Items produced by `definition` whose directly enclosing graph was not.
pub fn get_all_roots(graph: &ParseGraph, definition: &Token) -> Vec<ParseItem> {
    let root = (graph.definition() == Some(definition)).then(|| ParseItem::Graph(graph.clone()));
    root.into_iter()
        .chain(
            graph
                .items_with_parent()
                .filter(|(parent, item)| {
                    item.definition() == Some(definition) && parent.definition() != Some(definition)
                })
                .map(|(_, item)| item.clone()),
        )
        .collect()
}

/// The graph every reference in `graph` points at, most recent first.
///
/// A reference that does not resolve is an invariant violation.
pub fn get_references(graph: &ParseGraph) -> Result<Vec<ParseGraph>> {
    graph
        .items()
        .filter_map(ParseItem::as_reference)
        .map(|reference| {
            reference.resolve(graph).ok_or_else(|| {
                crate::err_msg!(
                    Invariant,
                    "A reference must point to an existing graph (offset {}).",
                    reference.location()
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::any;
    use crate::data::{ParseReference, Slice, Source};
    use crate::encoding::Encoding;

    fn value(offset: u64, token: &Token) -> ParseValue {
        let slice = Slice::create(Source::from_bytes(vec![0; 8]), offset, 1).unwrap().unwrap();
        ParseValue::new(token.name(), token.clone(), slice, Encoding::default(), offset)
    }

    #[test]
    fn roots_skip_directly_nested_occurrences() {
        let (outer, leaf) = (any("outer"), any("leaf"));
        let graph = ParseGraph::empty()
            .add_branch(outer.clone())
            .add_value(value(0, &leaf))
            .add_branch(outer.clone())
            .add_value(value(1, &leaf))
            .close_branch()
            .unwrap()
            .close_branch()
            .unwrap();
        assert_eq!(get_all(&graph, &outer).len(), 2);
        assert_eq!(get_all_roots(&graph, &outer).len(), 1);
        assert_eq!(get_all_values(&graph, &leaf).len(), 2);
        assert!(matches!(get(&graph, &outer), Some(ParseItem::Graph(_))));
        assert!(get(&graph, &any("other")).is_none());
    }

    #[test]
    fn unresolvable_reference_is_fatal() {
        let t = any("t");
        let graph = ParseGraph::empty()
            .add_value(value(0, &t))
            .add_reference(ParseReference::new(0, t.clone()));
        assert_eq!(get_references(&graph).unwrap().len(), 1);

        let dangling = graph.add_reference(ParseReference::new(5, t));
        assert!(get_references(&dangling).is_err());
    }
}
