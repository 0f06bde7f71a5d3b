//! Jumps to other offsets, and the back-references that keep cyclic data
//! from being parsed forever.

mod common;

use std::cell::Cell;
use std::rc::Rc;

use num_bigint::BigInt;

use common::{env, parsed, run};
use strata::builder::*;
use strata::data::selection::{get_all, get_references};
use strata::{Callbacks, Engine, EngineOptions, Environment, ParseGraph, ParseItem, Source, Token};

/// A node of a linked list: a zero header, the offset of the next node and
/// a footer of one. The next node is optional, so a dangling pointer ends
/// the list.
fn linked_list() -> Token {
    seq(
        "linkedlist",
        vec![
            def_with("header", con(1), eq_num(con(0))),
            def("next", con(1)),
            opt("", sub_struct(token("linkedlist"), last(reference("next")))),
            def_with("footer", con(1), eq_num(con(1))),
        ],
    )
}

fn nested_graph(item: Option<&ParseItem>) -> ParseGraph {
    item.and_then(ParseItem::as_graph).cloned().expect("graph item")
}

/// The node graph a `next` pointer leads to: opt branch, sub branch, node.
fn followed(node: &ParseGraph) -> ParseItem {
    let opt = nested_graph(node.tail().head());
    let sub = nested_graph(opt.head());
    sub.head().cloned().expect("sub branch is not empty")
}

fn check_value(item: Option<&ParseItem>, expected: i64, offset: u64) {
    let value = item.and_then(ParseItem::as_value).expect("value item");
    assert_eq!(value.as_numeric().unwrap(), BigInt::from(expected));
    assert_eq!(value.offset(), offset);
}

/// A node that followed its `next` pointer.
fn check_branch(node: &ParseGraph, offset: u64, next: i64) {
    check_value(node.head(), 1, offset + 2);
    check_value(node.tail().tail().head(), next, offset + 1);
    check_value(node.tail().tail().tail().head(), 0, offset);
}

/// A node whose `next` pointer led nowhere.
fn check_leaf(node: &ParseGraph, offset: u64, next: i64) {
    check_value(node.head(), 1, offset + 2);
    check_value(node.tail().head(), next, offset + 1);
    check_value(node.tail().tail().head(), 0, offset);
}

#[test]
fn linked_list_without_cycles() {
    // offset: 0  1  2   3  4   5  6   7  8  9 10
    // nodes:  0..2 -> 8..10 -> 4..6 -> (12, out of range)
    let result = parsed(&linked_list(), &[0, 8, 1, 42, 0, 12, 1, 84, 0, 4, 1]);
    let graph = &result.graph;
    assert!(get_references(graph).unwrap().is_empty());

    let first = nested_graph(graph.head());
    check_branch(&first, 0, 8);

    let second = nested_graph(Some(&followed(&first)));
    check_branch(&second, 8, 4);

    let third = nested_graph(Some(&followed(&second)));
    check_leaf(&third, 4, 12);
    assert_eq!(result.offset, 3);
}

#[test]
fn self_reference_is_a_single_reference() {
    let grammar = linked_list();
    let result = parsed(&grammar, &[0, 0, 1]);
    let graph = &result.graph;
    assert_eq!(get_references(graph).unwrap().len(), 1);
    assert_eq!(get_all(graph, &grammar).len(), 1);

    let first = nested_graph(graph.head());
    check_branch(&first, 0, 0);

    let reference = followed(&first);
    let target = reference.as_reference().expect("reference item").resolve(graph).unwrap();
    check_branch(&target, 0, 0);
}

fn start_cycle(offset: u64) -> ParseGraph {
    let start = Environment::at(Source::from_bytes(vec![0, 4, 1, 21, 0, 0, 1]), offset);
    let result = strata::parse(&linked_list(), &start).unwrap().success().unwrap();
    assert_eq!(get_references(&result.graph).unwrap().len(), 1);
    result.graph
}

#[test]
fn cycle_back_to_the_first_node() {
    let graph = start_cycle(0);
    let first = nested_graph(graph.head());
    check_branch(&first, 0, 4);

    let second = nested_graph(Some(&followed(&first)));
    check_branch(&second, 4, 0);

    let reference = followed(&second);
    let target = reference.as_reference().unwrap().resolve(&graph).unwrap();
    check_branch(&target, 0, 4);
}

#[test]
fn cycle_back_to_a_higher_offset() {
    let graph = start_cycle(4);
    let first = nested_graph(graph.head());
    check_branch(&first, 4, 0);

    let second = nested_graph(Some(&followed(&first)));
    check_branch(&second, 0, 4);

    let reference = followed(&second);
    let target = reference.as_reference().unwrap().resolve(&graph).unwrap();
    check_branch(&target, 4, 0);
}

#[test]
fn every_jump_attempt_parses_at_most_once() {
    let grammar = linked_list();
    let jumps = Rc::new(Cell::new(0));
    let counter = Rc::clone(&jumps);
    let callbacks = Callbacks::new().with_generic(move |token, _| {
        if format!("{:?}", token) == "Sub" {
            counter.set(counter.get() + 1);
        }
    });
    let engine = Engine::new(EngineOptions::default()).with_callbacks(callbacks);
    let result = engine
        .parse(&grammar, &Environment::new(Source::from_bytes(vec![0, 4, 1, 21, 0, 0, 1])))
        .unwrap()
        .success()
        .unwrap();
    // Two nodes, two jumps: the second jump is answered with a reference.
    assert_eq!(jumps.get(), 2);
    assert_eq!(get_all(&result.graph, &grammar).len(), 2);
}

#[test]
fn sub_fails_on_missing_or_absent_address() {
    assert!(!run(&sub_struct(any("a"), reference("b")), &[1, 2, 3, 4]).succeeded());
    assert!(!run(&sub_struct(any("a"), cat(con(0), empty())), &[1, 2, 3, 4]).succeeded());
}

#[test]
fn sub_fails_on_many_addresses() {
    let start = env(&[0, 1, 2]);
    let grammar = seq("", vec![any("p"), any("p"), sub_struct(any("t"), reference("p"))]);
    let result = strata::parse(&grammar, &start).unwrap();
    assert!(!result.succeeded());
    assert_eq!(result.environment(), &start);
}

#[test]
fn sub_leaves_the_offset_after_the_pointer() {
    let grammar = seq("", vec![any("pointer"), sub_struct(def("target", con(2)), reference("pointer"))]);
    let result = parsed(&grammar, &[3, 0, 0, 0xAB, 0xCD]);
    assert_eq!(result.offset, 1);
    let target = result.graph.get("target").unwrap();
    assert_eq!(target.offset(), 3);
    assert_eq!(&*target.bytes().unwrap(), &[0xAB, 0xCD]);
}

#[test]
fn failed_sub_returns_the_original_environment() {
    let start = env(&[9]);
    let grammar = sub_struct(any("target"), con(5));
    let result = strata::parse(&grammar, &start).unwrap();
    assert!(!result.succeeded());
    assert_eq!(result.environment(), &start);
}
