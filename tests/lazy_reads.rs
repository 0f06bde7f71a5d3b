//! Bytes are read only when something interprets them, and at most once.

mod common;

use common::TrackingStream;
use strata::builder::*;
use strata::{Environment, Slice, Source};

fn tracked(bytes: &[u8]) -> (Environment, std::rc::Rc<std::cell::Cell<usize>>) {
    let stream = TrackingStream::new(bytes);
    let reads = stream.counter();
    (Environment::new(Source::from_stream(stream)), reads)
}

#[test]
fn unconditional_fields_are_not_read() {
    let (start, reads) = tracked(&[0; 1024]);
    let grammar = seq("", vec![def("header", con(16)), def("body", con(1000))]);
    let result = strata::parse(&grammar, &start).unwrap().success().unwrap();
    assert_eq!(result.offset, 1016);
    assert_eq!(reads.get(), 0);

    let body = result.graph.get("body").unwrap();
    assert!(!body.slice().is_materialized());
    assert_eq!(body.bytes().unwrap().len(), 1000);
    assert_eq!(reads.get(), 1);
}

#[test]
fn sizes_read_only_the_fields_they_name() {
    let (start, reads) = tracked(&[2, 0xAA, 0xBB, 0xCC]);
    let grammar = seq("", vec![def("length", con(1)), def("data", reference("length"))]);
    let result = strata::parse(&grammar, &start).unwrap().success().unwrap();
    assert_eq!(reads.get(), 1);
    assert_eq!(result.offset, 3);
}

#[test]
fn materialised_bytes_are_cached_across_clones() {
    let (start, reads) = tracked(&[1, 2, 3, 4]);
    let result = strata::parse(&def("all", con(4)), &start).unwrap().success().unwrap();
    let value = result.graph.get("all").unwrap().clone();
    let copy = value.clone();
    assert_eq!(&*value.bytes().unwrap(), &[1, 2, 3, 4]);
    assert_eq!(&*copy.bytes().unwrap(), &[1, 2, 3, 4]);
    assert_eq!(reads.get(), 1);
}

#[test]
fn prefix_reads_are_bounded() {
    let stream = TrackingStream::new(&[9; 64]);
    let reads = stream.counter();
    let slice = Slice::create(Source::from_stream(stream), 8, 32).unwrap().unwrap();
    assert_eq!(slice.data_prefix(4).unwrap(), vec![9; 4]);
    assert!(!slice.is_materialized());
    assert_eq!(reads.get(), 1);
}

#[test]
fn unavailable_ranges_fail_the_token_without_reading() {
    let (start, reads) = tracked(&[1, 2]);
    assert!(!strata::parse(&def("too_long", con(3)), &start).unwrap().succeeded());
    assert_eq!(reads.get(), 0);
}
