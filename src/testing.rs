//! Shared helpers for unit tests.

use crate::builder::any;
use crate::data::{Environment, ParseValue, Slice, Source};
use crate::encoding::Encoding;
use crate::value::OptionalValueList;

/// An environment in which every byte of `data` is bound, in order, under `name`.
pub(crate) fn bound(name: &str, data: Vec<u8>) -> Environment {
    let source = Source::from_bytes(data.clone());
    let token = any(name);
    (0..data.len() as u64).fold(Environment::new(source.clone()), |env, offset| {
        let slice = Slice::create(source.clone(), offset, 1).unwrap().unwrap();
        let value = ParseValue::new(name, token.clone(), slice, Encoding::default(), env.next_sequence_id());
        env.add_value(value).seek(offset + 1)
    })
}

/// Numeric interpretation of every element, `None` where absent.
pub(crate) fn numbers(list: &OptionalValueList) -> Vec<Option<i64>> {
    list.iter()
        .map(|v| v.as_ref().map(|v| i64::try_from(v.as_numeric().unwrap()).unwrap()))
        .collect()
}
