//! Lookups into the parse graph and structural list operations.

use num_bigint::BigInt;
use num_traits::ToPrimitive;

use crate::data::{selection, Environment};
use crate::diagnostics::Result;
use crate::encoding::Encoding;
use crate::token::Token;
use crate::value::{from_numeric, OptionalValue, OptionalValueList, Value};

pub(super) fn by_name(env: &Environment, name: &str) -> OptionalValueList {
    env.graph
        .get_all(name)
        .into_iter()
        .map(|value| Some(value.value().clone()))
        .collect()
}

pub(super) fn by_definition(env: &Environment, definition: &Token) -> OptionalValueList {
    selection::get_all_values(&env.graph, definition)
        .into_iter()
        .map(|value| Some(value.value().clone()))
        .collect()
}

pub(super) fn current(env: &Environment) -> OptionalValueList {
    OptionalValueList::single(env.graph.current().map(|value| value.value().clone()))
}

pub(super) fn current_offset(env: &Environment, encoding: &Encoding) -> OptionalValueList {
    OptionalValueList::of(from_numeric(&BigInt::from(env.offset), encoding))
}

pub(super) fn length(value: &Value, encoding: &Encoding) -> Value {
    from_numeric(&BigInt::from(value.length()), encoding)
}

pub(super) fn offset(value: &Value) -> Result<OptionalValue> {
    Ok(value
        .parsed_offset()
        .map(|offset| from_numeric(&BigInt::from(offset), value.encoding())))
}

pub(super) fn first(list: OptionalValueList) -> OptionalValueList {
    match list.bottom() {
        Some(value) => OptionalValueList::single(value.clone()),
        None => list,
    }
}

pub(super) fn last(list: OptionalValueList) -> OptionalValueList {
    match list.head() {
        Some(value) => OptionalValueList::single(value.clone()),
        None => list,
    }
}

pub(super) fn count(list: &OptionalValueList, encoding: &Encoding) -> OptionalValueList {
    OptionalValueList::of(from_numeric(&BigInt::from(list.len()), encoding))
}

/// For each index, the value at that position counted from the earliest.
///
/// Negative, out-of-range and absent indices select an absent value.
pub(super) fn nth(values: &OptionalValueList, indices: &OptionalValueList) -> Result<OptionalValueList> {
    indices
        .iter()
        .map(|index| {
            let Some(index) = index else {
                return Ok(None);
            };
            let position = index
                .as_numeric()?
                .to_usize()
                .filter(|&i| i < values.len())
                .map(|i| values.len() - 1 - i);
            Ok(position.and_then(|p| values.get(p).cloned().flatten()))
        })
        .collect()
}

/// Pairs from the head, preferring the left element when present. The
/// remainder of the longer list is kept as is.
pub(super) fn elvis(left: &OptionalValueList, right: &OptionalValueList) -> OptionalValueList {
    let paired = left.iter().zip(right.iter()).map(|(l, r)| l.clone().or_else(|| r.clone()));
    let rest = if left.len() > right.len() {
        left.iter().skip(right.len())
    } else {
        right.iter().skip(left.len())
    };
    paired.chain(rest.cloned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(values: &[Option<u8>]) -> OptionalValueList {
        values
            .iter()
            .map(|v| v.map(|b| Value::new(vec![b], Encoding::default())))
            .collect()
    }

    fn bytes(list: &OptionalValueList) -> Vec<Option<u8>> {
        list.iter()
            .map(|v| v.as_ref().map(|v| v.bytes().unwrap()[0]))
            .collect()
    }

    #[test]
    fn nth_counts_from_the_earliest() {
        // Most recent first: 9 was bound last, 5 first.
        let values = list(&[Some(9), Some(8), Some(7), Some(6), Some(5)]);
        let indices = list(&[Some(3), Some(2), Some(0), Some(4), Some(5), None]);
        let result = nth(&values, &indices).unwrap();
        assert_eq!(bytes(&result), vec![Some(8), Some(7), Some(5), Some(9), None, None]);
    }

    #[test]
    fn nth_negative_index_is_absent() {
        let values = list(&[Some(1)]);
        let minus_one = OptionalValueList::of(Value::new(vec![0xff], Encoding::signed()));
        assert_eq!(bytes(&nth(&values, &minus_one).unwrap()), vec![None]);
    }

    #[test]
    fn elvis_longer_list_continues() {
        let left = list(&[None, Some(2), None]);
        let right = list(&[Some(10), Some(20)]);
        assert_eq!(bytes(&elvis(&left, &right)), vec![Some(10), Some(2), None]);
        assert_eq!(bytes(&elvis(&right, &list(&[]))), vec![Some(10), Some(20)]);
    }

    #[test]
    fn first_and_last() {
        let values = list(&[Some(3), None, Some(1)]);
        assert_eq!(bytes(&first(values.clone())), vec![Some(1)]);
        assert_eq!(bytes(&last(values)), vec![Some(3)]);
        assert!(first(OptionalValueList::empty()).is_empty());
    }

    #[test]
    fn constants_have_no_offset() {
        let constant = Value::new(vec![1], Encoding::default());
        assert!(offset(&constant).unwrap().is_none());
    }
}
