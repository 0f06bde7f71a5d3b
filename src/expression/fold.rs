use crate::data::Environment;
use crate::diagnostics::Result;
use crate::encoding::Encoding;
use crate::expression::{Reducer, ValueExpression};
use crate::value::{OptionalValue, OptionalValueList, Value};

pub(super) fn fold_left(
    values: &ValueExpression,
    reducer: &Reducer,
    initial: Option<&ValueExpression>,
    env: &Environment,
    encoding: &Encoding,
) -> Result<OptionalValueList> {
    fold(values, initial, env, encoding, OptionalValueList::reverse, |acc, next| {
        reducer.reduce(ValueExpression::Const(acc), ValueExpression::Const(next))
    })
}

pub(super) fn fold_right(
    values: &ValueExpression,
    reducer: &Reducer,
    initial: Option<&ValueExpression>,
    env: &Environment,
    encoding: &Encoding,
) -> Result<OptionalValueList> {
    fold(values, initial, env, encoding, OptionalValueList::clone, |acc, next| {
        reducer.reduce(ValueExpression::Const(next), ValueExpression::Const(acc))
    })
}

/// Reduces the prepared values, starting from `initial` if it yields a value
/// and from the first prepared value otherwise.
///
/// An initial expression yielding several values gives an empty result. An
/// empty input, or one containing an absent value, gives the initial result.
fn fold(
    values: &ValueExpression,
    initial: Option<&ValueExpression>,
    env: &Environment,
    encoding: &Encoding,
    prepare: impl Fn(&OptionalValueList) -> OptionalValueList,
    combine: impl Fn(Value, Value) -> ValueExpression,
) -> Result<OptionalValueList> {
    let initial = match initial {
        Some(initial) => initial.eval(env, encoding)?,
        None => OptionalValueList::empty(),
    };
    if initial.len() > 1 {
        return Ok(OptionalValueList::empty());
    }
    let values = values.eval(env, encoding)?;
    if values.is_empty() || values.contains_empty() {
        return Ok(initial);
    }

    let values = prepare(&values);
    let mut remaining = values.iter();
    let mut accumulator: OptionalValue = match initial.head() {
        Some(head) => head.clone(),
        None => remaining.next().cloned().flatten(),
    };
    for next in remaining.flatten() {
        let Some(current) = accumulator.take() else {
            break;
        };
        let reduced = combine(current, next.clone()).eval(env, encoding)?;
        if reduced.len() != 1 {
            return Err(crate::err_msg!(
                Invariant,
                "Reducer must yield a single value, yielded {}.",
                reduced.len()
            ));
        }
        accumulator = reduced.head().cloned().flatten();
    }
    Ok(OptionalValueList::single(accumulator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{add, con, empty, reference, sub};
    use crate::diagnostics::ErrorType;
    use crate::testing::{bound, numbers};

    fn fold_with(
        fold: fn(&ValueExpression, &Reducer, Option<&ValueExpression>, &Environment, &Encoding) -> Result<OptionalValueList>,
        reducer: Reducer,
        initial: Option<ValueExpression>,
    ) -> Result<OptionalValueList> {
        let env = bound("v", vec![1, 2, 3]);
        fold(&reference("v"), &reducer, initial.as_ref(), &env, &Encoding::signed())
    }

    #[test]
    fn left_and_right_differ_for_non_commutative_reducers() {
        let left = fold_with(fold_left, Reducer::new(sub), None).unwrap();
        assert_eq!(numbers(&left), vec![Some(-4)]);
        let right = fold_with(fold_right, Reducer::new(sub), None).unwrap();
        assert_eq!(numbers(&right), vec![Some(2)]);
    }

    #[test]
    fn initial_value_seeds_the_fold() {
        let sum = fold_with(fold_left, Reducer::new(add), Some(con(10))).unwrap();
        assert_eq!(numbers(&sum), vec![Some(16)]);
    }

    #[test]
    fn multi_valued_initial_gives_empty_result() {
        let result = fold_with(fold_left, Reducer::new(add), Some(reference("v"))).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn absent_input_gives_initial() {
        let env = bound("v", vec![1]);
        let result = fold_left(&empty(), &Reducer::new(add), Some(&con(7)), &env, &Encoding::default()).unwrap();
        assert_eq!(numbers(&result), vec![Some(7)]);
        let without_initial = fold_left(&empty(), &Reducer::new(add), None, &env, &Encoding::default()).unwrap();
        assert!(without_initial.is_empty());
    }

    #[test]
    fn reducer_must_yield_one_value() {
        let err = fold_with(fold_right, Reducer::new(|_, _| reference("v")), None).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Invariant);
    }
}
