//! # Expressions
//!
//! Two expression languages drive a grammar:
//!
//! - [`ValueExpression`]s compute sizes, addresses, counts and data. They
//!   evaluate to an [`OptionalValueList`] because a name may be bound many
//!   times and any computation may fail to produce a value.
//! - [`Expression`]s are predicates. They evaluate to a plain `bool`.
//!
//! ## Lists
//!
//! Binary operators pair their operands element by element. Lists of
//! different lengths produce an empty result. An absent element on either
//! side makes only that position absent.
//!
//! Evaluation never mutates the environment. The only errors are fatal ones:
//! reads that fail and reducers that do not yield exactly one value.

mod arithmetic;
mod bitwise;
mod comparison;
mod fold;
mod reference;

pub use comparison::{Comparator, Comparison};

use std::fmt;
use std::rc::Rc;

use crate::data::Environment;
use crate::diagnostics::Result;
use crate::encoding::Encoding;
use crate::token::Token;
use crate::value::{OptionalValue, OptionalValueList, Value};

// ============================================================================
// VALUE EXPRESSIONS
// ============================================================================

/// An expression producing a list of optional values.
#[derive(Debug, Clone)]
pub enum ValueExpression {
    /// A single constant.
    Const(Value),
    /// Every value bound under a name, most recent first.
    Ref(String),
    /// Every value produced by a token, most recent first.
    DefinitionRef(Token),
    /// The most recently bound value.
    SelfValue,
    /// The offset the environment is at.
    CurrentOffset,
    /// A single absent value.
    Empty,

    /// Size of each value in bytes. Never reads.
    Len(Box<ValueExpression>),
    /// The earliest element.
    First(Box<ValueExpression>),
    /// The most recent element.
    Last(Box<ValueExpression>),
    /// The number of elements.
    Count(Box<ValueExpression>),
    /// Input offset of each parsed value; absent for computed values.
    Offset(Box<ValueExpression>),
    /// Selects from `values` by each of `indices`, counting from the earliest.
    Nth {
        values: Box<ValueExpression>,
        indices: Box<ValueExpression>,
    },
    /// Element-wise first present value; the longer list continues.
    Elvis(Box<ValueExpression>, Box<ValueExpression>),

    Neg(Box<ValueExpression>),
    Add(Box<ValueExpression>, Box<ValueExpression>),
    Sub(Box<ValueExpression>, Box<ValueExpression>),
    Mul(Box<ValueExpression>, Box<ValueExpression>),
    Div(Box<ValueExpression>, Box<ValueExpression>),
    DivCeil(Box<ValueExpression>, Box<ValueExpression>),
    Mod(Box<ValueExpression>, Box<ValueExpression>),

    And(Box<ValueExpression>, Box<ValueExpression>),
    Or(Box<ValueExpression>, Box<ValueExpression>),
    Not(Box<ValueExpression>),
    ShiftLeft(Box<ValueExpression>, Box<ValueExpression>),
    ShiftRight(Box<ValueExpression>, Box<ValueExpression>),

    /// Byte-wise concatenation.
    Cat(Box<ValueExpression>, Box<ValueExpression>),

    /// Folds the values earliest first, as `reducer(accumulator, next)`.
    FoldLeft {
        values: Box<ValueExpression>,
        reducer: Reducer,
        initial: Option<Box<ValueExpression>>,
    },
    /// Folds the values most recent first, as `reducer(next, accumulator)`.
    FoldRight {
        values: Box<ValueExpression>,
        reducer: Reducer,
        initial: Option<Box<ValueExpression>>,
    },
}

impl ValueExpression {
    pub fn eval(&self, env: &Environment, encoding: &Encoding) -> Result<OptionalValueList> {
        use ValueExpression as V;
        match self {
            V::Const(value) => Ok(OptionalValueList::of(value.clone())),
            V::Ref(name) => Ok(reference::by_name(env, name)),
            V::DefinitionRef(token) => Ok(reference::by_definition(env, token)),
            V::SelfValue => Ok(reference::current(env)),
            V::CurrentOffset => Ok(reference::current_offset(env, encoding)),
            V::Empty => Ok(OptionalValueList::single(None)),

            V::Len(operand) => unary(&operand.eval(env, encoding)?, |v| {
                Ok(Some(reference::length(v, encoding)))
            }),
            V::First(operand) => Ok(reference::first(operand.eval(env, encoding)?)),
            V::Last(operand) => Ok(reference::last(operand.eval(env, encoding)?)),
            V::Count(operand) => Ok(reference::count(&operand.eval(env, encoding)?, encoding)),
            V::Offset(operand) => unary(&operand.eval(env, encoding)?, reference::offset),
            V::Nth { values, indices } => {
                reference::nth(&values.eval(env, encoding)?, &indices.eval(env, encoding)?)
            }
            V::Elvis(left, right) => Ok(reference::elvis(
                &left.eval(env, encoding)?,
                &right.eval(env, encoding)?,
            )),

            V::Neg(operand) => unary(&operand.eval(env, encoding)?, |v| arithmetic::neg(v, encoding)),
            V::Add(l, r) => self.binary(l, r, env, encoding, arithmetic::add),
            V::Sub(l, r) => self.binary(l, r, env, encoding, arithmetic::sub),
            V::Mul(l, r) => self.binary(l, r, env, encoding, arithmetic::mul),
            V::Div(l, r) => self.binary(l, r, env, encoding, arithmetic::div),
            V::DivCeil(l, r) => self.binary(l, r, env, encoding, arithmetic::div_ceil),
            V::Mod(l, r) => self.binary(l, r, env, encoding, arithmetic::modulo),

            V::And(l, r) => self.binary(l, r, env, encoding, bitwise::and),
            V::Or(l, r) => self.binary(l, r, env, encoding, bitwise::or),
            V::Not(operand) => unary(&operand.eval(env, encoding)?, |v| bitwise::not(v, encoding)),
            V::ShiftLeft(l, r) => self.binary(l, r, env, encoding, bitwise::shift_left),
            V::ShiftRight(l, r) => self.binary(l, r, env, encoding, bitwise::shift_right),

            V::Cat(l, r) => self.binary(l, r, env, encoding, |a, b, enc| {
                let mut bytes = a.bytes()?.to_vec();
                bytes.extend_from_slice(&b.bytes()?);
                Ok(Some(Value::new(bytes, *enc)))
            }),

            V::FoldLeft {
                values,
                reducer,
                initial,
            } => fold::fold_left(values, reducer, initial.as_deref(), env, encoding),
            V::FoldRight {
                values,
                reducer,
                initial,
            } => fold::fold_right(values, reducer, initial.as_deref(), env, encoding),
        }
    }

    fn binary(
        &self,
        left: &ValueExpression,
        right: &ValueExpression,
        env: &Environment,
        encoding: &Encoding,
        op: impl Fn(&Value, &Value, &Encoding) -> Result<OptionalValue>,
    ) -> Result<OptionalValueList> {
        let left = left.eval(env, encoding)?;
        let right = right.eval(env, encoding)?;
        pairwise(&left, &right, |l, r| op(l, r, encoding))
    }
}

/// Applies `op` to every present element; absent elements stay absent.
fn unary(
    list: &OptionalValueList,
    op: impl Fn(&Value) -> Result<OptionalValue>,
) -> Result<OptionalValueList> {
    list.iter()
        .map(|value| match value {
            Some(value) => op(value),
            None => Ok(None),
        })
        .collect()
}

/// Pairs two lists element by element. Different lengths yield an empty list.
pub(crate) fn pairwise(
    left: &OptionalValueList,
    right: &OptionalValueList,
    op: impl Fn(&Value, &Value) -> Result<OptionalValue>,
) -> Result<OptionalValueList> {
    if left.len() != right.len() {
        return Ok(OptionalValueList::empty());
    }
    left.iter()
        .zip(right.iter())
        .map(|pair| match pair {
            (Some(l), Some(r)) => op(l, r),
            _ => Ok(None),
        })
        .collect()
}

/// Builds the expression combining two folded values.
///
/// The reducer receives constant expressions and must return an expression
/// that yields exactly one value; anything else aborts the parse.
#[derive(Clone)]
pub struct Reducer(Rc<dyn Fn(ValueExpression, ValueExpression) -> ValueExpression>);

impl Reducer {
    pub fn new(reduce: impl Fn(ValueExpression, ValueExpression) -> ValueExpression + 'static) -> Self {
        Self(Rc::new(reduce))
    }

    pub fn reduce(&self, left: ValueExpression, right: ValueExpression) -> ValueExpression {
        (self.0)(left, right)
    }
}

impl fmt::Debug for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Reducer")
    }
}

// ============================================================================
// BOOLEAN EXPRESSIONS
// ============================================================================

/// A predicate over an environment.
#[derive(Debug, Clone, Default)]
pub enum Expression {
    #[default]
    True,
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
    Not(Box<Expression>),
    Compare(Comparison),
}

impl Expression {
    pub fn eval(&self, env: &Environment, encoding: &Encoding) -> Result<bool> {
        match self {
            Expression::True => Ok(true),
            Expression::And(l, r) => Ok(l.eval(env, encoding)? && r.eval(env, encoding)?),
            Expression::Or(l, r) => Ok(l.eval(env, encoding)? || r.eval(env, encoding)?),
            Expression::Not(operand) => Ok(!operand.eval(env, encoding)?),
            Expression::Compare(comparison) => comparison.eval(env, encoding),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{add, cat, con, con_bytes, div, empty, reference};
    use crate::testing::{bound, numbers};

    #[test]
    fn references_are_most_recent_first() {
        let env = bound("v", vec![1, 2, 3]);
        let result = reference("v").eval(&env, &Encoding::default()).unwrap();
        assert_eq!(numbers(&result), vec![Some(3), Some(2), Some(1)]);
    }

    #[test]
    fn division_by_zero_poisons_only_its_position() {
        let env = bound("v", vec![6, 0, 3]);
        let result = div(con(6), reference("v")).eval(&env, &Encoding::default()).unwrap();
        assert!(result.is_empty());
        let result = div(reference("v"), reference("v")).eval(&env, &Encoding::default()).unwrap();
        assert_eq!(numbers(&result), vec![Some(1), None, Some(1)]);
    }

    #[test]
    fn cat_joins_bytes() {
        let env = bound("v", vec![]);
        let result = cat(con_bytes(vec![1]), con_bytes(vec![2, 3]))
            .eval(&env, &Encoding::default())
            .unwrap();
        assert_eq!(&*result.head().unwrap().as_ref().unwrap().bytes().unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn empty_is_one_absent_value() {
        let env = bound("v", vec![]);
        let result = add(empty(), con(1)).eval(&env, &Encoding::default()).unwrap();
        assert_eq!(numbers(&result), vec![None]);
    }
}
