//! # Grammar Builder
//!
//! Shorthand constructors for tokens and expressions, so that a format reads
//! as a nested call tree:
//!
//! ```rust
//! use strata::builder::*;
//!
//! let header = seq("header", vec![
//!     def_with("magic", con(1), eq_num(con(0x7f))),
//!     def("length", con(1)),
//!     def("body", reference("length")),
//! ]);
//! assert_eq!(header.name(), "header");
//! ```
//!
//! Composite tokens take a name first; pass `""` for an unnamed token.
//! Unnamed tokens do not add to the scope of the values beneath them.

use num_bigint::BigInt;

use crate::encoding::Encoding;
use crate::expression::{Comparator, Comparison, Expression, Reducer, ValueExpression};
use crate::token::{Token, TokenKind};
use crate::value::{from_numeric, from_string, Value};

// ============================================================================
// TOKENS
// ============================================================================

pub fn def(name: &str, size: ValueExpression) -> Token {
    def_with(name, size, Expression::True)
}

pub fn def_with(name: &str, size: ValueExpression, predicate: Expression) -> Token {
    Token::new(name, TokenKind::Def { size, predicate })
}

/// A single byte.
pub fn any(name: &str) -> Token {
    def(name, con(1))
}

pub fn nod(size: ValueExpression) -> Token {
    Token::new("", TokenKind::Nod { size })
}

pub fn seq(name: &str, tokens: Vec<Token>) -> Token {
    Token::new(name, TokenKind::Seq(tokens))
}

pub fn cho(name: &str, tokens: Vec<Token>) -> Token {
    Token::new(name, TokenKind::Cho(tokens))
}

/// Zero or more of `token`. The run ends at the first failure, or at the first
/// iteration that consumes no bytes.
pub fn rep(name: &str, token: Token) -> Token {
    Token::new(name, TokenKind::Rep(token))
}

pub fn rep_n(name: &str, token: Token, n: ValueExpression) -> Token {
    Token::new(name, TokenKind::RepN { token, n })
}

pub fn rep_while(name: &str, token: Token, predicate: Expression) -> Token {
    Token::new(name, TokenKind::While { token, predicate })
}

pub fn opt(name: &str, token: Token) -> Token {
    Token::new(name, TokenKind::Opt(token))
}

pub fn pre(name: &str, token: Token, predicate: Expression) -> Token {
    Token::new(name, TokenKind::Pre { token, predicate })
}

pub fn post(name: &str, token: Token, predicate: Expression) -> Token {
    Token::new(name, TokenKind::Post { token, predicate })
}

/// `token` parsed at `address`.
pub fn sub_struct(token: Token, address: ValueExpression) -> Token {
    Token::new("", TokenKind::Sub { token, address })
}

pub fn tie(name: &str, token: Token, data: ValueExpression) -> Token {
    Token::new(name, TokenKind::Tie { token, data })
}

/// A reference to the enclosing token named `reference`.
pub fn token(reference: &str) -> Token {
    Token::new(
        "",
        TokenKind::TokenRef {
            reference: reference.to_string(),
        },
    )
}

/// A copy of `token` that parses itself and its children under `encoding`.
///
/// The copy is a distinct token: it does not compare equal to `token`.
pub fn encoded(token: &Token, encoding: Encoding) -> Token {
    Token::with_encoding(token.name(), token.kind().clone(), Some(encoding))
}

// ============================================================================
// VALUE EXPRESSIONS
// ============================================================================

/// A numeric constant; negative numbers are stored signed.
pub fn con(value: i64) -> ValueExpression {
    let encoding = if value < 0 {
        Encoding::signed()
    } else {
        Encoding::default()
    };
    ValueExpression::Const(from_numeric(&BigInt::from(value), &encoding))
}

pub fn con_bytes(bytes: Vec<u8>) -> ValueExpression {
    ValueExpression::Const(Value::new(bytes, Encoding::default()))
}

pub fn con_str(text: &str) -> ValueExpression {
    ValueExpression::Const(from_string(text, &Encoding::default()))
}

pub fn con_value(value: Value) -> ValueExpression {
    ValueExpression::Const(value)
}

pub fn reference(name: &str) -> ValueExpression {
    ValueExpression::Ref(name.to_string())
}

pub fn definition_ref(token: &Token) -> ValueExpression {
    ValueExpression::DefinitionRef(token.clone())
}

pub fn self_value() -> ValueExpression {
    ValueExpression::SelfValue
}

pub fn current_offset() -> ValueExpression {
    ValueExpression::CurrentOffset
}

pub fn empty() -> ValueExpression {
    ValueExpression::Empty
}

pub fn len(operand: ValueExpression) -> ValueExpression {
    ValueExpression::Len(Box::new(operand))
}

pub fn first(operand: ValueExpression) -> ValueExpression {
    ValueExpression::First(Box::new(operand))
}

pub fn last(operand: ValueExpression) -> ValueExpression {
    ValueExpression::Last(Box::new(operand))
}

pub fn count(operand: ValueExpression) -> ValueExpression {
    ValueExpression::Count(Box::new(operand))
}

pub fn offset(operand: ValueExpression) -> ValueExpression {
    ValueExpression::Offset(Box::new(operand))
}

pub fn nth(values: ValueExpression, indices: ValueExpression) -> ValueExpression {
    ValueExpression::Nth {
        values: Box::new(values),
        indices: Box::new(indices),
    }
}

pub fn elvis(left: ValueExpression, right: ValueExpression) -> ValueExpression {
    ValueExpression::Elvis(Box::new(left), Box::new(right))
}

pub fn neg(operand: ValueExpression) -> ValueExpression {
    ValueExpression::Neg(Box::new(operand))
}

pub fn add(left: ValueExpression, right: ValueExpression) -> ValueExpression {
    ValueExpression::Add(Box::new(left), Box::new(right))
}

pub fn sub(left: ValueExpression, right: ValueExpression) -> ValueExpression {
    ValueExpression::Sub(Box::new(left), Box::new(right))
}

pub fn mul(left: ValueExpression, right: ValueExpression) -> ValueExpression {
    ValueExpression::Mul(Box::new(left), Box::new(right))
}

pub fn div(left: ValueExpression, right: ValueExpression) -> ValueExpression {
    ValueExpression::Div(Box::new(left), Box::new(right))
}

pub fn div_ceil(left: ValueExpression, right: ValueExpression) -> ValueExpression {
    ValueExpression::DivCeil(Box::new(left), Box::new(right))
}

pub fn modulo(left: ValueExpression, right: ValueExpression) -> ValueExpression {
    ValueExpression::Mod(Box::new(left), Box::new(right))
}

pub fn bit_and(left: ValueExpression, right: ValueExpression) -> ValueExpression {
    ValueExpression::And(Box::new(left), Box::new(right))
}

pub fn bit_or(left: ValueExpression, right: ValueExpression) -> ValueExpression {
    ValueExpression::Or(Box::new(left), Box::new(right))
}

pub fn bit_not(operand: ValueExpression) -> ValueExpression {
    ValueExpression::Not(Box::new(operand))
}

pub fn shl(operand: ValueExpression, positions: ValueExpression) -> ValueExpression {
    ValueExpression::ShiftLeft(Box::new(operand), Box::new(positions))
}

pub fn shr(operand: ValueExpression, positions: ValueExpression) -> ValueExpression {
    ValueExpression::ShiftRight(Box::new(operand), Box::new(positions))
}

pub fn cat(left: ValueExpression, right: ValueExpression) -> ValueExpression {
    ValueExpression::Cat(Box::new(left), Box::new(right))
}

pub fn fold_left(
    values: ValueExpression,
    reducer: fn(ValueExpression, ValueExpression) -> ValueExpression,
    initial: Option<ValueExpression>,
) -> ValueExpression {
    ValueExpression::FoldLeft {
        values: Box::new(values),
        reducer: Reducer::new(reducer),
        initial: initial.map(Box::new),
    }
}

pub fn fold_right(
    values: ValueExpression,
    reducer: fn(ValueExpression, ValueExpression) -> ValueExpression,
    initial: Option<ValueExpression>,
) -> ValueExpression {
    ValueExpression::FoldRight {
        values: Box::new(values),
        reducer: Reducer::new(reducer),
        initial: initial.map(Box::new),
    }
}

// ============================================================================
// PREDICATES
// ============================================================================

pub fn expr_true() -> Expression {
    Expression::True
}

pub fn and(left: Expression, right: Expression) -> Expression {
    Expression::And(Box::new(left), Box::new(right))
}

pub fn or(left: Expression, right: Expression) -> Expression {
    Expression::Or(Box::new(left), Box::new(right))
}

pub fn not(operand: Expression) -> Expression {
    Expression::Not(Box::new(operand))
}

fn compare(comparator: Comparator, value: Option<ValueExpression>, predicate: ValueExpression) -> Expression {
    Expression::Compare(Comparison::new(comparator, value, predicate))
}

macro_rules! comparisons {
    ($($current:ident, $explicit:ident => $comparator:ident;)*) => {
        $(
            /// Compares the most recently bound value against `predicate`.
            pub fn $current(predicate: ValueExpression) -> Expression {
                compare(Comparator::$comparator, None, predicate)
            }

            /// Compares `value` against `predicate`.
            pub fn $explicit(value: ValueExpression, predicate: ValueExpression) -> Expression {
                compare(Comparator::$comparator, Some(value), predicate)
            }
        )*
    };
}

comparisons! {
    eq, eq_of => Eq;
    eq_num, eq_num_of => EqNum;
    eq_str, eq_str_of => EqStr;
    gt_num, gt_num_of => GtNum;
    lt_num, lt_num_of => LtNum;
    gt_eq_num, gt_eq_num_of => GtEqNum;
    lt_eq_num, lt_eq_num_of => LtEqNum;
}

/// A comparison using a caller-supplied relation between `(current, predicate)`.
pub fn custom(
    value: Option<ValueExpression>,
    predicate: ValueExpression,
    compare_with: impl Fn(&Value, &Value) -> crate::Result<bool> + 'static,
) -> Expression {
    compare(Comparator::custom(compare_with), value, predicate)
}
