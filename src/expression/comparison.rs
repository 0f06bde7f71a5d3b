use std::fmt;
use std::rc::Rc;

use crate::data::Environment;
use crate::diagnostics::Result;
use crate::encoding::Encoding;
use crate::expression::ValueExpression;
use crate::value::{OptionalValueList, Value};

/// How two values are compared.
#[derive(Clone)]
pub enum Comparator {
    /// Identical bytes.
    Eq,
    EqNum,
    EqStr,
    GtNum,
    LtNum,
    GtEqNum,
    LtEqNum,
    /// A caller-supplied relation, given `(current, predicate)`.
    Custom(Rc<dyn Fn(&Value, &Value) -> Result<bool>>),
}

impl Comparator {
    pub fn custom(compare: impl Fn(&Value, &Value) -> Result<bool> + 'static) -> Self {
        Comparator::Custom(Rc::new(compare))
    }

    fn compare(&self, current: &Value, predicate: &Value) -> Result<bool> {
        use std::cmp::Ordering::*;
        let numeric = || -> Result<std::cmp::Ordering> {
            Ok(current.as_numeric()?.cmp(&predicate.as_numeric()?))
        };
        Ok(match self {
            Comparator::Eq => {
                current.length() == predicate.length() && current.bytes()? == predicate.bytes()?
            }
            Comparator::EqNum => numeric()? == Equal,
            Comparator::EqStr => current.as_string()? == predicate.as_string()?,
            Comparator::GtNum => numeric()? == Greater,
            Comparator::LtNum => numeric()? == Less,
            Comparator::GtEqNum => numeric()? != Less,
            Comparator::LtEqNum => numeric()? != Greater,
            Comparator::Custom(compare) => compare(current, predicate)?,
        })
    }
}

impl fmt::Debug for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparator::Eq => f.write_str("Eq"),
            Comparator::EqNum => f.write_str("EqNum"),
            Comparator::EqStr => f.write_str("EqStr"),
            Comparator::GtNum => f.write_str("GtNum"),
            Comparator::LtNum => f.write_str("LtNum"),
            Comparator::GtEqNum => f.write_str("GtEqNum"),
            Comparator::LtEqNum => f.write_str("LtEqNum"),
            Comparator::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// Compares `value` (the most recent value when omitted) against
/// `predicate`, element by element.
///
/// Holds only if both lists are non-empty and equally long, no element is
/// absent and every pair satisfies the comparator.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub comparator: Comparator,
    pub value: Option<ValueExpression>,
    pub predicate: ValueExpression,
}

impl Comparison {
    pub fn new(comparator: Comparator, value: Option<ValueExpression>, predicate: ValueExpression) -> Self {
        Self {
            comparator,
            value,
            predicate,
        }
    }

    pub fn eval(&self, env: &Environment, encoding: &Encoding) -> Result<bool> {
        let values = match &self.value {
            Some(value) => value.eval(env, encoding)?,
            None => OptionalValueList::single(env.graph.current().map(|value| value.value().clone())),
        };
        if values.is_empty() {
            return Ok(false);
        }
        let predicates = self.predicate.eval(env, encoding)?;
        if values.len() != predicates.len() {
            return Ok(false);
        }
        for pair in values.iter().zip(predicates.iter()) {
            let (Some(current), Some(predicate)) = pair else {
                return Ok(false);
            };
            if !self.comparator.compare(current, predicate)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
