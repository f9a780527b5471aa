//! The user-overridable ordering protocol.
//!
//! Comparison results are wrapped booleans (language values), so they can be
//! used in further message sends. `as_big_as` is normatively the
//! `leq && geq` conjunction, never direct equality; for NaN operands the
//! conjunction and `==` diverge and the conjunction wins.
use std::cmp::Ordering;

use crate::{signal::Fault, value::Value};

/// Stateless ordering protocol over two ordered specimens.
pub struct Comparer;

impl Comparer {
    pub fn greater_than(&self, left: &Value, right: &Value) -> Result<Value, Fault> {
        self.relation(left, right, |ord| ord == Ordering::Greater)
    }

    pub fn geq(&self, left: &Value, right: &Value) -> Result<Value, Fault> {
        self.relation(left, right, |ord| ord != Ordering::Less)
    }

    pub fn less_than(&self, left: &Value, right: &Value) -> Result<Value, Fault> {
        self.relation(left, right, |ord| ord == Ordering::Less)
    }

    pub fn leq(&self, left: &Value, right: &Value) -> Result<Value, Fault> {
        self.relation(left, right, |ord| ord != Ordering::Greater)
    }

    /// `leq && geq`. Distinct from `==` for unordered operands: a NaN is
    /// never as big as anything, including itself.
    pub fn as_big_as(&self, left: &Value, right: &Value) -> Result<Value, Fault> {
        let leq = self.leq(left, right)?;
        if let Value::Broken(_) = leq {
            return Ok(leq);
        }
        let geq = self.geq(left, right)?;
        if let Value::Broken(_) = geq {
            return Ok(geq);
        }
        Ok(Value::Boolean(leq.is_truthy() && geq.is_truthy()))
    }

    fn relation(
        &self,
        left: &Value,
        right: &Value,
        accept: fn(Ordering) -> bool,
    ) -> Result<Value, Fault> {
        if let Value::Broken(_) = left {
            return Ok(left.clone());
        }
        if let Value::Broken(_) = right {
            return Ok(right.clone());
        }
        let ordering = partial_order(left, right)?;
        Ok(Value::Boolean(ordering.map(accept).unwrap_or(false)))
    }
}

/// Host ordering for the primitive ordered variants. `None` marks operands
/// that are comparable by type but unordered (NaN). Unsupported pairs are
/// usage errors naming both types.
fn partial_order(left: &Value, right: &Value) -> Result<Option<Ordering>, Fault> {
    match (left, right) {
        (Value::Integer(l), Value::Integer(r)) => Ok(Some(l.cmp(r))),
        (Value::Float(l), Value::Float(r)) => Ok(l.partial_cmp(r)),
        (Value::Integer(l), Value::Float(r)) => Ok((*l as f64).partial_cmp(r)),
        (Value::Float(l), Value::Integer(r)) => Ok(l.partial_cmp(&(*r as f64))),
        (Value::String(l), Value::String(r)) => Ok(Some(l.cmp(r))),
        _ => Err(Fault::usage(format!(
            "unsupported comparison: {} and {}",
            left.type_name(),
            right.type_name()
        ))),
    }
}
