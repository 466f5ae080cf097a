//! Binary operator semantics.
//!
//! Operands arrive already evaluated; short-circuiting for `&&` and `||`
//! is the evaluator's job.

use crate::error::{EvalResult, RuntimeError};
use crate::options::EvalOptions;
use crate::value::Value;
use rinha_types::ast::BinaryOp;
use rinha_types::Location;
use std::cmp::Ordering;

/// Apply `op` to two evaluated operands.
pub(crate) fn apply_binary<'ast>(
    op: BinaryOp,
    lhs: &Value<'ast>,
    rhs: &Value<'ast>,
    options: &EvalOptions,
    location: &Location,
) -> EvalResult<Value<'ast>> {
    match op {
        BinaryOp::Add => add(lhs, rhs, location),
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
            let (a, b) = integers(lhs, rhs, location)?;
            arithmetic(op, a, b, location).map(Value::Int)
        }
        BinaryOp::Eq => Ok(Value::Bool(lhs == rhs)),
        BinaryOp::Neq => Ok(Value::Bool(lhs != rhs)),
        BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Lte | BinaryOp::Gte => {
            let ordering = compare(lhs, rhs, options, location)?;
            Ok(Value::Bool(match op {
                BinaryOp::Lt => ordering == Ordering::Less,
                BinaryOp::Gt => ordering == Ordering::Greater,
                BinaryOp::Lte => ordering != Ordering::Greater,
                _ => ordering != Ordering::Less,
            }))
        }
        BinaryOp::And | BinaryOp::Or => {
            let (Some(a), Some(b)) = (lhs.as_bool(), rhs.as_bool()) else {
                return Err(mismatch("boolean", lhs, rhs, location));
            };
            let result = match op {
                BinaryOp::And => a && b,
                _ => a || b,
            };
            Ok(Value::Bool(result))
        }
    }
}

fn add<'ast>(
    lhs: &Value<'ast>,
    rhs: &Value<'ast>,
    location: &Location,
) -> EvalResult<Value<'ast>> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => {
            arithmetic(BinaryOp::Add, *a, *b, location).map(Value::Int)
        }
        (Value::Str(_), Value::Str(_) | Value::Int(_)) | (Value::Int(_), Value::Str(_)) => {
            Ok(Value::text(format!("{lhs}{rhs}")))
        }
        _ => Err(mismatch("integer or text", lhs, rhs, location)),
    }
}

/// Checked 64-bit arithmetic.
fn arithmetic(op: BinaryOp, a: i64, b: i64, location: &Location) -> EvalResult<i64> {
    if matches!(op, BinaryOp::Div | BinaryOp::Rem) && b == 0 {
        return Err(RuntimeError::DivisionByZero {
            location: location.clone(),
        });
    }
    let result = match op {
        BinaryOp::Add => a.checked_add(b),
        BinaryOp::Sub => a.checked_sub(b),
        BinaryOp::Mul => a.checked_mul(b),
        BinaryOp::Div => a.checked_div(b),
        BinaryOp::Rem => a.checked_rem(b),
        _ => unreachable!("not an arithmetic operator: {op}"),
    };
    result.ok_or_else(|| RuntimeError::ArithmeticOverflow {
        op,
        location: location.clone(),
    })
}

fn compare(
    lhs: &Value<'_>,
    rhs: &Value<'_>,
    options: &EvalOptions,
    location: &Location,
) -> EvalResult<Ordering> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) if options.text_ordering => {
            Ok(a.as_bytes().cmp(b.as_bytes()))
        }
        _ => Err(mismatch("integer", lhs, rhs, location)),
    }
}

fn integers(lhs: &Value<'_>, rhs: &Value<'_>, location: &Location) -> EvalResult<(i64, i64)> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Ok((*a, *b)),
        _ => Err(mismatch("integer", lhs, rhs, location)),
    }
}

fn mismatch(
    expected: &'static str,
    lhs: &Value<'_>,
    rhs: &Value<'_>,
    location: &Location,
) -> RuntimeError {
    RuntimeError::type_mismatch(
        expected,
        format!("{} and {}", lhs.type_name(), rhs.type_name()),
        location,
    )
}
