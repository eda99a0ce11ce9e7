//! Arithmetic on values.
//!
//! Binary arithmetic works in place on a receiver so the executor can keep
//! one scratch value per expression node. Integral arithmetic is checked;
//! overflow is an error rather than a wrap.

use chrono::Days;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::ValueError;
use crate::value::Value;
use crate::DateTime;

/// Binary arithmetic operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl ArithOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Mod => "%",
        }
    }

    /// Operation name used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            ArithOp::Add => "add",
            ArithOp::Sub => "sub",
            ArithOp::Mul => "mul",
            ArithOp::Div => "div",
            ArithOp::Mod => "mod",
        }
    }
}

macro_rules! checked_int {
    ($op:expr, $a:expr, $b:expr) => {{
        let (a, b) = ($a, $b);
        match $op {
            ArithOp::Add => a.checked_add(b),
            ArithOp::Sub => a.checked_sub(b),
            ArithOp::Mul => a.checked_mul(b),
            ArithOp::Div | ArithOp::Mod if b == 0 => {
                return Err(ValueError::DivisionByZero { op: $op.name() })
            }
            ArithOp::Div => a.checked_div(b),
            ArithOp::Mod => a.checked_rem(b),
        }
        .ok_or(ValueError::Overflow { op: $op.name() })?
    }};
}

fn shift_days(date: DateTime, days: i64, op: &'static str) -> Result<DateTime, ValueError> {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.ok_or(ValueError::Overflow { op })
}

/// Whole number of days carried by a numeric value.
fn whole_days(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(n) => Some(i64::from(*n)),
        Value::Long(n) => Some(*n),
        Value::Double(d) => d.trunc().to_i64(),
        Value::Decimal(d) => d.trunc().to_i64(),
        _ => None,
    }
}

impl Value {
    /// Apply `self = self <op> rhs` in place.
    ///
    /// Numeric operands are promoted to the wider kind first; `+` on a
    /// string receiver concatenates the text form of `rhs`; `+`/`-` on a
    /// date receiver shift it by whole days.
    pub fn arith_in_place(&mut self, op: ArithOp, rhs: &Value) -> Result<(), ValueError> {
        if self.is_null() || rhs.is_null() {
            return Err(ValueError::NullOperand { op: op.name() });
        }
        match (&mut *self, op) {
            (Value::String(s), ArithOp::Add) => {
                match rhs {
                    Value::String(r) => s.push_str(r),
                    other => s.push_str(&other.to_ctl_string()),
                }
                return Ok(());
            }
            (Value::Date(d), ArithOp::Add | ArithOp::Sub) => {
                let days = whole_days(rhs).ok_or_else(|| incompatible(op, &Value::Date(*d), rhs))?;
                let days = if op == ArithOp::Sub {
                    days.checked_neg().ok_or(ValueError::Overflow { op: op.name() })?
                } else {
                    days
                };
                *d = shift_days(*d, days, op.name())?;
                return Ok(());
            }
            _ => {}
        }
        if !(self.is_numeric() && rhs.is_numeric()) {
            return Err(incompatible(op, self, rhs));
        }
        let result_ty = self.type_of().promote_with(&rhs.type_of());
        if self.type_of() != result_ty {
            *self = self.convert_to(&result_ty)?;
        }
        let rhs = rhs.convert_to(&result_ty)?;
        match (&mut *self, &rhs) {
            (Value::Integer(a), Value::Integer(b)) => *a = checked_int!(op, *a, *b),
            (Value::Long(a), Value::Long(b)) => *a = checked_int!(op, *a, *b),
            (Value::Double(a), Value::Double(b)) => *a = float_op(op, *a, *b)?,
            (Value::Decimal(a), Value::Decimal(b)) => *a = decimal_op(op, *a, *b)?,
            _ => {
                return Err(ValueError::IncompatibleOperands {
                    op: op.name(),
                    left: result_ty.to_string(),
                    right: rhs.type_of().to_string(),
                })
            }
        }
        Ok(())
    }

    /// `self <op> rhs` as a fresh value.
    pub fn arith(&self, op: ArithOp, rhs: &Value) -> Result<Value, ValueError> {
        let mut result = self.duplicate();
        result.arith_in_place(op, rhs)?;
        Ok(result)
    }

    /// Arithmetic negation.
    pub fn negate(&self) -> Result<Value, ValueError> {
        let overflow = ValueError::Overflow { op: "minus" };
        match self {
            Value::Integer(n) => n.checked_neg().map(Value::Integer).ok_or(overflow),
            Value::Long(n) => n.checked_neg().map(Value::Long).ok_or(overflow),
            Value::Double(d) => Ok(Value::Double(-d)),
            Value::Decimal(d) => Ok(Value::Decimal(-*d)),
            Value::Null => Err(ValueError::NullOperand { op: "minus" }),
            other => Err(ValueError::TypeMismatch {
                expected: "numeric".to_owned(),
                found: other.kind_name().to_owned(),
            }),
        }
    }

    /// Absolute value (unary plus).
    pub fn abs(&self) -> Result<Value, ValueError> {
        let overflow = ValueError::Overflow { op: "plus" };
        match self {
            Value::Integer(n) => n.checked_abs().map(Value::Integer).ok_or(overflow),
            Value::Long(n) => n.checked_abs().map(Value::Long).ok_or(overflow),
            Value::Double(d) => Ok(Value::Double(d.abs())),
            Value::Decimal(d) => Ok(Value::Decimal(d.abs())),
            Value::Null => Err(ValueError::NullOperand { op: "plus" }),
            other => Err(ValueError::TypeMismatch {
                expected: "numeric".to_owned(),
                found: other.kind_name().to_owned(),
            }),
        }
    }

    /// Add `delta` (±1 for `++`/`--`) in place: numerics by value, dates by days.
    pub fn step(&mut self, delta: i32) -> Result<(), ValueError> {
        let op = if delta >= 0 { "incr" } else { "decr" };
        match self {
            Value::Date(d) => *d = shift_days(*d, i64::from(delta), op)?,
            Value::Null => return Err(ValueError::NullOperand { op }),
            v if v.is_numeric() => v.arith_in_place(ArithOp::Add, &Value::Integer(delta))?,
            other => {
                return Err(ValueError::TypeMismatch {
                    expected: "numeric or date".to_owned(),
                    found: other.kind_name().to_owned(),
                })
            }
        }
        Ok(())
    }
}

fn incompatible(op: ArithOp, left: &Value, right: &Value) -> ValueError {
    ValueError::IncompatibleOperands {
        op: op.name(),
        left: left.type_of().to_string(),
        right: right.type_of().to_string(),
    }
}

fn float_op(op: ArithOp, a: f64, b: f64) -> Result<f64, ValueError> {
    match op {
        ArithOp::Add => Ok(a + b),
        ArithOp::Sub => Ok(a - b),
        ArithOp::Mul => Ok(a * b),
        ArithOp::Div | ArithOp::Mod if b == 0.0 => Err(ValueError::DivisionByZero { op: op.name() }),
        ArithOp::Div => Ok(a / b),
        ArithOp::Mod => Ok(a % b),
    }
}

fn decimal_op(op: ArithOp, a: Decimal, b: Decimal) -> Result<Decimal, ValueError> {
    let result = match op {
        ArithOp::Add => a.checked_add(b),
        ArithOp::Sub => a.checked_sub(b),
        ArithOp::Mul => a.checked_mul(b),
        ArithOp::Div | ArithOp::Mod if b.is_zero() => {
            return Err(ValueError::DivisionByZero { op: op.name() })
        }
        ArithOp::Div => a.checked_div(b),
        ArithOp::Mod => a.checked_rem(b),
    };
    result.ok_or(ValueError::Overflow { op: op.name() })
}
