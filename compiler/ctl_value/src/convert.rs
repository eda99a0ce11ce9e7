//! Conversions between value kinds.
//!
//! [`Value::convert_to`] follows the lattice's assignability: it widens
//! numerics and accepts like-shaped containers, never narrows.
//! [`Value::coerce_to`] additionally narrows numerics when the value fits,
//! which is what storing into a typed output field needs.

use ctl_types::Type;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::ValueError;
use crate::value::Value;

fn mismatch(expected: &Type, found: &Value) -> ValueError {
    ValueError::TypeMismatch {
        expected: expected.to_string(),
        found: found.type_of().to_string(),
    }
}

fn decimal_from_f64(d: f64) -> Result<Decimal, ValueError> {
    Decimal::try_from(d).map_err(|_| ValueError::Overflow { op: "convert" })
}

impl Value {
    /// Convert for assignment into a slot declared as `target`.
    pub fn convert_to(&self, target: &Type) -> Result<Value, ValueError> {
        if self.is_null() {
            return if target.is_void() {
                Err(mismatch(target, self))
            } else {
                Ok(Value::Null)
            };
        }
        let converted = match (self, target) {
            (_, Type::Object | Type::TypeVar(_)) => self.clone(),
            (Value::Integer(n), Type::Integer) => Value::Integer(*n),
            (Value::Integer(n), Type::Long) => Value::Long(i64::from(*n)),
            (Value::Integer(n), Type::Double) => Value::Double(f64::from(*n)),
            (Value::Integer(n), Type::Decimal) => Value::Decimal(Decimal::from(*n)),
            (Value::Long(n), Type::Long) => Value::Long(*n),
            (Value::Long(n), Type::Double) => Value::Double(*n as f64),
            (Value::Long(n), Type::Decimal) => Value::Decimal(Decimal::from(*n)),
            (Value::Double(d), Type::Double) => Value::Double(*d),
            (Value::Double(d), Type::Decimal) => Value::Decimal(decimal_from_f64(*d)?),
            (Value::Decimal(d), Type::Decimal) => Value::Decimal(*d),
            (Value::Boolean(_), Type::Boolean)
            | (Value::String(_), Type::String)
            | (Value::Date(_), Type::Date)
            | (Value::ByteArray(_), Type::ByteArray)
            | (Value::DateField(_), Type::DateField)
            | (Value::LogLevel(_), Type::LogLevel) => self.clone(),
            (Value::List(_) | Value::Map(_) | Value::Record(_), _)
                if target.can_assign(&self.type_of()) =>
            {
                self.clone()
            }
            _ => return Err(mismatch(target, self)),
        };
        Ok(converted)
    }

    /// Convert for storage into a field of type `target`, narrowing
    /// numerics when the value is representable.
    pub fn coerce_to(&self, target: &Type) -> Result<Value, ValueError> {
        if let Ok(converted) = self.convert_to(target) {
            return Ok(converted);
        }
        let narrowed = match (self, target) {
            (Value::Long(n), Type::Integer) => i32::try_from(*n).ok().map(Value::Integer),
            (Value::Double(d), Type::Integer) if d.fract() == 0.0 => {
                d.to_i32().map(Value::Integer)
            }
            (Value::Double(d), Type::Long) if d.fract() == 0.0 => d.to_i64().map(Value::Long),
            (Value::Decimal(d), Type::Integer) if d.fract().is_zero() => {
                d.to_i32().map(Value::Integer)
            }
            (Value::Decimal(d), Type::Long) if d.fract().is_zero() => d.to_i64().map(Value::Long),
            (Value::Decimal(d), Type::Double) => d.to_f64().map(Value::Double),
            _ => None,
        };
        narrowed.ok_or_else(|| mismatch(target, self))
    }

    /// Overwrite `self` with `other`, keeping the kind of `self`.
    ///
    /// String and byte buffers are reused. A `null` receiver (a fresh
    /// scratch slot) or a `null` source takes the source as-is.
    pub fn assign_from(&mut self, other: &Value) -> Result<(), ValueError> {
        match (self, other) {
            (Value::String(dst), Value::String(src)) => {
                dst.clear();
                dst.push_str(src);
            }
            (Value::ByteArray(dst), Value::ByteArray(src)) => dst.clone_from(src),
            (dst, src) => {
                let next = if dst.is_null() || src.is_null() {
                    src.clone()
                } else {
                    src.convert_to(&dst.type_of())?
                };
                *dst = next;
            }
        }
        Ok(())
    }
}
