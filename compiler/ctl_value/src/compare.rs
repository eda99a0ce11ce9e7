//! Ordering, equality and membership.
//!
//! Numerics compare across kinds after promotion: two integral values as
//! `i64`, anything involving a decimal as decimals, the rest as doubles.
//! Containers support equality only.

use std::cmp::Ordering;

use rust_decimal::Decimal;

use crate::error::ValueError;
use crate::value::Value;

fn incompatible(left: &Value, right: &Value) -> ValueError {
    ValueError::IncompatibleOperands {
        op: "compare",
        left: left.type_of().to_string(),
        right: right.type_of().to_string(),
    }
}

fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Integer(n) => Some(Decimal::from(*n)),
        Value::Long(n) => Some(Decimal::from(*n)),
        Value::Double(d) => Decimal::try_from(*d).ok(),
        Value::Decimal(d) => Some(*d),
        _ => None,
    }
}

fn compare_numeric(left: &Value, right: &Value) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (left.as_i64(), right.as_i64()) {
        return Some(a.cmp(&b));
    }
    if matches!(left, Value::Decimal(_)) || matches!(right, Value::Decimal(_)) {
        if let (Some(a), Some(b)) = (as_decimal(left), as_decimal(right)) {
            return Some(a.cmp(&b));
        }
    }
    let (a, b) = (left.as_f64()?, right.as_f64()?);
    Some(a.total_cmp(&b))
}

impl Value {
    /// Order `self` against `other`.
    pub fn compare(&self, other: &Value) -> Result<Ordering, ValueError> {
        if self.is_numeric() && other.is_numeric() {
            return compare_numeric(self, other).ok_or_else(|| incompatible(self, other));
        }
        match (self, other) {
            (Value::Null, Value::Null) => Ok(Ordering::Equal),
            (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Ok(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Ok(a.cmp(b)),
            (Value::ByteArray(a), Value::ByteArray(b)) => Ok(a.cmp(b)),
            (Value::DateField(a), Value::DateField(b)) => Ok(a.cmp(b)),
            (Value::LogLevel(a), Value::LogLevel(b)) => Ok(a.cmp(b)),
            (Value::List(_), Value::List(_))
            | (Value::Map(_), Value::Map(_))
            | (Value::Record(_), Value::Record(_)) => Err(ValueError::NotOrdered {
                ty: self.type_of().to_string(),
            }),
            _ => Err(incompatible(self, other)),
        }
    }

    /// Value equality, numerics compared across kinds.
    pub fn equals(&self, other: &Value) -> Result<bool, ValueError> {
        match (self, other) {
            (Value::List(a), Value::List(b)) => {
                if a.items.len() != b.items.len() {
                    return Ok(false);
                }
                for (x, y) in a.items.iter().zip(&b.items) {
                    if !x.loosely_equals(y) {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (Value::Map(a), Value::Map(b)) => Ok(a.entries.len() == b.entries.len()
                && a.entries.iter().all(|(k, v)| {
                    b.entries.get(k).is_some_and(|other| v.loosely_equals(other))
                })),
            (Value::Record(a), Value::Record(b)) => Ok(a.schema == b.schema
                && a.fields.len() == b.fields.len()
                && a.fields.iter().zip(&b.fields).all(|(x, y)| x.loosely_equals(y))),
            (Value::Regex(a), Value::Regex(b)) => Ok(a == b),
            _ => Ok(self.compare(other)? == Ordering::Equal),
        }
    }

    /// Element equality inside containers; never fails.
    fn loosely_equals(&self, other: &Value) -> bool {
        self.equals(other).unwrap_or(false)
    }

    /// Membership test used by `in`.
    ///
    /// Lists look at items, maps at keys, records at field values and byte
    /// arrays at bytes.
    pub fn contains(&self, needle: &Value) -> Result<bool, ValueError> {
        match self {
            Value::List(list) => Ok(list.items.iter().any(|item| needle.loosely_equals(item))),
            Value::Map(map) => Ok(map.contains_key(needle)),
            Value::Record(rec) => Ok(rec.fields.iter().any(|f| needle.loosely_equals(f))),
            Value::ByteArray(bytes) => {
                let byte = needle.as_i64().ok_or_else(|| incompatible(needle, self))?;
                Ok(bytes.iter().any(|b| i64::from(*b) == byte))
            }
            other => Err(ValueError::NotIndexable {
                ty: other.type_of().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests;
