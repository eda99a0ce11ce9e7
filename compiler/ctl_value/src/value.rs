//! The runtime value enum.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use ctl_types::{DateField, LogLevel, Type};
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::containers::{ListValue, MapValue, RecordValue};
use crate::DateTime;

/// Format used when a date is turned into text.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A precompiled regular expression, typed as `object`.
#[derive(Clone, Debug)]
pub struct RegexValue {
    regex: Arc<Regex>,
    anchored: Arc<Regex>,
}

impl RegexValue {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(RegexValue {
            regex: Arc::new(Regex::new(pattern)?),
            anchored: Arc::new(Regex::new(&format!("^(?:{pattern})$"))?),
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Whether the whole of `text` matches the pattern.
    pub fn matches_fully(&self, text: &str) -> bool {
        self.anchored.is_match(text)
    }

    /// Whether the pattern occurs anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for RegexValue {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for RegexValue {}

/// A CTL runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Integer(i32),
    Long(i64),
    Double(f64),
    Decimal(Decimal),
    Boolean(bool),
    String(String),
    Date(DateTime),
    ByteArray(Vec<u8>),
    List(ListValue),
    Map(MapValue),
    Record(RecordValue),
    DateField(DateField),
    LogLevel(LogLevel),
    Regex(RegexValue),
}

impl Value {
    /// Build a string value.
    pub fn string(s: impl Into<String>) -> Value {
        Value::String(s.into())
    }

    /// Parse a decimal literal such as `"10.00"`.
    pub fn decimal(text: &str) -> Option<Value> {
        text.parse::<Decimal>().ok().map(Value::Decimal)
    }

    /// The type descriptor of this value.
    pub fn type_of(&self) -> Type {
        match self {
            Value::Null => Type::Null,
            Value::Integer(_) => Type::Integer,
            Value::Long(_) => Type::Long,
            Value::Double(_) => Type::Double,
            Value::Decimal(_) => Type::Decimal,
            Value::Boolean(_) => Type::Boolean,
            Value::String(_) => Type::String,
            Value::Date(_) => Type::Date,
            Value::ByteArray(_) => Type::ByteArray,
            Value::List(list) => Type::list(list.elem.clone()),
            Value::Map(map) => Type::map(map.key.clone(), map.value.clone()),
            Value::Record(rec) => Type::record(Arc::clone(&rec.schema)),
            Value::DateField(_) => Type::DateField,
            Value::LogLevel(_) => Type::LogLevel,
            Value::Regex(_) => Type::Object,
        }
    }

    /// Short kind name for diagnostics, without allocating a [`Type`].
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Long(_) => "long",
            Value::Double(_) => "number",
            Value::Decimal(_) => "decimal",
            Value::Boolean(_) => "boolean",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::ByteArray(_) => "byte",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Record(_) => "record",
            Value::DateField(_) => "date-field",
            Value::LogLevel(_) => "log-level",
            Value::Regex(_) => "object",
        }
    }

    /// Copy for independent mutation.
    #[inline]
    #[must_use]
    pub fn duplicate(&self) -> Value {
        self.clone()
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// `null`, or a string of zero length.
    pub fn is_null_or_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Value::Integer(_) | Value::Long(_) | Value::Double(_) | Value::Decimal(_)
        )
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integral numeric payload, widened to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(i64::from(*n)),
            Value::Long(n) => Some(*n),
            _ => None,
        }
    }

    /// Any numeric payload as `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(f64::from(*n)),
            Value::Long(n) => Some(*n as f64),
            Value::Double(d) => Some(*d),
            Value::Decimal(d) => d.to_f64(),
            _ => None,
        }
    }

    /// Text form used by string concatenation and printing.
    pub fn to_ctl_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Long(n) => write!(f, "{n}"),
            Value::Double(d) => write!(f, "{d}"),
            Value::Decimal(d) => write!(f, "{d}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::String(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Value::ByteArray(bytes) => {
                for b in bytes {
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
            Value::List(list) => {
                f.write_str("[")?;
                for (i, item) in list.items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}={v}")?;
                }
                f.write_str("}")
            }
            Value::Record(rec) => {
                write!(f, "{}{{", rec.schema.name())?;
                for (i, (meta, v)) in rec.schema.fields().iter().zip(&rec.fields).enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}={v}", meta.name)?;
                }
                f.write_str("}")
            }
            Value::DateField(field) => write!(f, "{field}"),
            Value::LogLevel(level) => write!(f, "{level}"),
            Value::Regex(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

/// Strict structural equality: kinds must match exactly.
///
/// Cross-kind numeric equality (`1 == 1L`) is [`Value::equals`]; this impl
/// is what map keys and container comparison use.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::ByteArray(a), Value::ByteArray(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::DateField(a), Value::DateField(b)) => a == b,
            (Value::LogLevel(a), Value::LogLevel(b)) => a == b,
            (Value::Regex(a), Value::Regex(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Integer(n) => n.hash(state),
            Value::Long(n) => n.hash(state),
            Value::Double(d) => d.to_bits().hash(state),
            Value::Decimal(d) => d.normalize().hash(state),
            Value::Boolean(b) => b.hash(state),
            Value::String(s) => s.hash(state),
            Value::Date(d) => d.hash(state),
            Value::ByteArray(bytes) => bytes.hash(state),
            Value::List(list) => list.items.hash(state),
            // Entry order does not take part in map equality.
            Value::Map(map) => map.entries.len().hash(state),
            Value::Record(rec) => rec.fields.hash(state),
            Value::DateField(field) => field.hash(state),
            Value::LogLevel(level) => level.hash(state),
            Value::Regex(re) => re.as_str().hash(state),
        }
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(n)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<DateTime> for Value {
    fn from(d: DateTime) -> Self {
        Value::Date(d)
    }
}
