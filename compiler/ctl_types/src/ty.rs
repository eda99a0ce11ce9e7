//! The CTL type descriptor.
//!
//! `Type` is a closed set of kinds. Singleton kinds (`void`, `null`,
//! the primitives, ...) are unit variants, so equality between them is
//! variant equality. Parameterized kinds (`list`, `map`, `record`) and
//! the symbol kinds carry data and compare structurally.

use std::fmt;
use std::sync::Arc;

use crate::flags::TypeFlags;
use crate::schema::RecordSchema;

/// Shared identifier text (variable names, field names, type variables).
pub type Name = Arc<str>;

/// Date component symbol accepted by date built-ins.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DateField {
    Day,
    Month,
    Week,
    Year,
    Hour,
    Minute,
    Second,
    Millisec,
}

impl DateField {
    /// All enumerants in declaration order.
    pub const ALL: [DateField; 8] = [
        DateField::Day,
        DateField::Month,
        DateField::Week,
        DateField::Year,
        DateField::Hour,
        DateField::Minute,
        DateField::Second,
        DateField::Millisec,
    ];

    /// The keyword spelling used in scripts.
    pub const fn as_str(self) -> &'static str {
        match self {
            DateField::Day => "day",
            DateField::Month => "month",
            DateField::Week => "week",
            DateField::Year => "year",
            DateField::Hour => "hour",
            DateField::Minute => "minute",
            DateField::Second => "second",
            DateField::Millisec => "millisec",
        }
    }

    /// Parse a keyword, case-insensitively.
    pub fn from_name(name: &str) -> Option<DateField> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity symbol accepted by `print_log`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    /// All enumerants, least severe first.
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Fatal => "fatal",
        }
    }

    pub fn from_name(name: &str) -> Option<LogLevel> {
        Self::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A CTL type descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// No value (function without result).
    Void,
    /// The type of the `null` literal; bottom of the lattice.
    Null,
    /// Result of an impossible promotion.
    Error,
    /// Top type, used by native functions that accept anything.
    Object,
    Integer,
    Long,
    Double,
    Decimal,
    Boolean,
    String,
    Date,
    ByteArray,
    /// `list[T]`.
    List(Box<Type>),
    /// `map[K,V]`.
    Map(Box<Type>, Box<Type>),
    /// A record, optionally bound to a field schema.
    Record(Option<Arc<RecordSchema>>),
    /// The date-field symbol kind.
    DateField,
    /// The log-level symbol kind.
    LogLevel,
    /// Placeholder in a generic native signature.
    TypeVar(Name),
}

impl Type {
    /// Build `list[elem]`.
    pub fn list(elem: Type) -> Type {
        Type::List(Box::new(elem))
    }

    /// Build `map[key,value]`.
    pub fn map(key: Type, value: Type) -> Type {
        Type::Map(Box::new(key), Box::new(value))
    }

    /// Build a record type bound to `schema`.
    pub fn record(schema: Arc<RecordSchema>) -> Type {
        Type::Record(Some(schema))
    }

    /// A record type with no schema (accepts any record).
    pub const fn any_record() -> Type {
        Type::Record(None)
    }

    /// Build a type variable.
    pub fn var(name: &str) -> Type {
        Type::TypeVar(Arc::from(name))
    }

    /// Position in the numeric widening order, if numeric.
    pub(crate) const fn numeric_rank(&self) -> Option<u32> {
        match self {
            Type::Integer => Some(0),
            Type::Long => Some(1),
            Type::Double => Some(2),
            Type::Decimal => Some(3),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_numeric(&self) -> bool {
        self.numeric_rank().is_some()
    }

    #[inline]
    pub const fn is_list(&self) -> bool {
        matches!(self, Type::List(_))
    }

    #[inline]
    pub const fn is_map(&self) -> bool {
        matches!(self, Type::Map(..))
    }

    #[inline]
    pub const fn is_record(&self) -> bool {
        matches!(self, Type::Record(_))
    }

    #[inline]
    pub const fn is_byte_array(&self) -> bool {
        matches!(self, Type::ByteArray)
    }

    /// `date-field` or `log-level`.
    #[inline]
    pub const fn is_type_symbol(&self) -> bool {
        matches!(self, Type::DateField | Type::LogLevel)
    }

    #[inline]
    pub const fn is_type_variable(&self) -> bool {
        matches!(self, Type::TypeVar(_))
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Type::Null)
    }

    #[inline]
    pub const fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }

    #[inline]
    pub const fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    #[inline]
    pub const fn is_object(&self) -> bool {
        matches!(self, Type::Object)
    }

    /// Scalar built-in type.
    #[inline]
    pub const fn is_primitive(&self) -> bool {
        matches!(
            self,
            Type::Integer
                | Type::Long
                | Type::Double
                | Type::Decimal
                | Type::Boolean
                | Type::String
                | Type::Date
        )
    }

    /// `list`, `map` or `record`.
    #[inline]
    pub const fn is_container(&self) -> bool {
        matches!(self, Type::List(_) | Type::Map(..) | Type::Record(_))
    }

    /// Element type of a list, value type of a map.
    pub fn element_type(&self) -> Option<&Type> {
        match self {
            Type::List(elem) => Some(elem),
            Type::Map(_, value) => Some(value),
            _ => None,
        }
    }

    /// Key type of a map.
    pub fn key_type(&self) -> Option<&Type> {
        match self {
            Type::Map(key, _) => Some(key),
            _ => None,
        }
    }

    /// Schema of a bound record type.
    pub fn schema(&self) -> Option<&Arc<RecordSchema>> {
        match self {
            Type::Record(schema) => schema.as_ref(),
            _ => None,
        }
    }

    /// Compute classification flags.
    pub fn flags(&self) -> TypeFlags {
        match self {
            Type::Integer | Type::Long | Type::Double | Type::Decimal => {
                TypeFlags::NUMERIC | TypeFlags::PRIMITIVE | TypeFlags::ORDERED
            }
            Type::String | Type::Date => TypeFlags::PRIMITIVE | TypeFlags::ORDERED,
            Type::Boolean => TypeFlags::PRIMITIVE,
            Type::ByteArray => TypeFlags::INDEXABLE,
            Type::List(_) | Type::Map(..) | Type::Record(_) => {
                TypeFlags::CONTAINER | TypeFlags::INDEXABLE
            }
            Type::DateField | Type::LogLevel => TypeFlags::SYMBOL,
            Type::TypeVar(_) => TypeFlags::GENERIC,
            Type::Null => TypeFlags::NULLISH,
            Type::Error => TypeFlags::ERROR,
            Type::Void => TypeFlags::UNINHABITED,
            Type::Object => TypeFlags::empty(),
        }
    }

    /// Whether two types can meet in a comparison.
    ///
    /// Numerics compare across kinds; every other kind only with itself.
    pub fn is_compatible(&self, other: &Type) -> bool {
        if self.is_numeric() && other.is_numeric() {
            return true;
        }
        match (self, other) {
            (Type::Record(Some(a)), Type::Record(Some(b))) => a == b,
            (Type::Record(_), Type::Record(_)) => true,
            _ => self == other,
        }
    }

    /// Human-readable kind name without parameters.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Type::Void => "void",
            Type::Null => "null",
            Type::Error => "error",
            Type::Object => "object",
            Type::Integer => "integer",
            Type::Long => "long",
            Type::Double => "number",
            Type::Decimal => "decimal",
            Type::Boolean => "boolean",
            Type::String => "string",
            Type::Date => "date",
            Type::ByteArray => "byte",
            Type::List(_) => "list",
            Type::Map(..) => "map",
            Type::Record(_) => "record",
            Type::DateField => "date-field",
            Type::LogLevel => "log-level",
            Type::TypeVar(_) => "type-variable",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::List(elem) => write!(f, "list[{elem}]"),
            Type::Map(key, value) => write!(f, "map[{key},{value}]"),
            Type::Record(Some(schema)) => write!(f, "record({})", schema.name()),
            Type::TypeVar(name) => f.write_str(name),
            other => f.write_str(other.kind_name()),
        }
    }
}

#[cfg(test)]
mod tests;
