//! Types of host (native) function parameters.
//!
//! Native libraries describe their signatures with [`NativeType`], a
//! mirror of what the host language can express. [`Type::from_native`]
//! turns that description into a CTL type, rejecting anything the
//! language cannot represent.

use std::error::Error;
use std::fmt;

use crate::ty::Type;

/// Host enum types that map onto CTL symbol kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NativeEnum {
    DateField,
    LogLevel,
    /// Any other enum; not representable.
    Other(String),
}

/// Shape of a native function parameter or result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NativeType {
    Int,
    Long,
    Double,
    Decimal,
    Bool,
    Str,
    Date,
    Bytes,
    Void,
    Object,
    Record,
    /// Array parameter. Arrays are varargs, so the element type is used.
    Array(Box<NativeType>),
    Enum(NativeEnum),
    /// A list; `None` when the host did not parameterize it.
    List(Option<Box<NativeType>>),
    /// A map; `None` when the host did not parameterize it.
    Map(Option<(Box<NativeType>, Box<NativeType>)>),
    /// A generic parameter of the host signature.
    Generic(String),
    /// Any other host type, named for diagnostics.
    Opaque(String),
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeType::Int => f.write_str("int"),
            NativeType::Long => f.write_str("long"),
            NativeType::Double => f.write_str("double"),
            NativeType::Decimal => f.write_str("decimal"),
            NativeType::Bool => f.write_str("bool"),
            NativeType::Str => f.write_str("string"),
            NativeType::Date => f.write_str("date"),
            NativeType::Bytes => f.write_str("bytes"),
            NativeType::Void => f.write_str("void"),
            NativeType::Object => f.write_str("object"),
            NativeType::Record => f.write_str("record"),
            NativeType::Array(elem) => write!(f, "{elem}[]"),
            NativeType::Enum(NativeEnum::DateField) => f.write_str("enum DateField"),
            NativeType::Enum(NativeEnum::LogLevel) => f.write_str("enum LogLevel"),
            NativeType::Enum(NativeEnum::Other(name)) => write!(f, "enum {name}"),
            NativeType::List(Some(elem)) => write!(f, "List<{elem}>"),
            NativeType::List(None) => f.write_str("List"),
            NativeType::Map(Some((k, v))) => write!(f, "Map<{k}, {v}>"),
            NativeType::Map(None) => f.write_str("Map"),
            NativeType::Generic(name) | NativeType::Opaque(name) => f.write_str(name),
        }
    }
}

/// A native type with no CTL counterpart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeError {
    pub native: String,
    pub reason: &'static str,
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unsupported native type `{}`: {}",
            self.native, self.reason
        )
    }
}

impl Error for TypeError {}

fn unsupported(native: &NativeType, reason: &'static str) -> TypeError {
    TypeError {
        native: native.to_string(),
        reason,
    }
}

impl Type {
    /// Convert a host parameter type into a CTL type.
    pub fn from_native(native: &NativeType) -> Result<Type, TypeError> {
        Ok(match native {
            NativeType::Int => Type::Integer,
            NativeType::Long => Type::Long,
            NativeType::Double => Type::Double,
            NativeType::Decimal => Type::Decimal,
            NativeType::Bool => Type::Boolean,
            NativeType::Str => Type::String,
            NativeType::Date => Type::Date,
            NativeType::Bytes => Type::ByteArray,
            NativeType::Void => Type::Void,
            NativeType::Object => Type::Object,
            NativeType::Record => Type::any_record(),
            NativeType::Array(elem) => Type::from_native(elem)?,
            NativeType::Enum(NativeEnum::DateField) => Type::DateField,
            NativeType::Enum(NativeEnum::LogLevel) => Type::LogLevel,
            NativeType::Enum(NativeEnum::Other(_)) => {
                return Err(unsupported(native, "only date-field and log-level enums map to symbols"));
            }
            NativeType::List(Some(elem)) => Type::list(Type::from_native(elem)?),
            NativeType::List(None) => {
                return Err(unsupported(native, "list element type must be declared"));
            }
            NativeType::Map(Some((key, value))) => {
                Type::map(Type::from_native(key)?, Type::from_native(value)?)
            }
            NativeType::Map(None) => {
                return Err(unsupported(native, "map key and value types must be declared"));
            }
            NativeType::Generic(name) => Type::var(name),
            NativeType::Opaque(_) => {
                return Err(unsupported(native, "no CTL type corresponds to it"));
            }
        })
    }
}

#[cfg(test)]
mod tests;
