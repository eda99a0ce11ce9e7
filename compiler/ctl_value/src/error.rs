//! Value-level faults.
//!
//! These carry no source position; the executor wraps them with the node
//! being visited and the offending operands.

use std::error::Error;
use std::fmt;

/// An operation on values failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValueError {
    /// A value of the wrong kind was supplied.
    TypeMismatch { expected: String, found: String },
    /// The two operands of a binary operation do not meet.
    IncompatibleOperands {
        op: &'static str,
        left: String,
        right: String,
    },
    /// A `null` operand reached an operator that rejects it.
    NullOperand { op: &'static str },
    /// Ordinal outside `0..len` (or `0..=len` when appending).
    IndexOutOfRange { index: i64, len: usize },
    /// Indexing into a kind that does not support it.
    NotIndexable { ty: String },
    /// The index value has the wrong kind for the container.
    InvalidIndex { container: String, found: String },
    /// No record field carries this name.
    UnknownField { field: String },
    /// Assignment into a map without a key.
    MissingKey,
    /// Divisor of `/` or `%` is zero.
    DivisionByZero { op: &'static str },
    /// Result does not fit in the target kind.
    Overflow { op: &'static str },
    /// The kind has no ordering.
    NotOrdered { ty: String },
    /// Value cannot be stored in an output field.
    FieldFormat { field: String, reason: String },
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { expected, found } => {
                write!(f, "incompatible data types: expected {expected}, found {found}")
            }
            Self::IncompatibleOperands { op, left, right } => {
                write!(f, "{op} - incompatible literals/expressions ({left}, {right})")
            }
            Self::NullOperand { op } => write!(f, "{op} - NULL value not allowed"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} is outside current limits (length {len})")
            }
            Self::NotIndexable { ty } => write!(f, "values of type {ty} cannot be indexed"),
            Self::InvalidIndex { container, found } => {
                write!(f, "invalid index of type {found} for {container}")
            }
            Self::UnknownField { field } => write!(f, "invalid field ID `{field}`"),
            Self::MissingKey => write!(f, "no key defined when assigning to map"),
            Self::DivisionByZero { op } => write!(f, "{op} - division by zero"),
            Self::Overflow { op } => write!(f, "{op} - numeric overflow"),
            Self::NotOrdered { ty } => write!(f, "values of type {ty} have no ordering"),
            Self::FieldFormat { field, reason } => {
                write!(f, "bad data when mapping field `{field}`: {reason}")
            }
        }
    }
}

impl Error for ValueError {}
