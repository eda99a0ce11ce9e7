//! Runtime values for the CTL transformation language.
//!
//! [`Value`] is a closed sum type with one variant per type-lattice kind.
//! Values are plain owned data: duplicating a value is `clone`, and the
//! executor's per-node scratch buffers are refreshed through
//! [`Value::assign_from`], which reuses the receiver's allocation where
//! the payload allows it.
//!
//! # Crate Organization
//!
//! - `value`: the [`Value`] enum, constructors, display and hashing
//! - `containers`: list, map and record payloads plus indexed access
//! - `arith`: arithmetic, unary operators and date arithmetic
//! - `compare`: ordering, equality and membership
//! - `convert`: conversions between kinds and in-place assignment
//! - `variable`: typed variable slots and their defaults
//! - `record`: [`DataRecord`], the input/output records of a transform
//! - `error`: [`ValueError`]

mod arith;
mod compare;
mod containers;
mod convert;
mod error;
mod record;
mod value;
mod variable;

pub use arith::ArithOp;
pub use containers::{ListValue, MapValue, RecordValue};
pub use error::ValueError;
pub use record::DataRecord;
pub use value::{RegexValue, Value};
pub use variable::{VarDecl, Variable};

pub use ctl_types::{DateField, LogLevel, Name, Type};
pub use rust_decimal::Decimal;

/// Calendar date and time as stored in `date` values.
pub type DateTime = chrono::NaiveDateTime;
