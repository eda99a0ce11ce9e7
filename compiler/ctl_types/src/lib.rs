//! Type lattice for the CTL transformation language.
//!
//! Every CTL value and variable is described by a [`Type`]. The lattice
//! answers three questions the rest of the engine keeps asking:
//!
//! - **Promotion** ([`Type::promote_with`]): the least common supertype of
//!   two types, or [`Type::Error`] when none exists.
//! - **Assignability** ([`Type::can_assign`]): may a value of one type be
//!   stored into a variable of another without widening the variable?
//! - **Distance** ([`distance`]): how far a source type is from a target
//!   type, used to rank native function overloads.
//!
//! # Crate Organization
//!
//! - `ty`: the [`Type`] enum, symbol enumerants and predicates
//! - `lattice`: promotion, assignability and distance rules
//! - `schema`: record schemas (named field lists)
//! - `native`: conversion from host function signatures
//! - `flags`: pre-computed [`TypeFlags`] for quick classification

mod flags;
mod lattice;
mod native;
mod schema;
mod ty;

pub use flags::TypeFlags;
pub use lattice::{distance, DISTANCE_MAX, TYPE_VARIABLE_DISTANCE, UNBOUND_STRUCTURE_DISTANCE};
pub use native::{NativeEnum, NativeType, TypeError};
pub use schema::{FieldMeta, RecordSchema};
pub use ty::{DateField, LogLevel, Name, Type};
