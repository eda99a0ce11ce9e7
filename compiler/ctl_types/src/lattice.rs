//! Promotion, assignability and distance.
//!
//! All three are pure functions over [`Type`] descriptors.
//!
//! Promotion is not symmetric at the edges of the lattice: `object`
//! absorbs symbols (a native taking `object` accepts a date-field), while a
//! symbol refuses to promote with `object`.

use crate::ty::Type;

/// Distance reported when no conversion exists.
pub const DISTANCE_MAX: u32 = u32::MAX;

/// Distance from any type to a type variable.
pub const TYPE_VARIABLE_DISTANCE: u32 = 10;

/// Distance from a container to a schema-free container of the same shape.
pub const UNBOUND_STRUCTURE_DISTANCE: u32 = 1;

impl Type {
    /// Least common supertype of `self` and `other`, or [`Type::Error`].
    pub fn promote_with(&self, other: &Type) -> Type {
        match (self, other) {
            (Type::Error, _) | (_, Type::Error) => Type::Error,
            (Type::TypeVar(_), _) | (_, Type::TypeVar(_)) => Type::Error,
            (Type::Void, Type::Void) => Type::Void,
            (Type::Null, _) => other.clone(),
            (Type::Void, _) | (_, Type::Void) => Type::Error,
            (_, Type::Null) => self.clone(),
            (Type::Object, _) => Type::Object,
            (a, Type::Object) if a.is_type_symbol() => Type::Error,
            (_, Type::Object) => Type::Object,
            (a, b) if a.is_numeric() || b.is_numeric() => promote_numeric(a, b),
            (Type::DateField, Type::DateField) => Type::DateField,
            (Type::LogLevel, Type::LogLevel) => Type::LogLevel,
            (a, b) if a == b => a.clone(),
            _ => Type::Error,
        }
    }

    /// Whether a value of type `source` may be stored in a variable of type
    /// `self` without widening `self`.
    pub fn can_assign(&self, source: &Type) -> bool {
        if source.is_null() {
            return !self.is_void();
        }
        if self.is_type_symbol() || source.is_type_symbol() {
            return std::mem::discriminant(self) == std::mem::discriminant(source);
        }
        if let (Type::Record(None), Type::Record(_)) = (self, source) {
            return true;
        }
        !self.is_error() && self.promote_with(source) == *self
    }
}

fn promote_numeric(a: &Type, b: &Type) -> Type {
    match (a.numeric_rank(), b.numeric_rank()) {
        (Some(ra), Some(rb)) => {
            if ra >= rb {
                a.clone()
            } else {
                b.clone()
            }
        }
        _ => Type::Error,
    }
}

/// Rank how far `from` is from `to` for overload resolution.
///
/// Returns 0 for identical types, the number of widening steps for
/// numerics, [`TYPE_VARIABLE_DISTANCE`] for generic targets,
/// [`UNBOUND_STRUCTURE_DISTANCE`] for schema-free container targets and
/// [`DISTANCE_MAX`] when no conversion exists.
pub fn distance(from: &Type, to: &Type) -> u32 {
    if from == to {
        return 0;
    }
    if from.is_null() {
        return if to.is_void() { DISTANCE_MAX } else { 0 };
    }
    if let (Some(rf), Some(rt)) = (from.numeric_rank(), to.numeric_rank()) {
        return if rf <= rt { rt - rf } else { DISTANCE_MAX };
    }
    match to {
        Type::TypeVar(_) => TYPE_VARIABLE_DISTANCE,
        Type::Record(None) if from.is_record() => UNBOUND_STRUCTURE_DISTANCE,
        Type::List(elem) if elem.is_type_variable() && from.is_list() => {
            UNBOUND_STRUCTURE_DISTANCE
        }
        Type::Map(key, value)
            if key.is_type_variable() && value.is_type_variable() && from.is_map() =>
        {
            UNBOUND_STRUCTURE_DISTANCE
        }
        Type::DateField | Type::LogLevel if to.can_assign(from) => 0,
        _ => DISTANCE_MAX,
    }
}

#[cfg(test)]
mod tests;
