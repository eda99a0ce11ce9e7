//! Record schemas.
//!
//! A schema is a named, ordered list of fields. Records address fields by
//! ordinal at runtime; names are resolved to ordinals once and cached by
//! whoever asked.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::ty::{Name, Type};

/// One field of a record schema.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldMeta {
    pub name: Name,
    pub ty: Type,
    pub nullable: bool,
}

impl FieldMeta {
    /// A nullable field.
    pub fn new(name: &str, ty: Type) -> Self {
        FieldMeta {
            name: Arc::from(name),
            ty,
            nullable: true,
        }
    }

    /// A field that rejects `null`.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// Named field layout of a record.
///
/// Equality and hashing look at the name and the field list only; the
/// name index is derived data.
#[derive(Clone)]
pub struct RecordSchema {
    name: Name,
    fields: Vec<FieldMeta>,
    index: FxHashMap<Name, usize>,
}

impl RecordSchema {
    pub fn new(name: &str, fields: Vec<FieldMeta>) -> Self {
        let index = fields
            .iter()
            .enumerate()
            .map(|(pos, field)| (field.name.clone(), pos))
            .collect();
        RecordSchema {
            name: Arc::from(name),
            fields,
            index,
        }
    }

    /// Convenience constructor returning a shared schema.
    pub fn shared(name: &str, fields: Vec<FieldMeta>) -> Arc<Self> {
        Arc::new(Self::new(name, fields))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldMeta] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, ordinal: usize) -> Option<&FieldMeta> {
        self.fields.get(ordinal)
    }

    /// Ordinal of the field called `name`.
    pub fn field_position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

impl PartialEq for RecordSchema {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.fields == other.fields
    }
}

impl Eq for RecordSchema {}

impl Hash for RecordSchema {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.fields.hash(state);
    }
}

impl fmt::Debug for RecordSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSchema")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}

#[cfg(test)]
mod tests;
