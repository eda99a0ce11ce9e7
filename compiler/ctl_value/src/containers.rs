//! Container payloads and indexed access.
//!
//! Lists and byte arrays are addressed by integral ordinal, maps by key,
//! records by ordinal or field name. Stored values are converted to the
//! container's declared element type on the way in.

use std::sync::Arc;

use ctl_types::{RecordSchema, Type};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::error::ValueError;
use crate::value::Value;

/// Backing store of a `list[T]` value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListValue {
    pub elem: Type,
    pub items: Vec<Value>,
}

impl ListValue {
    pub fn new(elem: Type) -> Self {
        ListValue {
            elem,
            items: Vec::new(),
        }
    }

    /// A list pre-filled with `len` nulls.
    pub fn with_len(elem: Type, len: usize) -> Self {
        ListValue {
            elem,
            items: vec![Value::Null; len],
        }
    }

    pub fn from_items(elem: Type, items: Vec<Value>) -> Self {
        ListValue { elem, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: i64) -> Result<&Value, ValueError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.items.get(i))
            .ok_or(ValueError::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
    }

    /// Store at `index`. Index `len` and index `-1` append.
    pub fn set(&mut self, index: i64, value: &Value) -> Result<(), ValueError> {
        let len = self.items.len();
        let converted = value.convert_to(&self.elem)?;
        match usize::try_from(index) {
            Ok(i) if i < len => self.items[i] = converted,
            Ok(i) if i == len => self.items.push(converted),
            Err(_) if index == -1 => self.items.push(converted),
            _ => return Err(ValueError::IndexOutOfRange { index, len }),
        }
        Ok(())
    }

    /// Append a value, converting it to the element type.
    pub fn push(&mut self, value: &Value) -> Result<(), ValueError> {
        let converted = value.convert_to(&self.elem)?;
        self.items.push(converted);
        Ok(())
    }
}

/// Backing store of a `map[K,V]` value, in insertion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapValue {
    pub key: Type,
    pub value: Type,
    pub entries: IndexMap<Value, Value, FxBuildHasher>,
}

impl MapValue {
    pub fn new(key: Type, value: Type) -> Self {
        MapValue {
            key,
            value,
            entries: IndexMap::with_hasher(FxBuildHasher),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value under `key`, `null` when absent.
    pub fn get(&self, key: &Value) -> Result<Value, ValueError> {
        let key = key.convert_to(&self.key)?;
        Ok(self.entries.get(&key).cloned().unwrap_or(Value::Null))
    }

    pub fn insert(&mut self, key: &Value, value: &Value) -> Result<(), ValueError> {
        if key.is_null() {
            return Err(ValueError::MissingKey);
        }
        let key = key.convert_to(&self.key)?;
        let value = value.convert_to(&self.value)?;
        self.entries.insert(key, value);
        Ok(())
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        key.convert_to(&self.key)
            .is_ok_and(|k| self.entries.contains_key(&k))
    }
}

/// Backing store of a record value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordValue {
    pub schema: Arc<RecordSchema>,
    pub fields: Vec<Value>,
}

impl RecordValue {
    /// A record of `schema` with every field `null`.
    pub fn new(schema: Arc<RecordSchema>) -> Self {
        let fields = vec![Value::Null; schema.len()];
        RecordValue { schema, fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Resolve a field name to its ordinal.
    pub fn position(&self, name: &str) -> Result<usize, ValueError> {
        self.schema
            .field_position(name)
            .ok_or_else(|| ValueError::UnknownField {
                field: name.to_owned(),
            })
    }

    pub fn get(&self, ordinal: usize) -> Result<&Value, ValueError> {
        self.fields.get(ordinal).ok_or(ValueError::IndexOutOfRange {
            index: ordinal as i64,
            len: self.fields.len(),
        })
    }

    pub fn set(&mut self, ordinal: usize, value: &Value) -> Result<(), ValueError> {
        let len = self.fields.len();
        let meta = self
            .schema
            .field(ordinal)
            .ok_or(ValueError::IndexOutOfRange {
                index: ordinal as i64,
                len,
            })?;
        let converted = value.convert_to(&meta.ty)?;
        self.fields[ordinal] = converted;
        Ok(())
    }
}

fn ordinal_of(index: &Value, container: &Value) -> Result<i64, ValueError> {
    index.as_i64().ok_or_else(|| ValueError::InvalidIndex {
        container: container.type_of().to_string(),
        found: index.kind_name().to_owned(),
    })
}

fn byte_ordinal(index: i64, len: usize) -> Result<usize, ValueError> {
    usize::try_from(index)
        .ok()
        .filter(|i| *i < len)
        .ok_or(ValueError::IndexOutOfRange { index, len })
}

impl RecordValue {
    /// Ordinal addressed by an integral index or a field-name string.
    pub fn resolve_index(&self, index: &Value) -> Result<usize, ValueError> {
        match index {
            Value::String(name) => self.position(name),
            other => {
                let n = other.as_i64().ok_or_else(|| ValueError::InvalidIndex {
                    container: format!("record({})", self.schema.name()),
                    found: other.kind_name().to_owned(),
                })?;
                usize::try_from(n)
                    .ok()
                    .filter(|i| *i < self.fields.len())
                    .ok_or(ValueError::IndexOutOfRange {
                        index: n,
                        len: self.fields.len(),
                    })
            }
        }
    }
}

impl Value {
    /// Number of elements (characters for strings).
    pub fn length(&self) -> Option<usize> {
        match self {
            Value::String(s) => Some(s.chars().count()),
            Value::ByteArray(bytes) => Some(bytes.len()),
            Value::List(list) => Some(list.len()),
            Value::Map(map) => Some(map.len()),
            Value::Record(rec) => Some(rec.len()),
            _ => None,
        }
    }

    /// Read the element addressed by `index`.
    pub fn get_stored(&self, index: &Value) -> Result<Value, ValueError> {
        match self {
            Value::List(list) => list.get(ordinal_of(index, self)?).cloned(),
            Value::ByteArray(bytes) => {
                let i = byte_ordinal(ordinal_of(index, self)?, bytes.len())?;
                Ok(Value::Integer(i32::from(bytes[i])))
            }
            Value::Map(map) => map.get(index),
            Value::Record(rec) => {
                let i = rec.resolve_index(index)?;
                rec.get(i).cloned()
            }
            other => Err(ValueError::NotIndexable {
                ty: other.type_of().to_string(),
            }),
        }
    }

    /// Write `value` at the element addressed by `index`.
    pub fn set_stored(&mut self, index: &Value, value: &Value) -> Result<(), ValueError> {
        match self {
            Value::List(list) => {
                let i = index.as_i64().ok_or_else(|| ValueError::InvalidIndex {
                    container: Type::list(list.elem.clone()).to_string(),
                    found: index.kind_name().to_owned(),
                })?;
                list.set(i, value)
            }
            Value::ByteArray(bytes) => {
                let i = index.as_i64().ok_or_else(|| ValueError::InvalidIndex {
                    container: "byte".to_owned(),
                    found: index.kind_name().to_owned(),
                })?;
                let byte = value.as_i64().ok_or_else(|| ValueError::TypeMismatch {
                    expected: "integer".to_owned(),
                    found: value.kind_name().to_owned(),
                })?;
                let len = bytes.len();
                // Bytes keep the low eight bits, like a narrowing cast.
                let stored = (byte & 0xFF) as u8;
                match usize::try_from(i) {
                    Ok(pos) if pos < len => bytes[pos] = stored,
                    Ok(pos) if pos == len => bytes.push(stored),
                    _ => return Err(ValueError::IndexOutOfRange { index: i, len }),
                }
                Ok(())
            }
            Value::Map(map) => map.insert(index, value),
            Value::Record(rec) => {
                let i = rec.resolve_index(index)?;
                rec.set(i, value)
            }
            other => Err(ValueError::NotIndexable {
                ty: other.type_of().to_string(),
            }),
        }
    }

    /// Elements visited by `foreach`: list items, map values, record fields
    /// and bytes, in ordinal order.
    pub fn iter_elements(&self) -> Result<Vec<Value>, ValueError> {
        match self {
            Value::List(list) => Ok(list.items.clone()),
            Value::Map(map) => Ok(map.entries.values().cloned().collect()),
            Value::Record(rec) => Ok(rec.fields.clone()),
            Value::ByteArray(bytes) => Ok(bytes.iter().map(|b| Value::Integer(i32::from(*b))).collect()),
            other => Err(ValueError::NotIndexable {
                ty: other.type_of().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests;
