//! Data records flowing through a transform.
//!
//! Input records are read by ordinal; output records are written by
//! ordinal, with each value coerced to the field's declared type.

use std::sync::Arc;

use ctl_types::RecordSchema;

use crate::containers::RecordValue;
use crate::error::ValueError;
use crate::value::Value;

/// A record of a fixed schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataRecord {
    inner: RecordValue,
}

impl DataRecord {
    /// An all-null record.
    pub fn new(schema: Arc<RecordSchema>) -> Self {
        DataRecord {
            inner: RecordValue::new(schema),
        }
    }

    /// A record populated from `values`, each coerced to its field type.
    pub fn from_values(schema: Arc<RecordSchema>, values: &[Value]) -> Result<Self, ValueError> {
        let mut record = Self::new(schema);
        for (ordinal, value) in values.iter().enumerate() {
            record.set_field(ordinal, value)?;
        }
        Ok(record)
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.inner.schema
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn field(&self, ordinal: usize) -> Option<&Value> {
        self.inner.fields.get(ordinal)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Value> {
        self.schema()
            .field_position(name)
            .and_then(|ordinal| self.field(ordinal))
    }

    /// Store `value` into field `ordinal`.
    ///
    /// Numerics are narrowed when they fit; `null` is refused by
    /// non-nullable fields.
    pub fn set_field(&mut self, ordinal: usize, value: &Value) -> Result<(), ValueError> {
        let schema = Arc::clone(&self.inner.schema);
        let meta = schema.field(ordinal).ok_or(ValueError::IndexOutOfRange {
            index: ordinal as i64,
            len: schema.len(),
        })?;
        let format_error = |reason: String| ValueError::FieldFormat {
            field: meta.name.to_string(),
            reason,
        };
        if value.is_null() {
            if !meta.nullable {
                return Err(format_error("can't assign NULL to a non-nullable field".to_owned()));
            }
            self.inner.fields[ordinal] = Value::Null;
            return Ok(());
        }
        let coerced = value
            .coerce_to(&meta.ty)
            .map_err(|err| format_error(err.to_string()))?;
        self.inner.fields[ordinal] = coerced;
        Ok(())
    }

    /// Reset every field to `null`.
    pub fn reset(&mut self) {
        for field in &mut self.inner.fields {
            *field = Value::Null;
        }
    }

    /// The whole record as a `record` value.
    pub fn to_value(&self) -> Value {
        Value::Record(self.inner.clone())
    }

    /// Replace every field from a record value of the same schema.
    pub fn copy_from(&mut self, value: &Value) -> Result<(), ValueError> {
        match value {
            Value::Record(rec) if rec.schema == self.inner.schema => {
                self.inner.fields.clone_from(&rec.fields);
                Ok(())
            }
            other => Err(ValueError::TypeMismatch {
                expected: format!("record({})", self.inner.schema.name()),
                found: other.type_of().to_string(),
            }),
        }
    }

    /// Copy every field of a record value whose name also exists here,
    /// coercing each through [`set_field`](Self::set_field). Fields
    /// without a same-named source are left untouched.
    ///
    /// Returns the number of fields copied.
    pub fn copy_by_name(&mut self, value: &Value) -> Result<usize, ValueError> {
        let Value::Record(source) = value else {
            return Err(ValueError::TypeMismatch {
                expected: "record".to_owned(),
                found: value.type_of().to_string(),
            });
        };
        let schema = Arc::clone(&self.inner.schema);
        let mut copied = 0;
        for (meta, field) in source.schema.fields().iter().zip(&source.fields) {
            if let Some(ordinal) = schema.field_position(&meta.name) {
                self.set_field(ordinal, field)?;
                copied += 1;
            }
        }
        Ok(copied)
    }
}
