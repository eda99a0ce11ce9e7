//! Typed variable slots.
//!
//! A slot remembers the type it was declared with, so assigning `null`
//! does not lose it and later assignments are still checked against it.

use ctl_types::{Name, Type};
use rust_decimal::Decimal;

use crate::containers::{ListValue, MapValue, RecordValue};
use crate::error::ValueError;
use crate::value::Value;

/// Declaration details beyond the type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VarDecl {
    /// Initial length of a list, filled with nulls.
    pub length: Option<usize>,
    /// Number of fraction digits kept by a decimal.
    pub scale: Option<u32>,
}

/// A named, typed variable slot.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    pub name: Name,
    pub ty: Type,
    pub value: Value,
    scale: Option<u32>,
}

impl Variable {
    /// Declare with the default value for `ty`.
    pub fn new(name: Name, ty: Type) -> Self {
        Self::declare(name, ty, VarDecl::default())
    }

    pub fn declare(name: Name, ty: Type, decl: VarDecl) -> Self {
        let value = Self::default_value(&ty, decl);
        Variable {
            name,
            ty,
            value,
            scale: decl.scale,
        }
    }

    /// Value a freshly declared variable of `ty` holds.
    pub fn default_value(ty: &Type, decl: VarDecl) -> Value {
        match ty {
            Type::Integer => Value::Integer(0),
            Type::Long => Value::Long(0),
            Type::Double => Value::Double(0.0),
            Type::Decimal => Value::Decimal(Decimal::new(0, decl.scale.unwrap_or(0))),
            Type::Boolean => Value::Boolean(false),
            Type::String => Value::String(String::new()),
            Type::ByteArray => Value::ByteArray(Vec::new()),
            Type::List(elem) => Value::List(ListValue::with_len(
                (**elem).clone(),
                decl.length.unwrap_or(0),
            )),
            Type::Map(key, value) => {
                Value::Map(MapValue::new((**key).clone(), (**value).clone()))
            }
            Type::Record(Some(schema)) => Value::Record(RecordValue::new(schema.clone())),
            _ => Value::Null,
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Assign a whole new value, checked against the declared type.
    pub fn assign(&mut self, value: &Value) -> Result<(), ValueError> {
        let source = value.type_of();
        if !self.ty.can_assign(&source) {
            return Err(ValueError::TypeMismatch {
                expected: self.ty.to_string(),
                found: source.to_string(),
            });
        }
        let mut converted = value.convert_to(&self.ty)?;
        if let (Value::Decimal(d), Some(scale)) = (&mut converted, self.scale) {
            d.rescale(scale);
        }
        self.value = converted;
        Ok(())
    }

    /// Assign into one element of a container variable.
    pub fn set_stored(&mut self, index: &Value, value: &Value) -> Result<(), ValueError> {
        if self.value.is_null() {
            self.value = Self::default_value(&self.ty, VarDecl::default());
        }
        self.value.set_stored(index, value)
    }
}
