//! Built-in string and container functions.

use std::sync::Arc;

use ctl_types::{Name, Type};
use ctl_value::Value;

use crate::errors::HostError;
use crate::native::{CallContext, NativeRegistry, NativeSignature};

fn add<F>(registry: &mut NativeRegistry, name: &str, params: Vec<Type>, ret: Type, varargs: bool, f: F)
where
    F: Fn(&[Value], &CallContext<'_>) -> Result<Value, HostError> + Send + Sync + 'static,
{
    registry.register_typed(
        NativeSignature {
            name: Name::from(name),
            params,
            ret,
            varargs,
        },
        Arc::new(f),
    );
}

fn length(args: &[Value], _ctx: &CallContext<'_>) -> Result<Value, HostError> {
    match args.first() {
        None | Some(Value::Null) => Ok(Value::Integer(0)),
        Some(value) => {
            let len = value
                .length()
                .ok_or_else(|| HostError::new(format!("{} has no length", value.kind_name())))?;
            i32::try_from(len)
                .map(Value::Integer)
                .map_err(|_| HostError::new("length does not fit an integer"))
        }
    }
}

fn map_string(args: &[Value], f: impl Fn(&str) -> String) -> Result<Value, HostError> {
    match args.first() {
        Some(Value::String(s)) => Ok(Value::String(f(s))),
        Some(Value::Null) => Ok(Value::Null),
        Some(other) => Err(HostError::new(format!(
            "expected a string, found {}",
            other.kind_name()
        ))),
        None => Err(HostError::new("missing argument")),
    }
}

/// Register `length`, `concat`, `upper`, `lower` and `trim`.
pub fn register_stdlib(registry: &mut NativeRegistry) {
    let e = || Type::var("E");
    for param in [
        Type::String,
        Type::ByteArray,
        Type::list(e()),
        Type::map(Type::var("K"), Type::var("V")),
        Type::any_record(),
    ] {
        add(registry, "length", vec![param], Type::Integer, false, length);
    }

    add(
        registry,
        "concat",
        vec![Type::String],
        Type::String,
        true,
        |args, _| {
            let mut out = String::new();
            for arg in args {
                out.push_str(&arg.to_ctl_string());
            }
            Ok(Value::String(out))
        },
    );
    add(registry, "upper", vec![Type::String], Type::String, false, |args, _| {
        map_string(args, str::to_uppercase)
    });
    add(registry, "lower", vec![Type::String], Type::String, false, |args, _| {
        map_string(args, str::to_lowercase)
    });
    add(registry, "trim", vec![Type::String], Type::String, false, |args, _| {
        map_string(args, |s| s.trim().to_owned())
    });
}
