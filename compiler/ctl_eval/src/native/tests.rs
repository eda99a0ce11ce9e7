use super::*;
use crate::logger::TracingLogger;
use ctl_types::NativeEnum;
use pretty_assertions::assert_eq;

fn ctx() -> CallContext<'static> {
    CallContext {
        function: "test",
        span: Span::DUMMY,
        logger: &TracingLogger,
    }
}

fn constant(value: i32) -> impl Fn(&[Value], &CallContext<'_>) -> Result<Value, HostError> {
    move |_, _| Ok(Value::Integer(value))
}

fn call(registry: &NativeRegistry, id: NativeId, args: &[Value]) -> Value {
    let (_, f) = registry.get(id).unwrap();
    f.call(args, &ctx()).unwrap()
}

#[test]
fn closest_numeric_overload_wins() {
    let mut registry = NativeRegistry::new();
    let long = registry
        .register("f", &[NativeType::Long], &NativeType::Int, constant(1))
        .unwrap();
    let double = registry
        .register("f", &[NativeType::Double], &NativeType::Int, constant(2))
        .unwrap();

    assert_eq!(registry.resolve("f", &[Type::Integer]).unwrap().id, long);
    assert_eq!(registry.resolve("f", &[Type::Double]).unwrap().id, double);
    assert_eq!(
        registry.resolve("f", &[Type::Decimal]),
        Err(ResolveError::NoMatch {
            name: "f".into(),
            args: vec!["decimal".into()],
        })
    );
}

#[test]
fn equal_distances_are_ambiguous() {
    let mut registry = NativeRegistry::new();
    registry
        .register("g", &[NativeType::Long, NativeType::Int], &NativeType::Void, constant(0))
        .unwrap();
    registry
        .register("g", &[NativeType::Int, NativeType::Long], &NativeType::Void, constant(0))
        .unwrap();
    assert_eq!(
        registry.resolve("g", &[Type::Integer, Type::Integer]),
        Err(ResolveError::Ambiguous { name: "g".into() })
    );
    assert!(registry.resolve("g", &[Type::Long, Type::Integer]).is_ok());
}

#[test]
fn unknown_names_are_reported() {
    let registry = NativeRegistry::new();
    assert_eq!(
        registry.resolve("nope", &[]),
        Err(ResolveError::Unknown { name: "nope".into() })
    );
}

#[test]
fn varargs_accept_a_tail_and_lose_ties() {
    let mut registry = NativeRegistry::new();
    let fixed = registry
        .register("h", &[NativeType::Str], &NativeType::Str, constant(1))
        .unwrap();
    let variadic = registry
        .register(
            "h",
            &[NativeType::Array(Box::new(NativeType::Str))],
            &NativeType::Str,
            constant(2),
        )
        .unwrap();
    assert!(registry.signature(variadic).unwrap().varargs);
    assert_eq!(registry.resolve("h", &[Type::String]).unwrap().id, fixed);
    assert_eq!(
        registry
            .resolve("h", &[Type::String, Type::String, Type::Null])
            .unwrap()
            .id,
        variadic
    );
    assert!(registry.resolve("h", &[]).is_err());
}

#[test]
fn type_variables_bind_consistently() {
    let mut registry = NativeRegistry::new();
    let id = registry
        .register(
            "first",
            &[
                NativeType::List(Some(Box::new(NativeType::Generic("E".into())))),
                NativeType::Generic("E".into()),
            ],
            &NativeType::Generic("E".into()),
            constant(0),
        )
        .unwrap();
    let resolved = registry
        .resolve("first", &[Type::list(Type::String), Type::String])
        .unwrap();
    assert_eq!(resolved, Resolved { id, ret: Type::String });
    assert!(registry
        .resolve("first", &[Type::list(Type::String), Type::Integer])
        .is_err());
}

#[test]
fn unsupported_native_types_are_refused() {
    let mut registry = NativeRegistry::new();
    let err = registry
        .register(
            "bad",
            &[NativeType::Enum(NativeEnum::Other("Color".into()))],
            &NativeType::Void,
            constant(0),
        )
        .unwrap_err();
    assert_eq!(err.native, "enum Color");
    assert!(registry.is_empty());
}

#[test]
fn object_parameters_accept_anything() {
    let mut registry = NativeRegistry::new();
    let id = registry
        .register("show", &[NativeType::Object], &NativeType::Str, constant(0))
        .unwrap();
    assert_eq!(registry.resolve("show", &[Type::Date]).unwrap().id, id);
    assert_eq!(
        registry.resolve("show", &[Type::list(Type::Integer)]).unwrap().id,
        id
    );
}

#[test]
fn signature_display() {
    let mut registry = NativeRegistry::new();
    let id = registry
        .register(
            "join",
            &[NativeType::Str, NativeType::Array(Box::new(NativeType::Str))],
            &NativeType::Str,
            constant(0),
        )
        .unwrap();
    assert_eq!(
        registry.signature(id).unwrap().to_string(),
        "join(string, string...) : string"
    );
}

mod stdlib {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(registry: &NativeRegistry, name: &str, types: &[Type], args: &[Value]) -> Value {
        let resolved = registry.resolve(name, types).unwrap();
        call(registry, resolved.id, args)
    }

    #[test]
    fn length_overloads() {
        let registry = NativeRegistry::with_stdlib();
        assert_eq!(
            run(&registry, "length", &[Type::String], &[Value::from("héllo")]),
            Value::Integer(5)
        );
        let list = Value::List(ctl_value::ListValue::from_items(
            Type::Integer,
            vec![Value::Integer(1), Value::Integer(2)],
        ));
        assert_eq!(
            run(&registry, "length", &[Type::list(Type::Integer)], &[list]),
            Value::Integer(2)
        );
        assert_eq!(
            run(&registry, "length", &[Type::String], &[Value::Null]),
            Value::Integer(0)
        );
    }

    #[test]
    fn concat_is_variadic() {
        let registry = NativeRegistry::with_stdlib();
        assert_eq!(
            run(
                &registry,
                "concat",
                &[Type::String, Type::String, Type::String],
                &[Value::from("a"), Value::from("b"), Value::from("c")]
            ),
            Value::from("abc")
        );
    }

    #[test]
    fn case_and_trim() {
        let registry = NativeRegistry::with_stdlib();
        assert_eq!(
            run(&registry, "upper", &[Type::String], &[Value::from("abc")]),
            Value::from("ABC")
        );
        assert_eq!(
            run(&registry, "lower", &[Type::String], &[Value::from("AbC")]),
            Value::from("abc")
        );
        assert_eq!(
            run(&registry, "trim", &[Type::String], &[Value::from("  x ")]),
            Value::from("x")
        );
        assert_eq!(
            run(&registry, "trim", &[Type::String], &[Value::Null]),
            Value::Null
        );
    }
}
