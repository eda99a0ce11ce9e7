use super::*;
use pretty_assertions::assert_eq;

#[test]
fn scalars_map_directly() {
    assert_eq!(Type::from_native(&NativeType::Int), Ok(Type::Integer));
    assert_eq!(Type::from_native(&NativeType::Decimal), Ok(Type::Decimal));
    assert_eq!(Type::from_native(&NativeType::Bytes), Ok(Type::ByteArray));
    assert_eq!(Type::from_native(&NativeType::Record), Ok(Type::any_record()));
}

#[test]
fn arrays_are_varargs_of_their_element() {
    let varargs = NativeType::Array(Box::new(NativeType::Str));
    assert_eq!(Type::from_native(&varargs), Ok(Type::String));
}

#[test]
fn symbol_enums_map_to_symbol_kinds() {
    assert_eq!(
        Type::from_native(&NativeType::Enum(NativeEnum::DateField)),
        Ok(Type::DateField)
    );
    assert_eq!(
        Type::from_native(&NativeType::Enum(NativeEnum::LogLevel)),
        Ok(Type::LogLevel)
    );
}

#[test]
fn parameterized_collections_keep_their_parameters() {
    let list = NativeType::List(Some(Box::new(NativeType::Generic("E".into()))));
    assert_eq!(Type::from_native(&list), Ok(Type::list(Type::var("E"))));
    let map = NativeType::Map(Some((Box::new(NativeType::Str), Box::new(NativeType::Long))));
    assert_eq!(
        Type::from_native(&map),
        Ok(Type::map(Type::String, Type::Long))
    );
}

#[test]
fn unsupported_types_name_the_offender() {
    let err = Type::from_native(&NativeType::Opaque("java.io.File".into()));
    let msg = err.map_err(|e| e.to_string()).err().unwrap_or_default();
    assert!(msg.contains("java.io.File"), "{msg}");

    let raw = Type::from_native(&NativeType::List(None));
    assert_eq!(raw.map_err(|e| e.native), Err("List".to_string()));

    let nested = NativeType::Map(Some((
        Box::new(NativeType::Str),
        Box::new(NativeType::Enum(NativeEnum::Other("Color".into()))),
    )));
    assert_eq!(
        Type::from_native(&nested).map_err(|e| e.native),
        Err("enum Color".to_string())
    );
}
