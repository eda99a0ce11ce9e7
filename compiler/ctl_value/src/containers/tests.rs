use super::*;
use ctl_types::FieldMeta;
use pretty_assertions::assert_eq;

fn person() -> Arc<RecordSchema> {
    RecordSchema::shared(
        "person",
        vec![
            FieldMeta::new("name", Type::String),
            FieldMeta::new("age", Type::Integer),
        ],
    )
}

mod lists {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn set_at_length_appends_and_beyond_fails() {
        let mut list = Value::List(ListValue::new(Type::Integer));
        list.set_stored(&Value::Integer(0), &Value::Integer(5)).unwrap();
        assert_eq!(list.get_stored(&Value::Integer(0)), Ok(Value::Integer(5)));
        assert_eq!(
            list.get_stored(&Value::Integer(1)),
            Err(ValueError::IndexOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(
            list.set_stored(&Value::Integer(3), &Value::Integer(1)),
            Err(ValueError::IndexOutOfRange { index: 3, len: 1 })
        );
    }

    #[test]
    fn minus_one_appends() {
        let mut list = ListValue::with_len(Type::Long, 2);
        list.set(-1, &Value::Integer(9)).unwrap();
        assert_eq!(list.items, vec![Value::Null, Value::Null, Value::Long(9)]);
    }

    #[test]
    fn elements_are_converted_to_the_element_type() {
        let mut list = ListValue::new(Type::Decimal);
        list.push(&Value::Integer(3)).unwrap();
        assert_eq!(list.items[0], Value::Decimal(3.into()));
        assert!(list.push(&Value::string("x")).is_err());
    }

    #[test]
    fn index_must_be_integral() {
        let list = Value::List(ListValue::with_len(Type::Integer, 1));
        assert!(matches!(
            list.get_stored(&Value::string("0")),
            Err(ValueError::InvalidIndex { .. })
        ));
    }
}

mod maps {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_keys_read_as_null() {
        let mut map = Value::Map(MapValue::new(Type::String, Type::Integer));
        map.set_stored(&Value::string("a"), &Value::Integer(1)).unwrap();
        assert_eq!(map.get_stored(&Value::string("a")), Ok(Value::Integer(1)));
        assert_eq!(map.get_stored(&Value::string("b")), Ok(Value::Null));
        assert_eq!(map.length(), Some(1));
    }

    #[test]
    fn null_key_is_rejected_on_write() {
        let mut map = MapValue::new(Type::String, Type::Integer);
        assert_eq!(
            map.insert(&Value::Null, &Value::Integer(1)),
            Err(ValueError::MissingKey)
        );
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut map = Value::Map(MapValue::new(Type::String, Type::Integer));
        for (k, v) in [("z", 1), ("a", 2), ("m", 3)] {
            map.set_stored(&Value::string(k), &Value::Integer(v)).unwrap();
        }
        assert_eq!(
            map.iter_elements(),
            Ok(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)])
        );
    }
}

mod records {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fields_resolve_by_name_or_ordinal() {
        let mut rec = Value::Record(RecordValue::new(person()));
        rec.set_stored(&Value::string("age"), &Value::Integer(41)).unwrap();
        assert_eq!(rec.get_stored(&Value::Integer(1)), Ok(Value::Integer(41)));
        assert_eq!(
            rec.get_stored(&Value::string("height")),
            Err(ValueError::UnknownField {
                field: "height".into()
            })
        );
    }

    #[test]
    fn field_values_are_type_checked() {
        let mut rec = RecordValue::new(person());
        assert!(rec.set(0, &Value::Integer(3)).is_err());
        assert!(rec.set(1, &Value::Integer(3)).is_ok());
    }
}

#[test]
fn byte_arrays_store_low_bits() {
    let mut bytes = Value::ByteArray(vec![1, 2]);
    bytes.set_stored(&Value::Integer(1), &Value::Integer(0x1ff)).unwrap();
    assert_eq!(bytes.get_stored(&Value::Integer(1)), Ok(Value::Integer(0xff)));
    bytes.set_stored(&Value::Integer(2), &Value::Integer(7)).unwrap();
    assert_eq!(bytes.length(), Some(3));
}

#[test]
fn scalars_are_not_indexable() {
    assert!(matches!(
        Value::Integer(1).get_stored(&Value::Integer(0)),
        Err(ValueError::NotIndexable { .. })
    ));
    assert_eq!(Value::string("héllo").length(), Some(5));
}
