use super::*;
use crate::containers::{ListValue, MapValue};
use ctl_types::Type;
use pretty_assertions::assert_eq;

#[test]
fn numerics_compare_across_kinds() {
    assert_eq!(Value::Integer(3).compare(&Value::Long(3)), Ok(Ordering::Equal));
    assert_eq!(Value::Integer(3).compare(&Value::Double(3.5)), Ok(Ordering::Less));
    assert_eq!(
        Value::decimal("10.00").unwrap().compare(&Value::decimal("10.0").unwrap()),
        Ok(Ordering::Equal)
    );
    assert_eq!(
        Value::Double(0.1).compare(&Value::decimal("0.2").unwrap()),
        Ok(Ordering::Less)
    );
}

#[test]
fn strings_compare_lexicographically() {
    assert_eq!(Value::string("abc").compare(&Value::string("abd")), Ok(Ordering::Less));
    assert_eq!(Value::string("b").compare(&Value::string("a")), Ok(Ordering::Greater));
}

#[test]
fn mismatched_kinds_are_incompatible() {
    assert!(matches!(
        Value::string("1").compare(&Value::Integer(1)),
        Err(ValueError::IncompatibleOperands { op: "compare", .. })
    ));
}

#[test]
fn containers_have_equality_but_no_order() {
    let a = Value::List(ListValue::from_items(Type::Integer, vec![Value::Integer(1)]));
    let b = Value::List(ListValue::from_items(Type::Integer, vec![Value::Integer(1)]));
    assert_eq!(a.equals(&b), Ok(true));
    assert!(matches!(a.compare(&b), Err(ValueError::NotOrdered { .. })));
}

#[test]
fn membership_checks_items_and_keys() {
    let list = Value::List(ListValue::from_items(
        Type::Long,
        vec![Value::Long(1), Value::Long(2)],
    ));
    assert_eq!(list.contains(&Value::Integer(2)), Ok(true));
    assert_eq!(list.contains(&Value::Integer(3)), Ok(false));

    let mut map = Value::Map(MapValue::new(Type::String, Type::Integer));
    map.set_stored(&Value::string("k"), &Value::Integer(9)).unwrap();
    assert_eq!(map.contains(&Value::string("k")), Ok(true));
    assert_eq!(map.contains(&Value::Integer(9)), Ok(false));

    assert!(Value::Integer(1).contains(&Value::Integer(1)).is_err());
}
