use super::*;
use crate::schema::FieldMeta;
use pretty_assertions::assert_eq;

#[test]
fn display_uses_script_spelling() {
    assert_eq!(Type::Integer.to_string(), "integer");
    assert_eq!(Type::Double.to_string(), "number");
    assert_eq!(Type::list(Type::String).to_string(), "list[string]");
    assert_eq!(
        Type::map(Type::String, Type::Integer).to_string(),
        "map[string,integer]"
    );
    assert_eq!(Type::var("T").to_string(), "T");
    assert_eq!(Type::any_record().to_string(), "record");
}

#[test]
fn record_display_names_schema() {
    let schema = RecordSchema::shared("customer", vec![FieldMeta::new("id", Type::Long)]);
    assert_eq!(Type::record(schema).to_string(), "record(customer)");
}

#[test]
fn predicates_classify_kinds() {
    assert!(Type::Decimal.is_numeric());
    assert!(!Type::String.is_numeric());
    assert!(Type::list(Type::Integer).is_list());
    assert!(Type::map(Type::String, Type::Integer).is_map());
    assert!(Type::any_record().is_record());
    assert!(Type::ByteArray.is_byte_array());
    assert!(Type::DateField.is_type_symbol());
    assert!(Type::LogLevel.is_type_symbol());
    assert!(Type::var("K").is_type_variable());
    assert!(Type::Date.is_primitive());
    assert!(!Type::ByteArray.is_primitive());
}

#[test]
fn flags_match_predicates() {
    assert!(Type::Long.flags().contains(TypeFlags::NUMERIC | TypeFlags::ORDERED));
    assert!(Type::ByteArray.flags().contains(TypeFlags::INDEXABLE));
    assert!(!Type::ByteArray.flags().contains(TypeFlags::CONTAINER));
    assert!(Type::list(Type::Integer)
        .flags()
        .has_any(TypeFlags::CONTAINER));
    assert_eq!(Type::Object.flags(), TypeFlags::empty());
}

#[test]
fn structural_equality_for_parameterized_types() {
    assert_eq!(Type::list(Type::Integer), Type::list(Type::Integer));
    assert_ne!(Type::list(Type::Integer), Type::list(Type::Long));
    let a = RecordSchema::shared("r", vec![FieldMeta::new("x", Type::Integer)]);
    let b = RecordSchema::shared("r", vec![FieldMeta::new("x", Type::Integer)]);
    assert_eq!(Type::record(a), Type::record(b));
}

#[test]
fn compatibility_spans_numeric_kinds_only() {
    assert!(Type::Integer.is_compatible(&Type::Decimal));
    assert!(Type::String.is_compatible(&Type::String));
    assert!(!Type::String.is_compatible(&Type::Integer));
    assert!(!Type::Boolean.is_compatible(&Type::Date));
}

#[test]
fn symbol_names_parse_case_insensitively() {
    assert_eq!(DateField::from_name("MONTH"), Some(DateField::Month));
    assert_eq!(DateField::from_name("fortnight"), None);
    assert_eq!(LogLevel::from_name("Warn"), Some(LogLevel::Warn));
    assert_eq!(LogLevel::Fatal.to_string(), "fatal");
}
