use super::*;
use pretty_assertions::assert_eq;

fn customer() -> RecordSchema {
    RecordSchema::new(
        "customer",
        vec![
            FieldMeta::new("id", Type::Long).required(),
            FieldMeta::new("name", Type::String),
            FieldMeta::new("balance", Type::Decimal),
        ],
    )
}

#[test]
fn field_position_resolves_names() {
    let schema = customer();
    assert_eq!(schema.field_position("id"), Some(0));
    assert_eq!(schema.field_position("balance"), Some(2));
    assert_eq!(schema.field_position("missing"), None);
}

#[test]
fn field_metadata_is_ordered() {
    let schema = customer();
    assert_eq!(schema.len(), 3);
    assert!(!schema.field(0).map_or(true, |f| f.nullable));
    assert_eq!(schema.field(1).map(|f| &*f.name), Some("name"));
    assert!(schema.field(3).is_none());
}

#[test]
fn equality_ignores_derived_index() {
    assert_eq!(customer(), customer());
    let other = RecordSchema::new("customer", vec![FieldMeta::new("id", Type::Long)]);
    assert_ne!(customer(), other);
}
