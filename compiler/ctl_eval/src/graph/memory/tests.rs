use super::*;
use ctl_ir::Span;
use ctl_types::{FieldMeta, Type};
use pretty_assertions::assert_eq;

use crate::logger::TracingLogger;

fn people() -> MemoryLookup {
    let schema = RecordSchema::shared(
        "person",
        vec![
            FieldMeta::new("id", Type::Integer),
            FieldMeta::new("name", Type::String),
        ],
    );
    let rows = vec![
        DataRecord::from_values(Arc::clone(&schema), &[Value::Integer(1), Value::from("ann")])
            .unwrap(),
        DataRecord::from_values(Arc::clone(&schema), &[Value::Integer(2), Value::from("bob")])
            .unwrap(),
        DataRecord::from_values(Arc::clone(&schema), &[Value::Integer(1), Value::from("amy")])
            .unwrap(),
    ];
    MemoryLookup::new(schema, vec![0], rows)
}

#[test]
fn sequence_counts_from_start() {
    let seq = MemorySequence::new(10, 5);
    assert_eq!(seq.next_value().unwrap(), 10);
    assert_eq!(seq.next_value().unwrap(), 15);
    assert_eq!(seq.current_value().unwrap(), 15);
    seq.reset().unwrap();
    assert_eq!(seq.current_value().unwrap(), 10);
    assert_eq!(seq.next_value().unwrap(), 10);
}

#[test]
fn sequence_reports_exhaustion() {
    let seq = MemorySequence::new(i64::MAX, 1);
    assert!(seq.next_value().is_err());
}

#[test]
fn lookup_requires_init() {
    let table = people();
    assert!(!table.is_initialized());
    assert!(table.find(&[Value::Integer(1)]).is_err());
    table.init().unwrap();
    assert_eq!(table.init_calls(), 1);
    assert!(table.is_initialized());
    table.free();
    assert_eq!(table.free_calls(), 1);
    assert!(!table.is_initialized());
}

#[test]
fn lookup_finds_all_matches_in_order() {
    let table = people();
    table.init().unwrap();
    let found = table.find(&[Value::Long(1)]).unwrap();
    let names: Vec<Value> = found
        .iter()
        .map(|r| r.field_by_name("name").cloned().unwrap())
        .collect();
    assert_eq!(names, vec![Value::from("ann"), Value::from("amy")]);
    assert!(table.find(&[Value::Integer(9)]).unwrap().is_empty());
    assert!(table.find(&[]).is_err());
}

#[test]
fn dictionary_distinguishes_null_entries() {
    let dict = MemoryDictionary::new();
    dict.put("a", Some("1")).unwrap();
    dict.put("b", None).unwrap();
    assert_eq!(dict.get("a").as_deref(), Some("1"));
    assert_eq!(dict.get("b"), None);
    assert!(dict.contains("b"));
    dict.remove("b").unwrap();
    assert!(!dict.contains("b"));
}

#[test]
fn graph_hands_out_registered_resources() {
    let logger = Arc::new(MemoryLogger::new());
    let graph = MemoryGraph::new()
        .with_sequence("ids", Arc::new(MemorySequence::new(0, 1)))
        .with_lookup("people", Arc::new(people()))
        .with_logger(logger.clone());
    assert!(graph.sequence("ids").is_some());
    assert!(graph.sequence("other").is_none());
    assert!(graph.lookup_table("people").is_some());
    assert!(graph.dictionary().is_none());

    graph.logger().unwrap().log(LogLevel::Warn, "careful");
    assert_eq!(logger.entries(), vec![(LogLevel::Warn, "careful".to_owned())]);
}

#[test]
fn counting_function_counts() {
    let f = CountingFunction::new(Value::Boolean(true));
    let ctx = CallContext {
        function: "probe",
        span: Span::DUMMY,
        logger: &TracingLogger,
    };
    assert_eq!(f.call(&[], &ctx).unwrap(), Value::Boolean(true));
    f.call(&[Value::Integer(1)], &ctx).unwrap();
    assert_eq!(f.calls(), 2);
}
