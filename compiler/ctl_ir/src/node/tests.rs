use super::*;
use pretty_assertions::assert_eq;
use smallvec::smallvec;

fn id(n: u32) -> NodeId {
    NodeId::new(n)
}

#[test]
fn children_follow_evaluation_order() {
    let kind = NodeKind::For {
        init: Some(id(1)),
        cond: None,
        step: Some(id(3)),
        body: id(4),
    };
    let expected: SmallVec<[NodeId; 4]> = smallvec![id(1), id(3), id(4)];
    assert_eq!(kind.children(), expected);
}

#[test]
fn indexed_variables_expose_their_index() {
    let var = VarRef::new(Name::from("l"), Slot::global(0)).indexed(id(7));
    let assign = NodeKind::Assign {
        target: var,
        value: id(8),
    };
    assert_eq!(assign.children().to_vec(), vec![id(7), id(8)]);
}

#[test]
fn switch_lists_cases_then_default() {
    let kind = NodeKind::Switch {
        scrutinee: id(0),
        cases: vec![
            Case {
                value: id(1),
                body: id(2),
            },
            Case {
                value: id(3),
                body: id(4),
            },
        ],
        default: Some(id(5)),
    };
    assert_eq!(
        kind.children().to_vec(),
        vec![id(0), id(1), id(2), id(3), id(4), id(5)]
    );
}

#[test]
fn wildcard_mapping_is_a_statement_over_its_source() {
    let kind = NodeKind::WildcardMapping {
        record: 0,
        source: id(2),
    };
    assert_eq!(kind.children().to_vec(), vec![id(2)]);
    assert!(!kind.is_expression());
}

#[test]
fn expression_classification() {
    assert!(NodeKind::Literal(Value::Integer(1)).is_expression());
    assert!(!NodeKind::Break.is_expression());
    let step = |fix| NodeKind::Step {
        op: StepOp::Incr,
        fix,
        target: VarRef::new(Name::from("i"), Slot::local(0)),
    };
    assert!(step(Fix::Postfix).is_expression());
    assert!(!step(Fix::Statement).is_expression());
    assert!(!NodeKind::Lookup {
        table: Name::from("t"),
        op: LookupOp::Free
    }
    .is_expression());
}
