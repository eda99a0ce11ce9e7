use super::*;
use crate::node::{NodeKind, Slot, VarRef};
use ctl_value::Value;
use pretty_assertions::assert_eq;

#[test]
fn programs_get_distinct_ids() {
    assert_ne!(Program::new().id(), Program::new().id());
}

#[test]
fn alloc_and_validate() {
    let mut program = Program::new();
    let one = program.alloc(NodeKind::Literal(Value::Integer(1)), Span::new(1, 1));
    let root = program.alloc(NodeKind::Block(vec![one]), Span::new(1, 1));
    program.set_root(root);
    assert_eq!(program.validate(), Ok(()));
    assert_eq!(program.span(one), Span::new(1, 1));
}

#[test]
fn dangling_children_are_reported() {
    let mut program = Program::new();
    let root = program.alloc(NodeKind::Block(vec![NodeId::new(9)]), Span::DUMMY);
    program.set_root(root);
    assert_eq!(
        program.validate(),
        Err(ProgramError::DanglingNode {
            parent: root,
            child: NodeId::new(9)
        })
    );
}

#[test]
fn missing_root_is_reported() {
    assert_eq!(Program::new().validate(), Err(ProgramError::MissingRoot));
}

#[test]
fn globals_and_functions_are_found_by_name() {
    let mut program = Program::new();
    let body = program.alloc(NodeKind::Block(vec![]), Span::DUMMY);
    let f = program.add_function(FunctionDef {
        name: Name::from("transform"),
        params: vec![],
        ret: Type::Integer,
        body,
        local_count: 0,
    });
    program.add_global(GlobalInfo {
        name: Name::from("total"),
        ty: Type::Long,
        slot: 3,
    });
    let _ = VarRef::new(Name::from("total"), Slot::global(3));
    assert_eq!(program.function_by_name("transform").map(|(id, _)| id), Some(f));
    assert_eq!(program.global_count(), 4);
    assert_eq!(program.global_by_name("total").map(|g| g.slot), Some(3));
}
