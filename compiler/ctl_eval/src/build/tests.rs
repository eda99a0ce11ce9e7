use super::*;
use ctl_ir::{ArithOp, CallTarget, Locality, NodeKind, Span};
use ctl_types::FieldMeta;
use pretty_assertions::assert_eq;

fn stdlib() -> NativeRegistry {
    NativeRegistry::with_stdlib()
}

fn root_stmts(program: &Program) -> Vec<ctl_ir::NodeId> {
    let root = program.root().unwrap();
    match program.kind(root) {
        NodeKind::Block(stmts) => stmts.clone(),
        other => panic!("root is not a block: {other:?}"),
    }
}

#[test]
fn top_level_declarations_become_globals() {
    let natives = stdlib();
    let program = ProgramBuilder::new(&natives)
        .build(&[
            Stmt::decl("a", Type::Integer).into(),
            Stmt::decl_init("b", Type::String, Expr::string("x")).into(),
        ])
        .unwrap();
    assert_eq!(program.global_count(), 2);
    assert_eq!(program.global_by_name("b").map(|g| g.slot), Some(1));
    assert!(program.validate().is_ok());
}

#[test]
fn statements_are_numbered_by_line() {
    let natives = stdlib();
    let program = ProgramBuilder::new(&natives)
        .build(&[
            Stmt::decl("a", Type::Integer).into(),
            Stmt::at(40, 5, Stmt::assign("a", Expr::int(1))).into(),
            Stmt::assign("a", Expr::int(2)).into(),
        ])
        .unwrap();
    let spans: Vec<Span> = root_stmts(&program)
        .into_iter()
        .map(|id| program.span(id))
        .collect();
    assert_eq!(spans, vec![Span::new(1, 1), Span::new(40, 5), Span::new(2, 1)]);
}

#[test]
fn function_locals_start_at_zero() {
    let natives = stdlib();
    let program = ProgramBuilder::new(&natives)
        .build(&[
            Stmt::decl("g", Type::Integer).into(),
            FunctionDecl::new(
                "twice",
                &[("n", Type::Integer)],
                Type::Integer,
                vec![
                    Stmt::decl_init(
                        "r",
                        Type::Integer,
                        Expr::arith(ArithOp::Mul, Expr::var("n"), Expr::int(2)),
                    ),
                    Stmt::ret(Expr::var("r")),
                ],
            )
            .into(),
        ])
        .unwrap();
    let (_, def) = program.function_by_name("twice").unwrap();
    assert_eq!(def.local_count, 2);
    let NodeKind::Block(body) = program.kind(def.body) else {
        panic!("function body is not a block");
    };
    let NodeKind::VarDecl { var, .. } = program.kind(body[0]) else {
        panic!("expected a declaration");
    };
    assert_eq!(var.slot.locality, Locality::Local);
    assert_eq!(var.slot.index, 1);
}

#[test]
fn calls_may_precede_declarations() {
    let natives = stdlib();
    let program = ProgramBuilder::new(&natives)
        .build(&[
            Stmt::expr(Expr::call("later", vec![])).into(),
            FunctionDecl::new("later", &[], Type::Void, vec![]).into(),
        ])
        .unwrap();
    let stmts = root_stmts(&program);
    assert!(matches!(
        program.kind(stmts[0]),
        NodeKind::Call {
            target: CallTarget::Internal(_),
            ..
        }
    ));
}

#[test]
fn internal_functions_shadow_natives() {
    let natives = stdlib();
    assert!(natives.contains("length"));
    let program = ProgramBuilder::new(&natives)
        .build(&[
            FunctionDecl::new(
                "length",
                &[("s", Type::String)],
                Type::Integer,
                vec![Stmt::ret(Expr::int(-1))],
            )
            .into(),
            Stmt::expr(Expr::call("length", vec![Expr::string("abc")])).into(),
        ])
        .unwrap();
    let stmts = root_stmts(&program);
    assert!(matches!(
        program.kind(stmts[0]),
        NodeKind::Call {
            target: CallTarget::Internal(_),
            ..
        }
    ));
}

#[test]
fn internal_overloads_pick_the_closest() {
    let natives = stdlib();
    let program = ProgramBuilder::new(&natives)
        .build(&[
            FunctionDecl::new("f", &[("x", Type::Long)], Type::String, vec![]).into(),
            FunctionDecl::new("f", &[("x", Type::Decimal)], Type::String, vec![]).into(),
            Stmt::expr(Expr::call("f", vec![Expr::int(1)])).into(),
        ])
        .unwrap();
    let stmts = root_stmts(&program);
    let NodeKind::Call {
        target: CallTarget::Internal(id),
        ..
    } = program.kind(stmts[0])
    else {
        panic!("expected an internal call");
    };
    assert_eq!(program.function(*id).unwrap().params[0].ty, Type::Long);
}

#[test]
fn equally_close_overloads_are_ambiguous() {
    let natives = stdlib();
    let err = ProgramBuilder::new(&natives)
        .build(&[
            FunctionDecl::new(
                "f",
                &[("a", Type::Long), ("b", Type::Integer)],
                Type::Void,
                vec![],
            )
            .into(),
            FunctionDecl::new(
                "f",
                &[("a", Type::Integer), ("b", Type::Long)],
                Type::Void,
                vec![],
            )
            .into(),
            Stmt::expr(Expr::call("f", vec![Expr::int(1), Expr::int(2)])).into(),
        ])
        .unwrap_err();
    assert_eq!(
        err,
        BuildError::Resolve(ResolveError::Ambiguous {
            name: "f".to_owned()
        })
    );
}

#[test]
fn duplicate_signatures_are_refused() {
    let natives = stdlib();
    let f = || FunctionDecl::new("f", &[("x", Type::Integer)], Type::Void, vec![]);
    let err = ProgramBuilder::new(&natives)
        .build(&[f().into(), f().into()])
        .unwrap_err();
    assert_eq!(
        err,
        BuildError::DuplicateFunction {
            name: "f".to_owned()
        }
    );
}

#[test]
fn undeclared_variables_are_reported() {
    let natives = stdlib();
    let err = ProgramBuilder::new(&natives)
        .build(&[Stmt::assign("missing", Expr::int(1)).into()])
        .unwrap_err();
    assert_eq!(err.to_string(), "variable 'missing' is not declared");
}

#[test]
fn block_scoped_variables_do_not_leak() {
    let natives = stdlib();
    let err = ProgramBuilder::new(&natives)
        .build(&[
            Stmt::Block(vec![Stmt::decl("inner", Type::Integer)]).into(),
            Stmt::assign("inner", Expr::int(1)).into(),
        ])
        .unwrap_err();
    assert!(matches!(err, BuildError::UndeclaredVariable { .. }));
}

#[test]
fn void_variables_are_refused() {
    let natives = stdlib();
    let err = ProgramBuilder::new(&natives)
        .build(&[Stmt::decl("v", Type::Void).into()])
        .unwrap_err();
    assert_eq!(
        err,
        BuildError::VoidVariable {
            name: "v".to_owned()
        }
    );
}

#[test]
fn known_layouts_check_field_names() {
    let natives = stdlib();
    let schema = RecordSchema::shared("customer", vec![FieldMeta::new("name", Type::String)]);
    let builder = ProgramBuilder::new(&natives).with_input(schema);
    assert!(builder
        .build(&[Stmt::expr(Expr::input(0, "name")).into()])
        .is_ok());
    assert_eq!(
        builder
            .build(&[Stmt::expr(Expr::input(0, "age")).into()])
            .unwrap_err(),
        BuildError::UnknownField {
            record: "customer".to_owned(),
            field: "age".to_owned(),
        }
    );
    assert_eq!(
        builder
            .build(&[Stmt::expr(Expr::input(1, "name")).into()])
            .unwrap_err(),
        BuildError::UnknownRecord { record: 1 }
    );
}

#[test]
fn sequences_return_numbers_or_strings() {
    let natives = stdlib();
    let err = ProgramBuilder::new(&natives)
        .build_expression(&Expr::sequence("ids", ctl_ir::SeqOp::Next, Type::Boolean))
        .unwrap_err();
    assert_eq!(err, BuildError::InvalidSequenceType { ty: Type::Boolean });
}

#[test]
fn extending_keeps_enclosing_slots() {
    let natives = stdlib();
    let enclosing = ProgramBuilder::new(&natives)
        .build(&[
            Stmt::decl("a", Type::Integer).into(),
            Stmt::decl("b", Type::String).into(),
        ])
        .unwrap();
    let program = ProgramBuilder::extending(&natives, &enclosing)
        .build(&[
            Stmt::assign("b", Expr::string("set")).into(),
            Stmt::decl("c", Type::Long).into(),
        ])
        .unwrap();
    let stmts = root_stmts(&program);
    let NodeKind::Assign { target, .. } = program.kind(stmts[0]) else {
        panic!("expected an assignment");
    };
    assert_eq!(target.slot.index, 1);
    assert_eq!(program.global_by_name("c").map(|g| g.slot), Some(2));
}

#[test]
fn foreach_declares_its_variable() {
    let natives = stdlib();
    let program = ProgramBuilder::new(&natives)
        .build(&[Stmt::Foreach {
            var: "item".to_owned(),
            ty: Type::Integer,
            iterable: Expr::list(Type::Integer, vec![Expr::int(1)]),
            body: vec![],
        }
        .into()])
        .unwrap();
    let stmts = root_stmts(&program);
    let NodeKind::Block(inner) = program.kind(stmts[0]) else {
        panic!("foreach lowers to a block");
    };
    assert!(matches!(program.kind(inner[0]), NodeKind::VarDecl { .. }));
    assert!(matches!(program.kind(inner[1]), NodeKind::Foreach { .. }));
    assert_eq!(program.global_by_name("item").map(|g| g.ty.clone()), Some(Type::Integer));
}
