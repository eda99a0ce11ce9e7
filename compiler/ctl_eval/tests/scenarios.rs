//! End-to-end scenarios.
//!
//! Each test assembles a small script as a syntax tree, builds it with
//! `ProgramBuilder` against the standard library and runs it once.
//!
//! # Organization
//!
//! - operator precedence, `nvl`, decimal equality, list indexing and a
//!   counting `for` loop
//! - unresolvable graph resources
//! - short-circuit evaluation, observed through a counting native
//! - call-frame isolation and recursion

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

mod common;

use std::sync::Arc;

use ctl_eval::build::{BuildError, Expr, FunctionDecl, ProgramBuilder, Stmt, Target};
use ctl_eval::graph::memory::CountingFunction;
use ctl_eval::ir::SeqOp;
use ctl_eval::native::{NativeRegistry, NativeSignature};
use ctl_eval::types::{Name, Type};
use ctl_eval::value::Value;
use ctl_eval::{ErrorCategory, EvalErrorKind, Interpreter, ResourceKind};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use common::{add, build, eq, gt, lt, mul, run, stdlib, sub};

#[test]
fn multiplication_binds_tighter_than_addition() {
    let result = run(&[
        Stmt::decl("i", Type::Integer).into(),
        Stmt::assign("i", add(Expr::int(2), mul(Expr::int(3), Expr::int(4)))).into(),
        Stmt::expr(Expr::var("i")).into(),
    ]);
    assert_eq!(result.unwrap(), Some(Value::Integer(14)));
}

#[test]
fn nvl_replaces_null() {
    let result = run(&[
        Stmt::decl("s", Type::String).into(),
        Stmt::assign("s", Expr::nvl(Expr::null(), Expr::string("default"))).into(),
        Stmt::expr(Expr::var("s")).into(),
    ]);
    assert_eq!(result.unwrap(), Some(Value::string("default")));
}

#[test]
fn decimals_compare_by_value() {
    let decimal = |text: &str| Expr::Lit(Value::decimal(text).unwrap());
    let result = run(&[Stmt::expr(eq(decimal("10.00"), decimal("10.0"))).into()]);
    assert_eq!(result.unwrap(), Some(Value::Boolean(true)));
}

#[test]
fn list_slots_exist_once_assigned() {
    let prefix = || {
        vec![
            Stmt::decl("l", Type::list(Type::Integer)).into(),
            Stmt::Assign(Target::index("l", Expr::int(0)), Expr::int(5)).into(),
        ]
    };

    let mut items = prefix();
    items.push(Stmt::expr(Expr::index("l", Expr::int(0))).into());
    assert_eq!(run(&items).unwrap(), Some(Value::Integer(5)));

    let mut items = prefix();
    items.push(Stmt::expr(Expr::index("l", Expr::int(1))).into());
    let err = run(&items).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Index);
    assert!(err.is_catchable());
}

fn counting_loop(limit: i32) -> Vec<ctl_eval::build::Item> {
    vec![
        Stmt::decl_init("total", Type::Integer, Expr::int(0)).into(),
        Stmt::For {
            init: Some(Box::new(Stmt::decl_init("i", Type::Integer, Expr::int(0)))),
            cond: Some(lt(Expr::var("i"), Expr::int(limit))),
            step: Some(Box::new(Stmt::incr("i"))),
            body: vec![Stmt::assign(
                "total",
                add(Expr::var("total"), Expr::var("i")),
            )],
        }
        .into(),
        Stmt::expr(Expr::var("total")).into(),
    ]
}

#[test]
fn for_loop_accumulates() {
    assert_eq!(run(&counting_loop(3)).unwrap(), Some(Value::Integer(3)));
}

#[test]
fn missing_sequence_is_a_resource_error() {
    let result = run(&[Stmt::TryCatch {
        body: vec![Stmt::expr(Expr::sequence("no_such_seq", SeqOp::Next, Type::Long))],
        binding: Some("err".to_owned()),
        handler: vec![Stmt::ret(Expr::string("caught"))],
    }
    .into()]);
    let err = result.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Resource);
    assert_eq!(
        err.kind,
        EvalErrorKind::MissingResource {
            kind: ResourceKind::Sequence,
            name: "no_such_seq".to_owned(),
        }
    );
    assert!(!err.is_catchable());
}

/// A registry with the standard library plus a counting `probe()`.
fn with_probe() -> (Arc<NativeRegistry>, Arc<CountingFunction>) {
    let probe = Arc::new(CountingFunction::new(Value::Boolean(true)));
    let mut natives = NativeRegistry::with_stdlib();
    natives.register_typed(
        NativeSignature {
            name: Name::from("probe"),
            params: vec![],
            ret: Type::Boolean,
            varargs: false,
        },
        probe.clone(),
    );
    (Arc::new(natives), probe)
}

#[test]
fn logical_operators_short_circuit() {
    let (natives, probe) = with_probe();
    let call = || Expr::call("probe", vec![]);
    let program = build(
        &natives,
        &[
            Stmt::expr(Expr::and(Expr::boolean(false), call())).into(),
            Stmt::expr(Expr::or(Expr::boolean(true), call())).into(),
            Stmt::expr(Expr::and(Expr::boolean(true), call())).into(),
        ],
    );
    let mut interp = Interpreter::builder().natives(natives).build();
    assert_eq!(
        interp.evaluate(&program, &[], &mut []).unwrap(),
        Some(Value::Boolean(true))
    );
    assert_eq!(probe.calls(), 1);
}

#[test]
fn callee_cannot_see_caller_locals() {
    let natives = stdlib();
    let err = ProgramBuilder::new(&natives)
        .build(&[
            FunctionDecl::new(
                "outer",
                &[],
                Type::Integer,
                vec![
                    Stmt::decl_init("secret", Type::Integer, Expr::int(1)),
                    Stmt::ret(Expr::call("inner", vec![])),
                ],
            )
            .into(),
            FunctionDecl::new(
                "inner",
                &[],
                Type::Integer,
                vec![Stmt::ret(Expr::var("secret"))],
            )
            .into(),
        ])
        .unwrap_err();
    assert_eq!(
        err,
        BuildError::UndeclaredVariable {
            name: "secret".to_owned()
        }
    );
}

#[test]
fn recursive_activations_keep_their_own_locals() {
    // sum(n) = sum(n - 1) + n, reading the local `r` after the nested call.
    let natives = stdlib();
    let program = build(
        &natives,
        &[FunctionDecl::new(
            "sum",
            &[("n", Type::Integer)],
            Type::Integer,
            vec![
                Stmt::decl_init("r", Type::Integer, Expr::var("n")),
                Stmt::if_then(
                    gt(Expr::var("n"), Expr::int(1)),
                    vec![Stmt::assign(
                        "r",
                        add(
                            Expr::call("sum", vec![sub(Expr::var("n"), Expr::int(1))]),
                            Expr::var("r"),
                        ),
                    )],
                ),
                Stmt::ret(Expr::var("r")),
            ],
        )
        .into()],
    );
    let mut interp = Interpreter::builder().natives(natives).build();
    assert_eq!(
        interp
            .call_function(&program, "sum", &[Value::Integer(5)])
            .unwrap(),
        Some(Value::Integer(15))
    );
}

proptest! {
    #[test]
    fn for_loop_totals_match_closed_form(limit in 0i32..60) {
        let total = run(&counting_loop(limit)).unwrap();
        prop_assert_eq!(total, Some(Value::Integer(limit * (limit - 1) / 2)));
    }
}
