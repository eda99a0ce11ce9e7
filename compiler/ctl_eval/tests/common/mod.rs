//! Helpers shared by the executor integration tests.

#![allow(dead_code, reason = "each test binary uses a subset of the helpers")]

use std::sync::Arc;

use ctl_eval::build::{Expr, Item, ProgramBuilder};
use ctl_eval::ir::{ArithOp, CmpOp, Program};
use ctl_eval::native::NativeRegistry;
use ctl_eval::value::Value;
use ctl_eval::{buffer_handler, EvalResult, Interpreter};

pub fn stdlib() -> Arc<NativeRegistry> {
    Arc::new(NativeRegistry::with_stdlib())
}

pub fn build(natives: &NativeRegistry, items: &[Item]) -> Program {
    ProgramBuilder::new(natives).build(items).unwrap()
}

/// Build `items` against the standard library and run them once on a
/// fresh interpreter.
pub fn run(items: &[Item]) -> EvalResult<Option<Value>> {
    let natives = stdlib();
    let program = build(&natives, items);
    Interpreter::builder()
        .natives(natives)
        .print_handler(buffer_handler())
        .build()
        .evaluate(&program, &[], &mut [])
}

pub fn add(left: Expr, right: Expr) -> Expr {
    Expr::arith(ArithOp::Add, left, right)
}

pub fn sub(left: Expr, right: Expr) -> Expr {
    Expr::arith(ArithOp::Sub, left, right)
}

pub fn mul(left: Expr, right: Expr) -> Expr {
    Expr::arith(ArithOp::Mul, left, right)
}

pub fn div(left: Expr, right: Expr) -> Expr {
    Expr::arith(ArithOp::Div, left, right)
}

pub fn eq(left: Expr, right: Expr) -> Expr {
    Expr::compare(CmpOp::Eq, left, right)
}

pub fn lt(left: Expr, right: Expr) -> Expr {
    Expr::compare(CmpOp::Lt, left, right)
}

pub fn gt(left: Expr, right: Expr) -> Expr {
    Expr::compare(CmpOp::Gt, left, right)
}
