use super::*;
use crate::errors::{null_operand, ErrorCategory, EvalErrorKind};
use pretty_assertions::assert_eq;

fn site(name: &str, line: u32) -> CallSite {
    CallSite {
        name: Name::from(name),
        span: Some(Span::new(line, 1)),
    }
}

#[test]
fn push_respects_the_limit() {
    let mut stack = CallStack::new(Some(2));
    stack.push(site("a", 1)).unwrap();
    stack.push(site("b", 2)).unwrap();
    let err = stack.push(site("c", 3)).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::StackOverflow { depth: 2 });
    assert_eq!(err.category(), ErrorCategory::Fatal);
    assert_eq!(stack.depth(), 2);
}

#[test]
fn unlimited_stack_never_overflows() {
    let mut stack = CallStack::new(None);
    for i in 0..5000 {
        stack.push(site("f", i)).unwrap();
    }
    assert_eq!(stack.depth(), 5000);
}

#[test]
fn capture_is_innermost_first() {
    let mut stack = CallStack::new(None);
    stack.push(site("outer", 1)).unwrap();
    stack.push(site("inner", 5)).unwrap();
    let bt = stack.capture();
    let names: Vec<&str> = bt.frames().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["inner", "outer"]);
}

#[test]
fn attach_backtrace_keeps_the_first_one() {
    let mut stack = CallStack::new(None);
    let err = stack.attach_backtrace(null_operand("add"));
    assert_eq!(err.backtrace, None);

    stack.push(site("f", 1)).unwrap();
    let err = stack.attach_backtrace(null_operand("add"));
    assert_eq!(err.backtrace.as_ref().map(EvalBacktrace::len), Some(1));

    stack.push(site("g", 2)).unwrap();
    let err = stack.attach_backtrace(err);
    assert_eq!(err.backtrace.as_ref().map(EvalBacktrace::len), Some(1));
}

#[test]
fn truncate_unwinds() {
    let mut stack = CallStack::new(None);
    stack.push(site("a", 1)).unwrap();
    stack.push(site("b", 2)).unwrap();
    stack.truncate(1);
    assert_eq!(stack.depth(), 1);
    stack.pop();
    assert!(stack.is_empty());
}
