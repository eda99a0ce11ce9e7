use super::*;
use ctl_value::Type;
use pretty_assertions::assert_eq;

fn int_var(name: &str, value: i32) -> Variable {
    let mut var = Variable::new(name.into(), Type::Integer);
    var.value = Value::Integer(value);
    var
}

fn small() -> RuntimeStack {
    RuntimeStack::new(StackLimits {
        max_expr_depth: 4,
        initial_globals: 2,
        max_globals: 8,
        initial_locals: 2,
        max_locals: 8,
        growth_factor: 1.6,
    })
}

mod expression_stack {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn push_pop_peek() {
        let mut stack = small();
        stack.push(Value::Integer(1)).unwrap();
        stack.push(Value::string("two")).unwrap();
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.peek(0).unwrap(), &Value::string("two"));
        assert_eq!(stack.peek(1).unwrap(), &Value::Integer(1));
        assert_eq!(stack.pop().unwrap(), Value::string("two"));
        assert_eq!(stack.pop().unwrap(), Value::Integer(1));
        assert_eq!(stack.pop(), Err(StackError::ExpressionUnderflow));
    }

    #[test]
    fn overflow_is_reported_at_the_limit() {
        let mut stack = small();
        for i in 0..4 {
            stack.push(Value::Integer(i)).unwrap();
        }
        assert_eq!(
            stack.push(Value::Null),
            Err(StackError::ExpressionOverflow { limit: 4 })
        );
        assert_eq!(stack.depth(), 4);
    }

    #[test]
    fn pop_n_keeps_argument_order() {
        let mut stack = small();
        for i in 1..=3 {
            stack.push(Value::Integer(i)).unwrap();
        }
        assert_eq!(
            stack.pop_n(2).unwrap(),
            vec![Value::Integer(2), Value::Integer(3)]
        );
        assert_eq!(stack.values(), &[Value::Integer(1)]);
        assert_eq!(stack.pop_n(2), Err(StackError::ExpressionUnderflow));
    }
}

mod slots {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn globals_grow_until_the_cap() {
        let mut stack = small();
        assert_eq!(stack.global_capacity(), 2);
        stack.set_global(2, int_var("g", 7)).unwrap();
        assert_eq!(stack.global_capacity(), 4);
        stack.set_global(7, int_var("h", 8)).unwrap();
        assert_eq!(stack.global_capacity(), 8);
        assert_eq!(stack.global(2).map(|v| v.value.clone()), Some(Value::Integer(7)));
        assert_eq!(
            stack.set_global(8, int_var("x", 0)),
            Err(StackError::GlobalsExhausted { slot: 8, limit: 8 })
        );
    }

    #[test]
    fn undeclared_slots_are_empty() {
        let stack = small();
        assert!(stack.global(0).is_none());
        assert!(stack.global(100).is_none());
        assert!(stack.local(0).is_none());
    }

    #[test]
    fn local_counter_tracks_highest_slot() {
        let mut stack = small();
        stack.set_local(2, int_var("c", 3)).unwrap();
        assert_eq!(stack.local_counter(), 3);
        stack.set_local(0, int_var("a", 1)).unwrap();
        assert_eq!(stack.local_counter(), 3);
    }
}

mod frames {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn callee_locals_sit_above_the_caller() {
        let mut stack = small();
        stack.set_local(0, int_var("a", 1)).unwrap();
        stack.set_local(1, int_var("b", 2)).unwrap();
        stack.push_call_frame();
        assert_eq!(stack.local_offset(), 2);
        assert_eq!(stack.local_counter(), 0);
        assert!(stack.local(0).is_none());
        stack.set_local(0, int_var("a", 10)).unwrap();
        assert_eq!(stack.local(0).map(|v| v.value.clone()), Some(Value::Integer(10)));

        stack.pop_call_frame().unwrap();
        assert_eq!((stack.local_offset(), stack.local_counter()), (0, 2));
        assert_eq!(stack.local(0).map(|v| v.value.clone()), Some(Value::Integer(1)));
    }

    #[test]
    fn popping_clears_the_callee_range() {
        let mut stack = small();
        stack.push_call_frame();
        stack.set_local(0, int_var("x", 5)).unwrap();
        stack.pop_call_frame().unwrap();
        stack.push_call_frame();
        assert!(stack.local(0).is_none());
    }

    #[test]
    fn locals_cap_is_fatal() {
        let mut stack = small();
        stack.set_local(5, int_var("x", 0)).unwrap();
        stack.push_call_frame();
        assert_eq!(
            stack.set_local(2, int_var("y", 0)),
            Err(StackError::LocalsExhausted { slot: 8, limit: 8 })
        );
    }

    #[test]
    fn unbalanced_pop_is_an_error() {
        assert_eq!(small().pop_call_frame(), Err(StackError::FrameUnderflow));
    }
}

#[test]
fn restore_returns_every_cursor() {
    let mut stack = small();
    stack.push(Value::Integer(1)).unwrap();
    stack.set_local(0, int_var("a", 1)).unwrap();
    let saved = stack.save();

    stack.push(Value::Integer(2)).unwrap();
    stack.push_call_frame();
    stack.set_local(0, int_var("b", 2)).unwrap();
    stack.push_call_frame();
    assert_ne!(stack.save(), saved);

    stack.restore(saved);
    assert_eq!(stack.save(), saved);
    assert_eq!(stack.values(), &[Value::Integer(1)]);
    assert_eq!(stack.frame_depth(), 0);
    assert_eq!(stack.local(0).map(|v| v.value.clone()), Some(Value::Integer(1)));
    stack.push_call_frame();
    assert!(stack.local(0).is_none());
}

#[test]
fn reset_keeps_globals() {
    let mut stack = small();
    stack.set_global(0, int_var("g", 1)).unwrap();
    stack.push(Value::Integer(3)).unwrap();
    stack.set_local(0, int_var("l", 1)).unwrap();
    stack.reset();
    assert_eq!(stack.depth(), 0);
    assert!(stack.local(0).is_none());
    assert!(stack.global(0).is_some());
}
