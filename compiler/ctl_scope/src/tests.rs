use super::*;
use pretty_assertions::assert_eq;

#[test]
fn top_level_declarations_are_global() {
    let mut table = SymbolTable::new();
    let a = table.declare("a", Type::Integer).unwrap();
    let b = table.declare("b", Type::String).unwrap();
    assert_eq!(a.slot, Slot::global(0));
    assert_eq!(b.slot, Slot::global(1));
    assert_eq!(table.global_count(), 2);
    assert_eq!(table.resolve("b").map(|i| i.ty), Some(Type::String));
}

#[test]
fn redeclaration_in_same_scope_is_refused() {
    let mut table = SymbolTable::new();
    let first = table.declare("x", Type::Integer).unwrap();
    let err = table.declare("x", Type::Long).unwrap_err();
    assert_eq!(
        err,
        DeclareError::AlreadyDeclared {
            name: Name::from("x"),
            previous: first,
        }
    );
    assert_eq!(err.to_string(), "variable 'x' is already defined");
}

#[test]
fn nested_blocks_may_shadow() {
    let mut table = SymbolTable::new();
    table.declare("x", Type::Integer).unwrap();
    table.enter_block();
    let inner = table.declare("x", Type::String).unwrap();
    assert_eq!(inner.slot, Slot::global(1));
    assert_eq!(inner.block_offset, 1);
    assert_eq!(table.resolve("x").map(|i| i.ty), Some(Type::String));
    table.exit_block();
    assert_eq!(table.resolve("x").map(|i| i.ty), Some(Type::Integer));
}

#[test]
fn unknown_names_do_not_resolve() {
    let mut table = SymbolTable::new();
    table.enter_block();
    assert_eq!(table.resolve("missing"), None);
    table.exit_block();
    table.exit_block();
    assert_eq!(table.resolve("missing"), None);
}

#[test]
fn functions_number_locals_from_zero() {
    let mut table = SymbolTable::new();
    table.declare("total", Type::Long).unwrap();

    table.enter_function("add");
    assert!(table.in_function());
    assert_eq!(table.current_function().map(|n| &**n), Some("add"));
    let a = table.declare("a", Type::Integer).unwrap();
    let b = table.declare("b", Type::Integer).unwrap();
    table.enter_block();
    let tmp = table.declare("tmp", Type::Integer).unwrap();
    table.exit_block();
    assert_eq!(
        (a.slot, b.slot, tmp.slot),
        (Slot::local(0), Slot::local(1), Slot::local(2))
    );
    assert_eq!(table.resolve("total").map(|i| i.slot), Some(Slot::global(0)));
    assert_eq!(table.exit_function(), 3);
    assert!(!table.in_function());
}

#[test]
fn function_locals_are_private() {
    let mut table = SymbolTable::new();
    table.enter_function("a");
    table.declare("secret", Type::Integer).unwrap();
    assert_eq!(table.exit_function(), 1);

    table.enter_function("b");
    assert_eq!(table.resolve("secret"), None);
    let own = table.declare("secret", Type::String).unwrap();
    assert_eq!(own.slot, Slot::local(0));
    assert_eq!(table.exit_function(), 1);

    assert_eq!(table.resolve("secret"), None);
    assert_eq!(table.exit_function(), 0);
}

#[test]
fn exit_function_restores_outer_counter() {
    let mut table = SymbolTable::new();
    table.enter_function("outer");
    table.declare("x", Type::Integer).unwrap();
    table.enter_function("inner");
    table.declare("y", Type::Integer).unwrap();
    table.declare("z", Type::Integer).unwrap();
    assert_eq!(table.exit_function(), 2);
    assert_eq!(table.local_count(), 1);
    assert_eq!(table.resolve("x").map(|i| i.slot), Some(Slot::local(0)));
    assert_eq!(table.exit_function(), 1);
}
