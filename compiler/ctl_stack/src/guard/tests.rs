use super::*;

fn nest(depth: u32) -> u32 {
    ensure_sufficient_stack(|| if depth == 0 { 0 } else { nest(depth - 1) + 1 })
}

#[test]
fn deep_nesting_does_not_overflow() {
    assert_eq!(nest(200_000), 200_000);
}

#[test]
fn passes_results_through() {
    let result: Result<u8, String> = ensure_sufficient_stack(|| Ok(7));
    assert_eq!(result, Ok(7));
}
