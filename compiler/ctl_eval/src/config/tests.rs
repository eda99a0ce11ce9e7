use super::*;
use pretty_assertions::assert_eq;

fn env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
    move |key| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| (*v).to_owned())
    }
}

#[test]
fn defaults_without_overrides() {
    assert_eq!(EvalConfig::from_lookup(env(&[])), EvalConfig::default());
    let config = EvalConfig::default();
    assert_eq!(config.max_call_depth, Some(1000));
    assert_eq!(config.max_eval_depth, 16);
    assert_eq!(config.stack.max_expr_depth, 512);
}

#[test]
fn valid_values_override() {
    let config = EvalConfig::from_lookup(env(&[
        (MAX_CALL_DEPTH_VAR, "50"),
        (MAX_EVAL_DEPTH_VAR, " 3 "),
        (MAX_STACK_DEPTH_VAR, "64"),
    ]));
    assert_eq!(config.max_call_depth, Some(50));
    assert_eq!(config.max_eval_depth, 3);
    assert_eq!(config.stack.max_expr_depth, 64);
}

#[test]
fn zero_call_depth_removes_the_limit() {
    let config = EvalConfig::from_lookup(env(&[(MAX_CALL_DEPTH_VAR, "0")]));
    assert_eq!(config.max_call_depth, None);
}

#[test]
fn invalid_values_are_ignored() {
    let config = EvalConfig::from_lookup(env(&[
        (MAX_CALL_DEPTH_VAR, "lots"),
        (MAX_EVAL_DEPTH_VAR, "-1"),
    ]));
    assert_eq!(config, EvalConfig::default());
}
