//! Executor configuration.

use ctl_stack::StackLimits;
use tracing::warn;

/// Environment variable overriding [`EvalConfig::max_call_depth`].
pub const MAX_CALL_DEPTH_VAR: &str = "CTL_MAX_CALL_DEPTH";
/// Environment variable overriding [`EvalConfig::max_eval_depth`].
pub const MAX_EVAL_DEPTH_VAR: &str = "CTL_MAX_EVAL_DEPTH";
/// Environment variable overriding [`StackLimits::max_expr_depth`].
pub const MAX_STACK_DEPTH_VAR: &str = "CTL_MAX_STACK_DEPTH";

/// Limits and knobs of one [`Interpreter`](crate::Interpreter).
#[derive(Clone, Debug, PartialEq)]
pub struct EvalConfig {
    pub stack: StackLimits,
    /// Nesting limit for user-defined function calls; `None` is unbounded.
    pub max_call_depth: Option<usize>,
    /// Nesting limit for `eval`.
    pub max_eval_depth: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            stack: StackLimits::default(),
            max_call_depth: Some(1000),
            max_eval_depth: 16,
        }
    }
}

impl EvalConfig {
    /// Defaults overridden from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    /// Values that are not non-negative integers are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = EvalConfig::default();
        if let Some(depth) = parse_var(&lookup, MAX_CALL_DEPTH_VAR) {
            // Zero means "no limit".
            config.max_call_depth = (depth > 0).then_some(depth);
        }
        if let Some(depth) = parse_var(&lookup, MAX_EVAL_DEPTH_VAR) {
            config.max_eval_depth = depth;
        }
        if let Some(depth) = parse_var(&lookup, MAX_STACK_DEPTH_VAR) {
            config.stack.max_expr_depth = depth;
        }
        config
    }
}

fn parse_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<usize> {
    let raw = lookup(key)?;
    match raw.trim().parse::<usize>() {
        Ok(n) => Some(n),
        Err(err) => {
            warn!(variable = key, value = %raw, error = %err, "ignoring invalid setting");
            None
        }
    }
}

#[cfg(test)]
mod tests;
