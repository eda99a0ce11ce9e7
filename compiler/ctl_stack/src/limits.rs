/// Capacity configuration of a [`RuntimeStack`](crate::RuntimeStack).
#[derive(Clone, Debug, PartialEq)]
pub struct StackLimits {
    /// Values the expression stack may hold at once.
    pub max_expr_depth: usize,
    pub initial_globals: usize,
    pub max_globals: usize,
    pub initial_locals: usize,
    /// Cap on the local slot array, shared by all active call frames.
    pub max_locals: usize,
    /// Multiplier applied when a slot array has to grow.
    pub growth_factor: f64,
}

impl Default for StackLimits {
    fn default() -> Self {
        StackLimits {
            max_expr_depth: 512,
            initial_globals: 64,
            max_globals: 65_536,
            initial_locals: 128,
            max_locals: 65_536,
            growth_factor: 1.6,
        }
    }
}

impl StackLimits {
    /// Next length for an array of `len` slots that must hold `slot`,
    /// or `None` past `max`.
    pub(crate) fn grown_len(&self, len: usize, slot: usize, max: usize) -> Option<usize> {
        if slot >= max {
            return None;
        }
        let factor = self.growth_factor.max(1.0);
        let scaled = ((len.max(1) as f64) * factor).ceil() as usize;
        Some(scaled.max(slot + 1).min(max))
    }
}
