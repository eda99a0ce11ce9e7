use std::error::Error;
use std::fmt;

/// Stack faults. They mean a runaway script or an engine defect, never bad
/// input data, so callers treat every variant as fatal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StackError {
    ExpressionOverflow { limit: usize },
    ExpressionUnderflow,
    GlobalsExhausted { slot: usize, limit: usize },
    LocalsExhausted { slot: usize, limit: usize },
    FrameUnderflow,
}

impl fmt::Display for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackError::ExpressionOverflow { limit } => {
                write!(f, "expression stack overflow (limit {limit})")
            }
            StackError::ExpressionUnderflow => write!(f, "expression stack underflow"),
            StackError::GlobalsExhausted { slot, limit } => {
                write!(f, "global variable slot {slot} exceeds the maximum of {limit}")
            }
            StackError::LocalsExhausted { slot, limit } => {
                write!(f, "local variable slot {slot} exceeds the maximum of {limit}")
            }
            StackError::FrameUnderflow => write!(f, "call frame stack underflow"),
        }
    }
}

impl Error for StackError {}
