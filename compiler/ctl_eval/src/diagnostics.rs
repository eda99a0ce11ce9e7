//! Internal call tracking for diagnostics and recursion limits.
//!
//! `CallStack` mirrors the chain of user-defined function activations. It
//! bounds recursion (see [`EvalConfig::max_call_depth`](crate::EvalConfig))
//! and snapshots itself into an [`EvalBacktrace`] when an error surfaces.

use ctl_ir::Span;
use ctl_types::Name;

use crate::errors::{recursion_limit_exceeded, BacktraceFrame, EvalBacktrace, EvalError};

/// One active internal call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallSite {
    pub name: Name,
    /// Where the call was made, not where the function is defined.
    pub span: Option<Span>,
}

/// Live chain of internal calls.
#[derive(Clone, Debug)]
pub struct CallStack {
    frames: Vec<CallSite>,
    max_depth: Option<usize>,
}

impl CallStack {
    /// `None` disables the depth check.
    pub fn new(max_depth: Option<usize>) -> Self {
        CallStack {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Enter a call. The frame is not pushed when the limit is reached.
    pub fn push(&mut self, site: CallSite) -> Result<(), EvalError> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                return Err(recursion_limit_exceeded(max));
            }
        }
        self.frames.push(site);
        Ok(())
    }

    pub fn pop(&mut self) {
        debug_assert!(!self.frames.is_empty(), "CallStack::pop on empty stack");
        self.frames.pop();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Drop frames above `depth`; used when a `catch` unwinds calls.
    pub fn truncate(&mut self, depth: usize) {
        self.frames.truncate(depth);
    }

    /// Snapshot the active calls, innermost first.
    pub fn capture(&self) -> EvalBacktrace {
        EvalBacktrace::new(
            self.frames
                .iter()
                .rev()
                .map(|site| BacktraceFrame {
                    name: site.name.to_string(),
                    span: site.span,
                })
                .collect(),
        )
    }

    /// Attach a backtrace unless the error already has one or no call is
    /// active.
    pub fn attach_backtrace(&self, err: EvalError) -> EvalError {
        if err.backtrace.is_some() || self.frames.is_empty() {
            return err;
        }
        err.with_backtrace(self.capture())
    }
}

#[cfg(test)]
mod tests;
