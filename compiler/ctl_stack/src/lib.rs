//! Runtime stack for the CTL executor.
//!
//! # Crate Organization
//!
//! - [`RuntimeStack`]: expression stack, global and local variable slots,
//!   call frames, snapshot/restore
//! - [`StackLimits`]: capacity configuration
//! - [`StackError`]: capacity and underflow faults, all fatal
//! - [`ensure_sufficient_stack`]: native stack growth for deep recursion
//!
//! The stack is single-threaded. Hosts that evaluate in parallel give each
//! worker its own instance.

mod error;
mod guard;
mod limits;
mod runtime;

pub use error::StackError;
pub use guard::ensure_sufficient_stack;
pub use limits::StackLimits;
pub use runtime::{CallFrame, RuntimeStack, StackSnapshot};
