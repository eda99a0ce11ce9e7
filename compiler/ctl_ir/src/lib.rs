//! Abstract syntax tree for CTL programs.
//!
//! The front-end (outside this workspace) parses source text and hands the
//! executor an immutable [`Program`]: an arena of [`Node`]s addressed by
//! [`NodeId`], a function table, and the number of global slots the
//! program uses. Variable references already carry resolved slot numbers.
//!
//! Nodes never hold runtime state. Per-node caches (resolved field
//! ordinals, lazily resolved graph resources, arithmetic scratch values)
//! live in the executor, keyed by [`ProgramId`] and [`NodeId`], so a
//! `Program` can be shared between worker threads.

mod node;
mod program;
mod span;

pub use node::{
    CallTarget, Case, CmpOp, DictOp, EvalMode, FieldSel, Fix, Locality, LogicalOp, LookupOp,
    NativeId, Node, NodeId, NodeKind, SeqOp, Slot, StepOp, UnaryOp, VarAccess, VarRef,
};
pub use program::{FuncId, FunctionDef, GlobalInfo, Param, Program, ProgramError, ProgramId};
pub use span::Span;

pub use ctl_value::ArithOp;
