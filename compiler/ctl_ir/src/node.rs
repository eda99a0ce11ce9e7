//! AST node kinds.

use std::fmt;

use ctl_types::{LogLevel, Name, Type};
use ctl_value::{ArithOp, Value, VarDecl};
use smallvec::SmallVec;

use crate::span::Span;

/// Index of a node in a [`Program`](crate::Program) arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index of a resolved native function overload in the host registry.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct NativeId(pub u32);

/// Whether a slot lives in the program-wide or the function-local store.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Locality {
    Global,
    Local,
}

/// A variable slot as assigned by the symbol table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Slot {
    pub locality: Locality,
    pub index: usize,
}

impl Slot {
    pub const fn global(index: usize) -> Self {
        Slot {
            locality: Locality::Global,
            index,
        }
    }

    pub const fn local(index: usize) -> Self {
        Slot {
            locality: Locality::Local,
            index,
        }
    }
}

/// How a variable reference addresses its slot.
#[derive(Clone, Debug, PartialEq)]
pub enum VarAccess {
    /// The whole value.
    Whole,
    /// `v[expr]`: list/byte ordinal, map key, or record ordinal/field name.
    Index(NodeId),
    /// `v.field`: a record field named in the source.
    Field(Name),
}

/// A resolved variable reference.
#[derive(Clone, Debug, PartialEq)]
pub struct VarRef {
    pub name: Name,
    pub slot: Slot,
    pub access: VarAccess,
}

impl VarRef {
    pub fn new(name: Name, slot: Slot) -> Self {
        VarRef {
            name,
            slot,
            access: VarAccess::Whole,
        }
    }

    #[must_use]
    pub fn indexed(mut self, index: NodeId) -> Self {
        self.access = VarAccess::Index(index);
        self
    }

    #[must_use]
    pub fn field(mut self, field: &str) -> Self {
        self.access = VarAccess::Field(Name::from(field));
        self
    }
}

/// Field selector of an input or output record.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldSel {
    Ordinal(usize),
    /// Resolved against the record schema on first use.
    Name(Name),
    /// The whole record.
    Whole,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LogicalOp {
    And,
    Or,
}

/// Comparison operator.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    /// `~=`: left string fully matches the right pattern.
    RegexMatch,
    /// `in`: left is a member of the right container.
    In,
}

impl CmpOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::NotEq => "!=",
            CmpOp::Lt => "<",
            CmpOp::LtEq => "<=",
            CmpOp::Gt => ">",
            CmpOp::GtEq => ">=",
            CmpOp::RegexMatch => "~=",
            CmpOp::In => "in",
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    /// Arithmetic negation.
    Minus,
    /// Absolute value.
    Plus,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum StepOp {
    Incr,
    Decr,
}

impl StepOp {
    pub const fn delta(self) -> i32 {
        match self {
            StepOp::Incr => 1,
            StepOp::Decr => -1,
        }
    }
}

/// Position of `++`/`--` relative to its operand.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Fix {
    /// `++i`: yields the new value.
    Prefix,
    /// `i++`: yields the old value.
    Postfix,
    /// Used as a statement; yields nothing.
    Statement,
}

/// Sequence operation.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SeqOp {
    Next,
    Current,
    Reset,
}

/// Lookup-table operation.
#[derive(Clone, Debug, PartialEq)]
pub enum LookupOp {
    /// Explicitly initialize the table.
    Init,
    /// Release the table.
    Free,
    /// Look up `keys` and yield `field` of the first match.
    Get { keys: Vec<NodeId>, field: FieldSel },
    /// Advance to the next match of the last `Get` and yield `field`.
    Next { field: FieldSel },
    /// Number of matches of the last `Get`.
    NumFound,
}

/// Graph dictionary operation.
#[derive(Clone, Debug, PartialEq)]
pub enum DictOp {
    Get(NodeId),
    Put(NodeId, NodeId),
    Delete(NodeId),
}

/// What `eval` compiles its argument as.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum EvalMode {
    /// A single expression whose value is the result.
    Expression,
    /// A statement list executed for its effects.
    Statements,
}

/// Callee of a call node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CallTarget {
    /// A function declared in the program.
    Internal(crate::FuncId),
    /// A resolved native overload.
    Native(NativeId),
}

/// One `case` arm of a `switch`.
#[derive(Clone, Debug, PartialEq)]
pub struct Case {
    pub value: NodeId,
    pub body: NodeId,
}

/// Node payload.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    // Statements lists
    Block(Vec<NodeId>),

    // Literals and references
    Literal(Value),
    ListLiteral {
        elem: Type,
        items: Vec<NodeId>,
    },
    Var(VarRef),
    /// Read from input record `record`.
    InputField {
        record: usize,
        field: FieldSel,
    },
    /// Write the first usable alternative into output record `record`.
    Mapping {
        record: usize,
        field: FieldSel,
        alternatives: Vec<NodeId>,
    },
    /// Copy the same-named fields of the record `source` evaluates to
    /// into output record `record` (`$out.N.* = <record>`).
    WildcardMapping {
        record: usize,
        source: NodeId,
    },

    // Declarations and assignment
    VarDecl {
        var: VarRef,
        ty: Type,
        decl: VarDecl,
        init: Option<NodeId>,
    },
    Assign {
        target: VarRef,
        value: NodeId,
    },

    // Operators
    Logical {
        op: LogicalOp,
        left: NodeId,
        right: NodeId,
    },
    Not(NodeId),
    Compare {
        op: CmpOp,
        left: NodeId,
        right: NodeId,
    },
    Arith {
        op: ArithOp,
        left: NodeId,
        right: NodeId,
    },
    Unary {
        op: UnaryOp,
        operand: NodeId,
    },
    Step {
        op: StepOp,
        fix: Fix,
        target: VarRef,
    },

    // Null helpers
    IsNull(NodeId),
    Nvl {
        value: NodeId,
        fallback: NodeId,
    },
    Nvl2 {
        value: NodeId,
        present: NodeId,
        absent: NodeId,
    },
    Iif {
        cond: NodeId,
        then: NodeId,
        otherwise: NodeId,
    },

    // Control flow
    If {
        cond: NodeId,
        then: NodeId,
        otherwise: Option<NodeId>,
    },
    For {
        init: Option<NodeId>,
        cond: Option<NodeId>,
        step: Option<NodeId>,
        body: NodeId,
    },
    Foreach {
        var: VarRef,
        iterable: NodeId,
        body: NodeId,
    },
    While {
        cond: NodeId,
        body: NodeId,
    },
    DoWhile {
        body: NodeId,
        cond: NodeId,
    },
    Switch {
        scrutinee: NodeId,
        cases: Vec<Case>,
        default: Option<NodeId>,
    },
    TryCatch {
        body: NodeId,
        binding: Option<VarRef>,
        handler: NodeId,
    },
    Break,
    Continue,
    Return(Option<NodeId>),

    // Calls and graph resources
    Call {
        target: CallTarget,
        args: Vec<NodeId>,
    },
    Sequence {
        name: Name,
        op: SeqOp,
        /// `integer`, `long` or `string`.
        ret: Type,
    },
    Lookup {
        table: Name,
        op: LookupOp,
    },
    Dictionary(DictOp),
    Eval {
        source: NodeId,
        mode: EvalMode,
    },

    // Diagnostics
    PrintErr {
        message: NodeId,
        with_location: bool,
    },
    PrintLog {
        level: LogLevel,
        message: NodeId,
    },
    RaiseError(NodeId),
    PrintStack,
}

fn push_var(out: &mut SmallVec<[NodeId; 4]>, var: &VarRef) {
    if let VarAccess::Index(index) = var.access {
        out.push(index);
    }
}

impl NodeKind {
    /// Direct children, in evaluation order.
    pub fn children(&self) -> SmallVec<[NodeId; 4]> {
        let mut out = SmallVec::new();
        match self {
            NodeKind::Block(stmts) => out.extend(stmts.iter().copied()),
            NodeKind::ListLiteral { items, .. } => out.extend(items.iter().copied()),
            NodeKind::Var(var) | NodeKind::Step { target: var, .. } => push_var(&mut out, var),
            NodeKind::Mapping { alternatives, .. } => out.extend(alternatives.iter().copied()),
            NodeKind::VarDecl { var, init, .. } => {
                push_var(&mut out, var);
                out.extend(*init);
            }
            NodeKind::Assign { target, value } => {
                push_var(&mut out, target);
                out.push(*value);
            }
            NodeKind::Logical { left, right, .. }
            | NodeKind::Compare { left, right, .. }
            | NodeKind::Arith { left, right, .. } => {
                out.push(*left);
                out.push(*right);
            }
            NodeKind::Not(operand)
            | NodeKind::Unary { operand, .. }
            | NodeKind::IsNull(operand)
            | NodeKind::RaiseError(operand)
            | NodeKind::PrintErr {
                message: operand, ..
            }
            | NodeKind::PrintLog {
                message: operand, ..
            }
            | NodeKind::Eval {
                source: operand, ..
            }
            | NodeKind::WildcardMapping {
                source: operand, ..
            } => out.push(*operand),
            NodeKind::Nvl { value, fallback } => {
                out.push(*value);
                out.push(*fallback);
            }
            NodeKind::Nvl2 {
                value,
                present,
                absent,
            } => out.extend([*value, *present, *absent]),
            NodeKind::Iif {
                cond,
                then,
                otherwise,
            } => out.extend([*cond, *then, *otherwise]),
            NodeKind::If {
                cond,
                then,
                otherwise,
            } => {
                out.push(*cond);
                out.push(*then);
                out.extend(*otherwise);
            }
            NodeKind::For {
                init,
                cond,
                step,
                body,
            } => {
                out.extend(*init);
                out.extend(*cond);
                out.extend(*step);
                out.push(*body);
            }
            NodeKind::Foreach {
                var,
                iterable,
                body,
            } => {
                push_var(&mut out, var);
                out.push(*iterable);
                out.push(*body);
            }
            NodeKind::While { cond, body } => {
                out.push(*cond);
                out.push(*body);
            }
            NodeKind::DoWhile { body, cond } => {
                out.push(*body);
                out.push(*cond);
            }
            NodeKind::Switch {
                scrutinee,
                cases,
                default,
            } => {
                out.push(*scrutinee);
                for case in cases {
                    out.push(case.value);
                    out.push(case.body);
                }
                out.extend(*default);
            }
            NodeKind::TryCatch {
                body,
                binding,
                handler,
            } => {
                out.push(*body);
                if let Some(var) = binding {
                    push_var(&mut out, var);
                }
                out.push(*handler);
            }
            NodeKind::Return(value) => out.extend(*value),
            NodeKind::Call { args, .. } => out.extend(args.iter().copied()),
            NodeKind::Lookup { op, .. } => {
                if let LookupOp::Get { keys, .. } = op {
                    out.extend(keys.iter().copied());
                }
            }
            NodeKind::Dictionary(op) => match op {
                DictOp::Get(key) | DictOp::Delete(key) => out.push(*key),
                DictOp::Put(key, value) => {
                    out.push(*key);
                    out.push(*value);
                }
            },
            NodeKind::Literal(_)
            | NodeKind::InputField { .. }
            | NodeKind::Break
            | NodeKind::Continue
            | NodeKind::Sequence { .. }
            | NodeKind::PrintStack => {}
        }
        out
    }

    /// Whether the node leaves a value on the expression stack.
    pub fn is_expression(&self) -> bool {
        match self {
            NodeKind::Literal(_)
            | NodeKind::ListLiteral { .. }
            | NodeKind::Var(_)
            | NodeKind::InputField { .. }
            | NodeKind::Logical { .. }
            | NodeKind::Not(_)
            | NodeKind::Compare { .. }
            | NodeKind::Arith { .. }
            | NodeKind::Unary { .. }
            | NodeKind::IsNull(_)
            | NodeKind::Nvl { .. }
            | NodeKind::Nvl2 { .. }
            | NodeKind::Iif { .. }
            | NodeKind::Sequence { .. } => true,
            NodeKind::Lookup { op, .. } => !matches!(op, LookupOp::Init | LookupOp::Free),
            NodeKind::Step { fix, .. } => *fix != Fix::Statement,
            NodeKind::Dictionary(op) => matches!(op, DictOp::Get(_)),
            NodeKind::Eval { mode, .. } => *mode == EvalMode::Expression,
            // Calls push their result unless the callee returns nothing;
            // the executor discards it in statement position.
            NodeKind::Call { .. } => true,
            _ => false,
        }
    }
}

/// A node: payload plus source position.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

#[cfg(test)]
mod tests;
