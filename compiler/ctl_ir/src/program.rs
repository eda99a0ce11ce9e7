//! Whole programs: node arena, function table, global slot table.

use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use ctl_types::{Name, Type};

use crate::node::{CallTarget, Node, NodeId, NodeKind};
use crate::span::Span;

static NEXT_PROGRAM_ID: AtomicU32 = AtomicU32::new(1);

/// Process-unique identity of a [`Program`].
///
/// Executors key their per-node caches by it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ProgramId(u32);

impl ProgramId {
    fn fresh() -> Self {
        ProgramId(NEXT_PROGRAM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Index into a program's function table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct FuncId(pub u32);

impl FuncId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A declared parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: Name,
    pub ty: Type,
}

/// A user-defined function.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDef {
    pub name: Name,
    /// Bound to local slots `0..params.len()` on entry.
    pub params: Vec<Param>,
    pub ret: Type,
    pub body: NodeId,
    /// Local slots used by the body, parameters included.
    pub local_count: usize,
}

/// A program-wide variable.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobalInfo {
    pub name: Name,
    pub ty: Type,
    pub slot: usize,
}

/// Structural problems found by [`Program::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgramError {
    DanglingNode { parent: NodeId, child: NodeId },
    UnknownFunction { node: NodeId, func: u32 },
    MissingRoot,
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramError::DanglingNode { parent, child } => {
                write!(f, "node {parent} refers to missing node {child}")
            }
            ProgramError::UnknownFunction { node, func } => {
                write!(f, "node {node} calls unknown function {func}")
            }
            ProgramError::MissingRoot => write!(f, "program has no root node"),
        }
    }
}

impl Error for ProgramError {}

/// A compiled CTL program.
#[derive(Clone, Debug)]
pub struct Program {
    id: ProgramId,
    nodes: Vec<Node>,
    root: Option<NodeId>,
    functions: Vec<FunctionDef>,
    globals: Vec<GlobalInfo>,
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

impl Program {
    pub fn new() -> Self {
        Program {
            id: ProgramId::fresh(),
            nodes: Vec::new(),
            root: None,
            functions: Vec::new(),
            globals: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> ProgramId {
        self.id
    }

    /// Append a node and return its id.
    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId::new(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(Node { kind, span });
        id
    }

    /// Look up a node. Ids come from [`Program::alloc`] on this program.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    #[inline]
    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Register a function; its body may be attached later.
    pub fn add_function(&mut self, def: FunctionDef) -> FuncId {
        let id = FuncId(u32::try_from(self.functions.len()).unwrap_or(u32::MAX));
        self.functions.push(def);
        id
    }

    pub fn function(&self, id: FuncId) -> Option<&FunctionDef> {
        self.functions.get(id.index())
    }

    pub fn function_mut(&mut self, id: FuncId) -> Option<&mut FunctionDef> {
        self.functions.get_mut(id.index())
    }

    pub fn functions(&self) -> &[FunctionDef] {
        &self.functions
    }

    /// Find a function by name.
    pub fn function_by_name(&self, name: &str) -> Option<(FuncId, &FunctionDef)> {
        self.functions
            .iter()
            .enumerate()
            .find(|(_, f)| &*f.name == name)
            .map(|(i, f)| (FuncId(i as u32), f))
    }

    pub fn add_global(&mut self, info: GlobalInfo) {
        self.globals.push(info);
    }

    pub fn globals(&self) -> &[GlobalInfo] {
        &self.globals
    }

    /// Number of global slots the program addresses.
    pub fn global_count(&self) -> usize {
        self.globals.iter().map(|g| g.slot + 1).max().unwrap_or(0)
    }

    pub fn global_by_name(&self, name: &str) -> Option<&GlobalInfo> {
        self.globals.iter().find(|g| &*g.name == name)
    }

    /// Check that every child id and call target exists.
    pub fn validate(&self) -> Result<(), ProgramError> {
        let root = self.root.ok_or(ProgramError::MissingRoot)?;
        let len = self.nodes.len();
        if root.index() >= len {
            return Err(ProgramError::MissingRoot);
        }
        for (i, node) in self.nodes.iter().enumerate() {
            let parent = NodeId::new(i as u32);
            if let Some(child) = node.kind.children().into_iter().find(|c| c.index() >= len) {
                return Err(ProgramError::DanglingNode { parent, child });
            }
            if let NodeKind::Call {
                target: CallTarget::Internal(func),
                ..
            } = &node.kind
            {
                if func.index() >= self.functions.len() {
                    return Err(ProgramError::UnknownFunction {
                        node: parent,
                        func: func.0,
                    });
                }
            }
        }
        for def in &self.functions {
            if def.body.index() >= len {
                return Err(ProgramError::DanglingNode {
                    parent: root,
                    child: def.body,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
