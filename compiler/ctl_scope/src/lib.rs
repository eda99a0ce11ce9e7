//! Symbol table for CTL programs.
//!
//! Front-ends declare and resolve variables here while building a
//! [`Program`](ctl_ir::Program); every declaration is handed a [`Slot`]
//! that the executor later uses to address the runtime stack.
//!
//! # Slot assignment
//!
//! - Variables declared outside any function are global and numbered
//!   program-wide.
//! - Variables declared inside a function (parameters first) are local and
//!   numbered from zero per function. Entering a function snapshots the
//!   local counter and resets it; leaving restores it.
//! - Nested blocks may shadow outer names. Redeclaring a name in the same
//!   scope is refused.

use std::cell::RefCell;
use std::error::Error;
use std::fmt;
use std::rc::Rc;

use ctl_ir::Slot;
use ctl_types::{Name, Type};
use rustc_hash::FxHashMap;

/// What a declared name resolves to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotInfo {
    pub slot: Slot,
    pub ty: Type,
    /// Ordinal of the block entry that declared the name. Diagnostics only.
    pub block_offset: usize,
}

/// Declaration refused by [`SymbolTable::declare`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclareError {
    /// The name already exists in the current scope.
    AlreadyDeclared { name: Name, previous: SlotInfo },
}

impl fmt::Display for DeclareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclareError::AlreadyDeclared { name, .. } => {
                write!(f, "variable '{name}' is already defined")
            }
        }
    }
}

impl Error for DeclareError {}

type ScopeRef = Rc<RefCell<Scope>>;

/// One lexical scope.
#[derive(Debug)]
pub struct Scope {
    symbols: FxHashMap<Name, SlotInfo>,
    parent: Option<ScopeRef>,
    block_offset: usize,
}

impl Scope {
    fn new(parent: Option<ScopeRef>, block_offset: usize) -> Self {
        Scope {
            symbols: FxHashMap::default(),
            parent,
            block_offset,
        }
    }

    /// Names declared directly in this scope.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    fn lookup(&self, name: &str) -> Option<SlotInfo> {
        if let Some(info) = self.symbols.get(name) {
            return Some(info.clone());
        }
        self.parent
            .as_ref()
            .and_then(|parent| parent.borrow().lookup(name))
    }
}

#[derive(Debug)]
struct FunctionFrame {
    name: Name,
    saved_counter: usize,
    saved_scope: ScopeRef,
}

/// Scope chain plus global and local slot counters.
#[derive(Debug)]
pub struct SymbolTable {
    root: ScopeRef,
    current: ScopeRef,
    functions: Vec<FunctionFrame>,
    global_counter: usize,
    local_counter: usize,
    blocks_entered: usize,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        let root = Rc::new(RefCell::new(Scope::new(None, 0)));
        SymbolTable {
            current: Rc::clone(&root),
            root,
            functions: Vec::new(),
            global_counter: 0,
            local_counter: 0,
            blocks_entered: 0,
        }
    }

    /// Whether declarations currently produce local slots.
    pub fn in_function(&self) -> bool {
        !self.functions.is_empty()
    }

    /// Name of the function being declared, if any.
    pub fn current_function(&self) -> Option<&Name> {
        self.functions.last().map(|f| &f.name)
    }

    /// Global slots handed out so far.
    pub fn global_count(&self) -> usize {
        self.global_counter
    }

    /// Local slots handed out in the current function so far.
    pub fn local_count(&self) -> usize {
        self.local_counter
    }

    /// Declare `name` in the current scope.
    pub fn declare(&mut self, name: &str, ty: Type) -> Result<SlotInfo, DeclareError> {
        let mut scope = self.current.borrow_mut();
        if let Some(previous) = scope.symbols.get(name) {
            return Err(DeclareError::AlreadyDeclared {
                name: Name::from(name),
                previous: previous.clone(),
            });
        }
        let slot = if self.functions.is_empty() {
            self.global_counter += 1;
            Slot::global(self.global_counter - 1)
        } else {
            self.local_counter += 1;
            Slot::local(self.local_counter - 1)
        };
        let info = SlotInfo {
            slot,
            ty,
            block_offset: scope.block_offset,
        };
        scope.symbols.insert(Name::from(name), info.clone());
        Ok(info)
    }

    /// Find `name` in the current scope or any enclosing one.
    pub fn resolve(&self, name: &str) -> Option<SlotInfo> {
        self.current.borrow().lookup(name)
    }

    pub fn enter_block(&mut self) {
        self.blocks_entered += 1;
        let scope = Scope::new(Some(Rc::clone(&self.current)), self.blocks_entered);
        self.current = Rc::new(RefCell::new(scope));
    }

    /// Leave the innermost block. Leaving the root scope is a no-op.
    pub fn exit_block(&mut self) {
        let parent = self.current.borrow().parent.clone();
        if let Some(parent) = parent {
            self.current = parent;
        }
    }

    /// Start a function body. Its scope sees globals but no other
    /// function's locals.
    pub fn enter_function(&mut self, name: &str) {
        self.functions.push(FunctionFrame {
            name: Name::from(name),
            saved_counter: self.local_counter,
            saved_scope: Rc::clone(&self.current),
        });
        self.local_counter = 0;
        self.blocks_entered += 1;
        let scope = Scope::new(Some(Rc::clone(&self.root)), self.blocks_entered);
        self.current = Rc::new(RefCell::new(scope));
    }

    /// Finish the innermost function and return the number of local slots
    /// it used. Returns 0 outside a function.
    pub fn exit_function(&mut self) -> usize {
        let Some(frame) = self.functions.pop() else {
            return 0;
        };
        let used = self.local_counter;
        self.local_counter = frame.saved_counter;
        self.current = frame.saved_scope;
        used
    }
}

#[cfg(test)]
mod tests;
