//! Programs from owned syntax trees.
//!
//! The CTL parser is not part of this crate. A front-end hands
//! [`ProgramBuilder`] the syntax tree it parsed ([`Item`]s); the builder
//! resolves names to slots through the symbol table, binds calls to
//! internal functions or native overloads by type distance and emits an
//! immutable [`Program`].
//!
//! Statements without an explicit [`Stmt::At`] position are numbered one
//! line each, in the order they are lowered.

mod ast;
mod lower;

pub use ast::{Expr, FieldRef, FunctionDecl, Item, Stmt, Target};

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use ctl_ir::Program;
use ctl_scope::DeclareError;
use ctl_types::{RecordSchema, Type};
use tracing::debug;

use crate::native::{NativeRegistry, ResolveError};
use lower::Lowerer;

/// Why a syntax tree could not become a [`Program`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildError {
    Declare(DeclareError),
    UndeclaredVariable { name: String },
    /// No internal function or native overload fits a call.
    Resolve(ResolveError),
    DuplicateFunction { name: String },
    VoidVariable { name: String },
    UnknownRecord { record: usize },
    UnknownField { record: String, field: String },
    InvalidSequenceType { ty: Type },
    /// A global of the enclosing program could not be redeclared in place.
    GlobalLayout { name: String },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Declare(err) => err.fmt(f),
            BuildError::UndeclaredVariable { name } => {
                write!(f, "variable '{name}' is not declared")
            }
            BuildError::Resolve(err) => err.fmt(f),
            BuildError::DuplicateFunction { name } => {
                write!(f, "function '{name}' is already defined with these parameters")
            }
            BuildError::VoidVariable { name } => {
                write!(f, "variable '{name}' cannot be declared void")
            }
            BuildError::UnknownRecord { record } => write!(f, "record {record} does not exist"),
            BuildError::UnknownField { record, field } => {
                write!(f, "record '{record}' has no field '{field}'")
            }
            BuildError::InvalidSequenceType { ty } => {
                write!(f, "sequence cannot return {ty}")
            }
            BuildError::GlobalLayout { name } => {
                write!(f, "global '{name}' cannot keep its slot")
            }
        }
    }
}

impl Error for BuildError {}

impl From<DeclareError> for BuildError {
    fn from(err: DeclareError) -> Self {
        BuildError::Declare(err)
    }
}

impl From<ResolveError> for BuildError {
    fn from(err: ResolveError) -> Self {
        BuildError::Resolve(err)
    }
}

/// Lowers syntax trees against a native registry and optional record
/// layouts.
///
/// The registry must be the one the executing
/// [`Interpreter`](crate::Interpreter) uses: call nodes store overload ids.
#[derive(Clone)]
pub struct ProgramBuilder<'r> {
    natives: &'r NativeRegistry,
    inputs: Vec<Arc<RecordSchema>>,
    outputs: Vec<Arc<RecordSchema>>,
    enclosing: Option<&'r Program>,
}

impl<'r> ProgramBuilder<'r> {
    pub fn new(natives: &'r NativeRegistry) -> Self {
        ProgramBuilder {
            natives,
            inputs: Vec::new(),
            outputs: Vec::new(),
            enclosing: None,
        }
    }

    /// A builder for code compiled by `eval`: the globals of `enclosing`
    /// keep their names and slots. Functions of `enclosing` are not
    /// visible.
    pub fn extending(natives: &'r NativeRegistry, enclosing: &'r Program) -> Self {
        ProgramBuilder {
            enclosing: Some(enclosing),
            ..Self::new(natives)
        }
    }

    /// Declare the layout of the next input record. Fields of known
    /// records are checked and typed at build time.
    #[must_use]
    pub fn with_input(mut self, schema: Arc<RecordSchema>) -> Self {
        self.inputs.push(schema);
        self
    }

    #[must_use]
    pub fn with_output(mut self, schema: Arc<RecordSchema>) -> Self {
        self.outputs.push(schema);
        self
    }

    /// Lower a statement list. The root is a block of the top-level
    /// statements; functions are callable before their declaration.
    pub fn build(&self, items: &[Item]) -> Result<Program, BuildError> {
        let mut lowerer = self.lowerer()?;
        lowerer.declare_functions(items)?;
        let root = lowerer.lower_items(items)?;
        let program = lowerer.finish(root);
        debug!(
            nodes = program.node_count(),
            functions = program.functions().len(),
            globals = program.global_count(),
            "program built"
        );
        Ok(program)
    }

    /// Lower a single expression; the program's value is the expression's.
    pub fn build_expression(&self, expr: &Expr) -> Result<Program, BuildError> {
        let mut lowerer = self.lowerer()?;
        let (root, _) = lowerer.lower_expr(expr)?;
        Ok(lowerer.finish(root))
    }

    fn lowerer(&self) -> Result<Lowerer<'_>, BuildError> {
        let mut lowerer = Lowerer::new(self.natives, &self.inputs, &self.outputs);
        if let Some(enclosing) = self.enclosing {
            lowerer.inherit_globals(enclosing)?;
        }
        Ok(lowerer)
    }
}

#[cfg(test)]
mod tests;
