//! Tree-walking executor for CTL programs.
//!
//! # Architecture
//!
//! Every node is either executed as a statement ([`Interpreter::exec`],
//! yielding a [`Flow`]) or evaluated as an expression
//! ([`Interpreter::eval`], leaving exactly one value on the runtime
//! stack). Both entry points grow the native stack on demand and annotate
//! errors with the position of the innermost failing node plus a
//! backtrace of the active internal calls.
//!
//! - `eval`: node dispatch
//! - `access`: variables, input fields and output mappings
//! - `expr`: operators and null helpers
//! - `control`: blocks, branches, loops, `switch` and `try/catch`
//! - `call`: internal and native function calls
//! - `resources`: sequences, lookup tables, the dictionary, `eval` and
//!   the diagnostic statements
//! - `cache`: per-node state (scratch values, resolved ordinals,
//!   compiled patterns, resource handles)
//!
//! # Ownership
//!
//! A [`Program`] is immutable and may be shared between executors; an
//! `Interpreter` owns everything that changes while a program runs. One
//! interpreter serves one thread. Hosts that transform records in
//! parallel build one interpreter per worker from the same registry and
//! graph.

mod access;
mod builder;
mod cache;
mod call;
mod control;
mod eval;
mod expr;
mod resources;

pub use builder::InterpreterBuilder;

use std::sync::Arc;

use ctl_ir::{EvalMode, NodeKind, Program, ProgramId};
use ctl_stack::{RuntimeStack, StackSnapshot};
use ctl_value::{DataRecord, Value, Variable};
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::config::EvalConfig;
use crate::diagnostics::CallStack;
use crate::errors::{internal, EvalError, EvalResult, HostError};
use crate::graph::GraphContext;
use crate::logger::SharedLogger;
use crate::native::NativeRegistry;
use crate::print_handler::SharedPrintHandler;
use cache::NodeCache;

/// Turns the source text handed to `eval` into a program.
///
/// The compiled program may address the enclosing program's global slots;
/// it runs in the frame of the `eval` call.
pub trait ScriptCompiler: Send + Sync {
    fn compile(&self, source: &str, mode: EvalMode, enclosing: &Program)
        -> Result<Program, HostError>;
}

/// How a statement finished.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Flow {
    Normal,
    Break,
    Continue,
    Return(Option<Value>),
}

/// The program being run and the records it reads and writes.
pub(crate) struct Ctx<'p, 'io> {
    pub program: &'p Program,
    pub inputs: &'io [DataRecord],
    pub outputs: &'io mut [DataRecord],
}

/// Executor state that `try/catch` and failed evaluations rewind to.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Checkpoint {
    stack: StackSnapshot,
    calls: usize,
    eval_depth: usize,
}

/// Executes [`Program`]s against input and output records.
pub struct Interpreter {
    pub(crate) config: EvalConfig,
    pub(crate) stack: RuntimeStack,
    /// Active internal calls, for recursion limits and backtraces.
    pub(crate) call_stack: CallStack,
    pub(crate) natives: Arc<NativeRegistry>,
    pub(crate) graph: Arc<dyn GraphContext>,
    pub(crate) logger: SharedLogger,
    pub(crate) print_handler: SharedPrintHandler,
    pub(crate) compiler: Option<Arc<dyn ScriptCompiler>>,
    pub(crate) cache: NodeCache,
    /// Nesting of `eval` calls.
    pub(crate) eval_depth: usize,
    validated: FxHashSet<ProgramId>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// An interpreter with the standard library, no graph resources and
    /// default limits.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn natives(&self) -> &NativeRegistry {
        &self.natives
    }

    /// Run `program` once.
    ///
    /// The result is the value of a top-level `return`, or of the last
    /// top-level statement when that statement is an expression. On error
    /// the expression stack, call frames and locals are rewound; globals
    /// keep whatever the program assigned before failing.
    #[tracing::instrument(level = "debug", skip_all, fields(program = ?program.id()))]
    pub fn evaluate(
        &mut self,
        program: &Program,
        inputs: &[DataRecord],
        outputs: &mut [DataRecord],
    ) -> EvalResult<Option<Value>> {
        self.ensure_valid(program)?;
        let root = program
            .root()
            .ok_or_else(|| internal("program has no root"))?;
        let checkpoint = self.checkpoint();
        let mut ctx = Ctx {
            program,
            inputs,
            outputs,
        };
        let result = self.run_root(&mut ctx, root);
        if let Err(err) = &result {
            debug!(code = err.code(), error = %err, "evaluation failed");
            self.rewind(checkpoint);
        }
        result
    }

    /// Call the user-defined function `name` with no records attached.
    pub fn call_function(
        &mut self,
        program: &Program,
        name: &str,
        args: &[Value],
    ) -> EvalResult<Option<Value>> {
        self.call_function_with(program, name, args, &[], &mut [])
    }

    /// Call the user-defined function `name`. Returns `None` for `void`
    /// functions.
    #[tracing::instrument(level = "debug", skip(self, program, args, inputs, outputs))]
    pub fn call_function_with(
        &mut self,
        program: &Program,
        name: &str,
        args: &[Value],
        inputs: &[DataRecord],
        outputs: &mut [DataRecord],
    ) -> EvalResult<Option<Value>> {
        self.ensure_valid(program)?;
        let (func, _) = program
            .function_by_name(name)
            .ok_or_else(|| internal(format!("function `{name}` is not declared")))?;
        let checkpoint = self.checkpoint();
        let mut ctx = Ctx {
            program,
            inputs,
            outputs,
        };
        let result = self.invoke(&mut ctx, func, args.to_vec(), None);
        if result.is_err() {
            self.rewind(checkpoint);
        }
        result
    }

    /// Current value of global `slot`.
    pub fn global(&self, slot: usize) -> Option<&Value> {
        self.stack.global(slot).map(Variable::value)
    }

    pub fn global_by_name(&self, program: &Program, name: &str) -> Option<&Value> {
        program
            .global_by_name(name)
            .and_then(|info| self.global(info.slot))
    }

    /// Assign into a declared global, checked against its type.
    pub fn set_global(&mut self, slot: usize, value: &Value) -> EvalResult {
        let var = self
            .stack
            .global_mut(slot)
            .ok_or_else(|| internal(format!("global slot {slot} is not declared")))?;
        var.assign(value)
            .map_err(|err| EvalError::from(err).in_variable(&var.name, &var.ty))
    }

    /// Text captured by a buffer print handler.
    pub fn get_print_output(&self) -> String {
        self.print_handler.get_output()
    }

    pub fn clear_print_output(&self) {
        self.print_handler.clear();
    }

    /// Drop transient state: expression values, locals, frames and lookup
    /// cursors. Globals survive.
    pub fn reset(&mut self) {
        self.stack.reset();
        self.call_stack.truncate(0);
        self.eval_depth = 0;
        self.cache.cursors.clear();
    }

    /// Release per-node caches held for `program`.
    pub fn forget_program(&mut self, program: &Program) {
        self.cache.forget_program(program.id());
        self.validated.remove(&program.id());
    }

    fn ensure_valid(&mut self, program: &Program) -> EvalResult {
        if self.validated.contains(&program.id()) {
            return Ok(());
        }
        program
            .validate()
            .map_err(|err| internal(format!("invalid program: {err}")))?;
        self.validated.insert(program.id());
        Ok(())
    }

    fn run_root(&mut self, ctx: &mut Ctx<'_, '_>, root: ctl_ir::NodeId) -> EvalResult<Option<Value>> {
        let program = ctx.program;
        let NodeKind::Block(stmts) = program.kind(root) else {
            if program.kind(root).is_expression() {
                return self.eval_value(ctx, root).map(Some);
            }
            return self.exec(ctx, root).map(Flow::into_value);
        };
        for (i, &stmt) in stmts.iter().enumerate() {
            if i + 1 == stmts.len() && program.kind(stmt).is_expression() {
                return self.eval_value(ctx, stmt).map(Some);
            }
            match self.exec(ctx, stmt)? {
                Flow::Normal => {}
                Flow::Return(value) => return Ok(value),
                Flow::Break | Flow::Continue => break,
            }
        }
        Ok(None)
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            stack: self.stack.save(),
            calls: self.call_stack.depth(),
            eval_depth: self.eval_depth,
        }
    }

    pub(crate) fn rewind(&mut self, checkpoint: Checkpoint) {
        self.stack.restore(checkpoint.stack);
        self.call_stack.truncate(checkpoint.calls);
        self.eval_depth = checkpoint.eval_depth;
    }

    #[inline]
    pub(crate) fn push(&mut self, value: Value) -> EvalResult {
        Ok(self.stack.push(value)?)
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> EvalResult<Value> {
        Ok(self.stack.pop()?)
    }
}

impl Flow {
    fn into_value(self) -> Option<Value> {
        match self {
            Flow::Return(value) => value,
            Flow::Normal | Flow::Break | Flow::Continue => None,
        }
    }
}

/// An ordinal as the signed index diagnostics report.
pub(crate) fn signed(ordinal: usize) -> i64 {
    i64::try_from(ordinal).unwrap_or(i64::MAX)
}
