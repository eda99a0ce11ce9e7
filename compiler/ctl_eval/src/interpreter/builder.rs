//! `InterpreterBuilder` for configuring an [`Interpreter`].

use std::sync::Arc;

use ctl_stack::RuntimeStack;
use rustc_hash::FxHashSet;
use tracing::debug;

use super::cache::NodeCache;
use super::{Interpreter, ScriptCompiler};
use crate::config::EvalConfig;
use crate::diagnostics::CallStack;
use crate::graph::{EmptyGraph, GraphContext};
use crate::logger::{tracing_logger, SharedLogger};
use crate::native::NativeRegistry;
use crate::print_handler::{stderr_handler, SharedPrintHandler};

/// Builder for [`Interpreter`].
///
/// Unset collaborators default to: the standard library registry, a graph
/// without resources, the graph's logger or else `tracing`, stderr for
/// `print_err`, and no `eval` support.
#[derive(Default)]
pub struct InterpreterBuilder {
    config: EvalConfig,
    natives: Option<Arc<NativeRegistry>>,
    graph: Option<Arc<dyn GraphContext>>,
    logger: Option<SharedLogger>,
    print_handler: Option<SharedPrintHandler>,
    compiler: Option<Arc<dyn ScriptCompiler>>,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the native functions call nodes were resolved against.
    #[must_use]
    pub fn natives(mut self, natives: Arc<NativeRegistry>) -> Self {
        self.natives = Some(natives);
        self
    }

    #[must_use]
    pub fn graph(mut self, graph: Arc<dyn GraphContext>) -> Self {
        self.graph = Some(graph);
        self
    }

    /// Set the `print_log` sink. Overrides the graph's logger.
    #[must_use]
    pub fn logger(mut self, logger: SharedLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Enable `eval` with `compiler`.
    #[must_use]
    pub fn compiler(mut self, compiler: Arc<dyn ScriptCompiler>) -> Self {
        self.compiler = Some(compiler);
        self
    }

    pub fn build(self) -> Interpreter {
        let graph = self.graph.unwrap_or_else(|| Arc::new(EmptyGraph));
        let logger = self
            .logger
            .or_else(|| graph.logger())
            .unwrap_or_else(tracing_logger);
        let natives = self
            .natives
            .unwrap_or_else(|| Arc::new(NativeRegistry::with_stdlib()));
        debug!(
            natives = natives.len(),
            max_call_depth = ?self.config.max_call_depth,
            eval = self.compiler.is_some(),
            "building interpreter"
        );
        Interpreter {
            stack: RuntimeStack::new(self.config.stack.clone()),
            call_stack: CallStack::new(self.config.max_call_depth),
            config: self.config,
            natives,
            graph,
            logger,
            print_handler: self.print_handler.unwrap_or_else(stderr_handler),
            compiler: self.compiler,
            cache: NodeCache::default(),
            eval_depth: 0,
            validated: FxHashSet::default(),
        }
    }
}
