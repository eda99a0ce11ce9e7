//! CTL Eval - tree-walking executor for CTL transformation programs.
//!
//! A host builds a [`Program`](ctl_ir::Program) (through a parser front-end
//! or [`build::ProgramBuilder`]) once and runs it against input and output
//! records with an [`Interpreter`], usually once per record batch.
//!
//! # Crate Organization
//!
//! - `interpreter`: the executor and its builder
//! - `errors`: runtime error kinds, categories and factories
//! - `diagnostics`: the internal call stack behind recursion limits and
//!   backtraces
//! - `config`: limits, with environment overrides
//! - `native`: host functions and overload resolution
//! - `graph`: sequences, lookup tables, the dictionary and the logger a
//!   graph provides, plus in-memory implementations
//! - `build`: programs from owned syntax trees
//! - `logger`, `print_handler`: where `print_log` and `print_err` output
//!   goes
//!
//! # Re-exports
//!
//! The value, type and IR crates are re-exported so hosts depend on this
//! crate alone: `ctl_eval::value::Value`, `ctl_eval::types::Type`,
//! `ctl_eval::ir::Program`.

pub mod build;
mod config;
mod diagnostics;
pub mod errors;
pub mod graph;
mod interpreter;
mod logger;
pub mod native;
mod print_handler;

use std::sync::Once;

pub use ctl_ir as ir;
pub use ctl_types as types;
pub use ctl_value as value;

pub use config::{EvalConfig, MAX_CALL_DEPTH_VAR, MAX_EVAL_DEPTH_VAR, MAX_STACK_DEPTH_VAR};
pub use diagnostics::{CallSite, CallStack};
pub use errors::{
    BacktraceFrame, ErrorCategory, EvalBacktrace, EvalError, EvalErrorKind, EvalNote, EvalResult,
    HostError, ResourceKind,
};
pub use interpreter::{Interpreter, InterpreterBuilder, ScriptCompiler};
pub use logger::{tracing_logger, ScriptLogger, SharedLogger, TracingLogger};
pub use print_handler::{
    buffer_handler, silent_handler, stderr_handler, BufferPrintHandler, PrintHandlerImpl,
    SharedPrintHandler,
};

/// Environment variable holding the log filter; `RUST_LOG` is the
/// fallback.
pub const LOG_ENV_VAR: &str = "CTL_LOG";

static TRACING_INIT: Once = Once::new();

/// Install a stderr subscriber filtered by `CTL_LOG` (or `RUST_LOG`).
///
/// Safe to call more than once. Does nothing when neither variable is
/// set or another subscriber is already installed.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let directives = std::env::var(LOG_ENV_VAR)
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok();
        if let Some(directives) = directives {
            let _ = tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(true)
                        .with_writer(std::io::stderr),
                )
                .with(EnvFilter::new(directives))
                .try_init();
        }
    });
}
