//! Graph resources, `eval` and the diagnostic statements.
//!
//! Sequences and lookup tables are resolved by name the first time a node
//! uses them and cached for that node; a name missing from the graph is a
//! resource error, which scripts cannot catch.

use std::sync::Arc;

use ctl_ir::{DictOp, EvalMode, LookupOp, NodeId, ProgramId, SeqOp, Span};
use ctl_types::{LogLevel, Name, Type};
use ctl_value::Value;
use tracing::{debug, trace};

use super::cache::LookupCursor;
use super::{Ctx, Interpreter};
use crate::errors::{
    compiler_unavailable, eval_compile_failed, eval_depth_exceeded, internal, missing_resource,
    null_operand, overflow, raised_by_user, resource_failure, type_mismatch, EvalError,
    EvalResult, HostError, ResourceKind,
};
use crate::graph::{Dictionary, LookupTable, Sequence};

impl Interpreter {
    fn sequence(
        &mut self,
        program: ProgramId,
        id: NodeId,
        name: &Name,
    ) -> EvalResult<Arc<dyn Sequence>> {
        if let Some(sequence) = self.cache.node_sequence(program, id) {
            return Ok(sequence);
        }
        let sequence = match self.cache.named_sequence(name) {
            Some(sequence) => sequence,
            None => {
                let sequence = self
                    .graph
                    .sequence(name)
                    .ok_or_else(|| missing_resource(ResourceKind::Sequence, name))?;
                sequence
                    .init()
                    .map_err(|err| resource_failure(ResourceKind::Sequence, name, &err))?;
                debug!(sequence = %name, "sequence resolved");
                sequence
            }
        };
        self.cache.store_sequence(program, id, name, &sequence);
        Ok(sequence)
    }

    /// `sequence(name).next/current/reset`, typed as `ret`.
    pub(crate) fn eval_sequence(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        id: NodeId,
        name: &Name,
        op: SeqOp,
        ret: &Type,
    ) -> EvalResult {
        let sequence = self.sequence(ctx.program.id(), id, name)?;
        let failed = |err: HostError| resource_failure(ResourceKind::Sequence, name, &err);
        let number = match op {
            SeqOp::Next => sequence.next_value().map_err(failed)?,
            SeqOp::Current => sequence.current_value().map_err(failed)?,
            SeqOp::Reset => {
                sequence.reset().map_err(failed)?;
                return self.push(Value::Integer(0));
            }
        };
        let value = match ret {
            Type::Long => Value::Long(number),
            Type::String => Value::String(number.to_string()),
            _ => Value::Integer(i32::try_from(number).map_err(|_| overflow("sequence"))?),
        };
        self.push(value)
    }

    fn lookup_table(
        &mut self,
        program: ProgramId,
        id: NodeId,
        name: &Name,
    ) -> EvalResult<Arc<dyn LookupTable>> {
        if let Some(table) = self.cache.node_lookup(program, id) {
            return Ok(table);
        }
        let table = match self.cache.named_lookup(name) {
            Some(table) => table,
            None => {
                let table = self
                    .graph
                    .lookup_table(name)
                    .ok_or_else(|| missing_resource(ResourceKind::LookupTable, name))?;
                debug!(table = %name, "lookup table resolved");
                table
            }
        };
        self.cache.store_lookup(program, id, name, &table);
        Ok(table)
    }

    /// `lookup_admin(name, init|free)`.
    pub(crate) fn exec_lookup_admin(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        id: NodeId,
        name: &Name,
        op: &LookupOp,
    ) -> EvalResult {
        let table = self.lookup_table(ctx.program.id(), id, name)?;
        match op {
            LookupOp::Init => ensure_initialized(table.as_ref(), name),
            LookupOp::Free => {
                table.free();
                self.cache.cursors.remove(&**name);
                debug!(table = %name, "lookup table freed");
                Ok(())
            }
            LookupOp::Get { .. } | LookupOp::Next { .. } | LookupOp::NumFound => {
                Err(internal("lookup query used as a statement"))
            }
        }
    }

    /// `lookup`, `lookup_next` and `lookup_found`.
    pub(crate) fn eval_lookup(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        id: NodeId,
        name: &Name,
        op: &LookupOp,
    ) -> EvalResult {
        let program = ctx.program.id();
        let table = self.lookup_table(program, id, name)?;
        ensure_initialized(table.as_ref(), name)?;
        let value = match op {
            LookupOp::Get { keys, field } => {
                for &key in keys {
                    self.eval(ctx, key)?;
                }
                let keys = self.stack.pop_n(keys.len())?;
                let records = table
                    .find(&keys)
                    .map_err(|err| resource_failure(ResourceKind::LookupTable, name, &err))?;
                trace!(table = %name, found = records.len(), "lookup");
                let value = match records.first() {
                    Some(record) => self.record_field(program, id, record, field)?,
                    None => Value::Null,
                };
                self.cache.cursors.insert(
                    Arc::clone(name),
                    LookupCursor {
                        records,
                        position: 0,
                    },
                );
                value
            }
            LookupOp::Next { field } => {
                let record = self.cache.cursors.get_mut(&**name).and_then(|cursor| {
                    cursor.position += 1;
                    cursor.records.get(cursor.position).cloned()
                });
                match record {
                    Some(record) => self.record_field(program, id, &record, field)?,
                    None => Value::Null,
                }
            }
            LookupOp::NumFound => {
                let found = self
                    .cache
                    .cursors
                    .get(&**name)
                    .map_or(0, |cursor| cursor.records.len());
                Value::Integer(i32::try_from(found).map_err(|_| overflow("lookup_found"))?)
            }
            LookupOp::Init | LookupOp::Free => {
                return Err(internal("lookup administration used as an expression"));
            }
        };
        self.push(value)
    }

    fn dictionary(&self) -> EvalResult<Arc<dyn Dictionary>> {
        self.graph
            .dictionary()
            .ok_or_else(|| missing_resource(ResourceKind::Dictionary, "dictionary"))
    }

    fn dictionary_key(&mut self, ctx: &mut Ctx<'_, '_>, key: NodeId) -> EvalResult<String> {
        match self.eval_value(ctx, key)? {
            Value::String(key) => Ok(key),
            Value::Null => Err(null_operand("dictionary key")),
            other => Err(type_mismatch("string", &other)),
        }
    }

    pub(crate) fn eval_dictionary_get(&mut self, ctx: &mut Ctx<'_, '_>, key: NodeId) -> EvalResult {
        let dictionary = self.dictionary()?;
        let key = self.dictionary_key(ctx, key)?;
        let value = dictionary.get(&key).map_or(Value::Null, Value::String);
        self.push(value)
    }

    pub(crate) fn exec_dictionary(&mut self, ctx: &mut Ctx<'_, '_>, op: &DictOp) -> EvalResult {
        let dictionary = self.dictionary()?;
        match op {
            DictOp::Put(key, value) => {
                let key = self.dictionary_key(ctx, *key)?;
                let value = match self.eval_value(ctx, *value)? {
                    Value::Null => None,
                    Value::String(value) => Some(value),
                    other => return Err(type_mismatch("string", &other)),
                };
                dictionary
                    .put(&key, value.as_deref())
                    .map_err(|err| resource_failure(ResourceKind::Dictionary, &key, &err))
            }
            DictOp::Delete(key) => {
                let key = self.dictionary_key(ctx, *key)?;
                dictionary
                    .remove(&key)
                    .map_err(|err| resource_failure(ResourceKind::Dictionary, &key, &err))
            }
            DictOp::Get(_) => Err(internal("dictionary read used as a statement")),
        }
    }

    /// Compile the text of `source` and run it in the current frame. The
    /// runtime stack is restored afterwards; an expression's value is
    /// returned.
    pub(crate) fn run_eval(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        source: NodeId,
        mode: EvalMode,
    ) -> EvalResult<Option<Value>> {
        let text = self.eval_value(ctx, source)?.to_ctl_string();
        let compiler = self.compiler.clone().ok_or_else(compiler_unavailable)?;
        if self.eval_depth >= self.config.max_eval_depth {
            return Err(eval_depth_exceeded(self.config.max_eval_depth));
        }
        let compiled = compiler
            .compile(&text, mode, ctx.program)
            .map_err(|err| eval_compile_failed(&err))?;
        compiled
            .validate()
            .map_err(|err| internal(format!("eval produced an invalid program: {err}")))?;
        let root = compiled
            .root()
            .ok_or_else(|| internal("eval produced a program without root"))?;
        debug!(?mode, depth = self.eval_depth + 1, "eval");

        let snapshot = self.stack.save();
        self.eval_depth += 1;
        let result = {
            let mut inner = Ctx {
                program: &compiled,
                inputs: ctx.inputs,
                outputs: &mut *ctx.outputs,
            };
            match mode {
                EvalMode::Expression => self.eval_value(&mut inner, root).map(Some),
                EvalMode::Statements => self.exec(&mut inner, root).map(|_| None),
            }
        };
        self.eval_depth -= 1;
        self.cache.forget_program(compiled.id());
        self.stack.restore(snapshot);
        result
    }

    /// `print_err(message[, true])`.
    pub(crate) fn exec_print_err(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        id: NodeId,
        message: NodeId,
        with_location: bool,
    ) -> EvalResult {
        let message = self.eval_value(ctx, message)?.to_ctl_string();
        let span = ctx.program.span(id);
        let line = if with_location {
            with_position(&message, span)
        } else {
            message
        };
        self.print_handler.println(&line);
        Ok(())
    }

    pub(crate) fn exec_print_log(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        level: LogLevel,
        message: NodeId,
    ) -> EvalResult {
        let message = self.eval_value(ctx, message)?.to_ctl_string();
        self.logger.log(level, &message);
        Ok(())
    }

    /// Build the error of `raise_error(message)`.
    pub(crate) fn raise_error(&mut self, ctx: &mut Ctx<'_, '_>, message: NodeId) -> EvalError {
        match self.eval_value(ctx, message) {
            Ok(message) => raised_by_user(&message.to_ctl_string()),
            Err(err) => err,
        }
    }

    /// Write the expression stack, top first.
    pub(crate) fn exec_print_stack(&self) {
        for (i, value) in self.stack.values().iter().enumerate().rev() {
            let line = format!("[{i}] : {value}");
            debug!(target: "ctl::stack", "{line}");
            self.print_handler.println(&line);
        }
    }
}

fn ensure_initialized(table: &dyn LookupTable, name: &str) -> EvalResult {
    if !table.is_initialized() {
        table
            .init()
            .map_err(|err| resource_failure(ResourceKind::LookupTable, name, &err))?;
        debug!(table = name, "lookup table initialized");
    }
    Ok(())
}

fn with_position(message: &str, span: Span) -> String {
    format!("{message} (on line: {} col: {})", span.line, span.column)
}
