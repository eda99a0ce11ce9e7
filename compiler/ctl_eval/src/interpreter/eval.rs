//! Node dispatch.
//!
//! `NodeKind` payloads are borrowed from the program, not from `self`,
//! so each arm can recurse into `eval`/`exec` while holding them.

use ctl_ir::{DictOp, EvalMode, Fix, LookupOp, NodeId, NodeKind, Program};
use ctl_stack::ensure_sufficient_stack;
use ctl_value::Value;
use tracing::trace;

use super::{Ctx, Flow, Interpreter};
use crate::errors::{internal, EvalError, EvalResult};

impl Interpreter {
    /// Evaluate expression `id`, leaving exactly one value on the stack.
    pub(crate) fn eval(&mut self, ctx: &mut Ctx<'_, '_>, id: NodeId) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(ctx, id))
            .map_err(|err| self.annotate(ctx.program, id, err))
    }

    /// Evaluate expression `id` and take its value off the stack.
    pub(crate) fn eval_value(&mut self, ctx: &mut Ctx<'_, '_>, id: NodeId) -> EvalResult<Value> {
        self.eval(ctx, id)?;
        self.pop()
    }

    /// Execute statement `id`. Expressions in statement position are
    /// evaluated and their value dropped.
    pub(crate) fn exec(&mut self, ctx: &mut Ctx<'_, '_>, id: NodeId) -> EvalResult<Flow> {
        ensure_sufficient_stack(|| self.exec_inner(ctx, id))
            .map_err(|err| self.annotate(ctx.program, id, err))
    }

    /// Position an error at `id` unless an inner node already did, and
    /// record the active calls.
    fn annotate(&self, program: &Program, id: NodeId, err: EvalError) -> EvalError {
        let err = if err.span.is_none() {
            err.with_span(program.span(id))
        } else {
            err
        };
        self.call_stack.attach_backtrace(err)
    }

    fn eval_inner(&mut self, ctx: &mut Ctx<'_, '_>, id: NodeId) -> EvalResult {
        let program = ctx.program;
        let node = program.node(id);
        trace!(node = %id, line = node.span.line, "eval");
        match &node.kind {
            NodeKind::Literal(value) => self.push(value.clone()),
            NodeKind::ListLiteral { elem, items } => self.eval_list_literal(ctx, elem, items),
            NodeKind::Var(var) => {
                let value = self.read_var(ctx, id, var)?;
                self.push(value)
            }
            NodeKind::InputField { record, field } => {
                self.eval_input_field(ctx, id, *record, field)
            }
            NodeKind::Logical { op, left, right } => self.eval_logical(ctx, *op, *left, *right),
            NodeKind::Not(operand) => {
                let value = self.eval_boolean(ctx, *operand)?;
                self.push(Value::Boolean(!value))
            }
            NodeKind::Compare { op, left, right } => {
                self.eval_compare(ctx, id, *op, *left, *right)
            }
            NodeKind::Arith { op, left, right } => self.eval_arith(ctx, id, *op, *left, *right),
            NodeKind::Unary { op, operand } => self.eval_unary(ctx, *op, *operand),
            NodeKind::Step { op, fix, target } if *fix != Fix::Statement => {
                let (old, new) = self.step_var(ctx, id, *op, target)?;
                self.push(if *fix == Fix::Prefix { new } else { old })
            }
            NodeKind::IsNull(operand) => {
                let value = self.eval_value(ctx, *operand)?;
                self.push(Value::Boolean(value.is_null_or_empty()))
            }
            NodeKind::Nvl { value, fallback } => self.eval_nvl(ctx, *value, *fallback),
            NodeKind::Nvl2 {
                value,
                present,
                absent,
            } => self.eval_nvl2(ctx, *value, *present, *absent),
            NodeKind::Iif {
                cond,
                then,
                otherwise,
            } => {
                let branch = if self.eval_condition(ctx, Some(*cond), "iif")? {
                    *then
                } else {
                    *otherwise
                };
                self.eval(ctx, branch)
            }
            NodeKind::Call { target, args } => {
                let value = self.eval_call(ctx, id, *target, args)?;
                self.push(value.unwrap_or(Value::Null))
            }
            NodeKind::Sequence { name, op, ret } => self.eval_sequence(ctx, id, name, *op, ret),
            NodeKind::Lookup { table, op } if !matches!(op, LookupOp::Init | LookupOp::Free) => {
                self.eval_lookup(ctx, id, table, op)
            }
            NodeKind::Dictionary(DictOp::Get(key)) => self.eval_dictionary_get(ctx, *key),
            NodeKind::Eval {
                source,
                mode: EvalMode::Expression,
            } => {
                let value = self.run_eval(ctx, *source, EvalMode::Expression)?;
                self.push(value.unwrap_or(Value::Null))
            }
            _ => Err(internal(format!("node {id} is not an expression"))),
        }
    }

    fn exec_inner(&mut self, ctx: &mut Ctx<'_, '_>, id: NodeId) -> EvalResult<Flow> {
        let program = ctx.program;
        let node = program.node(id);
        trace!(node = %id, line = node.span.line, "exec");
        match &node.kind {
            NodeKind::Block(stmts) => self.exec_block(ctx, stmts),
            NodeKind::VarDecl {
                var,
                ty,
                decl,
                init,
            } => {
                self.exec_var_decl(ctx, var, ty, *decl, *init)?;
                Ok(Flow::Normal)
            }
            NodeKind::Assign { target, value } => {
                self.exec_assign(ctx, id, target, *value)?;
                Ok(Flow::Normal)
            }
            NodeKind::Mapping {
                record,
                field,
                alternatives,
            } => {
                self.exec_mapping(ctx, id, *record, field, alternatives)?;
                Ok(Flow::Normal)
            }
            NodeKind::WildcardMapping { record, source } => {
                self.exec_wildcard_mapping(ctx, *record, *source)?;
                Ok(Flow::Normal)
            }
            NodeKind::Step {
                op,
                fix: Fix::Statement,
                target,
            } => {
                self.step_var(ctx, id, *op, target)?;
                Ok(Flow::Normal)
            }
            NodeKind::If {
                cond,
                then,
                otherwise,
            } => self.exec_if(ctx, *cond, *then, *otherwise),
            NodeKind::For {
                init,
                cond,
                step,
                body,
            } => self.exec_for(ctx, *init, *cond, *step, *body),
            NodeKind::Foreach {
                var,
                iterable,
                body,
            } => self.exec_foreach(ctx, var, *iterable, *body),
            NodeKind::While { cond, body } => self.exec_while(ctx, *cond, *body),
            NodeKind::DoWhile { body, cond } => self.exec_do_while(ctx, *body, *cond),
            NodeKind::Switch {
                scrutinee,
                cases,
                default,
            } => self.exec_switch(ctx, *scrutinee, cases, *default),
            NodeKind::TryCatch {
                body,
                binding,
                handler,
            } => self.exec_try_catch(ctx, *body, binding.as_ref(), *handler),
            NodeKind::Break => Ok(Flow::Break),
            NodeKind::Continue => Ok(Flow::Continue),
            NodeKind::Return(value) => {
                let value = match value {
                    Some(value) => Some(self.eval_value(ctx, *value)?),
                    None => None,
                };
                Ok(Flow::Return(value))
            }
            NodeKind::Call { target, args } => {
                self.eval_call(ctx, id, *target, args)?;
                Ok(Flow::Normal)
            }
            NodeKind::Lookup {
                table,
                op: op @ (LookupOp::Init | LookupOp::Free),
            } => {
                self.exec_lookup_admin(ctx, id, table, op)?;
                Ok(Flow::Normal)
            }
            NodeKind::Dictionary(op @ (DictOp::Put(..) | DictOp::Delete(_))) => {
                self.exec_dictionary(ctx, op)?;
                Ok(Flow::Normal)
            }
            NodeKind::Eval {
                source,
                mode: EvalMode::Statements,
            } => {
                self.run_eval(ctx, *source, EvalMode::Statements)?;
                Ok(Flow::Normal)
            }
            NodeKind::PrintErr {
                message,
                with_location,
            } => {
                self.exec_print_err(ctx, id, *message, *with_location)?;
                Ok(Flow::Normal)
            }
            NodeKind::PrintLog { level, message } => {
                self.exec_print_log(ctx, *level, *message)?;
                Ok(Flow::Normal)
            }
            NodeKind::RaiseError(message) => Err(self.raise_error(ctx, *message)),
            NodeKind::PrintStack => {
                self.exec_print_stack();
                Ok(Flow::Normal)
            }
            kind if kind.is_expression() => {
                self.eval(ctx, id)?;
                self.pop()?;
                Ok(Flow::Normal)
            }
            _ => Err(internal(format!("node {id} is not a statement"))),
        }
    }
}
