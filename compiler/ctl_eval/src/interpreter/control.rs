//! Blocks, branches, loops, `switch` and `try/catch`.

use std::cmp::Ordering;

use ctl_ir::{Case, NodeId, VarRef};
use ctl_value::Value;
use tracing::debug;

use super::access::Place;
use super::{Ctx, Flow, Interpreter};
use crate::errors::{incompatible_operands, EvalError, EvalResult};

impl Interpreter {
    pub(crate) fn exec_block(&mut self, ctx: &mut Ctx<'_, '_>, stmts: &[NodeId]) -> EvalResult<Flow> {
        for &stmt in stmts {
            let flow = self.exec(ctx, stmt)?;
            if flow != Flow::Normal {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    pub(crate) fn exec_if(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        cond: NodeId,
        then: NodeId,
        otherwise: Option<NodeId>,
    ) -> EvalResult<Flow> {
        if self.eval_condition(ctx, Some(cond), "if")? {
            self.exec(ctx, then)
        } else if let Some(otherwise) = otherwise {
            self.exec(ctx, otherwise)
        } else {
            Ok(Flow::Normal)
        }
    }

    /// Run a loop body once. `Some` ends the loop with that flow.
    fn loop_body(&mut self, ctx: &mut Ctx<'_, '_>, body: NodeId) -> EvalResult<Option<Flow>> {
        Ok(match self.exec(ctx, body)? {
            Flow::Normal | Flow::Continue => None,
            Flow::Break => Some(Flow::Normal),
            ret @ Flow::Return(_) => Some(ret),
        })
    }

    pub(crate) fn exec_for(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        init: Option<NodeId>,
        cond: Option<NodeId>,
        step: Option<NodeId>,
        body: NodeId,
    ) -> EvalResult<Flow> {
        if let Some(init) = init {
            self.exec(ctx, init)?;
        }
        while self.eval_condition(ctx, cond, "for")? {
            if let Some(flow) = self.loop_body(ctx, body)? {
                return Ok(flow);
            }
            if let Some(step) = step {
                self.exec(ctx, step)?;
            }
        }
        Ok(Flow::Normal)
    }

    /// Bind each element of the iterable to `var` and run the body. A
    /// `null` iterable runs nothing.
    pub(crate) fn exec_foreach(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        var: &VarRef,
        iterable: NodeId,
        body: NodeId,
    ) -> EvalResult<Flow> {
        let iterable = self.eval_value(ctx, iterable)?;
        if iterable.is_null() {
            return Ok(Flow::Normal);
        }
        for element in iterable.iter_elements()? {
            self.store(var, &Place::Whole, &element)?;
            if let Some(flow) = self.loop_body(ctx, body)? {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    pub(crate) fn exec_while(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        cond: NodeId,
        body: NodeId,
    ) -> EvalResult<Flow> {
        while self.eval_condition(ctx, Some(cond), "while")? {
            if let Some(flow) = self.loop_body(ctx, body)? {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    pub(crate) fn exec_do_while(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        body: NodeId,
        cond: NodeId,
    ) -> EvalResult<Flow> {
        loop {
            if let Some(flow) = self.loop_body(ctx, body)? {
                return Ok(flow);
            }
            if !self.eval_condition(ctx, Some(cond), "do-while")? {
                return Ok(Flow::Normal);
            }
        }
    }

    /// Every case is tested against the scrutinee and each matching body
    /// runs, until a `break`. The default runs only when no case matched.
    pub(crate) fn exec_switch(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        scrutinee: NodeId,
        cases: &[Case],
        default: Option<NodeId>,
    ) -> EvalResult<Flow> {
        self.eval(ctx, scrutinee)?;
        let subject = self.pop()?;
        let mut matched = false;
        for case in cases {
            // Each test consumes its own copy of the scrutinee.
            self.push(subject.clone())?;
            self.eval(ctx, case.value)?;
            let candidate = self.pop()?;
            let tested = self.pop()?;
            if !switch_matches(&tested, &candidate)
                .map_err(|err| err.with_span(ctx.program.span(case.value)))?
            {
                continue;
            }
            matched = true;
            match self.exec(ctx, case.body)? {
                Flow::Normal => {}
                Flow::Break => return Ok(Flow::Normal),
                flow @ (Flow::Continue | Flow::Return(_)) => return Ok(flow),
            }
        }

        match default {
            Some(body) if !matched => match self.exec(ctx, body)? {
                Flow::Break => Ok(Flow::Normal),
                flow => Ok(flow),
            },
            _ => Ok(Flow::Normal),
        }
    }

    /// Run `body`; on a catchable error rewind the executor to where the
    /// `try` started, bind the error category name and run `handler`.
    pub(crate) fn exec_try_catch(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        body: NodeId,
        binding: Option<&VarRef>,
        handler: NodeId,
    ) -> EvalResult<Flow> {
        let checkpoint = self.checkpoint();
        match self.exec(ctx, body) {
            Ok(flow) => Ok(flow),
            Err(err) if err.is_catchable() => {
                debug!(code = err.code(), category = %err.category(), error = %err, "caught");
                self.rewind(checkpoint);
                if let Some(var) = binding {
                    self.store(var, &Place::Whole, &Value::string(err.category().name()))?;
                }
                self.exec(ctx, handler)
            }
            Err(err) => Err(err),
        }
    }
}

/// Whether a case value selects the scrutinee. Nulls only match nulls.
fn switch_matches(subject: &Value, candidate: &Value) -> EvalResult<bool> {
    if subject.is_null() || candidate.is_null() {
        return Ok(subject.is_null() && candidate.is_null());
    }
    if !subject.type_of().is_compatible(&candidate.type_of()) {
        return Err(incompatible_operands("switch", subject, candidate));
    }
    let ordering = subject
        .compare(candidate)
        .map_err(|err| EvalError::from(err).with_operands(&[subject, candidate]))?;
    Ok(ordering == Ordering::Equal)
}
