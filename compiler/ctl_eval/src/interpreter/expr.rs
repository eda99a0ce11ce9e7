//! Operators and null helpers.

use std::cmp::Ordering;

use ctl_ir::{ArithOp, CmpOp, LogicalOp, NodeId, ProgramId, UnaryOp};
use ctl_value::{Value, ValueError};

use super::{Ctx, Interpreter};
use crate::errors::{
    incompatible_operands, internal, invalid_condition, missing_condition, null_operand,
    type_mismatch, EvalError, EvalResult,
};

impl Interpreter {
    /// Evaluate an operand that must be a boolean.
    pub(crate) fn eval_boolean(&mut self, ctx: &mut Ctx<'_, '_>, id: NodeId) -> EvalResult<bool> {
        let value = self.eval_value(ctx, id)?;
        value
            .as_bool()
            .ok_or_else(|| type_mismatch("boolean", &value).with_span(ctx.program.span(id)))
    }

    /// Evaluate the condition of `construct`. A missing or `null`
    /// condition and a non-boolean one are distinct errors.
    pub(crate) fn eval_condition(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        cond: Option<NodeId>,
        construct: &'static str,
    ) -> EvalResult<bool> {
        let Some(cond) = cond else {
            return Err(missing_condition(construct));
        };
        match self.eval_value(ctx, cond)? {
            Value::Boolean(b) => Ok(b),
            Value::Null => Err(missing_condition(construct).with_span(ctx.program.span(cond))),
            other => Err(invalid_condition(construct)
                .with_operands(&[&other])
                .with_span(ctx.program.span(cond))),
        }
    }

    /// `&&`/`||`; the right operand runs only when the left one does not
    /// decide the result.
    pub(crate) fn eval_logical(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        op: LogicalOp,
        left: NodeId,
        right: NodeId,
    ) -> EvalResult {
        let left = self.eval_boolean(ctx, left)?;
        let result = match (op, left) {
            (LogicalOp::And, false) => false,
            (LogicalOp::Or, true) => true,
            _ => self.eval_boolean(ctx, right)?,
        };
        self.push(Value::Boolean(result))
    }

    pub(crate) fn eval_compare(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        id: NodeId,
        op: CmpOp,
        left: NodeId,
        right: NodeId,
    ) -> EvalResult {
        self.eval(ctx, left)?;
        self.eval(ctx, right)?;
        let right = self.pop()?;
        let left = self.pop()?;
        let result = match op {
            CmpOp::RegexMatch => self.regex_match(ctx.program.id(), id, &left, &right)?,
            CmpOp::In => {
                if left.is_null() {
                    false
                } else {
                    right
                        .contains(&left)
                        .map_err(|err| EvalError::from(err).with_operands(&[&left, &right]))?
                }
            }
            _ => compare_values(op, &left, &right)?,
        };
        self.push(Value::Boolean(result))
    }

    fn regex_match(
        &mut self,
        program: ProgramId,
        id: NodeId,
        text: &Value,
        pattern: &Value,
    ) -> EvalResult<bool> {
        let symbol = CmpOp::RegexMatch.as_symbol();
        let text = match text {
            Value::String(text) => text,
            Value::Null => return Err(null_operand(symbol)),
            other => return Err(type_mismatch("string", other)),
        };
        match pattern {
            Value::Regex(re) => Ok(re.matches_fully(text)),
            Value::String(source) => Ok(self.cache.regex(program, id, source)?.matches_fully(text)),
            Value::Null => Err(null_operand(symbol)),
            other => Err(type_mismatch("string", other)),
        }
    }

    /// Binary arithmetic through the node's scratch buffer.
    pub(crate) fn eval_arith(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        id: NodeId,
        op: ArithOp,
        left: NodeId,
        right: NodeId,
    ) -> EvalResult {
        self.eval(ctx, left)?;
        self.eval(ctx, right)?;
        let right = self.pop()?;
        let left = self.pop()?;
        let failed = |err: ValueError| EvalError::from(err).with_operands(&[&left, &right]);
        let scratch = self
            .cache
            .scratch(ctx.program.id(), id, &left)
            .map_err(failed)?;
        scratch.arith_in_place(op, &right).map_err(failed)?;
        let result = scratch.clone();
        self.push(result)
    }

    pub(crate) fn eval_unary(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        op: UnaryOp,
        operand: NodeId,
    ) -> EvalResult {
        let value = self.eval_value(ctx, operand)?;
        let result = match op {
            UnaryOp::Minus => value.negate(),
            UnaryOp::Plus => value.abs(),
        }
        .map_err(|err| EvalError::from(err).with_operands(&[&value]))?;
        self.push(result)
    }

    pub(crate) fn eval_nvl(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        value: NodeId,
        fallback: NodeId,
    ) -> EvalResult {
        let value = self.eval_value(ctx, value)?;
        if value.is_null_or_empty() {
            self.eval(ctx, fallback)
        } else {
            self.push(value)
        }
    }

    pub(crate) fn eval_nvl2(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        value: NodeId,
        present: NodeId,
        absent: NodeId,
    ) -> EvalResult {
        let value = self.eval_value(ctx, value)?;
        let branch = if value.is_null_or_empty() {
            absent
        } else {
            present
        };
        self.eval(ctx, branch)
    }
}

/// Equality and ordering. `==`/`!=` accept nulls (two nulls are equal);
/// ordering a null is an error.
pub(crate) fn compare_values(op: CmpOp, left: &Value, right: &Value) -> EvalResult<bool> {
    let symbol = op.as_symbol();
    if left.is_null() || right.is_null() {
        let both = left.is_null() && right.is_null();
        return match op {
            CmpOp::Eq => Ok(both),
            CmpOp::NotEq => Ok(!both),
            _ => Err(null_operand(symbol).with_operands(&[left, right])),
        };
    }
    if !left.type_of().is_compatible(&right.type_of()) {
        return Err(incompatible_operands(symbol, left, right));
    }
    let result = match op {
        CmpOp::Eq => left.equals(right),
        CmpOp::NotEq => left.equals(right).map(|eq| !eq),
        CmpOp::Lt => left.compare(right).map(Ordering::is_lt),
        CmpOp::LtEq => left.compare(right).map(Ordering::is_le),
        CmpOp::Gt => left.compare(right).map(Ordering::is_gt),
        CmpOp::GtEq => left.compare(right).map(Ordering::is_ge),
        CmpOp::RegexMatch | CmpOp::In => {
            return Err(internal(format!("`{symbol}` is not an ordering")));
        }
    };
    result.map_err(|err| EvalError::from(err).with_operands(&[left, right]))
}
