//! Variables, input fields and output mappings.

use std::sync::Arc;

use ctl_ir::{FieldSel, Locality, NodeId, ProgramId, Slot, StepOp, VarAccess, VarRef};
use ctl_types::{RecordSchema, Type};
use ctl_value::{DataRecord, ListValue, Value, VarDecl, Variable};
use tracing::trace;

use super::{signed, Ctx, Interpreter};
use crate::errors::{index_out_of_bounds, internal, not_indexable, EvalError, EvalResult};

/// A resolved variable access. Index expressions are evaluated once, so
/// read-modify-write operators see a single evaluation.
pub(crate) enum Place {
    Whole,
    Index(Value),
    Field(usize),
}

impl Place {
    fn index_value(&self) -> Option<Value> {
        match self {
            Place::Whole => None,
            Place::Index(index) => Some(index.clone()),
            Place::Field(ordinal) => Some(Value::Long(signed(*ordinal))),
        }
    }
}

impl Interpreter {
    pub(crate) fn variable(&self, var: &VarRef) -> EvalResult<&Variable> {
        let found = match var.slot.locality {
            Locality::Global => self.stack.global(var.slot.index),
            Locality::Local => self.stack.local(var.slot.index),
        };
        found.ok_or_else(|| undeclared(var))
    }

    fn variable_mut(&mut self, var: &VarRef) -> EvalResult<&mut Variable> {
        let found = match var.slot.locality {
            Locality::Global => self.stack.global_mut(var.slot.index),
            Locality::Local => self.stack.local_mut(var.slot.index),
        };
        found.ok_or_else(|| undeclared(var))
    }

    pub(crate) fn install(&mut self, slot: Slot, var: Variable) -> EvalResult {
        match slot.locality {
            Locality::Global => self.stack.set_global(slot.index, var)?,
            Locality::Local => self.stack.set_local(slot.index, var)?,
        }
        Ok(())
    }

    /// Resolve the access path of `var`, evaluating its index expression.
    pub(crate) fn place(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        id: NodeId,
        var: &VarRef,
    ) -> EvalResult<Place> {
        match &var.access {
            VarAccess::Whole => Ok(Place::Whole),
            VarAccess::Index(index) => Ok(Place::Index(self.eval_value(ctx, *index)?)),
            VarAccess::Field(field) => {
                let schema = self.record_schema(var)?;
                let ordinal = self
                    .cache
                    .ordinal(ctx.program.id(), id, &schema, field)
                    .map_err(|err| {
                        EvalError::from(err).in_variable(&var.name, &Type::record(Arc::clone(&schema)))
                    })?;
                Ok(Place::Field(ordinal))
            }
        }
    }

    fn record_schema(&self, var: &VarRef) -> EvalResult<Arc<RecordSchema>> {
        let variable = self.variable(var)?;
        if let Value::Record(rec) = &variable.value {
            return Ok(Arc::clone(&rec.schema));
        }
        variable
            .ty
            .schema()
            .cloned()
            .ok_or_else(|| not_indexable(&var.name, &variable.ty))
    }

    pub(crate) fn load(&self, var: &VarRef, place: &Place) -> EvalResult<Value> {
        let variable = self.variable(var)?;
        match place.index_value() {
            None => Ok(variable.value.clone()),
            Some(index) => variable
                .value
                .get_stored(&index)
                .map_err(|err| EvalError::from(err).in_variable(&var.name, &variable.ty)),
        }
    }

    pub(crate) fn store(&mut self, var: &VarRef, place: &Place, value: &Value) -> EvalResult {
        let variable = self.variable_mut(var)?;
        let stored = match place.index_value() {
            None => variable.assign(value),
            Some(index) => variable.set_stored(&index, value),
        };
        stored.map_err(|err| EvalError::from(err).in_variable(&variable.name, &variable.ty))
    }

    pub(crate) fn read_var(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        id: NodeId,
        var: &VarRef,
    ) -> EvalResult<Value> {
        let place = self.place(ctx, id, var)?;
        self.load(var, &place)
    }

    pub(crate) fn exec_var_decl(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        var: &VarRef,
        ty: &Type,
        decl: VarDecl,
        init: Option<NodeId>,
    ) -> EvalResult {
        let mut variable = Variable::declare(Arc::clone(&var.name), ty.clone(), decl);
        if let Some(init) = init {
            let value = self.eval_value(ctx, init)?;
            variable
                .assign(&value)
                .map_err(|err| EvalError::from(err).in_variable(&var.name, ty))?;
        }
        self.install(var.slot, variable)
    }

    /// `target = value`. The target's index is evaluated before the value.
    pub(crate) fn exec_assign(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        id: NodeId,
        target: &VarRef,
        value: NodeId,
    ) -> EvalResult {
        let place = self.place(ctx, id, target)?;
        let value = self.eval_value(ctx, value)?;
        self.store(target, &place, &value)
    }

    /// `++`/`--` on a variable; returns the old and the new value.
    pub(crate) fn step_var(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        id: NodeId,
        op: StepOp,
        target: &VarRef,
    ) -> EvalResult<(Value, Value)> {
        let place = self.place(ctx, id, target)?;
        let old = self.load(target, &place)?;
        let mut new = old.clone();
        new.step(op.delta())
            .map_err(|err| EvalError::from(err).with_operands(&[&old]))?;
        self.store(target, &place, &new)?;
        Ok((old, new))
    }

    pub(crate) fn eval_list_literal(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        elem: &Type,
        items: &[NodeId],
    ) -> EvalResult {
        for &item in items {
            self.eval(ctx, item)?;
        }
        let values = self.stack.pop_n(items.len())?;
        let mut list = ListValue::new(elem.clone());
        for value in &values {
            list.push(value)?;
        }
        self.push(Value::List(list))
    }

    pub(crate) fn eval_input_field(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        id: NodeId,
        record: usize,
        field: &FieldSel,
    ) -> EvalResult {
        let inputs = ctx.inputs;
        let input = inputs
            .get(record)
            .ok_or_else(|| index_out_of_bounds(signed(record), inputs.len()))?;
        let value = self.record_field(ctx.program.id(), id, input, field)?;
        self.push(value)
    }

    /// Read `field` of `record`, resolving names through the node cache.
    pub(crate) fn record_field(
        &mut self,
        program: ProgramId,
        id: NodeId,
        record: &DataRecord,
        field: &FieldSel,
    ) -> EvalResult<Value> {
        let ordinal = match field {
            FieldSel::Whole => return Ok(record.to_value()),
            FieldSel::Ordinal(ordinal) => *ordinal,
            FieldSel::Name(name) => self.cache.ordinal(program, id, record.schema(), name)?,
        };
        record
            .field(ordinal)
            .cloned()
            .ok_or_else(|| index_out_of_bounds(signed(ordinal), record.len()))
    }

    /// Store the first alternative that evaluates and converts cleanly
    /// into output `record`.
    pub(crate) fn exec_mapping(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        id: NodeId,
        record: usize,
        field: &FieldSel,
        alternatives: &[NodeId],
    ) -> EvalResult {
        let program = ctx.program;
        let output_count = ctx.outputs.len();
        let schema = ctx
            .outputs
            .get(record)
            .map(|out| Arc::clone(out.schema()))
            .ok_or_else(|| index_out_of_bounds(signed(record), output_count))?;
        let ordinal = match field {
            FieldSel::Whole => None,
            FieldSel::Ordinal(ordinal) => Some(*ordinal),
            FieldSel::Name(name) => Some(self.cache.ordinal(program.id(), id, &schema, name)?),
        };

        let mut last_error = None;
        for &alternative in alternatives {
            let checkpoint = self.checkpoint();
            let value = match self.eval_value(ctx, alternative) {
                Ok(value) => value,
                Err(err) if err.is_catchable() => {
                    trace!(node = %alternative, error = %err, "mapping alternative failed");
                    self.rewind(checkpoint);
                    last_error = Some(err);
                    continue;
                }
                Err(err) => return Err(err),
            };
            let output = ctx
                .outputs
                .get_mut(record)
                .ok_or_else(|| index_out_of_bounds(signed(record), output_count))?;
            let stored = match ordinal {
                Some(ordinal) => output.set_field(ordinal, &value),
                None => output.copy_from(&value),
            };
            match stored {
                Ok(()) => return Ok(()),
                Err(err) => {
                    trace!(node = %alternative, error = %err, "mapping alternative rejected");
                    last_error = Some(EvalError::from(err).with_span(program.span(alternative)));
                }
            }
        }
        Err(last_error.unwrap_or_else(|| internal("mapping without alternatives")))
    }

    /// Copy the same-named fields of `source` into output `record`.
    pub(crate) fn exec_wildcard_mapping(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        record: usize,
        source: NodeId,
    ) -> EvalResult {
        let program = ctx.program;
        let value = self.eval_value(ctx, source)?;
        let output_count = ctx.outputs.len();
        let output = ctx
            .outputs
            .get_mut(record)
            .ok_or_else(|| index_out_of_bounds(signed(record), output_count))?;
        let copied = output
            .copy_by_name(&value)
            .map_err(|err| EvalError::from(err).with_span(program.span(source)))?;
        trace!(record, copied, "wildcard mapping");
        Ok(())
    }
}

#[cold]
fn undeclared(var: &VarRef) -> EvalError {
    internal(format!(
        "variable `{}` used before its declaration",
        var.name
    ))
}
