//! Internal and native function calls.

use std::sync::Arc;

use ctl_ir::{CallTarget, FuncId, FunctionDef, NativeId, NodeId, Span};
use ctl_value::{Value, Variable};
use tracing::{debug, trace};

use super::{Ctx, Flow, Interpreter};
use crate::diagnostics::CallSite;
use crate::errors::{
    arity_mismatch, internal, native_failure, type_mismatch, EvalError, EvalNote, EvalResult,
};
use crate::native::CallContext;

impl Interpreter {
    /// Evaluate the arguments left to right, then call. `None` for callees
    /// returning nothing.
    pub(crate) fn eval_call(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        id: NodeId,
        target: CallTarget,
        args: &[NodeId],
    ) -> EvalResult<Option<Value>> {
        for &arg in args {
            self.eval(ctx, arg)?;
        }
        let values = self.stack.pop_n(args.len())?;
        let span = ctx.program.span(id);
        match target {
            CallTarget::Internal(func) => self.invoke(ctx, func, values, Some(span)),
            CallTarget::Native(native) => self.invoke_native(native, &values, span),
        }
    }

    /// Call a user-defined function in a fresh frame.
    pub(crate) fn invoke(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        func: FuncId,
        args: Vec<Value>,
        site: Option<Span>,
    ) -> EvalResult<Option<Value>> {
        let program = ctx.program;
        let def = program
            .function(func)
            .ok_or_else(|| internal(format!("unknown function #{}", func.0)))?;
        if args.len() != def.params.len() {
            return Err(arity_mismatch(&def.name, def.params.len(), args.len()));
        }
        self.call_stack.push(CallSite {
            name: Arc::clone(&def.name),
            span: site,
        })?;
        self.stack.push_call_frame();
        debug!(function = %def.name, depth = self.call_stack.depth(), "call");

        let result = self.run_function(ctx, def, &args);

        let popped = self.stack.pop_call_frame();
        self.call_stack.pop();
        let value = result?;
        popped?;
        Ok(value)
    }

    fn run_function(
        &mut self,
        ctx: &mut Ctx<'_, '_>,
        def: &FunctionDef,
        args: &[Value],
    ) -> EvalResult<Option<Value>> {
        for (slot, (param, arg)) in def.params.iter().zip(args).enumerate() {
            let mut var = Variable::new(Arc::clone(&param.name), param.ty.clone());
            var.assign(arg)
                .map_err(|err| EvalError::from(err).in_variable(&param.name, &param.ty))?;
            self.stack.set_local(slot, var)?;
        }
        let returned = match self.exec(ctx, def.body)? {
            Flow::Return(value) => value,
            Flow::Normal | Flow::Break | Flow::Continue => None,
        };
        match returned {
            Some(value) if def.ret.is_void() => Err(type_mismatch("void", &value)
                .with_note(EvalNote::new(format!(
                    "function `{}` does not return a value",
                    def.name
                )))),
            Some(value) => Ok(Some(value.convert_to(&def.ret)?)),
            None if def.ret.is_void() => Ok(None),
            None => Ok(Some(Value::Null)),
        }
    }

    pub(crate) fn invoke_native(
        &self,
        native: NativeId,
        args: &[Value],
        span: Span,
    ) -> EvalResult<Option<Value>> {
        let (signature, function) = self
            .natives
            .get(native)
            .ok_or_else(|| internal(format!("unknown native function #{}", native.0)))?;
        if !signature.accepts_arity(args.len()) {
            return Err(arity_mismatch(
                &signature.name,
                signature.params.len(),
                args.len(),
            ));
        }
        trace!(function = %signature.name, argc = args.len(), "native call");
        let call = CallContext {
            function: &signature.name,
            span,
            logger: self.logger.as_ref(),
        };
        let value = function
            .call(args, &call)
            .map_err(|err| native_failure(&signature.name, &err).with_span(span))?;
        Ok((!signature.ret.is_void()).then_some(value))
    }
}
