//! The runtime stack proper.
//!
//! Three stores that move independently:
//!
//! - the expression stack, a bounded LIFO of values with a `top` cursor;
//! - the global slot array, indexed by global slot number;
//! - the local slot array, addressed as `local_offset + slot`.
//!
//! A call frame records the caller's `(offset, counter)` pair. Pushing a
//! frame moves the offset past the caller's locals so the callee's slots
//! start strictly above them. Popping clears the callee's range because
//! slot numbers are reused by unrelated calls.

use std::mem;

use ctl_value::{Value, Variable};
use tracing::debug;

use crate::error::StackError;
use crate::limits::StackLimits;

/// A saved caller region of the local slot array.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CallFrame {
    pub offset: usize,
    pub counter: usize,
}

/// The four scalar cursors of a [`RuntimeStack`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StackSnapshot {
    pub top: usize,
    pub frame_top: usize,
    pub local_offset: usize,
    pub local_counter: usize,
}

/// Expression stack, variable slots and call frames of one executor.
#[derive(Debug)]
pub struct RuntimeStack {
    limits: StackLimits,
    values: Vec<Value>,
    top: usize,
    globals: Vec<Option<Variable>>,
    locals: Vec<Option<Variable>>,
    /// One past the highest local slot written since the last reset.
    locals_high: usize,
    local_offset: usize,
    local_counter: usize,
    frames: Vec<CallFrame>,
    frame_top: usize,
}

impl Default for RuntimeStack {
    fn default() -> Self {
        Self::new(StackLimits::default())
    }
}

impl RuntimeStack {
    pub fn new(limits: StackLimits) -> Self {
        let globals = vec![None; limits.initial_globals.min(limits.max_globals)];
        let locals = vec![None; limits.initial_locals.min(limits.max_locals)];
        RuntimeStack {
            values: Vec::with_capacity(limits.max_expr_depth.min(64)),
            limits,
            top: 0,
            globals,
            locals,
            locals_high: 0,
            local_offset: 0,
            local_counter: 0,
            frames: Vec::new(),
            frame_top: 0,
        }
    }

    pub fn limits(&self) -> &StackLimits {
        &self.limits
    }

    // Expression stack

    /// Number of values on the expression stack.
    #[inline]
    pub fn depth(&self) -> usize {
        self.top
    }

    pub fn push(&mut self, value: Value) -> Result<(), StackError> {
        if self.top >= self.limits.max_expr_depth {
            return Err(StackError::ExpressionOverflow {
                limit: self.limits.max_expr_depth,
            });
        }
        if self.top < self.values.len() {
            self.values[self.top] = value;
        } else {
            self.values.push(value);
        }
        self.top += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Value, StackError> {
        if self.top == 0 {
            return Err(StackError::ExpressionUnderflow);
        }
        self.top -= 1;
        Ok(mem::replace(&mut self.values[self.top], Value::Null))
    }

    /// Pop the top `n` values, returned bottom-first.
    pub fn pop_n(&mut self, n: usize) -> Result<Vec<Value>, StackError> {
        if n > self.top {
            return Err(StackError::ExpressionUnderflow);
        }
        let start = self.top - n;
        let values = self.values[start..self.top]
            .iter_mut()
            .map(|slot| mem::replace(slot, Value::Null))
            .collect();
        self.top = start;
        Ok(values)
    }

    /// The value `depth` positions below the top; `0` is the top itself.
    pub fn peek(&self, depth: usize) -> Result<&Value, StackError> {
        if depth >= self.top {
            return Err(StackError::ExpressionUnderflow);
        }
        Ok(&self.values[self.top - 1 - depth])
    }

    /// Live values, bottom first.
    pub fn values(&self) -> &[Value] {
        &self.values[..self.top]
    }

    /// Drop values until the stack is `depth` deep.
    pub fn truncate(&mut self, depth: usize) {
        while self.top > depth {
            self.top -= 1;
            self.values[self.top] = Value::Null;
        }
    }

    // Global slots

    pub fn global_capacity(&self) -> usize {
        self.globals.len()
    }

    pub fn global(&self, slot: usize) -> Option<&Variable> {
        self.globals.get(slot).and_then(Option::as_ref)
    }

    pub fn global_mut(&mut self, slot: usize) -> Option<&mut Variable> {
        self.globals.get_mut(slot).and_then(Option::as_mut)
    }

    /// Install `var` in global `slot`, growing the array as needed.
    pub fn set_global(&mut self, slot: usize, var: Variable) -> Result<(), StackError> {
        if slot >= self.globals.len() {
            let new_len = self
                .limits
                .grown_len(self.globals.len(), slot, self.limits.max_globals)
                .ok_or(StackError::GlobalsExhausted {
                    slot,
                    limit: self.limits.max_globals,
                })?;
            debug!(from = self.globals.len(), to = new_len, "growing global slots");
            self.globals.resize(new_len, None);
        }
        self.globals[slot] = Some(var);
        Ok(())
    }

    // Local slots

    pub fn local_offset(&self) -> usize {
        self.local_offset
    }

    pub fn local_counter(&self) -> usize {
        self.local_counter
    }

    pub fn local(&self, slot: usize) -> Option<&Variable> {
        self.locals
            .get(self.local_offset + slot)
            .and_then(Option::as_ref)
    }

    pub fn local_mut(&mut self, slot: usize) -> Option<&mut Variable> {
        self.locals
            .get_mut(self.local_offset + slot)
            .and_then(Option::as_mut)
    }

    /// Install `var` in local `slot` of the current frame.
    pub fn set_local(&mut self, slot: usize, var: Variable) -> Result<(), StackError> {
        let index = self.local_offset + slot;
        if index >= self.locals.len() {
            let new_len = self
                .limits
                .grown_len(self.locals.len(), index, self.limits.max_locals)
                .ok_or(StackError::LocalsExhausted {
                    slot: index,
                    limit: self.limits.max_locals,
                })?;
            debug!(from = self.locals.len(), to = new_len, "growing local slots");
            self.locals.resize(new_len, None);
        }
        self.locals[index] = Some(var);
        self.local_counter = self.local_counter.max(slot + 1);
        self.locals_high = self.locals_high.max(index + 1);
        Ok(())
    }

    // Call frames

    /// Number of active call frames.
    pub fn frame_depth(&self) -> usize {
        self.frame_top
    }

    /// Open a frame for a callee; its locals start above the caller's.
    pub fn push_call_frame(&mut self) {
        let frame = CallFrame {
            offset: self.local_offset,
            counter: self.local_counter,
        };
        if self.frame_top < self.frames.len() {
            self.frames[self.frame_top] = frame;
        } else {
            self.frames.push(frame);
        }
        self.frame_top += 1;
        self.local_offset += self.local_counter;
        self.local_counter = 0;
    }

    /// Close the innermost frame, clearing the callee's locals.
    pub fn pop_call_frame(&mut self) -> Result<(), StackError> {
        if self.frame_top == 0 {
            return Err(StackError::FrameUnderflow);
        }
        let end = (self.local_offset + self.local_counter).min(self.locals.len());
        for slot in &mut self.locals[self.local_offset.min(end)..end] {
            *slot = None;
        }
        self.frame_top -= 1;
        let frame = self.frames[self.frame_top];
        self.local_offset = frame.offset;
        self.local_counter = frame.counter;
        Ok(())
    }

    // Snapshots

    pub fn save(&self) -> StackSnapshot {
        StackSnapshot {
            top: self.top,
            frame_top: self.frame_top,
            local_offset: self.local_offset,
            local_counter: self.local_counter,
        }
    }

    /// Return every cursor to `snapshot`. Values pushed and locals written
    /// above the saved region since then are cleared.
    pub fn restore(&mut self, snapshot: StackSnapshot) {
        self.truncate(snapshot.top);
        self.top = snapshot.top;
        self.frame_top = snapshot.frame_top.min(self.frames.len());
        self.local_offset = snapshot.local_offset;
        self.local_counter = snapshot.local_counter;
        let end = (snapshot.local_offset + snapshot.local_counter).min(self.locals.len());
        let high = self.locals_high.min(self.locals.len());
        if high > end {
            for slot in &mut self.locals[end..high] {
                *slot = None;
            }
        }
        self.locals_high = self.locals_high.min(end);
    }

    /// Drop all values, locals and frames. Globals survive.
    pub fn reset(&mut self) {
        self.restore(StackSnapshot::default());
    }
}

#[cfg(test)]
mod tests;
