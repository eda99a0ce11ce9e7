//! Per-node runtime caches.
//!
//! Programs are immutable and shareable, so whatever the executor learns
//! about a node while running it lives here, keyed by program and node.

use std::sync::Arc;

use ctl_ir::{NodeId, ProgramId};
use ctl_types::{Name, RecordSchema};
use ctl_value::{RegexValue, Value, ValueError};
use rustc_hash::FxHashMap;

use crate::errors::{invalid_regex, EvalResult};
use crate::graph::{LookupTable, Sequence};

type NodeKey = (ProgramId, NodeId);

/// Matches of the last `lookup` on one table.
#[derive(Debug, Default)]
pub(crate) struct LookupCursor {
    pub records: Vec<ctl_value::DataRecord>,
    pub position: usize,
}

#[derive(Default)]
pub(crate) struct NodeCache {
    /// Arithmetic result buffers.
    scratch: FxHashMap<NodeKey, Value>,
    /// Field name resolved against the schema it was resolved for.
    ordinals: FxHashMap<NodeKey, (Arc<RecordSchema>, usize)>,
    regexes: FxHashMap<NodeKey, RegexValue>,
    sequences: FxHashMap<NodeKey, Arc<dyn Sequence>>,
    lookups: FxHashMap<NodeKey, Arc<dyn LookupTable>>,
    /// Handles by resource name, so each is initialized once per executor.
    named_sequences: FxHashMap<Name, Arc<dyn Sequence>>,
    named_lookups: FxHashMap<Name, Arc<dyn LookupTable>>,
    /// Cursor state is shared by every node naming the same table.
    pub cursors: FxHashMap<Name, LookupCursor>,
}

impl NodeCache {
    /// Scratch buffer of an arithmetic node, seeded from `seed`.
    ///
    /// The buffer is reused while `seed` keeps the kind it was seeded
    /// with; a different kind reseeds it.
    pub fn scratch(
        &mut self,
        program: ProgramId,
        node: NodeId,
        seed: &Value,
    ) -> Result<&mut Value, ValueError> {
        let slot = self.scratch.entry((program, node)).or_insert(Value::Null);
        if std::mem::discriminant(slot) == std::mem::discriminant(seed) {
            slot.assign_from(seed)?;
        } else {
            slot.clone_from(seed);
        }
        Ok(slot)
    }

    /// Ordinal of field `name` in `schema`, resolved once per node and
    /// schema.
    pub fn ordinal(
        &mut self,
        program: ProgramId,
        node: NodeId,
        schema: &Arc<RecordSchema>,
        name: &str,
    ) -> Result<usize, ValueError> {
        let key = (program, node);
        if let Some((cached, ordinal)) = self.ordinals.get(&key) {
            if Arc::ptr_eq(cached, schema) || **cached == **schema {
                return Ok(*ordinal);
            }
        }
        let ordinal = schema
            .field_position(name)
            .ok_or_else(|| ValueError::UnknownField {
                field: name.to_owned(),
            })?;
        self.ordinals.insert(key, (Arc::clone(schema), ordinal));
        Ok(ordinal)
    }

    /// Compiled `pattern`, reused while a node keeps matching the same
    /// text.
    pub fn regex(&mut self, program: ProgramId, node: NodeId, pattern: &str) -> EvalResult<RegexValue> {
        let key = (program, node);
        if let Some(re) = self.regexes.get(&key) {
            if re.as_str() == pattern {
                return Ok(re.clone());
            }
        }
        let re = RegexValue::new(pattern).map_err(|err| invalid_regex(pattern, &err.to_string()))?;
        self.regexes.insert(key, re.clone());
        Ok(re)
    }

    pub fn node_sequence(&self, program: ProgramId, node: NodeId) -> Option<Arc<dyn Sequence>> {
        self.sequences.get(&(program, node)).cloned()
    }

    pub fn named_sequence(&self, name: &str) -> Option<Arc<dyn Sequence>> {
        self.named_sequences.get(name).cloned()
    }

    pub fn store_sequence(
        &mut self,
        program: ProgramId,
        node: NodeId,
        name: &Name,
        sequence: &Arc<dyn Sequence>,
    ) {
        self.named_sequences
            .entry(Arc::clone(name))
            .or_insert_with(|| Arc::clone(sequence));
        self.sequences.insert((program, node), Arc::clone(sequence));
    }

    pub fn node_lookup(&self, program: ProgramId, node: NodeId) -> Option<Arc<dyn LookupTable>> {
        self.lookups.get(&(program, node)).cloned()
    }

    pub fn named_lookup(&self, name: &str) -> Option<Arc<dyn LookupTable>> {
        self.named_lookups.get(name).cloned()
    }

    pub fn store_lookup(
        &mut self,
        program: ProgramId,
        node: NodeId,
        name: &Name,
        table: &Arc<dyn LookupTable>,
    ) {
        self.named_lookups
            .entry(Arc::clone(name))
            .or_insert_with(|| Arc::clone(table));
        self.lookups.insert((program, node), Arc::clone(table));
    }

    /// Drop every per-node entry of `program`.
    pub fn forget_program(&mut self, program: ProgramId) {
        self.scratch.retain(|(p, _), _| *p != program);
        self.ordinals.retain(|(p, _), _| *p != program);
        self.regexes.retain(|(p, _), _| *p != program);
        self.sequences.retain(|(p, _), _| *p != program);
        self.lookups.retain(|(p, _), _| *p != program);
    }

    /// Number of per-node entries held for `program`.
    #[cfg(test)]
    pub fn entries_for(&self, program: ProgramId) -> usize {
        let count = |keys: &mut dyn Iterator<Item = &NodeKey>| keys.filter(|(p, _)| *p == program).count();
        count(&mut self.scratch.keys())
            + count(&mut self.ordinals.keys())
            + count(&mut self.regexes.keys())
            + count(&mut self.sequences.keys())
            + count(&mut self.lookups.keys())
    }
}
