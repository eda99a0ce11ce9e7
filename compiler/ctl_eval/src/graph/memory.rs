//! In-memory graph resources.
//!
//! Enough of a graph to run programs without an engine around them:
//! hosts use these for embedded evaluation, tests use them to observe what
//! a program did (sequence values drawn, lookup table lifecycle, dictionary
//! contents, logged messages, native calls made).

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use ctl_types::{LogLevel, Name, RecordSchema};
use ctl_value::{DataRecord, Value};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::errors::HostError;
use crate::graph::{Dictionary, GraphContext, LookupTable, Sequence};
use crate::logger::{ScriptLogger, SharedLogger};
use crate::native::{CallContext, NativeFunction};

/// A graph assembled from in-memory resources.
#[derive(Default)]
pub struct MemoryGraph {
    sequences: FxHashMap<Name, Arc<dyn Sequence>>,
    lookups: FxHashMap<Name, Arc<dyn LookupTable>>,
    dictionary: Option<Arc<dyn Dictionary>>,
    logger: Option<SharedLogger>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_sequence(mut self, name: &str, sequence: Arc<dyn Sequence>) -> Self {
        self.sequences.insert(Name::from(name), sequence);
        self
    }

    #[must_use]
    pub fn with_lookup(mut self, name: &str, table: Arc<dyn LookupTable>) -> Self {
        self.lookups.insert(Name::from(name), table);
        self
    }

    #[must_use]
    pub fn with_dictionary(mut self, dictionary: Arc<dyn Dictionary>) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    #[must_use]
    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = Some(logger);
        self
    }
}

impl GraphContext for MemoryGraph {
    fn sequence(&self, name: &str) -> Option<Arc<dyn Sequence>> {
        self.sequences.get(name).cloned()
    }

    fn lookup_table(&self, name: &str) -> Option<Arc<dyn LookupTable>> {
        self.lookups.get(name).cloned()
    }

    fn dictionary(&self) -> Option<Arc<dyn Dictionary>> {
        self.dictionary.clone()
    }

    fn logger(&self) -> Option<SharedLogger> {
        self.logger.clone()
    }
}

#[derive(Debug)]
struct SequenceState {
    next: i64,
    current: i64,
}

/// Arithmetic sequence `start, start + step, ...`.
#[derive(Debug)]
pub struct MemorySequence {
    start: i64,
    step: i64,
    state: Mutex<SequenceState>,
    init_calls: AtomicUsize,
}

impl MemorySequence {
    pub fn new(start: i64, step: i64) -> Self {
        MemorySequence {
            start,
            step,
            state: Mutex::new(SequenceState {
                next: start,
                current: start,
            }),
            init_calls: AtomicUsize::new(0),
        }
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::Relaxed)
    }
}

impl Sequence for MemorySequence {
    fn init(&self) -> Result<(), HostError> {
        self.init_calls.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn next_value(&self) -> Result<i64, HostError> {
        let mut state = self.state.lock();
        let value = state.next;
        state.next = value
            .checked_add(self.step)
            .ok_or_else(|| HostError::new("sequence exhausted"))?;
        state.current = value;
        Ok(value)
    }

    fn current_value(&self) -> Result<i64, HostError> {
        Ok(self.state.lock().current)
    }

    fn reset(&self) -> Result<(), HostError> {
        let mut state = self.state.lock();
        state.next = self.start;
        state.current = self.start;
        Ok(())
    }
}

/// A lookup table over a fixed set of records, keyed by field ordinals.
pub struct MemoryLookup {
    schema: Arc<RecordSchema>,
    key_fields: Vec<usize>,
    rows: Vec<DataRecord>,
    initialized: AtomicBool,
    init_calls: AtomicUsize,
    free_calls: AtomicUsize,
}

impl MemoryLookup {
    pub fn new(schema: Arc<RecordSchema>, key_fields: Vec<usize>, rows: Vec<DataRecord>) -> Self {
        MemoryLookup {
            schema,
            key_fields,
            rows,
            initialized: AtomicBool::new(false),
            init_calls: AtomicUsize::new(0),
            free_calls: AtomicUsize::new(0),
        }
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::Relaxed)
    }

    pub fn free_calls(&self) -> usize {
        self.free_calls.load(Ordering::Relaxed)
    }
}

impl LookupTable for MemoryLookup {
    fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    fn init(&self) -> Result<(), HostError> {
        self.init_calls.fetch_add(1, Ordering::Relaxed);
        self.initialized.store(true, Ordering::Release);
        Ok(())
    }

    fn free(&self) {
        self.free_calls.fetch_add(1, Ordering::Relaxed);
        self.initialized.store(false, Ordering::Release);
    }

    fn schema(&self) -> Arc<RecordSchema> {
        Arc::clone(&self.schema)
    }

    fn find(&self, keys: &[Value]) -> Result<Vec<DataRecord>, HostError> {
        if !self.is_initialized() {
            return Err(HostError::new("lookup table is not initialized"));
        }
        if keys.len() != self.key_fields.len() {
            return Err(HostError::new(format!(
                "expected {} key values, got {}",
                self.key_fields.len(),
                keys.len()
            )));
        }
        Ok(self
            .rows
            .iter()
            .filter(|row| {
                self.key_fields.iter().zip(keys).all(|(ordinal, key)| {
                    row.field(*ordinal)
                        .is_some_and(|field| field.equals(key).unwrap_or(false))
                })
            })
            .cloned()
            .collect())
    }
}

/// Dictionary backed by a hash map.
#[derive(Default)]
pub struct MemoryDictionary {
    entries: Mutex<FxHashMap<String, Option<String>>>,
}

impl MemoryDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` has an entry, null entries included.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }
}

impl Dictionary for MemoryDictionary {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned().flatten()
    }

    fn put(&self, key: &str, value: Option<&str>) -> Result<(), HostError> {
        self.entries
            .lock()
            .insert(key.to_owned(), value.map(str::to_owned));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), HostError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Logger that records every message.
#[derive(Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.entries.lock().clone()
    }
}

impl ScriptLogger for MemoryLogger {
    fn log(&self, level: LogLevel, message: &str) {
        self.entries.lock().push((level, message.to_owned()));
    }
}

/// Native function that counts its invocations and returns a fixed value.
pub struct CountingFunction {
    calls: AtomicUsize,
    result: Value,
}

impl CountingFunction {
    pub fn new(result: Value) -> Self {
        CountingFunction {
            calls: AtomicUsize::new(0),
            result,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl NativeFunction for CountingFunction {
    fn call(&self, _args: &[Value], _ctx: &CallContext<'_>) -> Result<Value, HostError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.result.clone())
    }
}

#[cfg(test)]
mod tests;
