//! Interfaces to the surrounding transformation graph.
//!
//! The executor resolves sequences, lookup tables and the graph dictionary
//! by name through a [`GraphContext`]. Handles are shared (`Arc`) and use
//! interior mutability, because one graph serves many executors.

pub mod memory;

use std::sync::Arc;

use ctl_types::RecordSchema;
use ctl_value::{DataRecord, Value};

use crate::errors::HostError;
use crate::logger::SharedLogger;

/// A named numeric sequence.
pub trait Sequence: Send + Sync {
    /// Called once, before the first operation from an executor.
    fn init(&self) -> Result<(), HostError> {
        Ok(())
    }

    fn next_value(&self) -> Result<i64, HostError>;

    /// The value last returned by [`next_value`](Sequence::next_value).
    fn current_value(&self) -> Result<i64, HostError>;

    fn reset(&self) -> Result<(), HostError>;
}

/// A keyed lookup table.
pub trait LookupTable: Send + Sync {
    fn is_initialized(&self) -> bool;

    fn init(&self) -> Result<(), HostError>;

    fn free(&self);

    /// Layout of the records [`find`](LookupTable::find) returns.
    fn schema(&self) -> Arc<RecordSchema>;

    /// Every record whose key fields equal `keys`, in table order.
    fn find(&self, keys: &[Value]) -> Result<Vec<DataRecord>, HostError>;
}

/// The graph-wide string dictionary.
pub trait Dictionary: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`; `None` stores a null entry.
    fn put(&self, key: &str, value: Option<&str>) -> Result<(), HostError>;

    fn remove(&self, key: &str) -> Result<(), HostError>;
}

/// Named resources visible to a running program.
pub trait GraphContext: Send + Sync {
    fn sequence(&self, name: &str) -> Option<Arc<dyn Sequence>>;

    fn lookup_table(&self, name: &str) -> Option<Arc<dyn LookupTable>>;

    fn dictionary(&self) -> Option<Arc<dyn Dictionary>> {
        None
    }

    /// Logger for `print_log`; the executor falls back to its own.
    fn logger(&self) -> Option<SharedLogger> {
        None
    }
}

/// A graph with no resources.
#[derive(Copy, Clone, Debug, Default)]
pub struct EmptyGraph;

impl GraphContext for EmptyGraph {
    fn sequence(&self, _name: &str) -> Option<Arc<dyn Sequence>> {
        None
    }

    fn lookup_table(&self, _name: &str) -> Option<Arc<dyn LookupTable>> {
        None
    }
}
