//! Unspent-output ledger snapshot
//!
//! A passive store mapping [`UtxoId`] to its [`Output`]. No validation
//! lives here; the validator and chain manager decide what goes in and
//! out. `Clone` produces an independent snapshot: mutating the copy never
//! shows through the source.

use crate::types::{Output, UtxoId};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct LedgerSnapshot {
    entries: HashMap<UtxoId, Output>,
}

impl LedgerSnapshot {
    pub fn new() -> Self {
        LedgerSnapshot {
            entries: HashMap::new(),
        }
    }

    pub fn contains(&self, id: &UtxoId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &UtxoId) -> Option<&Output> {
        self.entries.get(id)
    }

    /// Record `output` as unspent under `id`, replacing any previous entry.
    pub fn put(&mut self, id: UtxoId, output: Output) {
        self.entries.insert(id, output);
    }

    /// Remove the entry for `id`, returning it if present.
    pub fn remove(&mut self, id: &UtxoId) -> Option<Output> {
        self.entries.remove(id)
    }

    /// All entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&UtxoId, &Output)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
