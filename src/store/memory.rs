//! In-memory pin store
//!
//! Clones share the same records, so a caller can hand one clone to a
//! tracker and keep another to look at what was saved.

use crate::error::Result;
use crate::store::{PinRecord, PinStore};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    records: Vec<PinRecord>,
    saves: usize,
}

/// Pin store that keeps everything in process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with pre-existing records
    pub fn with_records(records: Vec<PinRecord>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner { records, saves: 0 })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of the stored records
    pub fn records(&self) -> Vec<PinRecord> {
        self.lock().records.clone()
    }

    /// How many times `save` has been called
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }
}

impl PinStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn load(&self) -> Result<Vec<PinRecord>> {
        Ok(self.records())
    }

    fn save(&mut self, records: &[PinRecord]) -> Result<()> {
        let mut inner = self.lock();
        inner.records = records.to_vec();
        inner.saves += 1;
        Ok(())
    }
}
