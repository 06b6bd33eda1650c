//! In-memory binding store for tests and local harnesses

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;
use rolebot_core::{Binding, BindingStore, StoreError, StoreResult};

/// Binding table kept in memory, with switchable write failures
#[derive(Debug, Default)]
pub struct MemoryBindingStore {
    table: Mutex<Option<Vec<Binding>>>,
    fail_writes: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryBindingStore {
    /// Empty table
    pub fn new() -> Self {
        Self::with_bindings(Vec::new())
    }

    /// Table pre-filled with `bindings`
    pub fn with_bindings(bindings: Vec<Binding>) -> Self {
        Self {
            table: Mutex::new(Some(bindings)),
            ..Self::default()
        }
    }

    /// No table at all; `load` fails with `Missing`
    pub fn missing() -> Self {
        Self::default()
    }

    /// Make subsequent saves fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Current stored table
    pub fn contents(&self) -> Option<Vec<Binding>> {
        self.table.lock().clone()
    }

    fn location() -> PathBuf {
        PathBuf::from(":memory:")
    }
}

impl BindingStore for MemoryBindingStore {
    fn load(&self) -> StoreResult<Vec<Binding>> {
        self.table.lock().clone().ok_or(StoreError::Missing {
            path: Self::location(),
        })
    }

    fn save(&self, bindings: &[Binding]) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io {
                path: Self::location(),
                source: std::io::Error::other("simulated write failure"),
            });
        }

        *self.table.lock() = Some(bindings.to_vec());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
