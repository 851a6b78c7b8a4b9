use hashbrown::HashSet;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Bookkeeping kept behind the database lock.
#[derive(Debug, Default)]
pub struct SwapLedger {
    applied_versions: HashSet<i64>,
    generation: u64,
}

impl SwapLedger {
    pub fn is_applied(&self, version: i64) -> bool {
        self.applied_versions.contains(&version)
    }

    /// Records a finished swap. Readers holding a pool from an older
    /// generation must reopen the file.
    pub fn mark_applied(&mut self, version: i64) {
        self.applied_versions.insert(version);
        self.generation += 1;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Guards the active database file. Storage reads take the read side, the
/// swap step takes the write side.
#[derive(Debug, Default)]
pub struct DatabaseLock {
    ledger: RwLock<SwapLedger>,
}

impl DatabaseLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, SwapLedger> {
        self.ledger.write().await
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, SwapLedger> {
        self.ledger.read().await
    }

    /// For synchronous readers. Must not be called from an async context.
    pub fn blocking_read(&self) -> RwLockReadGuard<'_, SwapLedger> {
        self.ledger.blocking_read()
    }
}
