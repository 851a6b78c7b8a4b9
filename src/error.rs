use std::time::Duration;

use thiserror::Error;

/// Read of a boss field before `set_basic` completed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BossError {
    #[error("boss {enemy_id}: '{field}' read before set_basic")]
    Uninitialized { enemy_id: i32, field: &'static str },
}

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("storage lookup failed: {0}")]
    Storage(#[source] anyhow::Error),

    #[error("boss {enemy_id} is already initialized")]
    AlreadyInitialized { enemy_id: i32 },

    #[error("boss {enemy_id}: prefab id {prefab_id} is not a valid icon id")]
    InvalidPrefabId { enemy_id: i32, prefab_id: i32 },
}

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("loaders not ready after {attempts} attempts ({waited:?})")]
    BarrierTimeout { attempts: u32, waited: Duration },

    #[error("database swap failed: {0}")]
    SwapFailure(#[source] anyhow::Error),
}
