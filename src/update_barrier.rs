use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use log::*;
use tokio::runtime::Handle;
use tokio::task::{self, JoinHandle};
use tokio::time::{Instant, sleep};

use crate::abstractions::UpdateCoordinator;
use crate::constants::{MAX_POLL_ATTEMPTS, POLL_INTERVAL};
use crate::database_lock::DatabaseLock;
use crate::error::UpdateError;
use crate::loaders::Loaders;
use crate::models::UpdatePackage;
use crate::settings::UpdateSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarrierOptions {
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

impl Default for BarrierOptions {
    fn default() -> Self {
        Self {
            poll_interval: POLL_INTERVAL,
            max_attempts: MAX_POLL_ATTEMPTS,
        }
    }
}

impl From<&UpdateSettings> for BarrierOptions {
    fn from(settings: &UpdateSettings) -> Self {
        Self {
            poll_interval: settings.poll_interval(),
            max_attempts: settings.max_attempts.max(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierState {
    Awaiting,
    AllReady,
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    Swapped,
    /// Another run already installed this package.
    AlreadyApplied,
}

/// Waits for every loader to finish before letting the coordinator replace
/// the database file.
pub struct UpdateBarrier<UC: UpdateCoordinator> {
    loaders: Loaders,
    coordinator: Arc<UC>,
    database_lock: Arc<DatabaseLock>,
    options: BarrierOptions,
}

impl<UC: UpdateCoordinator> UpdateBarrier<UC> {
    pub fn new(
        loaders: Loaders,
        coordinator: Arc<UC>,
        database_lock: Arc<DatabaseLock>,
        options: BarrierOptions) -> Self {
        Self {
            loaders,
            coordinator,
            database_lock,
            options,
        }
    }

    /// Runs the barrier on its own task so the caller is never blocked.
    pub fn spawn(self: &Arc<Self>, runtime: &Handle, package: UpdatePackage) -> JoinHandle<Result<SwapOutcome, UpdateError>> {
        let barrier = self.clone();
        runtime.spawn(async move { barrier.run(package).await })
    }

    pub fn tick(&self, attempt: u32) -> BarrierState {
        if self.loaders.all_ready() {
            BarrierState::AllReady
        } else if attempt >= self.options.max_attempts {
            BarrierState::TimedOut
        } else {
            BarrierState::Awaiting
        }
    }

    pub async fn run(&self, package: UpdatePackage) -> Result<SwapOutcome, UpdateError> {
        let started = Instant::now();
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.tick(attempt) {
                BarrierState::AllReady => {
                    debug!("loaders ready after {} attempts", attempt);
                    return self.swap(package).await;
                }
                BarrierState::Awaiting => sleep(self.options.poll_interval).await,
                BarrierState::TimedOut => {
                    sleep(self.options.poll_interval).await;
                    break;
                }
            }
        }

        let waited = started.elapsed();
        warn!("time out after {:?}, still loading: {:?}", waited, self.loaders.pending());
        self.coordinator.on_timeout(&package);

        Err(UpdateError::BarrierTimeout { attempts: attempt, waited })
    }

    async fn swap(&self, package: UpdatePackage) -> Result<SwapOutcome, UpdateError> {
        let mut ledger = self.database_lock.write().await;

        if ledger.is_applied(package.version) {
            info!("package {} already applied", package.version);
            return Ok(SwapOutcome::AlreadyApplied);
        }

        let coordinator = self.coordinator.clone();
        let swapped = package.clone();
        let result = task::spawn_blocking(move || coordinator.on_ready_for_swap(&swapped))
            .await
            .unwrap_or_else(|err| Err(anyhow!("swap task stopped: {}", err)));

        match result {
            Ok(()) => {
                ledger.mark_applied(package.version);
                info!("package {} applied", package.version);
                Ok(SwapOutcome::Swapped)
            }
            Err(err) => {
                self.coordinator.on_swap_failed(&package, &err);
                Err(UpdateError::SwapFailure(err))
            }
        }
    }
}
