use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use log::*;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::abstractions::{FileSystem, UpdateCoordinator};
use crate::error::UpdateError;
use crate::loaders::{LoaderKind, Loaders};
use crate::models::UpdatePackage;
use crate::update_barrier::{SwapOutcome, UpdateBarrier};

pub struct BackgroundWorker<UC: UpdateCoordinator, FS: FileSystem> {
    loaders: Loaders,
    coordinator: Arc<UC>,
    barrier: Arc<UpdateBarrier<UC>>,
    file_system: Arc<FS>,
    database_path: PathBuf,
    min_database_size_kb: u64,
    runtime: Handle,
}

impl<UC: UpdateCoordinator, FS: FileSystem> BackgroundWorker<UC, FS> {
    pub fn new(
        loaders: Loaders,
        coordinator: Arc<UC>,
        barrier: Arc<UpdateBarrier<UC>>,
        file_system: Arc<FS>,
        database_path: PathBuf,
        min_database_size_kb: u64,
        runtime: Handle) -> Self {
        Self {
            loaders,
            coordinator,
            barrier,
            file_system,
            database_path,
            min_database_size_kb,
            runtime,
        }
    }

    /// Loads from the local database when it looks usable, otherwise asks for
    /// a fresh download.
    pub fn start(&self) -> Vec<JoinHandle<Result<()>>> {
        if self.check_database_file() {
            return self.load_data();
        }

        info!("no usable database at {:?}", self.database_path);
        // nothing to read until the first package is installed
        self.loaders.finish_all_empty();
        self.coordinator.on_check_version(true);
        Vec::new()
    }

    pub fn check_database_file(&self) -> bool {
        if !self.file_system.exists(&self.database_path) {
            return false;
        }

        match self.file_system.file_size(&self.database_path) {
            Ok(size) => size >= self.min_database_size_kb * 1024,
            Err(err) => {
                warn!("{}", err);
                false
            }
        }
    }

    /// Starts every loader on its own blocking worker. A version check follows
    /// once characters are loaded.
    pub fn load_data(&self) -> Vec<JoinHandle<Result<()>>> {
        spawn_loads(&self.runtime, &self.loaders, &self.coordinator)
    }

    /// Runs the barrier in the background. A successful swap is followed by a
    /// reload of every loader before the returned task completes.
    pub fn on_db_download_finished(&self, package: UpdatePackage) -> JoinHandle<Result<SwapOutcome, UpdateError>> {
        info!("package {} downloaded at {}", package.version, package.downloaded_on);

        let barrier = self.barrier.clone();
        let loaders = self.loaders.clone();
        let coordinator = self.coordinator.clone();
        let runtime = self.runtime.clone();

        self.runtime.spawn(async move {
            let outcome = barrier.run(package).await?;

            if outcome == SwapOutcome::Swapped {
                loaders.reset_all();

                for handle in spawn_loads(&runtime, &loaders, &coordinator) {
                    if let Err(err) = handle.await {
                        error!("reload task stopped: {}", err);
                    }
                }
            }

            Ok::<_, UpdateError>(outcome)
        })
    }

    /// Drops every published entity set and loads the new database.
    pub fn on_db_update_finished(&self) -> Vec<JoinHandle<Result<()>>> {
        self.loaders.reset_all();
        self.load_data()
    }
}

fn spawn_loads<UC: UpdateCoordinator>(
    runtime: &Handle,
    loaders: &Loaders,
    coordinator: &Arc<UC>) -> Vec<JoinHandle<Result<()>>> {
    loaders
        .iter()
        .map(|loader| {
            let loader = loader.clone();
            let coordinator = coordinator.clone();

            runtime.spawn_blocking(move || {
                let kind = loader.kind();

                if let Err(err) = loader.load() {
                    error!("{} loader failed: {:?}", kind, err);
                    return Err(err);
                }

                if kind == LoaderKind::Chara {
                    coordinator.on_check_version(true);
                }

                Ok(())
            })
        })
        .collect()
}
