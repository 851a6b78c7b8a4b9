use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use log::*;

use crate::models::UpdatePackage;

use super::FileSystem;

#[cfg(test)]
use mockall::automock;

/// Receives the outcome of an update cycle and performs its I/O.
#[cfg_attr(test, automock)]
pub trait UpdateCoordinator: Send + Sync + 'static {
    /// Called with the database lock held, once every loader is ready.
    fn on_ready_for_swap(&self, package: &UpdatePackage) -> Result<()>;
    fn on_timeout(&self, package: &UpdatePackage);
    fn on_swap_failed(&self, package: &UpdatePackage, error: &anyhow::Error);
    fn on_check_version(&self, force: bool);
}

pub struct DefaultUpdateCoordinator<FS: FileSystem> {
    file_system: Arc<FS>,
    database_path: PathBuf,
}

impl<FS: FileSystem> DefaultUpdateCoordinator<FS> {
    pub fn new(file_system: Arc<FS>, database_path: PathBuf) -> Self {
        Self {
            file_system,
            database_path,
        }
    }

    fn staging_path(&self) -> PathBuf {
        self.database_path.with_extension("db.tmp")
    }

    fn decompress(&self, package: &UpdatePackage, staging_path: &Path) -> Result<u64> {
        let reader = self.file_system.get_reader(&package.path)?;
        let mut decoder = GzDecoder::new(reader);
        let mut writer = self.file_system.get_writer(staging_path)?;

        let written = io::copy(&mut decoder, &mut writer)
            .with_context(|| format!("Could not decompress {:?}", package.path))?;
        writer.flush()?;

        Ok(written)
    }
}

impl<FS: FileSystem> UpdateCoordinator for DefaultUpdateCoordinator<FS> {
    fn on_ready_for_swap(&self, package: &UpdatePackage) -> Result<()> {
        let staging_path = self.staging_path();

        let written = match self.decompress(package, &staging_path) {
            Ok(written) => written,
            Err(err) => {
                if self.file_system.exists(&staging_path) {
                    let _ = self.file_system.remove(&staging_path);
                }
                return Err(err);
            }
        };

        self.file_system.replace(&staging_path, &self.database_path)?;
        info!("database {} installed ({} bytes)", package.version, written);

        if let Err(err) = self.file_system.remove(&package.path) {
            warn!("could not remove package {:?}: {}", package.path, err);
        }

        Ok(())
    }

    fn on_timeout(&self, package: &UpdatePackage) {
        error!("update {} failed: loaders did not finish in time", package.version);
    }

    fn on_swap_failed(&self, package: &UpdatePackage, error: &anyhow::Error) {
        error!("update {} failed: {:?}", package.version, error);
    }

    fn on_check_version(&self, force: bool) {
        info!("version check requested (force: {})", force);
    }
}
