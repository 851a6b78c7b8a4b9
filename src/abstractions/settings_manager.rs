use std::{io::Write, path::PathBuf, sync::Arc};
use anyhow::*;
use log::debug;

#[cfg(test)]
use mockall::automock;

use crate::settings::Settings;

use super::FileSystem;

#[cfg_attr(test, automock)]
pub trait SettingsManager {
    fn get_or_create(&mut self) -> Result<Settings>;
    fn write(&mut self, settings: &Settings) -> Result<()>;
}

pub struct DefaultSettingsManager<FS: FileSystem> {
    file_system: Arc<FS>,
    path: PathBuf
}

impl<FS: FileSystem> SettingsManager for DefaultSettingsManager<FS> {
    fn get_or_create(&mut self) -> Result<Settings> {

        if self.file_system.exists(&self.path) {
            let file = self.file_system.get_reader(&self.path)?;
            let settings = serde_json::from_reader(file)?;
            return Ok(settings);
        }

        debug!("creating default settings at {:?}", self.path);
        let settings = Settings::default();
        self.write(&settings)?;

        Ok(settings)
    }

    fn write(&mut self, settings: &Settings) -> Result<()> {
        let mut file = self.file_system.get_writer(&self.path)?;
        let json_str = serde_json::to_string_pretty(&settings)?;
        let bytes = json_str.as_bytes();

        file.write_all(bytes)?;

        Ok(())
    }
}

impl<FS: FileSystem> DefaultSettingsManager<FS> {
    pub fn new(file_system: Arc<FS>, path: PathBuf) -> Self {
        Self { file_system, path }
    }
}
