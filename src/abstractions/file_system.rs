use std::{env, fs::{self, File}, io::{Read, Write}, path::{Path, PathBuf}};

use anyhow::{Context, Result, anyhow};

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
pub trait FileSystem: Send + Sync + 'static {
    fn exists(&self, path: &Path) -> bool;
    fn file_size(&self, path: &Path) -> Result<u64>;
    fn get_reader(&self, path: &Path) -> Result<Box<dyn Read + Send>>;
    fn get_writer(&self, path: &Path) -> Result<Box<dyn Write + Send>>;
    /// Moves `from` over `to`, replacing it.
    fn replace(&self, from: &Path, to: &Path) -> Result<()>;
    fn remove(&self, path: &Path) -> Result<()>;
    fn get_executable_directory(&self) -> Result<PathBuf>;
}

pub struct DefaultFileSystem;

impl FileSystem for DefaultFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn file_size(&self, path: &Path) -> Result<u64> {
        let metadata = fs::metadata(path)
            .with_context(|| format!("Could not read metadata of {:?}", path))?;

        Ok(metadata.len())
    }

    fn get_reader(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let file = File::open(path).map_err(|e| anyhow!("Could not open file: {}", e))?;
        Ok(Box::new(file))
    }

    fn get_writer(&self, path: &Path) -> Result<Box<dyn Write + Send>> {
        let file = File::create(path).map_err(|e| anyhow!("Could not create file: {}", e))?;
        Ok(Box::new(file))
    }

    fn replace(&self, from: &Path, to: &Path) -> Result<()> {
        fs::rename(from, to)
            .with_context(|| format!("Could not move {:?} to {:?}", from, to))
    }

    fn remove(&self, path: &Path) -> Result<()> {
        fs::remove_file(path)
            .with_context(|| format!("Could not remove {:?}", path))
    }

    fn get_executable_directory(&self) -> Result<PathBuf> {
        let executable_path = env::current_exe()?;

        let executable_directory = executable_path
            .parent()
            .ok_or_else(|| anyhow!("Executable has no parent directory"))?;

        Ok(executable_directory.to_path_buf())
    }
}

impl DefaultFileSystem {
    pub fn new() -> Self {
        Self
    }
}
