use anyhow::Result;
use flexi_logger::{Duplicate, FileSpec, Logger, LoggerHandle, detailed_format};

use crate::settings::LogSettings;

/// Starts the global logger. `RUST_LOG` overrides the configured spec.
pub fn init(settings: &LogSettings) -> Result<LoggerHandle> {
    let logger = Logger::try_with_env_or_str(&settings.spec)?
        .format(detailed_format);

    let logger = match &settings.directory {
        Some(directory) => logger
            .log_to_file(FileSpec::default().directory(directory))
            .duplicate_to_stderr(Duplicate::Warn),
        None => logger.log_to_stderr(),
    };

    Ok(logger.start()?)
}
