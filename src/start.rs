use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use flexi_logger::LoggerHandle;
use log::info;
use tokio::runtime::Handle;

use crate::abstractions::*;
use crate::background_worker::BackgroundWorker;
use crate::constants::SETTINGS_FILE_NAME;
use crate::database_lock::DatabaseLock;
use crate::loaders::*;
use crate::logger;
use crate::update_barrier::{BarrierOptions, UpdateBarrier};

pub type DefaultCoordinator = DefaultUpdateCoordinator<DefaultFileSystem>;
pub type DefaultBackgroundWorker = BackgroundWorker<DefaultCoordinator, DefaultFileSystem>;

pub struct StartOptions {
    /// Holds settings, the active database and downloaded packages.
    /// Defaults to the executable's directory.
    pub data_directory: Option<PathBuf>,
    pub runtime: Handle,
}

pub struct Application {
    pub worker: DefaultBackgroundWorker,
    pub equipment: Arc<EquipmentLoader<SqliteStorage>>,
    pub chara: Arc<CharaLoader<SqliteStorage>>,
    pub clan_battle: Arc<ClanBattleLoader<SqliteStorage>>,
    pub quest: Arc<QuestLoader<SqliteStorage>>,
    _logger: LoggerHandle,
}

/// Wires the default stack together and kicks off the first load.
pub fn start(options: StartOptions) -> Result<Application> {
    let file_system = Arc::new(DefaultFileSystem::new());
    let data_directory = match options.data_directory {
        Some(directory) => directory,
        None => file_system.get_executable_directory()?,
    };

    let mut settings_manager = DefaultSettingsManager::new(
        file_system.clone(),
        data_directory.join(SETTINGS_FILE_NAME));
    let settings = settings_manager.get_or_create()?;

    let logger = logger::init(&settings.log)?;

    let database_path = data_directory.join(&settings.database.file_name);
    let database_lock = Arc::new(DatabaseLock::new());
    let storage = Arc::new(SqliteStorage::new(
        database_path.clone(),
        settings.database.pool_size,
        database_lock.clone()));

    let equipment = Arc::new(EquipmentLoader::new(storage.clone()));
    let chara = Arc::new(CharaLoader::new(storage.clone()));
    let clan_battle = Arc::new(ClanBattleLoader::new(storage.clone()));
    let quest = Arc::new(QuestLoader::new(storage));

    let loaders = Loaders {
        equipment: equipment.clone(),
        chara: chara.clone(),
        clan_battle: clan_battle.clone(),
        quest: quest.clone(),
    };

    let coordinator = Arc::new(DefaultUpdateCoordinator::new(file_system.clone(), database_path.clone()));
    let barrier = Arc::new(UpdateBarrier::new(
        loaders.clone(),
        coordinator.clone(),
        database_lock,
        BarrierOptions::from(&settings.update)));

    let worker = BackgroundWorker::new(
        loaders,
        coordinator,
        barrier,
        file_system,
        database_path,
        settings.database.min_size_kb,
        options.runtime);

    info!("starting with database {:?}", data_directory.join(&settings.database.file_name));
    worker.start();

    Ok(Application {
        worker,
        equipment,
        chara,
        clan_battle,
        quest,
        _logger: logger,
    })
}
