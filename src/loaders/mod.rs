mod chara;
mod clan_battle;
mod equipment;
mod quest;

pub use chara::CharaLoader;
pub use clan_battle::ClanBattleLoader;
pub use equipment::EquipmentLoader;
pub use quest::QuestLoader;

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use anyhow::Result;
use log::warn;

use crate::flags::LoadingFlag;

#[cfg(test)]
use mockall::automock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoaderKind {
    Equipment,
    Chara,
    ClanBattle,
    Quest,
}

impl fmt::Display for LoaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoaderKind::Equipment => "equipment",
            LoaderKind::Chara => "chara",
            LoaderKind::ClanBattle => "clan battle",
            LoaderKind::Quest => "quest",
        };

        f.write_str(name)
    }
}

/// A unit that loads one domain's entity set and reports when it is ready.
#[cfg_attr(test, automock)]
pub trait Loader: Send + Sync + 'static {
    fn kind(&self) -> LoaderKind;
    /// `true` until the entity set of the current cycle is published.
    fn is_loading(&self) -> bool;
    /// Fetches, assembles and publishes. On error nothing is published and
    /// the loader stays busy.
    ///
    /// Storage reads block, so this must run on a blocking thread
    /// (`spawn_blocking` or a plain thread), never on an async worker.
    fn load(&self) -> Result<()>;
    /// Publishes an empty set for a cycle with no database to read from.
    fn finish_empty(&self);
    /// Drops the published set and starts a new cycle.
    fn reset(&self);
}

/// Published entity set plus the flag announcing it.
pub struct LoaderState<T> {
    kind: LoaderKind,
    flag: LoadingFlag,
    data: RwLock<Arc<T>>,
}

impl<T: Default> LoaderState<T> {
    pub fn new(kind: LoaderKind) -> Self {
        Self {
            kind,
            flag: LoadingFlag::new(),
            data: RwLock::new(Arc::new(T::default())),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.flag.is_loading()
    }

    /// Stores `value` and then finishes the flag, both under the write lock.
    /// Returns `false` when this cycle was already published.
    pub fn publish(&self, value: T) -> bool {
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);

        if !self.flag.is_loading() {
            warn!("{} already published for this cycle", self.kind);
            return false;
        }

        *data = Arc::new(value);
        self.flag.finish()
    }

    pub fn finish_empty(&self) -> bool {
        self.publish(T::default())
    }

    pub fn get(&self) -> Arc<T> {
        self.data.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn reset(&self) {
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        *data = Arc::new(T::default());
        self.flag.restart();
    }
}

/// The four loaders an update has to wait for.
#[derive(Clone)]
pub struct Loaders {
    pub equipment: Arc<dyn Loader>,
    pub chara: Arc<dyn Loader>,
    pub clan_battle: Arc<dyn Loader>,
    pub quest: Arc<dyn Loader>,
}

impl Loaders {
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Loader>> {
        [&self.equipment, &self.chara, &self.clan_battle, &self.quest].into_iter()
    }

    pub fn all_ready(&self) -> bool {
        self.iter().all(|loader| !loader.is_loading())
    }

    pub fn pending(&self) -> Vec<LoaderKind> {
        self.iter()
            .filter(|loader| loader.is_loading())
            .map(|loader| loader.kind())
            .collect()
    }

    pub fn reset_all(&self) {
        for loader in self.iter() {
            loader.reset();
        }
    }

    pub fn finish_all_empty(&self) {
        for loader in self.iter() {
            loader.finish_empty();
        }
    }
}
