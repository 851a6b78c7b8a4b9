use std::sync::Arc;

use anyhow::Result;

use crate::flags::LoadingFlag;
use crate::loaders::{Loader, LoaderKind, Loaders};

/// Loader whose readiness is driven by the test through a shared flag.
pub struct FlagLoader {
    kind: LoaderKind,
    flag: Arc<LoadingFlag>,
}

impl FlagLoader {
    pub fn new(kind: LoaderKind, flag: Arc<LoadingFlag>) -> Self {
        Self { kind, flag }
    }

    pub fn busy(kind: LoaderKind) -> Self {
        Self::new(kind, Arc::new(LoadingFlag::new()))
    }

    pub fn ready(kind: LoaderKind) -> Self {
        let loader = Self::busy(kind);
        loader.flag.finish();
        loader
    }
}

impl Loader for FlagLoader {
    fn kind(&self) -> LoaderKind {
        self.kind
    }

    fn is_loading(&self) -> bool {
        self.flag.is_loading()
    }

    fn load(&self) -> Result<()> {
        self.flag.finish();
        Ok(())
    }

    fn finish_empty(&self) {
        self.flag.finish();
    }

    fn reset(&self) {
        self.flag.restart();
    }
}

/// Four busy loaders plus the flags that finish them.
pub fn flag_loaders() -> (Loaders, Vec<Arc<LoadingFlag>>) {
    let flags: Vec<_> = (0..4).map(|_| Arc::new(LoadingFlag::new())).collect();

    let loaders = Loaders {
        equipment: Arc::new(FlagLoader::new(LoaderKind::Equipment, flags[0].clone())),
        chara: Arc::new(FlagLoader::new(LoaderKind::Chara, flags[1].clone())),
        clan_battle: Arc::new(FlagLoader::new(LoaderKind::ClanBattle, flags[2].clone())),
        quest: Arc::new(FlagLoader::new(LoaderKind::Quest, flags[3].clone())),
    };

    (loaders, flags)
}
