use std::sync::Arc;

use anyhow::Result;
use log::*;

use crate::abstractions::Storage;
use crate::models::Quest;

use super::{Loader, LoaderKind, LoaderState};

pub struct QuestLoader<ST: Storage> {
    storage: Arc<ST>,
    state: LoaderState<Vec<Quest>>,
}

impl<ST: Storage> QuestLoader<ST> {
    pub fn new(storage: Arc<ST>) -> Self {
        Self {
            storage,
            state: LoaderState::new(LoaderKind::Quest),
        }
    }

    pub fn quests(&self) -> Arc<Vec<Quest>> {
        self.state.get()
    }
}

impl<ST: Storage> Loader for QuestLoader<ST> {
    fn kind(&self) -> LoaderKind {
        LoaderKind::Quest
    }

    fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    fn load(&self) -> Result<()> {
        let mut quests = self.storage
            .get_quests()
            .inspect_err(|err| error!("failed to load quests: {:?}", err))?;

        // newest areas first
        quests.sort_by(|a, b| b.quest_id.cmp(&a.quest_id));
        let count = quests.len();

        if self.state.publish(quests) {
            info!("loaded {} quests", count);
        }

        Ok(())
    }

    fn finish_empty(&self) {
        self.state.finish_empty();
    }

    fn reset(&self) {
        self.state.reset();
    }
}
