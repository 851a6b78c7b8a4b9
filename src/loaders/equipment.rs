use std::sync::Arc;

use anyhow::Result;
use hashbrown::HashMap;
use log::*;

use crate::abstractions::Storage;
use crate::models::Equipment;

use super::{Loader, LoaderKind, LoaderState};

pub struct EquipmentLoader<ST: Storage> {
    storage: Arc<ST>,
    state: LoaderState<HashMap<i32, Equipment>>,
}

impl<ST: Storage> EquipmentLoader<ST> {
    pub fn new(storage: Arc<ST>) -> Self {
        Self {
            storage,
            state: LoaderState::new(LoaderKind::Equipment),
        }
    }

    pub fn equipment_map(&self) -> Arc<HashMap<i32, Equipment>> {
        self.state.get()
    }
}

impl<ST: Storage> Loader for EquipmentLoader<ST> {
    fn kind(&self) -> LoaderKind {
        LoaderKind::Equipment
    }

    fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    fn load(&self) -> Result<()> {
        let equipment_map: HashMap<i32, Equipment> = self.storage
            .get_equipments()
            .inspect_err(|err| error!("failed to load equipment: {:?}", err))?
            .into_iter()
            .map(|equipment| (equipment.equipment_id, equipment))
            .collect();

        let count = equipment_map.len();

        if self.state.publish(equipment_map) {
            info!("loaded {} equipment", count);
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
