use std::sync::Arc;

use anyhow::Result;
use log::*;

use crate::abstractions::Storage;
use crate::models::{Chara, RawChara};

use super::{Loader, LoaderKind, LoaderState};

pub struct CharaLoader<ST: Storage> {
    storage: Arc<ST>,
    state: LoaderState<Vec<Chara>>,
}

impl<ST: Storage> CharaLoader<ST> {
    pub fn new(storage: Arc<ST>) -> Self {
        Self {
            storage,
            state: LoaderState::new(LoaderKind::Chara),
        }
    }

    pub fn charas(&self) -> Arc<Vec<Chara>> {
        self.state.get()
    }

    fn assemble(&self, raw: &RawChara) -> Result<Chara> {
        let mut chara = raw.chara();

        if let Some(unique_equipment) = self.storage.get_unique_equipment(raw.unit_id)? {
            let enhance_property = self.storage
                .get_unique_equipment_enhance(raw.unit_id)?
                .unwrap_or_default();
            unique_equipment.set_chara_unique_equipment(&mut chara, enhance_property);
        }

        Ok(chara)
    }
}

impl<ST: Storage> Loader for CharaLoader<ST> {
    fn kind(&self) -> LoaderKind {
        LoaderKind::Chara
    }

    fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    fn load(&self) -> Result<()> {
        let charas = self.storage
            .get_charas()
            .and_then(|raws| raws.iter().map(|raw| self.assemble(raw)).collect::<Result<Vec<_>>>())
            .inspect_err(|err| error!("failed to load charas: {:?}", err))?;

        let count = charas.len();

        if self.state.publish(charas) {
            info!("loaded {} charas", count);
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

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::anyhow;
    use mockall::predicate::eq;

    use crate::abstractions::MockStorage;
    use crate::loaders::Loader;
    use crate::models::Property;
    use crate::test_utils::*;

    use super::CharaLoader;

    #[test]
    fn should_attach_unique_equipment() {
        let mut storage = MockStorage::new();
        storage
            .expect_get_charas()
            .returning(|| Ok(vec![raw_chara(CHARA_UNIT_ID), raw_chara(100201)]));
        storage
            .expect_get_unique_equipment()
            .with(eq(CHARA_UNIT_ID))
            .returning(|_| Ok(Some(raw_unique_equipment(130011))));
        storage
            .expect_get_unique_equipment()
            .with(eq(100201))
            .returning(|_| Ok(None));
        storage
            .expect_get_unique_equipment_enhance()
            .with(eq(CHARA_UNIT_ID))
            .times(1)
            .returning(|_| Ok(Some(Property::default())));

        let loader = CharaLoader::new(Arc::new(storage));
        loader.load().unwrap();

        let charas = loader.charas();
        assert_eq!(charas.len(), 2);
        assert_eq!(charas[0].unique_equipment.as_ref().unwrap().equipment_id, 130011);
        assert!(charas[1].unique_equipment.is_none());
        assert!(!loader.is_loading());
    }

    #[test]
    fn should_not_publish_partial_charas() {
        let mut storage = MockStorage::new();
        storage
            .expect_get_charas()
            .returning(|| Ok(vec![raw_chara(CHARA_UNIT_ID), raw_chara(100201)]));
        storage
            .expect_get_unique_equipment()
            .with(eq(CHARA_UNIT_ID))
            .returning(|_| Ok(None));
        storage
            .expect_get_unique_equipment()
            .with(eq(100201))
            .returning(|_| Err(anyhow!("database is locked")));

        let loader = CharaLoader::new(Arc::new(storage));

        assert!(loader.load().is_err());
        assert!(loader.is_loading());
        assert!(loader.charas().is_empty());
    }
}
