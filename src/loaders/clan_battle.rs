use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use log::*;

use crate::abstractions::Storage;
use crate::clan_battle_boss::{BossBasic, ClanBattleBoss, assemble_basic};
use crate::constants::CLAN_BATTLE_TIME_FORMAT;
use crate::models::{ClanBattlePeriod, RawClanBattleBoss, RawClanBattlePeriod};

use super::{Loader, LoaderKind, LoaderState};

pub struct ClanBattleLoader<ST: Storage> {
    storage: Arc<ST>,
    state: LoaderState<Vec<ClanBattlePeriod>>,
}

fn parse_time(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, CLAN_BATTLE_TIME_FORMAT)
        .with_context(|| format!("invalid clan battle time '{}'", value))
}

impl<ST: Storage> ClanBattleLoader<ST> {
    pub fn new(storage: Arc<ST>) -> Self {
        Self {
            storage,
            state: LoaderState::new(LoaderKind::ClanBattle),
        }
    }

    pub fn periods(&self) -> Arc<Vec<ClanBattlePeriod>> {
        self.state.get()
    }

    fn assemble_boss(&self, raw: &RawClanBattleBoss) -> Result<ClanBattleBoss> {
        let basic = BossBasic {
            unit_id: raw.unit_id,
            name: raw.name.clone(),
            level: raw.level,
            prefab_id: raw.prefab_id,
            resist_status_id: raw.resist_status_id,
            property: raw.property,
        };

        let mut boss = assemble_basic(&*self.storage, raw.enemy_id, basic)?;

        for skill in self.storage.get_enemy_skills(raw.enemy_id)? {
            boss.add_skill(skill);
        }

        Ok(boss)
    }

    fn assemble_period(&self, raw: &RawClanBattlePeriod) -> Result<ClanBattlePeriod> {
        let rows = self.storage.get_clan_battle_bosses(raw.clan_battle_id)?;
        let mut roots: Vec<(i32, ClanBattleBoss)> = Vec::new();

        for row in &rows {
            let boss = self.assemble_boss(row)?;

            // phase 2+ hangs under the phase 1 boss of the same slot
            match roots.iter_mut().find(|(order_num, _)| *order_num == row.order_num) {
                Some((_, root)) if row.phase > 1 => root.add_child(boss),
                _ => {
                    if row.phase > 1 {
                        warn!("boss {} has phase {} without a phase 1 root", row.enemy_id, row.phase);
                    }
                    roots.push((row.order_num, boss));
                }
            }
        }

        Ok(ClanBattlePeriod {
            clan_battle_id: raw.clan_battle_id,
            start_time: parse_time(&raw.start_time)?,
            end_time: parse_time(&raw.end_time)?,
            bosses: roots.into_iter().map(|(_, boss)| boss).collect(),
        })
    }
}

impl<ST: Storage> Loader for ClanBattleLoader<ST> {
    fn kind(&self) -> LoaderKind {
        LoaderKind::ClanBattle
    }

    fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    fn load(&self) -> Result<()> {
        let periods = self.storage
            .get_clan_battle_periods()
            .and_then(|raws| raws.iter().map(|raw| self.assemble_period(raw)).collect::<Result<Vec<_>>>())
            .inspect_err(|err| error!("failed to load clan battles: {:?}", err))?;

        let count = periods.len();

        if self.state.publish(periods) {
            info!("loaded {} clan battle periods", count);
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
