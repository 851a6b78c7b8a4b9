use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use hashbrown::HashMap;
use log::debug;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row, params};

use crate::constants::{ATTACK_PATTERN_SLOTS, RESIST_AILMENTS, STAT_COLUMNS};
use crate::database_lock::DatabaseLock;
use crate::models::*;

#[cfg(test)]
use mockall::automock;

/// Read access to the game database.
#[cfg_attr(test, automock)]
pub trait Storage: Send + Sync + 'static {
    fn get_unit_attack_pattern(&self, unit_id: i32) -> Result<Vec<AttackPatternRow>>;
    fn get_resist_data(&self, resist_status_id: i32) -> Result<HashMap<String, i32>>;
    fn get_equipments(&self) -> Result<Vec<Equipment>>;
    fn get_charas(&self) -> Result<Vec<RawChara>>;
    fn get_unique_equipment(&self, unit_id: i32) -> Result<Option<RawUniqueEquipmentData>>;
    fn get_unique_equipment_enhance(&self, unit_id: i32) -> Result<Option<Property>>;
    fn get_clan_battle_periods(&self) -> Result<Vec<RawClanBattlePeriod>>;
    fn get_clan_battle_bosses(&self, clan_battle_id: i32) -> Result<Vec<RawClanBattleBoss>>;
    fn get_enemy_skills(&self, enemy_id: i32) -> Result<Vec<Skill>>;
    fn get_quests(&self) -> Result<Vec<Quest>>;
}

/// Every read waits for a running database swap to finish, so calls block.
/// Run them on a blocking thread when inside a tokio runtime.
pub struct SqliteStorage {
    path: PathBuf,
    pool_size: u32,
    database_lock: Arc<DatabaseLock>,
    pool: Mutex<Option<(u64, Pool<SqliteConnectionManager>)>>,
}

impl SqliteStorage {
    pub fn new(path: PathBuf, pool_size: u32, database_lock: Arc<DatabaseLock>) -> Self {
        Self {
            path,
            pool_size,
            database_lock,
            pool: Mutex::new(None),
        }
    }

    fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let ledger = self.database_lock.blocking_read();
        let pool = self.pool_for(ledger.generation())?;
        let connection = pool.get()?;

        f(&connection)
    }

    // a swap replaces the file under the pool, so pools are keyed by generation
    fn pool_for(&self, generation: u64) -> Result<Pool<SqliteConnectionManager>> {
        let mut current = self.pool
            .lock()
            .map_err(|_| anyhow!("connection pool lock poisoned"))?;

        match current.as_ref() {
            Some((pool_generation, pool)) if *pool_generation == generation => Ok(pool.clone()),
            _ => {
                debug!("opening {:?} (generation {})", self.path, generation);
                let pool = build_pool(&self.path, self.pool_size)?;
                *current = Some((generation, pool.clone()));
                Ok(pool)
            }
        }
    }
}

fn build_pool(path: &Path, pool_size: u32) -> Result<Pool<SqliteConnectionManager>> {
    let manager = SqliteConnectionManager::file(path)
        .with_flags(OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX);

    let pool = Pool::builder()
        .max_size(pool_size)
        .build(manager)?;

    Ok(pool)
}

fn stat_columns(alias: &str) -> String {
    STAT_COLUMNS
        .iter()
        .map(|column| format!("{alias}.{column}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn read_property(row: &Row, offset: usize) -> rusqlite::Result<Property> {
    let mut values = [0.0; 17];

    for (index, value) in values.iter_mut().enumerate() {
        *value = row.get::<_, Option<f64>>(offset + index)?.unwrap_or_default();
    }

    Ok(Property::from_slice(&values))
}

impl Storage for SqliteStorage {
    fn get_unit_attack_pattern(&self, unit_id: i32) -> Result<Vec<AttackPatternRow>> {
        let pattern_columns = (1..=ATTACK_PATTERN_SLOTS)
            .map(|index| format!("atk_pattern_{index}"))
            .collect::<Vec<_>>()
            .join(", ");

        let query = format!(
            "SELECT pattern_id, unit_id, loop_start, loop_end, {pattern_columns}
             FROM unit_attack_pattern
             WHERE unit_id = ?1
             ORDER BY pattern_id"
        );

        self.with_connection(|connection| {
            let mut stmt = connection.prepare_cached(&query)?;

            let rows = stmt
                .query_map(params![unit_id], |row| {
                    let mut atk_patterns = Vec::with_capacity(ATTACK_PATTERN_SLOTS);
                    for index in 0..ATTACK_PATTERN_SLOTS {
                        atk_patterns.push(row.get::<_, Option<i32>>(4 + index)?.unwrap_or_default());
                    }

                    Ok(AttackPatternRow {
                        pattern_id: row.get(0)?,
                        unit_id: row.get(1)?,
                        loop_start: row.get(2)?,
                        loop_end: row.get(3)?,
                        atk_patterns,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(rows)
        })
    }

    fn get_resist_data(&self, resist_status_id: i32) -> Result<HashMap<String, i32>> {
        let ailment_columns = (1..=RESIST_AILMENTS.len())
            .map(|index| format!("ailment_{index}"))
            .collect::<Vec<_>>()
            .join(", ");

        let query = format!(
            "SELECT {ailment_columns} FROM resist_data WHERE resist_status_id = ?1"
        );

        self.with_connection(|connection| {
            let resist_map = connection
                .query_row(&query, params![resist_status_id], |row| {
                    let mut resist_map = HashMap::with_capacity(RESIST_AILMENTS.len());
                    for (index, ailment) in RESIST_AILMENTS.iter().enumerate() {
                        let value = row.get::<_, Option<i32>>(index)?.unwrap_or_default();
                        resist_map.insert(ailment.to_string(), value);
                    }
                    Ok(resist_map)
                })
                .optional()?
                .ok_or_else(|| anyhow!("resist data {} not found", resist_status_id))?;

            Ok(resist_map)
        })
    }

    fn get_equipments(&self) -> Result<Vec<Equipment>> {
        let query = format!(
            "SELECT e.equipment_id,
                    e.equipment_name,
                    (SELECT COALESCE(MAX(d.equipment_enhance_level), 0)
                     FROM equipment_enhance_data d
                     WHERE d.promotion_level = e.promotion_level),
                    {},
                    {}
             FROM equipment_data e
             LEFT JOIN equipment_enhance_rate r ON r.equipment_id = e.equipment_id
             ORDER BY e.equipment_id",
            stat_columns("e"),
            stat_columns("r"),
        );

        self.with_connection(|connection| {
            let mut stmt = connection.prepare_cached(&query)?;

            let equipments = stmt
                .query_map([], |row| {
                    Ok(Equipment {
                        equipment_id: row.get(0)?,
                        equipment_name: row.get(1)?,
                        max_enhance_level: row.get(2)?,
                        property: read_property(row, 3)?,
                        enhance_property: read_property(row, 3 + STAT_COLUMNS.len())?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(equipments)
        })
    }

    fn get_charas(&self) -> Result<Vec<RawChara>> {
        let query = "
            SELECT u.unit_id,
                   u.unit_name,
                   u.rarity,
                   u.search_area_width,
                   u.atk_type,
                   (SELECT COALESCE(MAX(enhance_level), 0) FROM unique_equipment_enhance_data)
            FROM unit_data u
            ORDER BY u.unit_id";

        self.with_connection(|connection| {
            let mut stmt = connection.prepare_cached(query)?;

            let charas = stmt
                .query_map([], |row| {
                    Ok(RawChara {
                        unit_id: row.get(0)?,
                        unit_name: row.get(1)?,
                        rarity: row.get(2)?,
                        search_area_width: row.get(3)?,
                        atk_type: row.get(4)?,
                        max_unique_equipment_level: row.get(5)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(charas)
        })
    }

    fn get_unique_equipment(&self, unit_id: i32) -> Result<Option<RawUniqueEquipmentData>> {
        let query = format!(
            "SELECT e.equipment_id, e.equipment_name, {}
             FROM unit_unique_equip u
             JOIN unique_equipment_data e ON e.equipment_id = u.equip_id
             WHERE u.unit_id = ?1 AND u.equip_slot = 1",
            stat_columns("e"),
        );

        self.with_connection(|connection| {
            let equipment = connection
                .query_row(&query, params![unit_id], |row| {
                    Ok(RawUniqueEquipmentData {
                        equipment_id: row.get(0)?,
                        equipment_name: row.get(1)?,
                        property: read_property(row, 2)?,
                    })
                })
                .optional()?;

            Ok(equipment)
        })
    }

    fn get_unique_equipment_enhance(&self, unit_id: i32) -> Result<Option<Property>> {
        let query = format!(
            "SELECT {}
             FROM unit_unique_equip u
             JOIN unique_equipment_enhance_rate r ON r.equipment_id = u.equip_id
             WHERE u.unit_id = ?1 AND u.equip_slot = 1",
            stat_columns("r"),
        );

        self.with_connection(|connection| {
            let property = connection
                .query_row(&query, params![unit_id], |row| read_property(row, 0))
                .optional()?;

            Ok(property)
        })
    }

    fn get_clan_battle_periods(&self) -> Result<Vec<RawClanBattlePeriod>> {
        let query = "
            SELECT clan_battle_id, start_time, end_time
            FROM clan_battle_period
            ORDER BY clan_battle_id DESC";

        self.with_connection(|connection| {
            let mut stmt = connection.prepare_cached(query)?;

            let periods = stmt
                .query_map([], |row| {
                    Ok(RawClanBattlePeriod {
                        clan_battle_id: row.get(0)?,
                        start_time: row.get(1)?,
                        end_time: row.get(2)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(periods)
        })
    }

    fn get_clan_battle_bosses(&self, clan_battle_id: i32) -> Result<Vec<RawClanBattleBoss>> {
        let query = format!(
            "SELECT p.enemy_id, p.unit_id, p.name, p.level, u.prefab_id, p.resist_status_id,
                    b.order_num, b.phase, {}
             FROM clan_battle_boss_data b
             JOIN enemy_parameter p ON p.enemy_id = b.enemy_id
             JOIN unit_enemy_data u ON u.unit_id = p.unit_id
             WHERE b.clan_battle_id = ?1
             ORDER BY b.order_num, b.phase",
            stat_columns("p"),
        );

        self.with_connection(|connection| {
            let mut stmt = connection.prepare_cached(&query)?;

            let bosses = stmt
                .query_map(params![clan_battle_id], |row| {
                    Ok(RawClanBattleBoss {
                        enemy_id: row.get(0)?,
                        unit_id: row.get(1)?,
                        name: row.get(2)?,
                        level: row.get(3)?,
                        prefab_id: row.get(4)?,
                        resist_status_id: row.get(5)?,
                        order_num: row.get(6)?,
                        phase: row.get(7)?,
                        property: read_property(row, 8)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(bosses)
        })
    }

    fn get_enemy_skills(&self, enemy_id: i32) -> Result<Vec<Skill>> {
        let query = "
            SELECT skill_id, name, skill_level, description
            FROM enemy_skill_data
            WHERE enemy_id = ?1
            ORDER BY ordinal";

        self.with_connection(|connection| {
            let mut stmt = connection.prepare_cached(query)?;

            let skills = stmt
                .query_map(params![enemy_id], |row| {
                    Ok(Skill {
                        skill_id: row.get(0)?,
                        name: row.get(1)?,
                        level: row.get(2)?,
                        description: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(skills)
        })
    }

    fn get_quests(&self) -> Result<Vec<Quest>> {
        let query = "
            SELECT quest_id, quest_name, stamina,
                   reward_image_1, reward_image_2, reward_image_3, reward_image_4, reward_image_5
            FROM quest_data
            ORDER BY quest_id";

        self.with_connection(|connection| {
            let mut stmt = connection.prepare_cached(query)?;

            let quests = stmt
                .query_map([], |row| {
                    let mut drop_reward_ids = Vec::new();
                    for index in 3..8 {
                        let reward = row.get::<_, Option<i32>>(index)?.unwrap_or_default();
                        if reward != 0 {
                            drop_reward_ids.push(reward);
                        }
                    }

                    Ok(Quest {
                        quest_id: row.get(0)?,
                        quest_name: row.get(1)?,
                        stamina: row.get(2)?,
                        drop_reward_ids,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(quests)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::database_lock::DatabaseLock;
    use crate::loaders::{Loader, QuestLoader};
    use crate::models::PatternAction;
    use crate::test_utils::*;

    use super::{SqliteStorage, Storage};

    fn create_storage() -> (tempfile::TempDir, SqliteStorage) {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("master.db");
        create_seeded_database(&path).unwrap();

        let storage = SqliteStorage::new(path, 2, Arc::new(DatabaseLock::new()));

        (directory, storage)
    }

    #[test]
    fn should_return_attack_patterns_in_pattern_order() {
        let (_directory, storage) = create_storage();

        let rows = storage.get_unit_attack_pattern(BOSS_UNIT_ID).unwrap();

        let ids: Vec<_> = rows.iter().map(|row| row.pattern_id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(rows[0].atk_patterns.len(), 20);
        let pattern = rows[0].attack_pattern();
        assert_eq!(pattern.items[0].action, PatternAction::Attack);
    }

    #[test]
    fn should_map_resist_columns_to_ailments() {
        let (_directory, storage) = create_storage();

        let resist_map = storage.get_resist_data(RESIST_STATUS_ID).unwrap();

        assert_eq!(resist_map.len(), 12);
        assert_eq!(resist_map["stun"], 100);
        assert_eq!(resist_map["curse"], 0);
    }

    #[test]
    fn should_fail_on_missing_resist_data() {
        let (_directory, storage) = create_storage();

        let result = storage.get_resist_data(999);

        assert!(result.is_err());
    }

    #[test]
    fn should_load_equipment_with_enhance_rates() {
        let (_directory, storage) = create_storage();

        let equipments = storage.get_equipments().unwrap();

        assert_eq!(equipments.len(), 1);
        assert_eq!(equipments[0].max_enhance_level, 5);
        assert_eq!(equipments[0].property.atk, 30.0);
        assert_eq!(equipments[0].enhance_property.atk, 2.0);
    }

    #[test]
    fn should_load_charas_and_unique_equipment() {
        let (_directory, storage) = create_storage();

        let charas = storage.get_charas().unwrap();
        let unique = storage.get_unique_equipment(CHARA_UNIT_ID).unwrap();
        let enhance = storage.get_unique_equipment_enhance(CHARA_UNIT_ID).unwrap();
        let missing = storage.get_unique_equipment(100201).unwrap();

        assert_eq!(charas.len(), 2);
        assert_eq!(charas[0].max_unique_equipment_level, 140);
        assert_eq!(unique.unwrap().equipment_id, 130011);
        assert_eq!(enhance.unwrap().atk, 5.0);
        assert!(missing.is_none());
    }

    #[test]
    fn should_load_clan_battle_bosses_in_phase_order() {
        let (_directory, storage) = create_storage();

        let periods = storage.get_clan_battle_periods().unwrap();
        let bosses = storage.get_clan_battle_bosses(periods[0].clan_battle_id).unwrap();
        let skills = storage.get_enemy_skills(bosses[0].enemy_id).unwrap();

        assert_eq!(periods.len(), 1);
        let phases: Vec<_> = bosses.iter().map(|boss| (boss.order_num, boss.phase)).collect();
        assert_eq!(phases, vec![(1, 1), (1, 2)]);
        assert_eq!(bosses[0].prefab_id, 302000);
        assert_eq!(skills.len(), 2);
        assert_eq!(skills[0].skill_id, 3020001);
    }

    #[test]
    fn should_collect_non_empty_quest_rewards() {
        let (_directory, storage) = create_storage();

        let quests = storage.get_quests().unwrap();

        assert_eq!(quests.len(), 1);
        assert_eq!(quests[0].drop_reward_ids, vec![101011, 101251]);
    }

    #[tokio::test]
    async fn should_load_from_blocking_thread_inside_runtime() {
        let (_directory, storage) = create_storage();
        let loader = Arc::new(QuestLoader::new(Arc::new(storage)));

        let task_loader = loader.clone();
        tokio::task::spawn_blocking(move || task_loader.load())
            .await
            .unwrap()
            .unwrap();

        assert!(!loader.is_loading());
        assert_eq!(loader.quests().len(), 1);
    }
}
