use std::path::Path;

use anyhow::Result;
use rusqlite::{Connection, params};

use crate::constants::STAT_COLUMNS;

use super::{BOSS_PREFAB_ID, BOSS_UNIT_ID, CHARA_UNIT_ID, RESIST_STATUS_ID};

fn stat_definitions() -> String {
    STAT_COLUMNS
        .iter()
        .map(|column| format!("{column} REAL DEFAULT 0"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn numbered_definitions(prefix: &str, count: usize) -> String {
    (1..=count)
        .map(|index| format!("{prefix}_{index} INTEGER DEFAULT 0"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn create_schema(connection: &Connection) -> Result<()> {
    let stats = stat_definitions();
    let atk_patterns = numbered_definitions("atk_pattern", 20);
    let ailments = numbered_definitions("ailment", 12);
    let rewards = numbered_definitions("reward_image", 5);

    connection.execute_batch(&format!("
        CREATE TABLE unit_attack_pattern (pattern_id INTEGER, unit_id INTEGER, loop_start INTEGER, loop_end INTEGER, {atk_patterns});
        CREATE TABLE resist_data (resist_status_id INTEGER, {ailments});
        CREATE TABLE equipment_data (equipment_id INTEGER, equipment_name TEXT, promotion_level INTEGER, {stats});
        CREATE TABLE equipment_enhance_rate (equipment_id INTEGER, {stats});
        CREATE TABLE equipment_enhance_data (promotion_level INTEGER, equipment_enhance_level INTEGER);
        CREATE TABLE unit_data (unit_id INTEGER, unit_name TEXT, rarity INTEGER, search_area_width INTEGER, atk_type INTEGER);
        CREATE TABLE unique_equipment_enhance_data (enhance_level INTEGER);
        CREATE TABLE unit_unique_equip (unit_id INTEGER, equip_slot INTEGER, equip_id INTEGER);
        CREATE TABLE unique_equipment_data (equipment_id INTEGER, equipment_name TEXT, {stats});
        CREATE TABLE unique_equipment_enhance_rate (equipment_id INTEGER, {stats});
        CREATE TABLE clan_battle_period (clan_battle_id INTEGER, start_time TEXT, end_time TEXT);
        CREATE TABLE clan_battle_boss_data (clan_battle_id INTEGER, order_num INTEGER, phase INTEGER, enemy_id INTEGER);
        CREATE TABLE enemy_parameter (enemy_id INTEGER, unit_id INTEGER, name TEXT, level INTEGER, resist_status_id INTEGER, {stats});
        CREATE TABLE unit_enemy_data (unit_id INTEGER, prefab_id INTEGER);
        CREATE TABLE enemy_skill_data (enemy_id INTEGER, skill_id INTEGER, name TEXT, skill_level INTEGER, description TEXT, ordinal INTEGER);
        CREATE TABLE quest_data (quest_id INTEGER, quest_name TEXT, stamina INTEGER, {rewards});
    "))?;

    Ok(())
}

/// Creates a database file with one row set per domain.
pub fn create_seeded_database(path: &Path) -> Result<()> {
    let connection = Connection::open(path)?;
    create_schema(&connection)?;

    connection.execute(
        "INSERT INTO unit_attack_pattern (pattern_id, unit_id, loop_start, loop_end, atk_pattern_1, atk_pattern_2)
         VALUES (2, ?1, 1, 2, 1, 2001)",
        params![BOSS_UNIT_ID])?;
    connection.execute(
        "INSERT INTO unit_attack_pattern (pattern_id, unit_id, loop_start, loop_end, atk_pattern_1, atk_pattern_2, atk_pattern_3)
         VALUES (1, ?1, 1, 3, 1, 1001, 1002)",
        params![BOSS_UNIT_ID])?;

    connection.execute(
        "INSERT INTO resist_data (resist_status_id, ailment_1) VALUES (?1, 100)",
        params![RESIST_STATUS_ID])?;

    connection.execute_batch("
        INSERT INTO equipment_data (equipment_id, equipment_name, promotion_level, atk) VALUES (101011, 'Iron Blade', 2, 30);
        INSERT INTO equipment_enhance_rate (equipment_id, atk) VALUES (101011, 2);
        INSERT INTO equipment_enhance_data VALUES (2, 1), (2, 5), (3, 8);
        INSERT INTO unique_equipment_enhance_data VALUES (1), (140);
        INSERT INTO unique_equipment_data (equipment_id, equipment_name, atk) VALUES (130011, 'Unique Blade', 50);
        INSERT INTO unique_equipment_enhance_rate (equipment_id, atk) VALUES (130011, 5);
        INSERT INTO clan_battle_period VALUES (1012, '2024/01/25 05:00:00', '2024/01/30 23:59:59');
        INSERT INTO clan_battle_boss_data VALUES (1012, 1, 2, 401010402), (1012, 1, 1, 401010401);
        INSERT INTO enemy_skill_data VALUES (401010401, 3020002, 'Tackle', 120, NULL, 2), (401010401, 3020001, 'Roar', 120, 'Stuns', 1);
        INSERT INTO quest_data (quest_id, quest_name, stamina, reward_image_1, reward_image_3) VALUES (11001001, 'Area 1-1', 8, 101011, 101251);
    ")?;

    connection.execute(
        "INSERT INTO unit_data VALUES (?1, 'Hiyori', 3, 200, 1), (100201, 'Yui', 3, 800, 2)",
        params![CHARA_UNIT_ID])?;
    connection.execute(
        "INSERT INTO unit_unique_equip VALUES (?1, 1, 130011)",
        params![CHARA_UNIT_ID])?;

    for (enemy_id, level) in [(401010401, 120), (401010402, 125)] {
        connection.execute(
            "INSERT INTO enemy_parameter (enemy_id, unit_id, name, level, resist_status_id, hp) VALUES (?1, ?2, 'Goblin Great', ?3, ?4, 6000000)",
            params![enemy_id, BOSS_UNIT_ID, level, RESIST_STATUS_ID])?;
    }

    connection.execute(
        "INSERT INTO unit_enemy_data VALUES (?1, ?2)",
        params![BOSS_UNIT_ID, BOSS_PREFAB_ID])?;

    Ok(())
}
