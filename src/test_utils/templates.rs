use hashbrown::HashMap;

use crate::clan_battle_boss::BossBasic;
use crate::models::*;

pub const BOSS_ENEMY_ID: i32 = 401010401;
pub const BOSS_UNIT_ID: i32 = 302000;
pub const BOSS_PREFAB_ID: i32 = 302000;
pub const RESIST_STATUS_ID: i32 = 2001;
pub const CHARA_UNIT_ID: i32 = 100101;

pub fn boss_basic(resist_status_id: i32) -> BossBasic {
    BossBasic {
        unit_id: BOSS_UNIT_ID,
        name: "Goblin Great".into(),
        level: 120,
        prefab_id: BOSS_PREFAB_ID,
        resist_status_id,
        property: Property::default(),
    }
}

pub fn resist_map() -> HashMap<String, i32> {
    HashMap::from([
        ("stun".to_string(), 100),
        ("paralyze".to_string(), 50),
        ("charm".to_string(), 0),
    ])
}

pub fn attack_pattern_row(pattern_id: i32, unit_id: i32) -> AttackPatternRow {
    let mut atk_patterns = vec![0; 20];
    atk_patterns[0] = 1;
    atk_patterns[1] = 1001;
    atk_patterns[2] = 1002;

    AttackPatternRow {
        pattern_id,
        unit_id,
        loop_start: 1,
        loop_end: 3,
        atk_patterns,
    }
}

pub fn skill(skill_id: i32) -> Skill {
    Skill {
        skill_id,
        name: format!("Skill {}", skill_id),
        level: 120,
        description: String::new(),
    }
}

pub fn equipment(equipment_id: i32) -> Equipment {
    Equipment {
        equipment_id,
        equipment_name: format!("Equipment {}", equipment_id),
        max_enhance_level: 5,
        property: Property::default(),
        enhance_property: Property::default(),
    }
}

pub fn raw_chara(unit_id: i32) -> RawChara {
    RawChara {
        unit_id,
        unit_name: format!("Unit {}", unit_id),
        rarity: 3,
        search_area_width: 200,
        atk_type: 1,
        max_unique_equipment_level: 140,
    }
}

pub fn raw_unique_equipment(equipment_id: i32) -> RawUniqueEquipmentData {
    RawUniqueEquipmentData {
        equipment_id,
        equipment_name: format!("Unique {}", equipment_id),
        property: Property::default(),
    }
}

pub fn quest(quest_id: i32) -> Quest {
    Quest {
        quest_id,
        quest_name: format!("Quest {}", quest_id),
        stamina: 10,
        drop_reward_ids: vec![101011],
    }
}

pub fn raw_clan_battle_period(clan_battle_id: i32) -> RawClanBattlePeriod {
    RawClanBattlePeriod {
        clan_battle_id,
        start_time: "2024/01/25 05:00:00".into(),
        end_time: "2024/01/30 23:59:59".into(),
    }
}

pub fn raw_clan_battle_boss(enemy_id: i32, order_num: i32, phase: i32) -> RawClanBattleBoss {
    RawClanBattleBoss {
        enemy_id,
        unit_id: BOSS_UNIT_ID,
        name: "Goblin Great".into(),
        level: 120,
        prefab_id: BOSS_PREFAB_ID,
        resist_status_id: RESIST_STATUS_ID,
        order_num,
        phase,
        property: Property::default(),
    }
}
