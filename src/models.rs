use std::ops::{Add, Mul};
use std::path::PathBuf;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::clan_battle_boss::ClanBattleBoss;
use crate::constants::ATTACK_PATTERN_SLOTS;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Property {
    pub hp: f64,
    pub atk: f64,
    pub magic_str: f64,
    pub def: f64,
    pub magic_def: f64,
    pub physical_critical: f64,
    pub magic_critical: f64,
    pub wave_hp_recovery: f64,
    pub wave_energy_recovery: f64,
    pub dodge: f64,
    pub physical_penetrate: f64,
    pub magic_penetrate: f64,
    pub life_steal: f64,
    pub hp_recovery_rate: f64,
    pub energy_recovery_rate: f64,
    pub energy_reduce_rate: f64,
    pub accuracy: f64,
}

impl Property {
    pub fn from_slice(values: &[f64; 17]) -> Self {
        Self {
            hp: values[0],
            atk: values[1],
            magic_str: values[2],
            def: values[3],
            magic_def: values[4],
            physical_critical: values[5],
            magic_critical: values[6],
            wave_hp_recovery: values[7],
            wave_energy_recovery: values[8],
            dodge: values[9],
            physical_penetrate: values[10],
            magic_penetrate: values[11],
            life_steal: values[12],
            hp_recovery_rate: values[13],
            energy_recovery_rate: values[14],
            energy_reduce_rate: values[15],
            accuracy: values[16],
        }
    }

    fn zip_with(self, other: Property, f: impl Fn(f64, f64) -> f64) -> Property {
        Property {
            hp: f(self.hp, other.hp),
            atk: f(self.atk, other.atk),
            magic_str: f(self.magic_str, other.magic_str),
            def: f(self.def, other.def),
            magic_def: f(self.magic_def, other.magic_def),
            physical_critical: f(self.physical_critical, other.physical_critical),
            magic_critical: f(self.magic_critical, other.magic_critical),
            wave_hp_recovery: f(self.wave_hp_recovery, other.wave_hp_recovery),
            wave_energy_recovery: f(self.wave_energy_recovery, other.wave_energy_recovery),
            dodge: f(self.dodge, other.dodge),
            physical_penetrate: f(self.physical_penetrate, other.physical_penetrate),
            magic_penetrate: f(self.magic_penetrate, other.magic_penetrate),
            life_steal: f(self.life_steal, other.life_steal),
            hp_recovery_rate: f(self.hp_recovery_rate, other.hp_recovery_rate),
            energy_recovery_rate: f(self.energy_recovery_rate, other.energy_recovery_rate),
            energy_reduce_rate: f(self.energy_reduce_rate, other.energy_reduce_rate),
            accuracy: f(self.accuracy, other.accuracy),
        }
    }
}

impl Add for Property {
    type Output = Property;

    fn add(self, other: Property) -> Property {
        self.zip_with(other, |a, b| a + b)
    }
}

impl Mul<f64> for Property {
    type Output = Property;

    fn mul(self, factor: f64) -> Property {
        self.zip_with(Property::default(), |a, _| a * factor)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Equipment {
    pub equipment_id: i32,
    pub equipment_name: String,
    pub max_enhance_level: i32,
    pub property: Property,
    pub enhance_property: Property,
}

impl Equipment {
    /// Stats at `max_enhance_level`.
    pub fn max_property(&self) -> Property {
        self.property + self.enhance_property * self.max_enhance_level as f64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chara {
    pub unit_id: i32,
    pub unit_name: String,
    pub rarity: i32,
    pub search_area_width: i32,
    pub atk_type: i32,
    pub max_unique_equipment_level: i32,
    pub unique_equipment: Option<Equipment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawChara {
    pub unit_id: i32,
    pub unit_name: String,
    pub rarity: i32,
    pub search_area_width: i32,
    pub atk_type: i32,
    pub max_unique_equipment_level: i32,
}

impl RawChara {
    pub fn chara(&self) -> Chara {
        Chara {
            unit_id: self.unit_id,
            unit_name: self.unit_name.clone(),
            rarity: self.rarity,
            search_area_width: self.search_area_width,
            atk_type: self.atk_type,
            max_unique_equipment_level: self.max_unique_equipment_level,
            unique_equipment: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawUniqueEquipmentData {
    pub equipment_id: i32,
    pub equipment_name: String,
    pub property: Property,
}

impl RawUniqueEquipmentData {
    /// Attaches this unique equipment to `chara`, enhancement rates included.
    pub fn set_chara_unique_equipment(&self, chara: &mut Chara, enhance_property: Property) {
        chara.unique_equipment = Some(Equipment {
            equipment_id: self.equipment_id,
            equipment_name: self.equipment_name.clone(),
            max_enhance_level: chara.max_unique_equipment_level,
            property: self.property,
            enhance_property,
        });
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Quest {
    pub quest_id: i32,
    pub quest_name: String,
    pub stamina: i32,
    pub drop_reward_ids: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Skill {
    pub skill_id: i32,
    pub name: String,
    pub level: i32,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternAction {
    Attack,
    MainSkill(i32),
    SpSkill(i32),
    Unknown(i32),
}

impl PatternAction {
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => PatternAction::Attack,
            1001..=1999 => PatternAction::MainSkill(code - 1000),
            2001..=2999 => PatternAction::SpSkill(code - 2000),
            _ => PatternAction::Unknown(code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackPatternItem {
    pub action: PatternAction,
    pub loop_start: bool,
    pub loop_end: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackPattern {
    pub pattern_id: i32,
    pub unit_id: i32,
    pub loop_start: i32,
    pub loop_end: i32,
    pub items: Vec<AttackPatternItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackPatternRow {
    pub pattern_id: i32,
    pub unit_id: i32,
    pub loop_start: i32,
    pub loop_end: i32,
    pub atk_patterns: Vec<i32>,
}

impl AttackPatternRow {
    pub fn attack_pattern(&self) -> AttackPattern {
        let last = if self.loop_end > 0 {
            (self.loop_end as usize).min(ATTACK_PATTERN_SLOTS)
        } else {
            ATTACK_PATTERN_SLOTS
        };

        let items = self.atk_patterns
            .iter()
            .take(last)
            .enumerate()
            .filter(|(_, code)| **code != 0)
            .map(|(index, code)| {
                let position = index as i32 + 1;
                AttackPatternItem {
                    action: PatternAction::from_code(*code),
                    loop_start: position == self.loop_start,
                    loop_end: position == self.loop_end,
                }
            })
            .collect();

        AttackPattern {
            pattern_id: self.pattern_id,
            unit_id: self.unit_id,
            loop_start: self.loop_start,
            loop_end: self.loop_end,
            items,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawClanBattlePeriod {
    pub clan_battle_id: i32,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawClanBattleBoss {
    pub enemy_id: i32,
    pub unit_id: i32,
    pub name: String,
    pub level: i32,
    pub prefab_id: i32,
    pub resist_status_id: i32,
    pub order_num: i32,
    pub phase: i32,
    pub property: Property,
}

#[derive(Debug, Clone)]
pub struct ClanBattlePeriod {
    pub clan_battle_id: i32,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub bosses: Vec<ClanBattleBoss>,
}

/// A downloaded database package waiting to replace the active file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePackage {
    pub version: i64,
    pub path: PathBuf,
    pub downloaded_on: DateTime<Utc>,
}

impl UpdatePackage {
    pub fn new(version: i64, path: PathBuf) -> Self {
        Self {
            version,
            path,
            downloaded_on: Utc::now(),
        }
    }
}
