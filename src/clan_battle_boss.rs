use hashbrown::HashMap;
use log::debug;

use crate::abstractions::Storage;
use crate::constants::{ICON_URL_PREFIX, ICON_URL_SUFFIX};
use crate::error::{AssemblyError, BossError};
use crate::models::{AttackPattern, Property, Skill};

pub fn icon_url(prefab_id: i32) -> String {
    format!("{ICON_URL_PREFIX}{prefab_id}{ICON_URL_SUFFIX}")
}

/// Values passed to [`ClanBattleBoss::set_basic`].
#[derive(Debug, Clone, PartialEq)]
pub struct BossBasic {
    pub unit_id: i32,
    pub name: String,
    pub level: i32,
    pub prefab_id: i32,
    pub resist_status_id: i32,
    pub property: Property,
}

#[derive(Debug, Clone)]
struct BossProfile {
    basic: BossBasic,
    icon_url: String,
    resist_map: Option<HashMap<String, i32>>,
    attack_patterns: Vec<AttackPattern>,
}

#[derive(Debug, Clone)]
enum BossState {
    Uninitialized,
    Ready(Box<BossProfile>),
}

/// A clan battle boss node. Later phases of the same boss are attached as
/// children; each node only carries its own attack patterns.
#[derive(Debug, Clone)]
pub struct ClanBattleBoss {
    enemy_id: i32,
    state: BossState,
    skills: Vec<Skill>,
    children: Vec<ClanBattleBoss>,
}

/// Creates a boss and runs `set_basic` on it.
pub fn assemble_basic<ST: Storage + ?Sized>(
    storage: &ST,
    enemy_id: i32,
    basic: BossBasic) -> Result<ClanBattleBoss, AssemblyError> {
    let mut boss = ClanBattleBoss::new(enemy_id);
    boss.set_basic(storage, basic)?;
    Ok(boss)
}

impl ClanBattleBoss {
    pub fn new(enemy_id: i32) -> Self {
        Self {
            enemy_id,
            state: BossState::Uninitialized,
            skills: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Fills the two-phase fields. The node is left untouched unless every
    /// lookup succeeds; a second call fails with `AlreadyInitialized`.
    pub fn set_basic<ST: Storage + ?Sized>(&mut self, storage: &ST, basic: BossBasic) -> Result<(), AssemblyError> {
        if self.is_initialized() {
            return Err(AssemblyError::AlreadyInitialized { enemy_id: self.enemy_id });
        }

        if basic.prefab_id <= 0 {
            return Err(AssemblyError::InvalidPrefabId {
                enemy_id: self.enemy_id,
                prefab_id: basic.prefab_id,
            });
        }

        let attack_patterns = storage
            .get_unit_attack_pattern(basic.unit_id)
            .map_err(AssemblyError::Storage)?
            .iter()
            .map(|row| row.attack_pattern())
            .collect();

        // 0 means the boss has no resist data at all
        let resist_map = match basic.resist_status_id {
            0 => None,
            resist_status_id => Some(
                storage
                    .get_resist_data(resist_status_id)
                    .map_err(AssemblyError::Storage)?,
            ),
        };

        debug!("boss {} ready (unit {})", self.enemy_id, basic.unit_id);

        self.state = BossState::Ready(Box::new(BossProfile {
            icon_url: icon_url(basic.prefab_id),
            basic,
            resist_map,
            attack_patterns,
        }));

        Ok(())
    }

    fn profile(&self, field: &'static str) -> Result<&BossProfile, BossError> {
        match &self.state {
            BossState::Ready(profile) => Ok(&**profile),
            BossState::Uninitialized => Err(BossError::Uninitialized {
                enemy_id: self.enemy_id,
                field,
            }),
        }
    }

    pub fn enemy_id(&self) -> i32 {
        self.enemy_id
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.state, BossState::Ready(_))
    }

    pub fn unit_id(&self) -> Result<i32, BossError> {
        Ok(self.profile("unit_id")?.basic.unit_id)
    }

    pub fn name(&self) -> Result<&str, BossError> {
        Ok(&self.profile("name")?.basic.name)
    }

    pub fn level(&self) -> Result<i32, BossError> {
        Ok(self.profile("level")?.basic.level)
    }

    pub fn level_string(&self) -> Result<String, BossError> {
        Ok(format!("Lv.{}", self.level()?))
    }

    pub fn prefab_id(&self) -> Result<i32, BossError> {
        Ok(self.profile("prefab_id")?.basic.prefab_id)
    }

    pub fn resist_status_id(&self) -> Result<i32, BossError> {
        Ok(self.profile("resist_status_id")?.basic.resist_status_id)
    }

    pub fn property(&self) -> Result<&Property, BossError> {
        Ok(&self.profile("property")?.basic.property)
    }

    pub fn icon_url(&self) -> Result<&str, BossError> {
        Ok(&self.profile("icon_url")?.icon_url)
    }

    /// `None` when the boss has no resist data.
    pub fn resist_map(&self) -> Result<Option<&HashMap<String, i32>>, BossError> {
        Ok(self.profile("resist_map")?.resist_map.as_ref())
    }

    pub fn attack_patterns(&self) -> Result<&[AttackPattern], BossError> {
        Ok(&self.profile("attack_patterns")?.attack_patterns)
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn add_skill(&mut self, skill: Skill) {
        self.skills.push(skill);
    }

    pub fn children(&self) -> &[ClanBattleBoss] {
        &self.children
    }

    pub fn add_child(&mut self, child: ClanBattleBoss) {
        self.children.push(child);
    }
}
