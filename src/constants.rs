use std::time::Duration;

pub const ICON_URL_PREFIX: &str = "https://redive.estertion.win/icon/unit/";
pub const ICON_URL_SUFFIX: &str = ".webp";

pub const POLL_INTERVAL: Duration = Duration::from_millis(100);
pub const MAX_POLL_ATTEMPTS: u32 = 50;

pub const DATABASE_FILE_NAME: &str = "master.db";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const MIN_DATABASE_SIZE_KB: u64 = 50;
pub const DATABASE_POOL_SIZE: u32 = 4;

pub const CLAN_BATTLE_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

pub const ATTACK_PATTERN_SLOTS: usize = 20;

pub const RESIST_AILMENTS: [&str; 12] = [
    "stun",
    "paralyze",
    "freeze",
    "bind",
    "sleep",
    "charm",
    "confuse",
    "blind",
    "silence",
    "poison",
    "fear",
    "curse",
];

pub const STAT_COLUMNS: [&str; 17] = [
    "hp",
    "atk",
    "magic_str",
    "def",
    "magic_def",
    "physical_critical",
    "magic_critical",
    "wave_hp_recovery",
    "wave_energy_recovery",
    "dodge",
    "physical_penetrate",
    "magic_penetrate",
    "life_steal",
    "hp_recovery_rate",
    "energy_recovery_rate",
    "energy_reduce_rate",
    "accuracy",
];
