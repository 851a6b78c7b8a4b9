#[cfg(test)]
mod test_utils;

pub mod abstractions;
pub mod background_worker;
pub mod clan_battle_boss;
pub mod constants;
pub mod database_lock;
pub mod error;
pub mod flags;
pub mod loaders;
pub mod logger;
pub mod models;
pub mod settings;
pub mod start;
pub mod update_barrier;

pub use start::start;
pub use start::StartOptions;
