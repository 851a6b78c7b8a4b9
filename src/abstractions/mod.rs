pub mod file_system;
pub mod settings_manager;
pub mod storage;
pub mod update_coordinator;

pub use file_system::*;
pub use settings_manager::*;
pub use storage::*;
pub use update_coordinator::*;
