pub mod database;
pub mod flag_loader;
pub mod templates;

pub use database::*;
pub use flag_loader::*;
pub use templates::*;
