pub mod seed;
pub mod table;

pub use table::{LevelTable, LevelTableError};
