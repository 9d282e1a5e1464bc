pub mod experience;
pub mod levels;
