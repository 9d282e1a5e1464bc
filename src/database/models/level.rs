use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One rung of the level ladder. Static reference data: seeded once,
/// read-only at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Level {
    pub level: i32,
    pub name: String,
    pub required_exp: i32,
}
