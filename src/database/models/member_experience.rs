use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Per-member experience counter. One row per member, created lazily on
/// the first grant; `experience` only ever grows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MemberExperience {
    pub member_id: Uuid,
    pub experience: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
