use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config;
use crate::database::manager::DatabaseError;
use crate::experience::activity::Activity;
use crate::experience::progression::{progression, Progression, ProgressionError};
use crate::experience::store::{ExperienceStore, PgExperienceStore};
use crate::level::{LevelTable, LevelTableError};

/// Attempts per grant before a persistent conflict is surfaced.
const WRITE_CONFLICT_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum ExperienceError {
    #[error("grant amount must be between 1 and {max}, got {amount}")]
    InvalidGrantAmount { amount: i32, max: i32 },

    #[error("experience update conflicted after {0} attempts")]
    Conflict(u32),

    #[error(transparent)]
    LevelTable(#[from] LevelTableError),

    #[error(transparent)]
    Progression(#[from] ProgressionError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Application service over the experience counter and the level ladder.
pub struct ExperienceService {
    store: Arc<dyn ExperienceStore>,
}

impl ExperienceService {
    pub async fn new() -> Result<Self, ExperienceError> {
        Ok(Self {
            store: Arc::new(PgExperienceStore::new().await?),
        })
    }

    pub fn with_store(store: Arc<dyn ExperienceStore>) -> Self {
        Self { store }
    }

    /// Total accumulated experience; members without a row read as 0.
    pub async fn experience(&self, member_id: Uuid) -> Result<i32, ExperienceError> {
        Ok(self.store.total(member_id).await?)
    }

    /// Progression snapshot computed from the current total.
    pub async fn get_progress(&self, member_id: Uuid) -> Result<Progression, ExperienceError> {
        let experience = self.store.total(member_id).await?;
        let table = LevelTable::global_or_load().await?;
        Ok(progression(table, experience)?)
    }

    /// Grant `amount` experience, returning the updated total.
    ///
    /// The store applies the increment atomically; transient serialization
    /// or deadlock failures are retried here against fresh state so no
    /// grant is ever lost.
    pub async fn grant_experience(
        &self,
        member_id: Uuid,
        amount: i32,
    ) -> Result<i32, ExperienceError> {
        let max = config::config().experience.max_grant_amount;
        if amount < 1 || amount > max {
            return Err(ExperienceError::InvalidGrantAmount { amount, max });
        }

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.store.add(member_id, amount).await {
                Ok(total) => {
                    debug!(%member_id, amount, total, "granted experience");
                    return Ok(total);
                }
                Err(err) if is_write_conflict(&err) => {
                    if attempt >= WRITE_CONFLICT_RETRIES {
                        return Err(ExperienceError::Conflict(attempt));
                    }
                    warn!(%member_id, attempt, "experience grant conflicted, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Grant the configured reward for an activity.
    pub async fn grant_for_activity(
        &self,
        member_id: Uuid,
        activity: Activity,
    ) -> Result<i32, ExperienceError> {
        self.grant_experience(member_id, activity.reward()).await
    }
}

/// Transient serialization or deadlock failures reported by Postgres.
fn is_write_conflict(err: &DatabaseError) -> bool {
    let DatabaseError::Sqlx(sqlx::Error::Database(db_err)) = err else {
        return false;
    };
    matches!(db_err.code().as_deref(), Some("40001") | Some("40P01"))
}
