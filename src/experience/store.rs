use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::member_experience::MemberExperience;

/// Hard ceiling on the accumulated counter, safely inside i32 range.
pub const MAX_EXPERIENCE: i32 = 2_100_000_000;

/// Storage boundary for per-member experience counters.
///
/// `add` must be atomic with respect to concurrent calls for the same
/// member: the increment is applied against current stored state, never
/// against a stale read.
#[async_trait]
pub trait ExperienceStore: Send + Sync {
    /// Total accumulated experience; members without a row read as 0.
    async fn total(&self, member_id: Uuid) -> Result<i32, DatabaseError>;

    /// Atomically add `amount` (already validated positive) and return
    /// the updated total.
    async fn add(&self, member_id: Uuid, amount: i32) -> Result<i32, DatabaseError>;
}

pub struct PgExperienceStore {
    pool: PgPool,
}

impl PgExperienceStore {
    pub async fn new() -> Result<Self, DatabaseError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }
}

#[async_trait]
impl ExperienceStore for PgExperienceStore {
    async fn total(&self, member_id: Uuid) -> Result<i32, DatabaseError> {
        let row = sqlx::query_as::<_, MemberExperience>(
            "SELECT member_id, experience, created_at, updated_at
             FROM member_experience
             WHERE member_id = $1",
        )
        .bind(member_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.experience).unwrap_or(0))
    }

    async fn add(&self, member_id: Uuid, amount: i32) -> Result<i32, DatabaseError> {
        // Single-statement upsert: the increment runs inside the database,
        // so concurrent grants for the same member serialize on the row and
        // the lazily-created row starts from 0.
        let row = sqlx::query_as::<_, MemberExperience>(
            "INSERT INTO member_experience (member_id, experience)
             VALUES ($1, LEAST($2, $3))
             ON CONFLICT (member_id) DO UPDATE
             SET experience = LEAST(member_experience.experience + EXCLUDED.experience, $3),
                 updated_at = now()
             RETURNING member_id, experience, created_at, updated_at",
        )
        .bind(member_id)
        .bind(amount)
        .bind(MAX_EXPERIENCE)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.experience)
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::in_memory::InMemoryExperienceStore;
    use super::*;

    #[tokio::test]
    async fn absent_member_reads_as_zero() {
        let store = InMemoryExperienceStore::default();
        assert_eq!(store.total(Uuid::new_v4()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn sequential_adds_accumulate() {
        let store = InMemoryExperienceStore::default();
        let member = Uuid::new_v4();

        store.add(member, 40).await.unwrap();
        let total = store.add(member, 2).await.unwrap();

        assert_eq!(total, 42);
        assert_eq!(store.total(member).await.unwrap(), 42);
    }

    #[tokio::test]
    async fn split_grant_equals_single_grant() {
        let store = InMemoryExperienceStore::default();
        let split = Uuid::new_v4();
        let single = Uuid::new_v4();

        store.add(split, 130).await.unwrap();
        store.add(split, 70).await.unwrap();
        store.add(single, 200).await.unwrap();

        assert_eq!(
            store.total(split).await.unwrap(),
            store.total(single).await.unwrap()
        );
    }

    #[tokio::test]
    async fn concurrent_unit_adds_lose_no_updates() {
        let store = Arc::new(InMemoryExperienceStore::default());
        let member = Uuid::new_v4();

        let tasks: Vec<_> = (0..100)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.add(member, 1).await.unwrap() })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(store.total(member).await.unwrap(), 100);
    }

    #[tokio::test]
    async fn total_is_capped() {
        let store = InMemoryExperienceStore::default();
        let member = Uuid::new_v4();

        store.add(member, MAX_EXPERIENCE).await.unwrap();
        let total = store.add(member, 10).await.unwrap();

        assert_eq!(total, MAX_EXPERIENCE);
    }
}
