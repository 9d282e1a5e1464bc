use sqlx::PgPool;
use std::sync::OnceLock;
use thiserror::Error;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::level::Level;

#[derive(Debug, Error)]
pub enum LevelTableError {
    #[error("level table is empty")]
    Empty,

    #[error("lowest level {level} requires {required_exp} experience; a zero-floor level is required")]
    MissingZeroFloor { level: i32, required_exp: i32 },

    #[error("duplicate level number: {0}")]
    DuplicateLevel(i32),

    #[error("required experience must increase strictly with level; level {0} breaks the order")]
    NonIncreasingExperience(i32),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

static TABLE: OnceLock<LevelTable> = OnceLock::new();

/// The level ladder, held sorted by level number.
///
/// Construction validates the shape the lookups rely on: a zero-floor
/// lowest level and strictly increasing experience requirements. After
/// that the table is immutable, so the process-wide instance is shared
/// without synchronization.
#[derive(Debug)]
pub struct LevelTable {
    entries: Vec<Level>,
}

impl LevelTable {
    pub fn from_entries(mut entries: Vec<Level>) -> Result<Self, LevelTableError> {
        if entries.is_empty() {
            return Err(LevelTableError::Empty);
        }

        entries.sort_by_key(|e| e.level);

        for pair in entries.windows(2) {
            if pair[1].level == pair[0].level {
                return Err(LevelTableError::DuplicateLevel(pair[1].level));
            }
            if pair[1].required_exp <= pair[0].required_exp {
                return Err(LevelTableError::NonIncreasingExperience(pair[1].level));
            }
        }

        let lowest = &entries[0];
        if lowest.required_exp != 0 {
            return Err(LevelTableError::MissingZeroFloor {
                level: lowest.level,
                required_exp: lowest.required_exp,
            });
        }

        Ok(Self { entries })
    }

    pub async fn load(pool: &PgPool) -> Result<Self, LevelTableError> {
        let entries =
            sqlx::query_as::<_, Level>("SELECT level, name, required_exp FROM levels ORDER BY level")
                .fetch_all(pool)
                .await
                .map_err(DatabaseError::from)?;

        Self::from_entries(entries)
    }

    /// The entry with the largest `required_exp <= experience`.
    ///
    /// None only for negative input; validation guarantees a zero floor,
    /// so every non-negative total matches some level.
    pub fn level_for_experience(&self, experience: i32) -> Option<&Level> {
        // required_exp increases with level, so the same order works for both
        let idx = self
            .entries
            .partition_point(|e| e.required_exp <= experience);
        if idx == 0 {
            None
        } else {
            Some(&self.entries[idx - 1])
        }
    }

    /// The entry numbered `level + 1`, or None at the top of the ladder.
    pub fn next_level(&self, level: i32) -> Option<&Level> {
        self.entries
            .binary_search_by_key(&(level + 1), |e| e.level)
            .ok()
            .map(|idx| &self.entries[idx])
    }

    pub fn entries(&self) -> &[Level] {
        &self.entries
    }

    /// Install the process-wide table. First caller wins; later calls
    /// return the already-installed instance.
    pub fn initialize(table: LevelTable) -> &'static LevelTable {
        TABLE.get_or_init(|| table)
    }

    /// Process-wide table, loading it from the database on first use when
    /// startup ran degraded (database unreachable at boot).
    pub async fn global_or_load() -> Result<&'static LevelTable, LevelTableError> {
        if let Some(table) = TABLE.get() {
            return Ok(table);
        }

        let pool = DatabaseManager::pool().await?;
        let table = Self::load(&pool).await?;
        Ok(TABLE.get_or_init(|| table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(level: i32, name: &str, required_exp: i32) -> Level {
        Level {
            level,
            name: name.to_string(),
            required_exp,
        }
    }

    fn sample_table() -> LevelTable {
        LevelTable::from_entries(vec![
            entry(1, "Sloth", 0),
            entry(2, "Rabbit", 300),
            entry(3, "Fox", 700),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_empty_table() {
        assert!(matches!(
            LevelTable::from_entries(vec![]),
            Err(LevelTableError::Empty)
        ));
    }

    #[test]
    fn rejects_missing_zero_floor() {
        let result = LevelTable::from_entries(vec![entry(1, "Sloth", 50)]);
        assert!(matches!(
            result,
            Err(LevelTableError::MissingZeroFloor { required_exp: 50, .. })
        ));
    }

    #[test]
    fn rejects_duplicate_levels() {
        let result =
            LevelTable::from_entries(vec![entry(1, "Sloth", 0), entry(1, "Rabbit", 300)]);
        assert!(matches!(result, Err(LevelTableError::DuplicateLevel(1))));
    }

    #[test]
    fn rejects_non_increasing_experience() {
        let result = LevelTable::from_entries(vec![
            entry(1, "Sloth", 0),
            entry(2, "Rabbit", 300),
            entry(3, "Fox", 300),
        ]);
        assert!(matches!(
            result,
            Err(LevelTableError::NonIncreasingExperience(3))
        ));
    }

    #[test]
    fn accepts_unsorted_input() {
        let table = LevelTable::from_entries(vec![
            entry(3, "Fox", 700),
            entry(1, "Sloth", 0),
            entry(2, "Rabbit", 300),
        ])
        .unwrap();
        assert_eq!(table.entries()[0].level, 1);
        assert_eq!(table.entries()[2].level, 3);
    }

    #[test]
    fn level_for_experience_picks_largest_floor() {
        let table = sample_table();
        assert_eq!(table.level_for_experience(0).unwrap().level, 1);
        assert_eq!(table.level_for_experience(299).unwrap().level, 1);
        assert_eq!(table.level_for_experience(300).unwrap().level, 2);
        assert_eq!(table.level_for_experience(699).unwrap().level, 2);
        assert_eq!(table.level_for_experience(700).unwrap().level, 3);
        assert_eq!(table.level_for_experience(1_000_000).unwrap().level, 3);
    }

    #[test]
    fn level_for_negative_experience_is_none() {
        assert!(sample_table().level_for_experience(-1).is_none());
    }

    #[test]
    fn staircase_is_non_decreasing() {
        let table = sample_table();
        let mut previous = 0;
        for experience in 0..1_200 {
            let level = table.level_for_experience(experience).unwrap().level;
            assert!(level >= previous, "level regressed at experience {experience}");
            previous = level;
        }
    }

    #[test]
    fn next_level_walks_the_ladder() {
        let table = sample_table();
        assert_eq!(table.next_level(1).unwrap().level, 2);
        assert_eq!(table.next_level(2).unwrap().level, 3);
        assert!(table.next_level(3).is_none());
    }
}
