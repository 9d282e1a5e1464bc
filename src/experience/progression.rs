use serde::Serialize;
use thiserror::Error;

use crate::level::LevelTable;

#[derive(Debug, Error)]
pub enum ProgressionError {
    #[error("experience must be non-negative, got {0}")]
    NegativeExperience(i32),

    #[error("no level matches experience {0}; the level table has no zero floor")]
    NoMatchingLevel(i32),
}

/// Snapshot of a member's standing in the level ladder, computed fresh
/// from the accumulated total on every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progression {
    pub current_level: i32,
    pub level_name: String,
    pub current_exp: i32,
    pub current_level_min_exp: i32,
    pub exp_to_next_level: i32,
    pub current_level_progress: i32,
    pub current_level_total: i32,
}

/// Map an accumulated experience total onto the ladder.
///
/// At the top level there is no next floor: the remaining distance is 0
/// and the band width equals the progress made past the floor, so the
/// band reads as complete however far the total grows.
pub fn progression(table: &LevelTable, experience: i32) -> Result<Progression, ProgressionError> {
    if experience < 0 {
        return Err(ProgressionError::NegativeExperience(experience));
    }

    let current = table
        .level_for_experience(experience)
        .ok_or(ProgressionError::NoMatchingLevel(experience))?;
    let min_exp = current.required_exp;

    let snapshot = match table.next_level(current.level) {
        Some(next) => Progression {
            current_level: current.level,
            level_name: current.name.clone(),
            current_exp: experience,
            current_level_min_exp: min_exp,
            exp_to_next_level: (next.required_exp - experience).max(0),
            current_level_progress: experience - min_exp,
            current_level_total: next.required_exp - min_exp,
        },
        None => {
            let progress = experience - min_exp;
            Progression {
                current_level: current.level,
                level_name: current.name.clone(),
                current_exp: experience,
                current_level_min_exp: min_exp,
                exp_to_next_level: 0,
                current_level_progress: progress,
                current_level_total: progress,
            }
        }
    };

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::level::Level;

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
    fn zero_experience_is_lowest_level_with_no_progress() {
        let snapshot = progression(&sample_table(), 0).unwrap();
        assert_eq!(snapshot.current_level, 1);
        assert_eq!(snapshot.level_name, "Sloth");
        assert_eq!(snapshot.current_exp, 0);
        assert_eq!(snapshot.current_level_min_exp, 0);
        assert_eq!(snapshot.current_level_progress, 0);
        assert_eq!(snapshot.exp_to_next_level, 300);
        assert_eq!(snapshot.current_level_total, 300);
    }

    #[test]
    fn mid_ladder_snapshot() {
        let snapshot = progression(&sample_table(), 500).unwrap();
        assert_eq!(snapshot.current_level, 2);
        assert_eq!(snapshot.level_name, "Rabbit");
        assert_eq!(snapshot.current_exp, 500);
        assert_eq!(snapshot.current_level_min_exp, 300);
        assert_eq!(snapshot.exp_to_next_level, 200);
        assert_eq!(snapshot.current_level_progress, 200);
        assert_eq!(snapshot.current_level_total, 400);
    }

    #[test]
    fn top_level_snapshot_reads_complete() {
        let snapshot = progression(&sample_table(), 850).unwrap();
        assert_eq!(snapshot.current_level, 3);
        assert_eq!(snapshot.level_name, "Fox");
        assert_eq!(snapshot.current_exp, 850);
        assert_eq!(snapshot.current_level_min_exp, 700);
        assert_eq!(snapshot.exp_to_next_level, 0);
        assert_eq!(snapshot.current_level_progress, 150);
        assert_eq!(snapshot.current_level_total, 150);
    }

    #[test]
    fn top_level_distance_stays_zero_as_experience_grows() {
        let table = sample_table();
        for experience in [700, 701, 10_000, 1_000_000] {
            let snapshot = progression(&table, experience).unwrap();
            assert_eq!(snapshot.current_level, 3);
            assert_eq!(snapshot.exp_to_next_level, 0);
        }
    }

    #[test]
    fn floor_never_exceeds_experience() {
        let table = sample_table();
        for experience in 0..1_200 {
            let snapshot = progression(&table, experience).unwrap();
            assert!(snapshot.current_level_min_exp <= experience);
        }
    }

    #[test]
    fn rejects_negative_experience() {
        assert!(matches!(
            progression(&sample_table(), -5),
            Err(ProgressionError::NegativeExperience(-5))
        ));
    }

    #[test]
    fn serializes_with_camel_case_field_names() {
        let snapshot = progression(&sample_table(), 500).unwrap();
        let value = serde_json::to_value(&snapshot).unwrap();
        for field in [
            "currentLevel",
            "levelName",
            "currentExp",
            "currentLevelMinExp",
            "expToNextLevel",
            "currentLevelProgress",
            "currentLevelTotal",
        ] {
            assert!(value.get(field).is_some(), "missing field {field}");
        }
    }
}
