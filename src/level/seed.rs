use sqlx::PgPool;
use tracing::info;

use crate::database::manager::DatabaseError;
use crate::database::models::level::Level;

/// Default level ladder, levels 1 through 20.
const DEFAULT_LEVELS: &[(i32, &str, i32)] = &[
    (1, "Fresh Starter", 0),
    (2, "Maybe a Planner", 100),
    (3, "Definitely a Planner", 250),
    (4, "Three-Day Slump Breaker", 450),
    (5, "Sloth", 700),
    (6, "Miracle Morning", 1_000),
    (7, "Night Owl", 1_350),
    (8, "Promise Keeper", 1_750),
    (9, "Steady Tracker", 2_200),
    (10, "Power Planner", 2_700),
    (11, "Seasoned Tracker", 3_250),
    (12, "Challenger", 3_850),
    (13, "Habit Machine", 4_500),
    (14, "Consistency Royalty", 5_200),
    (15, "Helldive Trainee", 5_950),
    (16, "Helldive Veteran", 6_750),
    (17, "Helldive Master", 7_600),
    (18, "Infernal Commander", 8_500),
    (19, "Ladder Challenger", 9_450),
    (20, "Living Legend", 10_450),
];

/// The default ladder as model rows (also used by tests).
pub fn default_level_entries() -> Vec<Level> {
    DEFAULT_LEVELS
        .iter()
        .map(|&(level, name, required_exp)| Level {
            level,
            name: name.to_string(),
            required_exp,
        })
        .collect()
}

/// Insert the default ladder if the levels table is empty. Runs at every
/// startup; existing rows are left untouched.
pub async fn seed_default_levels(pool: &PgPool) -> Result<(), DatabaseError> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM levels")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        info!("Levels already initialized");
        return Ok(());
    }

    for &(level, name, required_exp) in DEFAULT_LEVELS {
        sqlx::query("INSERT INTO levels (level, name, required_exp) VALUES ($1, $2, $3)")
            .bind(level)
            .bind(name)
            .bind(required_exp)
            .execute(pool)
            .await?;
    }

    info!("Initialized {} levels", DEFAULT_LEVELS.len());
    Ok(())
}
