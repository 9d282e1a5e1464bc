use serde::{Deserialize, Serialize};

use crate::config::{self, ExperienceConfig};

/// Member activities that award experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    TodoCompleted,
    ChallengeTodoCompleted,
    DailyLogin,
}

impl Activity {
    /// Experience awarded for one occurrence of this activity.
    pub fn reward(self) -> i32 {
        self.reward_with(&config::config().experience)
    }

    pub fn reward_with(self, experience: &ExperienceConfig) -> i32 {
        match self {
            Activity::TodoCompleted => experience.todo_completion_xp,
            Activity::ChallengeTodoCompleted => experience.challenge_todo_completion_xp,
            Activity::DailyLogin => experience.daily_login_xp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewards() -> ExperienceConfig {
        ExperienceConfig {
            max_grant_amount: 10_000,
            todo_completion_xp: 10,
            challenge_todo_completion_xp: 20,
            daily_login_xp: 5,
        }
    }

    #[test]
    fn rewards_follow_config() {
        let config = rewards();
        assert_eq!(Activity::TodoCompleted.reward_with(&config), 10);
        assert_eq!(Activity::ChallengeTodoCompleted.reward_with(&config), 20);
        assert_eq!(Activity::DailyLogin.reward_with(&config), 5);
    }

    #[test]
    fn deserializes_from_snake_case() {
        let activity: Activity = serde_json::from_str("\"todo_completed\"").unwrap();
        assert_eq!(activity, Activity::TodoCompleted);
        let activity: Activity = serde_json::from_str("\"challenge_todo_completed\"").unwrap();
        assert_eq!(activity, Activity::ChallengeTodoCompleted);
    }

    #[test]
    fn rejects_unknown_activities() {
        assert!(serde_json::from_str::<Activity>("\"coffee_break\"").is_err());
    }
}
