use clap::Subcommand;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::cli::utils::{envelope_data, error_message, output_error, output_success};
use crate::cli::{ApiContext, OutputFormat};

#[derive(Subcommand)]
pub enum ExperienceCommands {
    #[command(about = "Show a member's level and progress")]
    Progress {
        #[arg(help = "Member UUID")]
        member_id: Uuid,
    },

    #[command(about = "Grant experience by raw amount or activity kind")]
    Grant {
        #[arg(help = "Member UUID")]
        member_id: Uuid,

        #[arg(long, help = "Raw experience amount")]
        amount: Option<i32>,

        #[arg(
            long,
            help = "Activity kind: todo_completed, challenge_todo_completed, daily_login"
        )]
        activity: Option<String>,
    },
}

pub async fn handle(
    cmd: ExperienceCommands,
    ctx: &ApiContext,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        ExperienceCommands::Progress { member_id } => {
            let res = ctx
                .get(&format!("/api/members/{}/experience", member_id))
                .send()
                .await?;
            let status = res.status();
            let body: Value = res.json().await?;

            if !status.is_success() {
                return output_error(output_format, &error_message(&body), None);
            }

            print_progress(output_format, &envelope_data(&body))
        }
        ExperienceCommands::Grant {
            member_id,
            amount,
            activity,
        } => {
            let payload = match (amount, activity) {
                (Some(amount), None) => json!({ "amount": amount }),
                (None, Some(activity)) => json!({ "activity": activity }),
                _ => anyhow::bail!("provide exactly one of --amount or --activity"),
            };

            let res = ctx
                .post(&format!("/api/members/{}/experience", member_id))
                .json(&payload)
                .send()
                .await?;
            let status = res.status();
            let body: Value = res.json().await?;

            if !status.is_success() {
                return output_error(output_format, &error_message(&body), None);
            }

            let data = envelope_data(&body);
            output_success(
                output_format,
                &format!("granted; total is now {}", data["experience"]),
                Some(data),
            )
        }
    }
}

fn print_progress(output_format: OutputFormat, progress: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(progress)?);
        }
        OutputFormat::Text => {
            println!(
                "level {} {:?} — {} xp ({}/{} in level, {} to next)",
                progress["currentLevel"],
                progress["levelName"].as_str().unwrap_or("?"),
                progress["currentExp"],
                progress["currentLevelProgress"],
                progress["currentLevelTotal"],
                progress["expToNextLevel"]
            );
        }
    }
    Ok(())
}
