use clap::Subcommand;
use serde_json::Value;

use crate::cli::utils::{envelope_data, error_message, output_error, output_success};
use crate::cli::{ApiContext, OutputFormat};

#[derive(Subcommand)]
pub enum LevelCommands {
    #[command(about = "List the level ladder")]
    List,
}

pub async fn handle(
    cmd: LevelCommands,
    ctx: &ApiContext,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        LevelCommands::List => {
            let res = ctx.get("/api/levels").send().await?;
            let status = res.status();
            let body: Value = res.json().await?;

            if !status.is_success() {
                return output_error(output_format, &error_message(&body), None);
            }

            let levels = envelope_data(&body);
            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&levels)?);
                }
                OutputFormat::Text => {
                    println!("{:>5}  {:>8}  name", "level", "min xp");
                    for entry in levels.as_array().into_iter().flatten() {
                        println!(
                            "{:>5}  {:>8}  {}",
                            entry["level"],
                            entry["required_exp"],
                            entry["name"].as_str().unwrap_or("?")
                        );
                    }
                }
            }
            Ok(())
        }
    }
}
