use clap::Subcommand;
use serde_json::Value;

use crate::cli::utils::{envelope_data, output_error, output_success};
use crate::cli::{ApiContext, OutputFormat};

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Check server health from the /health endpoint")]
    Ping,

    #[command(about = "Show server information from the API root endpoint")]
    Info,
}

pub async fn handle(
    cmd: ServerCommands,
    ctx: &ApiContext,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Ping => {
            let res = ctx.get("/health").send().await?;
            let status = res.status();
            let body: Value = res.json().await?;

            if status.is_success() {
                output_success(
                    output_format,
                    &format!("{} is healthy", ctx.base_url),
                    Some(envelope_data(&body)),
                )
            } else {
                output_error(
                    output_format,
                    &format!("{} is degraded ({})", ctx.base_url, status),
                    None,
                )
            }
        }
        ServerCommands::Info => {
            let res = ctx.get("/").send().await?;
            let body: Value = res.json().await?;
            output_success(output_format, "server info", Some(envelope_data(&body)))
        }
    }
}
