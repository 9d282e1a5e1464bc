use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Mint a bearer token locally from the configured secret")]
    Token {
        #[arg(help = "Member UUID")]
        member_id: Uuid,

        #[arg(long, default_value = "dev@example.com", help = "Email claim")]
        email: String,
    },
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Token { member_id, email } => {
            let claims = Claims::new(member_id, email);
            let token = generate_jwt(&claims)?;

            output_success(
                output_format,
                "token minted",
                Some(json!({ "token": token, "expires_at": claims.exp })),
            )
        }
    }
}
