pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ttodo")]
#[command(about = "TTODO CLI - Command-line client for the TTODO backend API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(
        long,
        global = true,
        help = "Server base URL (defaults to TTODO_SERVER or http://localhost:3000)"
    )]
    pub server: Option<String>,

    #[arg(long, global = true, help = "Bearer token (defaults to TTODO_TOKEN)")]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Server health and info")]
    Server {
        #[command(subcommand)]
        cmd: commands::server::ServerCommands,
    },

    #[command(about = "Level ladder inspection")]
    Level {
        #[command(subcommand)]
        cmd: commands::level::LevelCommands,
    },

    #[command(about = "Experience queries and grants")]
    Experience {
        #[command(subcommand)]
        cmd: commands::experience::ExperienceCommands,
    },

    #[command(about = "Token management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },
}

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Request context resolved from flags and environment.
pub struct ApiContext {
    pub base_url: String,
    pub token: Option<String>,
    client: reqwest::Client,
}

impl ApiContext {
    pub fn from_cli(cli: &Cli) -> Self {
        let base_url = cli
            .server
            .clone()
            .or_else(|| std::env::var("TTODO_SERVER").ok())
            .unwrap_or_else(|| "http://localhost:3000".to_string());
        let token = cli
            .token
            .clone()
            .or_else(|| std::env::var("TTODO_TOKEN").ok());

        Self {
            base_url,
            token,
            client: reqwest::Client::new(),
        }
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.with_auth(self.client.get(format!("{}{}", self.base_url, path)))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.with_auth(self.client.post(format!("{}{}", self.base_url, path)))
    }

    fn with_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = cli.output_format();
    let ctx = ApiContext::from_cli(&cli);

    match cli.command {
        Commands::Server { cmd } => commands::server::handle(cmd, &ctx, output_format).await,
        Commands::Level { cmd } => commands::level::handle(cmd, &ctx, output_format).await,
        Commands::Experience { cmd } => {
            commands::experience::handle(cmd, &ctx, output_format).await
        }
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format).await,
    }
}
