use clap::Parser;
use ttodo_api::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env so token minting sees SECURITY_JWT_SECRET
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = ttodo_api::cli::run(cli).await {
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
