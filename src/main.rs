//! `fewshot` binary entry point.

use fewshot_router::cli::commands::{handle_agents, handle_ask, handle_chat, handle_tools};
use fewshot_router::cli::{Cli, Commands};
use fewshot_router::config::RouterConfig;
use fewshot_router::error::RouterError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), RouterError> {
    let mut config = RouterConfig::load(cli.config.as_deref())?;
    cli.apply_to(&mut config);
    config.validate()?;

    match cli.command {
        Commands::Chat(args) => handle_chat(&config, args).await,
        Commands::Ask(args) => handle_ask(&config, args).await,
        Commands::Agents => handle_agents(),
        Commands::Tools => handle_tools(&config),
    }
}
