//! Logsift CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use logsift::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init(args) => logsift::cli::commands::init::execute(args, cli.json).await,
        Commands::Classify(args) => logsift::cli::commands::classify::execute(args, cli.json).await,
        Commands::Bug(args) => logsift::cli::commands::bug::execute(args, cli.json).await,
        Commands::Errors(args) => logsift::cli::commands::errors::execute(args, cli.json).await,
    };

    if let Err(err) = result {
        logsift::cli::handle_error(err, cli.json);
    }
}
