use clap::Parser;
use github_wiki::cli::{run, Cli};
use tracing_subscriber::EnvFilter;

fn main() {
    // Load environment
    dotenvy::dotenv().ok();

    // Diagnostics go to stderr and stay silent unless RUST_LOG asks for more.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("CLI application startup: tracing initialised, environment loaded");

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => {
            tracing::info!("CLI completed successfully");
            std::process::exit(0);
        }
        Err(e) => {
            tracing::error!(error = %e, "CLI exited with error");
            std::process::exit(1);
        }
    }
}
