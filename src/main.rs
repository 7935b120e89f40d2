#![forbid(unsafe_code)]

use clap::Parser;
use tracing_subscriber::EnvFilter;

use slider_search::cli::{self, Cli};

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let color = std::io::IsTerminal::is_terminal(&std::io::stdout());
    let result = cli::run(cli, &mut std::io::stdout().lock(), color);
    match result {
        Ok(status) => std::process::exit(status.exit_code()),
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(cli::ERROR_EXIT_CODE);
        }
    }
}
