use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tubank_auth::config::{load_config, print_schema};
use tubank_auth::startup::run;
use tubank_auth::utils::logger::init_logging;

/// Local PIN / biometric authentication for the TUBANK app, driven from a terminal keypad.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the YAML configuration file.
    #[arg(short, long, default_value = "./config.yaml")]
    config: PathBuf,

    /// Print the configuration JSON schema and exit.
    #[arg(long)]
    schema: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if args.schema {
        if let Err(e) = print_schema() {
            eprintln!("Failed to render schema: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let config = Arc::new(load_config(&args.config));

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(config).await {
        tracing::error!("Session failed: {}", e);
        std::process::exit(1);
    }
}
