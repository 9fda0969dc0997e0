mod cli;
mod handlers;
mod output;
mod source;

use clap::Parser;
use cli::{Cli, Commands};
use pagewin_core::AppConfig;

fn load_config(path: Option<&str>) -> AppConfig {
    match path {
        Some(path) => match AppConfig::load_from(std::path::Path::new(path)) {
            Ok(config) => config,
            Err(e) => output::output_error(&format!("Invalid config {}: {}", path, e)),
        },
        None => AppConfig::load(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("PAGEWIN_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::WARN)
            .init();
    }

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Browse(args) => {
            if let Err(e) = handlers::browse::handle(&config, args).await {
                output::output_error(&e.to_string());
            }
        }
        Commands::Config => {
            let path = cli
                .config
                .or_else(|| AppConfig::config_path().map(|p| p.display().to_string()));
            handlers::config::handle(&config, path)?;
        }
    }

    Ok(())
}
