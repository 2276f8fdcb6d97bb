use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use portside::bridge::{self, EnvExecutionContext};
use portside::cli::{self, CliCommand};
use portside::config::ShellConfig;
use portside::state::ShellState;
use portside::{app_logger, shell};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match cli::parse(std::env::args().skip(1)) {
        Ok(CliCommand::Help) => {
            println!("{}", cli::usage());
            return Ok(());
        }
        Ok(CliCommand::Run(args)) => args,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    // No token in the environment means the host context has not handed
    // over yet. Nothing to render; not an error.
    let Some(context) = EnvExecutionContext::from_env(args.production_override) else {
        eprintln!(
            "[portside] {} is not set; waiting for the host context. Nothing to render.",
            bridge::TOKEN_ENV
        );
        return Ok(());
    };

    let state = Arc::new(ShellState::new(ShellConfig::load()));

    let console = shell::bootstrap(Arc::new(context), state.clone())
        .await
        .map_err(anyhow::Error::msg)
        .context("console bootstrap failed")?;

    println!("{}", console.render(&args.path));

    if args.show_logs {
        println!("\n--- session log ({}) ---", state.session_id);
        for entry in state.log_entries(0) {
            println!(
                "{} {} {}: {}",
                entry.timestamp_ms,
                level_tag(entry.level),
                entry.source,
                entry.message
            );
        }
    }

    Ok(())
}

fn level_tag(level: app_logger::LogLevel) -> &'static str {
    match level {
        app_logger::LogLevel::Info => "INFO ",
        app_logger::LogLevel::Warn => "WARN ",
        app_logger::LogLevel::Error => "ERROR",
    }
}
