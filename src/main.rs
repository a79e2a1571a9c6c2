//! Bytebank Dashboard CLI
//!
//! Command-line front end for the dashboard:
//! - Show the dashboard once
//! - Watch it, refreshing periodically
//! - Generate a default config file

use anyhow::Context;
use bytebank_dashboard::config::generate_default_config;
use bytebank_dashboard::*;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bytebank-dashboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Personal finance dashboard for Bytebank accounts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: standard locations, then environment)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the statement and print the dashboard once
    Show {
        /// Session token (default: BYTEBANK_TOKEN / config)
        #[arg(short, long)]
        token: Option<String>,
        /// Account to show (default: the user's first account)
        #[arg(short, long)]
        account: Option<String>,
    },

    /// Keep the dashboard on screen, refreshing periodically
    Watch {
        /// Session token (default: BYTEBANK_TOKEN / config)
        #[arg(short, long)]
        token: Option<String>,
        /// Account to show (default: the user's first account)
        #[arg(short, long)]
        account: Option<String>,
        /// Refresh interval in seconds (default: from config)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    init_logging(&config.logging);

    match cli.command {
        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }

        Commands::Show { token, account } => {
            config.validate()?;
            let dashboard = build_dashboard(&config, token, account)?;

            if let RefreshOutcome::Applied { request_id } = dashboard.refresh().await {
                tracing::debug!(request_id, "Dashboard refreshed");
            }
            print_state(&dashboard.snapshot(), cli.format, config.dashboard.top_categories)?;
        }

        Commands::Watch {
            token,
            account,
            interval,
        } => {
            config.validate()?;
            let dashboard = Arc::new(build_dashboard(&config, token, account)?);
            let hub = RefreshHub::default();
            let mut states = dashboard.subscribe();

            let runner = tokio::spawn(Arc::clone(&dashboard).run(hub.subscribe()));

            let period = Duration::from_secs(
                interval
                    .unwrap_or(config.dashboard.refresh_interval_secs)
                    .max(1),
            );
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;

            tracing::info!(interval_secs = period.as_secs(), "Watching dashboard");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        hub.notify();
                    }
                    changed = states.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let state = states.borrow_and_update().clone();
                        if !state.loading && !state.is_initial() {
                            print_state(&state, cli.format, config.dashboard.top_categories)?;
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("Shutting down...");
                        break;
                    }
                }
            }

            drop(hub);
            runner.abort();
        }
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| format!("bytebank_dashboard={}", logging.level)),
    );

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn build_dashboard(
    config: &Config,
    token: Option<String>,
    account: Option<String>,
) -> anyhow::Result<Dashboard> {
    let token = token
        .or_else(|| config.api.token.clone())
        .context("no session token (use --token or BYTEBANK_TOKEN)")?;

    let mut session = Session::with_token(token);
    if let Some(account) = account {
        session = session.account(account);
    }

    let client = StatementClient::new(StatementClientConfig::from(&config.api))?;
    let builder = config.dashboard.builder()?;

    Ok(Dashboard::new(
        Arc::new(client),
        Arc::new(SessionContext::new(session)),
        builder,
    ))
}

fn print_state(
    state: &DashboardState,
    format: OutputFormat,
    top_categories: usize,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => println!("{}", render_text(state, top_categories)),
        OutputFormat::Json => println!("{}", render_json(state)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_session_args_documented() {
        let cli = Cli::command();
        for name in ["show", "watch"] {
            let command = cli.find_subcommand(name).unwrap();
            for arg in ["token", "account"] {
                let arg = command
                    .get_arguments()
                    .find(|a| a.get_id().as_str() == arg)
                    .unwrap();
                assert!(arg.get_help().is_some(), "{name} --{}", arg.get_id());
            }
        }
    }
}
