use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env, Target};

use intraday_dash::app::{run_dashboard, run_fetch, DashboardPreset};
use intraday_dash::cli::{Cli, Commands};
use intraday_dash::config::load_config;
use intraday_dash::fetch::FetchRequest;
use intraday_dash::ui::{init_chart_theme, ChartTheme};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref(), cli.is_interactive())?;

    init_chart_theme(ChartTheme::default());
    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        None => run_dashboard(config, DashboardPreset::default()).await?,
        Some(Commands::Dashboard { symbol, interval }) => {
            run_dashboard(config, DashboardPreset { symbol, interval }).await?
        }
        Some(Commands::Fetch {
            symbol,
            interval,
            output_size,
            csv,
        }) => {
            let request = FetchRequest::new(
                &symbol,
                interval.unwrap_or(config.defaults.interval),
                output_size.unwrap_or(config.defaults.output_size),
            )?;
            run_fetch(config, request, csv).await?
        }
    }

    Ok(())
}

/// The dashboard owns the terminal, so logs are dropped unless RUST_LOG or a
/// log file asks for them.
fn init_logging(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let default_level = match (log_file, interactive) {
        (Some(_), _) => "info",
        (None, true) => "off",
        (None, false) => "warn",
    };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_level));

    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}
