use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::fetch::{Interval, OutputSize};

#[derive(Parser)]
#[command(name = "intraday-dash")]
#[command(about = "Terminal dashboard for Alpha Vantage intraday stock prices")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to a JSON config file (defaults to intraday-dash.json when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Write logs to this file instead of discarding them
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive chart dashboard (default)
    Dashboard {
        /// Symbol to fetch on startup
        #[arg(short, long)]
        symbol: Option<String>,

        #[arg(short, long)]
        interval: Option<Interval>,
    },

    /// Fetch one series and print it without the dashboard
    Fetch {
        /// Ticker symbol, e.g. IBM
        symbol: String,

        #[arg(short, long)]
        interval: Option<Interval>,

        #[arg(short, long)]
        output_size: Option<OutputSize>,

        /// Print CSV instead of a table
        #[arg(long)]
        csv: bool,
    },
}

impl Cli {
    /// Whether the terminal UI will own stdout for this invocation.
    pub fn is_interactive(&self) -> bool {
        !matches!(self.command, Some(Commands::Fetch { .. }))
    }
}
