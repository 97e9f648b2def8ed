//! Murphy CLI - portfolio drawdown analysis and stress reporting.
//!
//! # Commands
//!
//! - `murphy drawdown` - Compose the weighted portfolio and write its
//!   drawdown series
//! - `murphy report` - Write the performance metrics summary, optionally
//!   with per-asset regressions and the shock simulation summary

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod error;
mod io;

pub use error::{CliError, Result};

use commands::report::ReportOptions;

/// Portfolio analytics and shock stress-testing CLI
#[derive(Parser)]
#[command(name = "murphy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the weighted portfolio drawdown series
    Drawdown {
        /// Path to the return table CSV
        #[arg(short, long)]
        returns: String,

        /// Path to the weight vector CSV
        #[arg(short, long)]
        weights: String,

        /// Output path for the drawdown series CSV
        #[arg(short, long)]
        output: String,
    },

    /// Generate the performance metrics report
    Report {
        /// Path to the return table CSV
        #[arg(short, long)]
        returns: String,

        /// Path to the weight vector CSV
        #[arg(short, long)]
        weights: String,

        /// Path to the stored drawdown series CSV
        #[arg(short, long)]
        drawdown: String,

        /// Output path for the metrics summary CSV
        #[arg(short, long)]
        output: String,

        /// Benchmark ticker for the regression
        #[arg(short, long, default_value = "SPY")]
        benchmark: String,

        /// Run the shock simulation and write its summary
        #[arg(short, long)]
        murphy: bool,

        /// Number of simulated paths (overrides the default)
        #[arg(short, long)]
        simulations: Option<usize>,

        /// Output path for the per-asset beta/alpha table
        #[arg(short, long)]
        asset_output: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" }));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Drawdown {
            returns,
            weights,
            output,
        } => commands::drawdown::run(&returns, &weights, &output),
        Commands::Report {
            returns,
            weights,
            drawdown,
            output,
            benchmark,
            murphy,
            simulations,
            asset_output,
        } => commands::report::run(
            &returns,
            &weights,
            &drawdown,
            &output,
            &ReportOptions {
                benchmark: &benchmark,
                murphy,
                simulations,
                asset_output: asset_output.as_deref(),
            },
        ),
    }
}
