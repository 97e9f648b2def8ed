//! Report command: performance metrics, optional per-asset regressions, and
//! the optional shock simulation summary.
//!
//! Every output is computed before anything is written, so a failure midway
//! through the analytics leaves no partial files behind.

use std::path::{Path, PathBuf};

use tracing::info;

use murphy_core::{align, metrics, portfolio};
use murphy_stress::simulate::{simulate, CancelToken, ShockModelParams};
use murphy_stress::summary::summarize;
use murphy_stress::{StressConfig, SummaryStats};

use crate::error::Result;
use crate::io;

const SIMULATION_SUMMARY_FILENAME: &str = "murphy_metrics.csv";

/// Options for the report pipeline beyond the three required inputs.
pub struct ReportOptions<'a> {
    /// Ticker used as the regression benchmark; falls back to the
    /// cross-sectional mean when absent from the return table.
    pub benchmark: &'a str,
    /// Run the shock simulation and write its summary.
    pub murphy: bool,
    /// Overrides the default simulation count.
    pub simulations: Option<usize>,
    /// Destination for the per-asset beta/alpha table.
    pub asset_output: Option<&'a str>,
}

/// Runs the report pipeline.
pub fn run(
    returns_path: &str,
    weights_path: &str,
    drawdown_path: &str,
    output_path: &str,
    options: &ReportOptions<'_>,
) -> Result<()> {
    let returns = io::read_return_file(returns_path)?;
    let weights = io::read_weight_file(weights_path)?;
    let drawdown = io::read_drawdown_file(drawdown_path)?;
    info!(
        tickers = returns.n_tickers(),
        rows = returns.n_rows(),
        "loaded report inputs"
    );

    let aligned = align::align(&returns, &weights)?;
    let portfolio = portfolio::compose(&aligned.returns, &aligned.weights)?;
    let benchmark = metrics::benchmark_returns(&aligned.returns, options.benchmark);

    let performance = metrics::compute(&portfolio, &benchmark, &drawdown)?;

    let regressions = match options.asset_output {
        Some(_) => Some(metrics::asset_regressions(&aligned.returns, &benchmark)?),
        None => None,
    };

    let simulation = if options.murphy {
        Some(run_simulation(&portfolio, options.simulations)?)
    } else {
        None
    };

    // All analytics done; writes start here.
    io::write_metrics_file(Path::new(output_path), &performance.rows())?;
    info!(output = output_path, "metrics summary written");

    if let (Some(path), Some(regressions)) = (options.asset_output, &regressions) {
        io::write_asset_file(path, regressions)?;
        info!(output = path, assets = regressions.len(), "asset regressions written");
    }

    if let Some(stats) = simulation {
        let path = simulation_summary_path(output_path);
        io::write_metrics_file(&path, &stats.rows())?;
        info!(output = %path.display(), "simulation summary written");
    }
    Ok(())
}

fn run_simulation(
    portfolio: &portfolio::PortfolioSeries,
    simulations: Option<usize>,
) -> Result<SummaryStats> {
    let params = ShockModelParams::estimate(portfolio)?;

    let mut builder = StressConfig::builder();
    if let Some(n) = simulations {
        builder = builder.n_simulations(n);
    }
    let config = builder.build()?;

    let matrix = simulate(params, &config, &CancelToken::new())?;
    Ok(summarize(&matrix))
}

/// The simulation summary lands next to the metrics output.
fn simulation_summary_path(output_path: &str) -> PathBuf {
    Path::new(output_path).with_file_name(SIMULATION_SUMMARY_FILENAME)
}
