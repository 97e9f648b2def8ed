//! Drawdown command: align, compose, and write the drawdown series.

use tracing::info;

use murphy_core::drawdown::DrawdownSeries;
use murphy_core::{align, portfolio};

use crate::error::Result;
use crate::io;

/// Runs the drawdown pipeline and writes the date-indexed series.
pub fn run(returns_path: &str, weights_path: &str, output_path: &str) -> Result<()> {
    let returns = io::read_return_file(returns_path)?;
    let weights = io::read_weight_file(weights_path)?;
    info!(
        tickers = returns.n_tickers(),
        rows = returns.n_rows(),
        weights = weights.len(),
        "loaded inputs"
    );

    let aligned = align::align(&returns, &weights)?;
    let portfolio = portfolio::compose(&aligned.returns, &aligned.weights)?;
    let curve = portfolio.cumulative_curve();
    let drawdown = DrawdownSeries::from_curve(portfolio.dates().to_vec(), &curve)?;

    io::write_drawdown_file(output_path, &drawdown)?;
    info!(
        output = output_path,
        max_drawdown = drawdown.max_drawdown(),
        "drawdown series written"
    );
    Ok(())
}
