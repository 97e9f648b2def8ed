//! Annualised performance metrics and regression beta/alpha.
//!
//! Annualisation uses the fixed 252-trading-day convention throughout.
//! Beta and alpha come from an ordinary least-squares fit of portfolio
//! returns on benchmark returns over their inner join (rows with a `NaN` on
//! either side are dropped before the fit).

use serde::Serialize;
use tracing::{debug, info};

use crate::drawdown::DrawdownSeries;
use crate::portfolio::PortfolioSeries;
use crate::types::{CoreError, ReturnSeries};

/// Trading days per year used for annualisation.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Minimum overlapping observations for a regression fit.
pub const MIN_REGRESSION_OBSERVATIONS: usize = 2;

/// The seven-field portfolio metrics report.
///
/// `sharpe_ratio` is `NaN` when the volatility is exactly zero; the ratio is
/// undefined there and must never panic.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    /// Geometric annualised return.
    pub annualized_return: f64,
    /// Sample daily standard deviation scaled by sqrt(252).
    pub annualized_volatility: f64,
    /// Annualised return over annualised volatility (`NaN` if volatility is 0).
    pub sharpe_ratio: f64,
    /// OLS slope of portfolio on benchmark returns.
    pub beta: f64,
    /// OLS intercept of portfolio on benchmark returns (daily).
    pub daily_alpha: f64,
    /// Daily alpha scaled by 252.
    pub annual_alpha: f64,
    /// Most negative drawdown of the historical curve.
    pub max_drawdown: f64,
}

impl PerformanceMetrics {
    /// The metrics as named rows, in report order.
    pub fn rows(&self) -> [(&'static str, f64); 7] {
        [
            ("Annualized Return", self.annualized_return),
            ("Annualized Volatility", self.annualized_volatility),
            ("Sharpe Ratio", self.sharpe_ratio),
            ("Beta", self.beta),
            ("Daily Alpha", self.daily_alpha),
            ("Annual Alpha", self.annual_alpha),
            ("Max Drawdown", self.max_drawdown),
        ]
    }
}

/// Per-asset regression coefficients against the benchmark.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AssetRegression {
    /// Ticker the coefficients belong to.
    pub ticker: String,
    /// OLS slope against the benchmark.
    pub beta: f64,
    /// OLS intercept against the benchmark (daily).
    pub daily_alpha: f64,
}

/// Selects the benchmark return vector from an aligned return table.
///
/// Uses the reference ticker's column when present, otherwise falls back to
/// the cross-sectional mean of all columns.
pub fn benchmark_returns(returns: &ReturnSeries, reference: &str) -> Vec<f64> {
    match returns.column(reference) {
        Some(column) => {
            debug!(ticker = reference, "using reference ticker as benchmark");
            column
        }
        None => {
            info!(
                ticker = reference,
                "reference ticker absent; falling back to cross-sectional mean benchmark"
            );
            returns.cross_sectional_mean()
        }
    }
}

/// Computes the full metrics report for a portfolio series.
///
/// The benchmark must be date-for-date compatible with the portfolio series
/// (one value per date, `NaN` for missing observations).
///
/// # Errors
///
/// - [`CoreError::EmptyInput`] for an empty portfolio series
/// - [`CoreError::LengthMismatch`] if the benchmark length differs
/// - [`CoreError::InsufficientOverlap`] if fewer than two rows survive the
///   inner join
/// - [`CoreError::DegenerateBenchmark`] if the benchmark has zero variance
///   over the overlap
pub fn compute(
    portfolio: &PortfolioSeries,
    benchmark: &[f64],
    drawdown: &DrawdownSeries,
) -> Result<PerformanceMetrics, CoreError> {
    if portfolio.is_empty() {
        return Err(CoreError::EmptyInput("portfolio return series"));
    }
    if benchmark.len() != portfolio.len() {
        return Err(CoreError::LengthMismatch {
            left: "portfolio returns",
            left_len: portfolio.len(),
            right: "benchmark returns",
            right_len: benchmark.len(),
        });
    }

    let (beta, daily_alpha) = ols(benchmark, portfolio.returns())?;

    let returns = portfolio.returns();
    let n = returns.len() as f64;
    let growth: f64 = returns.iter().map(|r| 1.0 + r).product();
    let annualized_return = growth.powf(TRADING_DAYS_PER_YEAR / n) - 1.0;
    let annualized_volatility = sample_std(returns) * TRADING_DAYS_PER_YEAR.sqrt();

    // Zero volatility leaves the ratio undefined; report the sentinel.
    let sharpe_ratio = if annualized_volatility == 0.0 {
        f64::NAN
    } else {
        annualized_return / annualized_volatility
    };

    Ok(PerformanceMetrics {
        annualized_return,
        annualized_volatility,
        sharpe_ratio,
        beta,
        daily_alpha,
        annual_alpha: daily_alpha * TRADING_DAYS_PER_YEAR,
        max_drawdown: drawdown.max_drawdown(),
    })
}

/// Regresses each ticker column on the benchmark.
///
/// Each column is inner-joined with the benchmark independently, so a gap in
/// one asset's history does not shrink another's fit.
///
/// # Errors
///
/// Same per-column rules as [`compute`]: at least two overlapping
/// observations and a non-degenerate benchmark.
pub fn asset_regressions(
    returns: &ReturnSeries,
    benchmark: &[f64],
) -> Result<Vec<AssetRegression>, CoreError> {
    if benchmark.len() != returns.n_rows() {
        return Err(CoreError::LengthMismatch {
            left: "return rows",
            left_len: returns.n_rows(),
            right: "benchmark returns",
            right_len: benchmark.len(),
        });
    }

    returns
        .tickers()
        .iter()
        .enumerate()
        .map(|(col, ticker)| {
            let column: Vec<f64> = (0..returns.n_rows()).map(|r| returns.row(r)[col]).collect();
            let (beta, daily_alpha) = ols(benchmark, &column)?;
            Ok(AssetRegression {
                ticker: ticker.clone(),
                beta,
                daily_alpha,
            })
        })
        .collect()
}

/// OLS slope and intercept of `y` on `x`, dropping `NaN` rows first.
fn ols(x: &[f64], y: &[f64]) -> Result<(f64, f64), CoreError> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter(|(a, b)| !a.is_nan() && !b.is_nan())
        .map(|(&a, &b)| (a, b))
        .collect();

    if pairs.len() < MIN_REGRESSION_OBSERVATIONS {
        return Err(CoreError::InsufficientOverlap {
            got: pairs.len(),
            need: MIN_REGRESSION_OBSERVATIONS,
        });
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    for (a, b) in &pairs {
        cov += (a - mean_x) * (b - mean_y);
        var_x += (a - mean_x) * (a - mean_x);
    }
    if var_x == 0.0 {
        return Err(CoreError::DegenerateBenchmark);
    }

    let beta = cov / var_x;
    let alpha = mean_y - beta * mean_x;
    Ok((beta, alpha))
}

/// Sample (n-1) standard deviation; `NaN` for fewer than two observations.
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1.0);
    var.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn dates(n: usize) -> Vec<NaiveDate> {
        (0..n)
            .map(|i| NaiveDate::from_num_days_from_ce_opt(738500 + i as i32).unwrap())
            .collect()
    }

    fn portfolio_from(returns: Vec<f64>) -> PortfolioSeries {
        PortfolioSeries::new(dates(returns.len()), returns).unwrap()
    }

    fn drawdown_for(series: &PortfolioSeries) -> DrawdownSeries {
        let curve = series.cumulative_curve();
        DrawdownSeries::from_curve(series.dates().to_vec(), &curve).unwrap()
    }

    #[test]
    fn test_annualized_return_constant_series() {
        // With a constant daily return the geometric annualisation collapses
        // to (1+r)^252 - 1 independent of the observation count.
        let portfolio = portfolio_from(vec![0.001; 10]);
        let benchmark: Vec<f64> = (0..10).map(|i| 0.001 + 0.0001 * i as f64).collect();
        let dd = drawdown_for(&portfolio);

        let metrics = compute(&portfolio, &benchmark, &dd).unwrap();
        let expected = 1.001_f64.powf(252.0) - 1.0;
        assert_relative_eq!(metrics.annualized_return, expected, epsilon = 1e-10);
    }

    #[test]
    fn test_annualized_volatility() {
        let portfolio = portfolio_from(vec![0.01, -0.01]);
        let benchmark = vec![0.02, -0.02];
        let dd = drawdown_for(&portfolio);

        let metrics = compute(&portfolio, &benchmark, &dd).unwrap();
        // Sample std of [0.01, -0.01] is sqrt(0.0002).
        let expected = 0.0002_f64.sqrt() * 252.0_f64.sqrt();
        assert_relative_eq!(metrics.annualized_volatility, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_beta_one_alpha_zero_against_self() {
        let returns = vec![0.01, -0.02, 0.015, 0.003];
        let portfolio = portfolio_from(returns.clone());
        let dd = drawdown_for(&portfolio);

        let metrics = compute(&portfolio, &returns, &dd).unwrap();
        assert_relative_eq!(metrics.beta, 1.0, epsilon = 1e-12);
        assert_relative_eq!(metrics.daily_alpha, 0.0, epsilon = 1e-15);
        assert_relative_eq!(metrics.annual_alpha, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_scaled_benchmark_beta() {
        let bench = vec![0.01, -0.02, 0.015, 0.003];
        let scaled: Vec<f64> = bench.iter().map(|r| 0.5 * r + 0.001).collect();
        let portfolio = portfolio_from(scaled);
        let dd = drawdown_for(&portfolio);

        let metrics = compute(&portfolio, &bench, &dd).unwrap();
        assert_relative_eq!(metrics.beta, 0.5, epsilon = 1e-12);
        assert_relative_eq!(metrics.daily_alpha, 0.001, epsilon = 1e-12);
    }

    #[test]
    fn test_sharpe_nan_on_zero_volatility() {
        // Constant portfolio return: zero variance, positive annual return.
        let portfolio = portfolio_from(vec![0.01; 4]);
        let benchmark = vec![0.02, -0.01, 0.005, 0.0];
        let dd = drawdown_for(&portfolio);

        let metrics = compute(&portfolio, &benchmark, &dd).unwrap();
        assert_eq!(metrics.annualized_volatility, 0.0);
        assert!(metrics.sharpe_ratio.is_nan());
        assert_relative_eq!(metrics.beta, 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_regression_drops_nan_rows() {
        let bench = vec![0.01, f64::NAN, 0.02, -0.01];
        let scaled = vec![0.02, 0.5, 0.04, -0.02]; // 2x benchmark where defined
        let portfolio = portfolio_from(scaled);
        let dd = drawdown_for(&portfolio);

        let metrics = compute(&portfolio, &bench, &dd).unwrap();
        assert_relative_eq!(metrics.beta, 2.0, epsilon = 1e-12);
        assert_relative_eq!(metrics.daily_alpha, 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_insufficient_overlap_is_fatal() {
        let portfolio = portfolio_from(vec![0.01, 0.02]);
        let benchmark = vec![0.01, f64::NAN];
        let dd = drawdown_for(&portfolio);

        assert_eq!(
            compute(&portfolio, &benchmark, &dd).unwrap_err(),
            CoreError::InsufficientOverlap { got: 1, need: 2 }
        );
    }

    #[test]
    fn test_degenerate_benchmark_is_fatal() {
        let portfolio = portfolio_from(vec![0.01, 0.02, -0.01]);
        let benchmark = vec![0.005; 3];
        let dd = drawdown_for(&portfolio);

        assert_eq!(
            compute(&portfolio, &benchmark, &dd).unwrap_err(),
            CoreError::DegenerateBenchmark
        );
    }

    #[test]
    fn test_benchmark_returns_prefers_reference_column() {
        let returns = ReturnSeries::new(
            dates(2),
            vec!["AAA".into(), "SPY".into()],
            vec![0.01, 0.02, 0.03, 0.04],
        )
        .unwrap();

        assert_eq!(benchmark_returns(&returns, "SPY"), vec![0.02, 0.04]);
    }

    #[test]
    fn test_benchmark_returns_falls_back_to_mean() {
        let returns = ReturnSeries::new(
            dates(2),
            vec!["AAA".into(), "BBB".into()],
            vec![0.01, 0.03, 0.02, 0.04],
        )
        .unwrap();

        let bench = benchmark_returns(&returns, "SPY");
        assert_relative_eq!(bench[0], 0.02, epsilon = 1e-15);
        assert_relative_eq!(bench[1], 0.03, epsilon = 1e-15);
    }

    #[test]
    fn test_asset_regressions() {
        let bench = vec![0.01, -0.02, 0.015];
        let returns = ReturnSeries::new(
            dates(3),
            vec!["HALF".into(), "DOUBLE".into()],
            vec![0.005, 0.02, -0.01, -0.04, 0.0075, 0.03],
        )
        .unwrap();

        let regs = asset_regressions(&returns, &bench).unwrap();
        assert_eq!(regs.len(), 2);
        assert_relative_eq!(regs[0].beta, 0.5, epsilon = 1e-12);
        assert_relative_eq!(regs[0].daily_alpha, 0.0, epsilon = 1e-15);
        assert_relative_eq!(regs[1].beta, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_metrics_rows_order() {
        let portfolio = portfolio_from(vec![0.01, -0.01]);
        let benchmark = vec![0.02, -0.02];
        let dd = drawdown_for(&portfolio);
        let metrics = compute(&portfolio, &benchmark, &dd).unwrap();

        let rows = metrics.rows();
        assert_eq!(rows[0].0, "Annualized Return");
        assert_eq!(rows[6].0, "Max Drawdown");
    }

    #[test]
    fn test_max_drawdown_passthrough() {
        let portfolio = portfolio_from(vec![0.015, -0.005]);
        let benchmark = vec![0.01, -0.01];
        let dd = drawdown_for(&portfolio);

        let metrics = compute(&portfolio, &benchmark, &dd).unwrap();
        assert_relative_eq!(metrics.max_drawdown, -0.005, epsilon = 1e-12);
    }
}
