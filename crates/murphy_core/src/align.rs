//! Ticker alignment between a return table and a weight vector.
//!
//! The intersection preserves the return-table column order. Mismatches are
//! recoverable: weighted tickers without return data are dropped with a
//! warning, return columns without weights are dropped with an info note.
//! Only an empty intersection is fatal.

use tracing::{info, warn};

use crate::types::{CoreError, ReturnSeries, WeightVector};

/// Which tickers were dropped on each side during alignment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlignmentReport {
    /// Tickers with weights but no return column (dropped, warned).
    pub unpriced_weights: Vec<String>,
    /// Tickers with return data but no weight (dropped, informational).
    pub unweighted_returns: Vec<String>,
}

/// A return table and weight vector restricted to their common tickers.
///
/// `returns.tickers()` and `weights.tickers()` are identical and in the same
/// order, so the composer can take a straight dot product per row.
#[derive(Clone, Debug, PartialEq)]
pub struct Aligned {
    /// Return table restricted to the intersection.
    pub returns: ReturnSeries,
    /// Weight vector restricted and reordered to match `returns`.
    pub weights: WeightVector,
    /// What was dropped on each side.
    pub report: AlignmentReport,
}

/// Aligns a return table with a weight vector by ticker intersection.
///
/// # Errors
///
/// [`CoreError::NoCommonTickers`] if the intersection is empty.
pub fn align(returns: &ReturnSeries, weights: &WeightVector) -> Result<Aligned, CoreError> {
    let mut common_indices = Vec::new();
    let mut common_pairs = Vec::new();
    let mut unweighted_returns = Vec::new();

    for (col, ticker) in returns.tickers().iter().enumerate() {
        match weights.get(ticker) {
            Some(weight) => {
                common_indices.push(col);
                common_pairs.push((ticker.clone(), weight));
            }
            None => unweighted_returns.push(ticker.clone()),
        }
    }

    let unpriced_weights: Vec<String> = weights
        .tickers()
        .iter()
        .filter(|t| returns.ticker_index(t).is_none())
        .cloned()
        .collect();

    if common_indices.is_empty() {
        return Err(CoreError::NoCommonTickers);
    }

    if !unpriced_weights.is_empty() {
        warn!(
            tickers = ?unpriced_weights,
            "tickers have weights but no return data; dropping them"
        );
    }
    if !unweighted_returns.is_empty() {
        info!(
            tickers = ?unweighted_returns,
            "tickers have return data but no weights; ignoring them"
        );
    }

    let aligned_returns = returns.select_columns(&common_indices);
    let aligned_weights = WeightVector::new(common_pairs)?;

    Ok(Aligned {
        returns: aligned_returns,
        weights: aligned_weights,
        report: AlignmentReport {
            unpriced_weights,
            unweighted_returns,
        },
    })
}
