//! CSV readers and writers for the service layer.
//!
//! Readers are generic over [`std::io::Read`] and take the input path only
//! for error context, so tests can drive them from strings. The file-based
//! wrappers at the bottom are what the commands call.
//!
//! Contracts:
//! - Return table: `Date` column (YYYY-MM-DD) plus one `f64` column per
//!   ticker; blank cells load as `NaN`.
//! - Weight vector: two columns, ticker then weight; a non-numeric first row
//!   is treated as a header.
//! - Drawdown series: `Date` plus a single `f64` column.
//! - Summaries: two-column `Metric,Value` tables.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim, Writer};

use murphy_core::drawdown::DrawdownSeries;
use murphy_core::metrics::AssetRegression;
use murphy_core::types::{ReturnSeries, WeightVector};

use crate::error::{CliError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

fn malformed(path: &str, source: csv::Error) -> CliError {
    CliError::MalformedCsv {
        path: path.to_string(),
        source,
    }
}

fn write_error(path: &str, err: csv::Error) -> CliError {
    let source = match err.into_kind() {
        csv::ErrorKind::Io(io) => io,
        other => std::io::Error::new(std::io::ErrorKind::InvalidData, format!("{other:?}")),
    };
    CliError::WriteFile {
        path: path.to_string(),
        source,
    }
}

fn parse_date(path: &str, row: usize, cell: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(cell, DATE_FORMAT).map_err(|_| CliError::BadCell {
        path: path.to_string(),
        row,
        column: "Date".to_string(),
        value: cell.to_string(),
        expected: "date (YYYY-MM-DD)",
    })
}

fn parse_f64(path: &str, row: usize, column: &str, cell: &str) -> Result<f64> {
    cell.parse::<f64>().map_err(|_| CliError::BadCell {
        path: path.to_string(),
        row,
        column: column.to_string(),
        value: cell.to_string(),
        expected: "f64",
    })
}

/// Reads a date-indexed return table.
///
/// Blank cells become `NaN`; downstream analytics drop them pairwise where
/// it matters.
pub fn read_return_table<R: Read>(reader: R, path: &str) -> Result<ReturnSeries> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = rdr.headers().map_err(|e| malformed(path, e))?.clone();
    let tickers: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

    let mut dates = Vec::new();
    let mut values = Vec::new();
    for (index, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| malformed(path, e))?;
        let row = index + 1;
        dates.push(parse_date(path, row, record.get(0).unwrap_or(""))?);
        for (j, ticker) in tickers.iter().enumerate() {
            let cell = record.get(j + 1).unwrap_or("");
            if cell.is_empty() {
                values.push(f64::NAN);
            } else {
                values.push(parse_f64(path, row, ticker, cell)?);
            }
        }
    }
    if dates.is_empty() {
        return Err(CliError::EmptyTable {
            path: path.to_string(),
        });
    }
    Ok(ReturnSeries::new(dates, tickers, values)?)
}

/// Reads a two-column weight vector, tolerating an optional header row.
pub fn read_weight_vector<R: Read>(reader: R, path: &str) -> Result<WeightVector> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .from_reader(reader);

    let mut pairs = Vec::new();
    for (index, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| malformed(path, e))?;
        let ticker = record.get(0).unwrap_or("");
        let raw = record.get(1).unwrap_or("");
        if ticker.is_empty() && raw.is_empty() {
            continue;
        }
        match raw.parse::<f64>() {
            Ok(weight) => pairs.push((ticker.to_string(), weight)),
            // A non-numeric first row is a header; later rows must parse.
            Err(_) if index == 0 => continue,
            Err(_) => {
                return Err(CliError::BadCell {
                    path: path.to_string(),
                    row: index + 1,
                    column: "weight".to_string(),
                    value: raw.to_string(),
                    expected: "f64",
                })
            }
        }
    }
    if pairs.is_empty() {
        return Err(CliError::EmptyTable {
            path: path.to_string(),
        });
    }
    Ok(WeightVector::new(pairs)?)
}

/// Reads a stored date-indexed drawdown series.
pub fn read_drawdown_series<R: Read>(reader: R, path: &str) -> Result<DrawdownSeries> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut dates = Vec::new();
    let mut values = Vec::new();
    for (index, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| malformed(path, e))?;
        let row = index + 1;
        dates.push(parse_date(path, row, record.get(0).unwrap_or(""))?);
        values.push(parse_f64(path, row, "drawdown", record.get(1).unwrap_or(""))?);
    }
    if dates.is_empty() {
        return Err(CliError::EmptyTable {
            path: path.to_string(),
        });
    }
    Ok(DrawdownSeries::new(dates, values)?)
}

/// Writes a drawdown series as `Date,Drawdown`.
pub fn write_drawdown_series<W: Write>(
    writer: W,
    series: &DrawdownSeries,
    path: &str,
) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(["Date", "Drawdown"])
        .map_err(|e| write_error(path, e))?;
    for (date, value) in series.dates().iter().zip(series.values()) {
        wtr.write_record([date.format(DATE_FORMAT).to_string(), value.to_string()])
            .map_err(|e| write_error(path, e))?;
    }
    wtr.flush().map_err(|source| CliError::WriteFile {
        path: path.to_string(),
        source,
    })
}

/// Writes named metric rows as a `Metric,Value` table.
pub fn write_metric_rows<W: Write>(writer: W, rows: &[(&str, f64)], path: &str) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(["Metric", "Value"])
        .map_err(|e| write_error(path, e))?;
    for (name, value) in rows {
        wtr.write_record([(*name).to_string(), value.to_string()])
            .map_err(|e| write_error(path, e))?;
    }
    wtr.flush().map_err(|source| CliError::WriteFile {
        path: path.to_string(),
        source,
    })
}

/// Writes the per-asset regression table.
pub fn write_asset_regressions<W: Write>(
    writer: W,
    regressions: &[AssetRegression],
    path: &str,
) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(["Ticker", "Beta", "Daily Alpha"])
        .map_err(|e| write_error(path, e))?;
    for reg in regressions {
        wtr.write_record([
            reg.ticker.clone(),
            reg.beta.to_string(),
            reg.daily_alpha.to_string(),
        ])
        .map_err(|e| write_error(path, e))?;
    }
    wtr.flush().map_err(|source| CliError::WriteFile {
        path: path.to_string(),
        source,
    })
}

fn open(path: &str) -> Result<File> {
    File::open(path).map_err(|source| CliError::ReadFile {
        path: path.to_string(),
        source,
    })
}

fn create(path: &Path) -> Result<File> {
    File::create(path).map_err(|source| CliError::WriteFile {
        path: path.display().to_string(),
        source,
    })
}

/// Loads a return table from disk.
pub fn read_return_file(path: &str) -> Result<ReturnSeries> {
    read_return_table(open(path)?, path)
}

/// Loads a weight vector from disk.
pub fn read_weight_file(path: &str) -> Result<WeightVector> {
    read_weight_vector(open(path)?, path)
}

/// Loads a drawdown series from disk.
pub fn read_drawdown_file(path: &str) -> Result<DrawdownSeries> {
    read_drawdown_series(open(path)?, path)
}

/// Writes a drawdown series to disk.
pub fn write_drawdown_file(path: &str, series: &DrawdownSeries) -> Result<()> {
    write_drawdown_series(create(Path::new(path))?, series, path)
}

/// Writes named metric rows to disk.
pub fn write_metrics_file(path: &Path, rows: &[(&str, f64)]) -> Result<()> {
    write_metric_rows(create(path)?, rows, &path.display().to_string())
}

/// Writes the per-asset regression table to disk.
pub fn write_asset_file(path: &str, regressions: &[AssetRegression]) -> Result<()> {
    write_asset_regressions(create(Path::new(path))?, regressions, path)
}
