//! Data Processor Module
//! Filters, classifies and geo-enriches the startup table, then summarizes it.
//!
//! The pipeline is a fixed sequence of stages. Each stage is gated on the
//! columns it needs and is a no-op when they are absent:
//!
//! 1. `filter`   - keep "for profit" rows when `Type` exists
//! 2. `classify` - derive `rocket_type` from `Fund level`, then promote it to
//!    `Final Label` unless that column already exists
//! 3. `enrich`   - add `latitude` / `longitude` from `Country`

use crate::data::schema::{
    has_column, lossless_float_values, string_values, COL_COUNTRY, COL_FINAL_LABEL,
    COL_FUND_LEVEL, COL_LATITUDE, COL_LONGITUDE, COL_ROCKET_TYPE, COL_TYPE,
};
use crate::stats::{StatsCalculator, StatsSummary};
use crate::taxonomy::{classify_value, geo};
use polars::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

/// `Type` value (trimmed, lowercased) a row needs to survive the filter.
pub const FOR_PROFIT: &str = "for profit";

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Whether a stage changed the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Applied,
    Skipped,
}

type StageFn = fn(&mut DataFrame) -> Result<StageOutcome, ProcessorError>;

/// Pipeline stages in execution order.
const STAGES: [(&str, StageFn); 3] = [
    ("filter", DataProcessor::filter_for_profit),
    ("classify", DataProcessor::classify_fund_level),
    ("enrich", DataProcessor::enrich_coordinates),
];

/// Runs the classification pipeline over a startup table.
pub struct DataProcessor;

impl DataProcessor {
    /// Process a raw table into the enriched table plus its statistics.
    ///
    /// The input is never modified. An empty input is returned as-is with an
    /// empty summary.
    pub fn process(df: &DataFrame) -> Result<(DataFrame, StatsSummary), ProcessorError> {
        if df.height() == 0 {
            debug!("empty input, skipping pipeline");
            return Ok((df.clone(), StatsSummary::default()));
        }

        let mut processed = df.clone();
        for (name, stage) in STAGES {
            match stage(&mut processed)? {
                StageOutcome::Applied => {
                    debug!(stage = name, rows = processed.height(), "stage applied")
                }
                StageOutcome::Skipped => {
                    debug!(stage = name, "stage skipped, required column absent")
                }
            }
        }

        let stats = StatsCalculator::summarize(&processed)?;
        info!(
            input_rows = df.height(),
            output_rows = stats.total_count,
            labels = stats.label_counts.len(),
            "processed startup table"
        );

        Ok((processed, stats))
    }

    /// Keep only rows whose trimmed, lowercased `Type` is "for profit".
    ///
    /// Rows with a missing `Type` are dropped.
    pub fn filter_for_profit(df: &mut DataFrame) -> Result<StageOutcome, ProcessorError> {
        if !has_column(df, COL_TYPE) {
            return Ok(StageOutcome::Skipped);
        }

        let mask: BooleanChunked = string_values(df, COL_TYPE)?
            .iter()
            .map(|v| is_for_profit(v.as_deref()))
            .collect();
        *df = df.filter(&mask)?;

        Ok(StageOutcome::Applied)
    }

    /// Derive the rocket type from `Fund level` and settle the label column.
    ///
    /// A fresh `rocket_type` always replaces an older one. It is renamed to
    /// `Final Label` only when no `Final Label` exists yet.
    pub fn classify_fund_level(df: &mut DataFrame) -> Result<StageOutcome, ProcessorError> {
        let mut outcome = StageOutcome::Skipped;

        if has_column(df, COL_FUND_LEVEL) {
            let labels: Vec<&str> = string_values(df, COL_FUND_LEVEL)?
                .iter()
                .map(|v| classify_value(v.as_deref()).as_str())
                .collect();
            df.with_column(Column::new(COL_ROCKET_TYPE.into(), labels))?;
            outcome = StageOutcome::Applied;
        }

        if has_column(df, COL_ROCKET_TYPE) && !has_column(df, COL_FINAL_LABEL) {
            df.rename(COL_ROCKET_TYPE, COL_FINAL_LABEL.into())?;
            outcome = StageOutcome::Applied;
        }

        Ok(outcome)
    }

    /// Add centroid coordinates from `Country` when either coordinate column
    /// is missing.
    ///
    /// Values from a coordinate column that already exists are kept. Only
    /// nulls and the missing column are filled in. An existing column with
    /// cells that do not parse as numbers is left exactly as it was.
    pub fn enrich_coordinates(df: &mut DataFrame) -> Result<StageOutcome, ProcessorError> {
        if !has_column(df, COL_COUNTRY)
            || (has_column(df, COL_LATITUDE) && has_column(df, COL_LONGITUDE))
        {
            return Ok(StageOutcome::Skipped);
        }

        let height = df.height();
        let countries = string_values(df, COL_COUNTRY)?;
        let existing_lat = existing_floats(df, COL_LATITUDE, height)?;
        let existing_lon = existing_floats(df, COL_LONGITUDE, height)?;

        let lat_input = existing_lat.clone().unwrap_or_else(|| vec![None; height]);
        let lon_input = existing_lon.clone().unwrap_or_else(|| vec![None; height]);
        let (lats, lons): (Vec<f64>, Vec<f64>) = countries
            .iter()
            .zip(lat_input)
            .zip(lon_input)
            .map(|((country, lat), lon)| {
                let coords = geo::resolve(country.as_deref(), lat, lon);
                (coords.lat, coords.lon)
            })
            .unzip();

        if existing_lat.is_some() {
            df.with_column(Column::new(COL_LATITUDE.into(), lats))?;
        } else {
            warn!(column = COL_LATITUDE, "non-numeric coordinates kept as-is");
        }
        if existing_lon.is_some() {
            df.with_column(Column::new(COL_LONGITUDE.into(), lons))?;
        } else {
            warn!(column = COL_LONGITUDE, "non-numeric coordinates kept as-is");
        }

        Ok(StageOutcome::Applied)
    }
}

fn is_for_profit(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().to_lowercase() == FOR_PROFIT)
}

/// Numeric values of a coordinate column, all-`None` when the column is
/// absent, or `None` when it holds text that must not be rewritten.
fn existing_floats(
    df: &DataFrame,
    name: &str,
    height: usize,
) -> Result<Option<Vec<Option<f64>>>, ProcessorError> {
    if has_column(df, name) {
        Ok(lossless_float_values(df, name)?)
    } else {
        Ok(Some(vec![None; height]))
    }
}
