//! Portfolio Insights
//! Secondary views over the processed table: overview counters, the country
//! frequency table, map locations and per-dimension label breakdowns.

use crate::config::ReportConfig;
use crate::data::schema::{
    float_values, has_column, optional_string_values, string_values, COL_COUNTRY, COL_FINAL_LABEL,
    COL_LATITUDE, COL_LONGITUDE, COL_MVP, COL_SECTOR,
};
use crate::stats::calculator::{LabelCounts, StatsCalculator, StatsSummary};
use crate::taxonomy::RocketType;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

/// `MVP?` value counted as having a product.
const MVP_YES: &str = "Yes";

/// Headline counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub organizations: usize,
    pub countries: Option<usize>,
    pub sectors: Option<usize>,
    pub mvps: Option<usize>,
}

/// One row of the country frequency table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryRow {
    pub country: String,
    pub counts: LabelCounts,
    /// Sum of the W..Z counts; `Unknown` is not included.
    pub total: usize,
}

/// Number of startups placed on one map coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationCount {
    pub latitude: f64,
    pub longitude: f64,
    pub count: usize,
}

/// Dimension value -> label -> count.
pub type Breakdown = BTreeMap<String, LabelCounts>;

/// Everything the report command prints.
#[derive(Debug, Clone, Serialize)]
pub struct Insights {
    pub overview: Overview,
    pub key_label_counts: BTreeMap<String, usize>,
    pub top_countries: Vec<CountryRow>,
    pub locations: Vec<LocationCount>,
    pub top_sectors: Vec<(String, usize)>,
    pub breakdowns: BTreeMap<String, Breakdown>,
}

pub struct InsightsCalculator;

impl InsightsCalculator {
    /// Build the full insights report for a processed table.
    pub fn compute(
        df: &DataFrame,
        stats: &StatsSummary,
        config: &ReportConfig,
    ) -> PolarsResult<Insights> {
        Ok(Insights {
            overview: Self::overview(df)?,
            key_label_counts: Self::key_label_counts(stats),
            top_countries: Self::top_countries(stats, config.top_countries),
            locations: Self::location_counts(df)?,
            top_sectors: Self::value_counts(df, COL_SECTOR, config.top_sectors)?,
            breakdowns: Self::breakdowns_parallel(df, &config.dimensions)?,
        })
    }

    pub fn overview(df: &DataFrame) -> PolarsResult<Overview> {
        let distinct = |values: Vec<Option<String>>| {
            let mut present: Vec<String> = values.into_iter().flatten().collect();
            present.sort();
            present.dedup();
            present.len()
        };

        let countries = optional_string_values(df, COL_COUNTRY)?.map(distinct);
        let sectors = optional_string_values(df, COL_SECTOR)?.map(distinct);
        let mvps = optional_string_values(df, COL_MVP)?
            .map(|values| values.iter().filter(|v| v.as_deref() == Some(MVP_YES)).count());

        Ok(Overview {
            organizations: df.height(),
            countries,
            sectors,
            mvps,
        })
    }

    /// W, X, Y and Z counts with absent labels filled as zero.
    pub fn key_label_counts(stats: &StatsSummary) -> BTreeMap<String, usize> {
        RocketType::RANKED
            .iter()
            .map(|label| (label.to_string(), stats.label_count(label.as_str())))
            .collect()
    }

    /// Per-country label counts, largest total first.
    pub fn country_frequency_table(stats: &StatsSummary) -> Vec<CountryRow> {
        let mut rows: Vec<CountryRow> = stats
            .country_label_breakdown
            .iter()
            .map(|(country, counts)| {
                let total = RocketType::RANKED
                    .iter()
                    .map(|label| counts.get(label.as_str()).copied().unwrap_or(0))
                    .sum();
                CountryRow {
                    country: country.clone(),
                    counts: counts.clone(),
                    total,
                }
            })
            .collect();

        // BTreeMap iteration already orders by country; the sort is stable.
        rows.sort_by_key(|row| Reverse(row.total));
        rows
    }

    /// The `n` countries with the most startups, counting every label.
    ///
    /// Ranking includes `Unknown`, unlike the `total` shown on each row.
    pub fn top_countries(stats: &StatsSummary, n: usize) -> Vec<CountryRow> {
        let mut rows = Self::country_frequency_table(stats);
        rows.sort_by(|a, b| {
            let a_all: usize = a.counts.values().sum();
            let b_all: usize = b.counts.values().sum();
            b_all.cmp(&a_all).then_with(|| a.country.cmp(&b.country))
        });
        rows.truncate(n);
        rows
    }

    /// Startups grouped by exact coordinate, most populated first.
    pub fn location_counts(df: &DataFrame) -> PolarsResult<Vec<LocationCount>> {
        if !has_column(df, COL_LATITUDE) || !has_column(df, COL_LONGITUDE) {
            return Ok(Vec::new());
        }

        let lats = float_values(df, COL_LATITUDE)?;
        let lons = float_values(df, COL_LONGITUDE)?;

        let mut grouped: HashMap<(u64, u64), usize> = HashMap::new();
        for (lat, lon) in lats.into_iter().zip(lons) {
            if let (Some(lat), Some(lon)) = (lat, lon) {
                *grouped.entry((lat.to_bits(), lon.to_bits())).or_insert(0) += 1;
            }
        }

        let mut locations: Vec<LocationCount> = grouped
            .into_iter()
            .map(|((lat, lon), count)| LocationCount {
                latitude: f64::from_bits(lat),
                longitude: f64::from_bits(lon),
                count,
            })
            .collect();
        locations.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then(a.latitude.total_cmp(&b.latitude))
                .then(a.longitude.total_cmp(&b.longitude))
        });

        Ok(locations)
    }

    /// Most frequent values of `column`, ties broken alphabetically.
    pub fn value_counts(
        df: &DataFrame,
        column: &str,
        top_n: usize,
    ) -> PolarsResult<Vec<(String, usize)>> {
        let Some(values) = optional_string_values(df, column)? else {
            return Ok(Vec::new());
        };

        let counts = StatsCalculator::value_counts(values.iter().map(|v| v.as_deref()));
        let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(top_n);

        Ok(ranked)
    }

    /// Label counts per value of `dimension` (e.g. Region or Sector).
    pub fn label_breakdown_by(df: &DataFrame, dimension: &str) -> PolarsResult<Breakdown> {
        if !has_column(df, dimension) || !has_column(df, COL_FINAL_LABEL) {
            return Ok(Breakdown::new());
        }

        let keys = string_values(df, dimension)?;
        let labels = string_values(df, COL_FINAL_LABEL)?;
        Ok(StatsCalculator::cross_counts(&keys, &labels))
    }

    /// Compute label breakdowns for several dimensions in parallel.
    ///
    /// Dimensions missing from the table are left out of the result.
    pub fn breakdowns_parallel(
        df: &DataFrame,
        dimensions: &[String],
    ) -> PolarsResult<BTreeMap<String, Breakdown>> {
        dimensions
            .par_iter()
            .filter(|dimension| has_column(df, dimension))
            .map(|dimension| -> PolarsResult<(String, Breakdown)> {
                let breakdown = Self::label_breakdown_by(df, dimension)?;
                Ok((dimension.clone(), breakdown))
            })
            .collect()
    }
}
