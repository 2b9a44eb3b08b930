//! Statistics Calculator Module
//! Label distribution, percentages and per-country breakdown of the
//! processed table.

use crate::data::schema::{has_column, string_values, COL_COUNTRY, COL_FINAL_LABEL};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label -> count.
pub type LabelCounts = BTreeMap<String, usize>;

/// Snapshot of the processed table, recomputed on every pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    /// Rows remaining after filtering.
    #[serde(rename = "total_startups")]
    pub total_count: usize,
    /// Every label seen at least once.
    #[serde(rename = "rocket_type_distribution")]
    pub label_counts: LabelCounts,
    /// Share of labelled rows per label, rounded to 2 decimals. The values
    /// need not add up to exactly 100.
    #[serde(rename = "percentages")]
    pub label_percentages: BTreeMap<String, f64>,
    /// Country -> label -> count. Only observed pairs are stored.
    #[serde(rename = "country_distribution")]
    pub country_label_breakdown: BTreeMap<String, LabelCounts>,
}

impl StatsSummary {
    /// Count for one label, zero when never seen.
    pub fn label_count(&self, label: &str) -> usize {
        self.label_counts.get(label).copied().unwrap_or(0)
    }

    /// Count for a (country, label) pair, zero when never seen.
    pub fn country_label_count(&self, country: &str, label: &str) -> usize {
        self.country_label_breakdown
            .get(country)
            .and_then(|labels| labels.get(label))
            .copied()
            .unwrap_or(0)
    }

    /// Rows that carry a label.
    pub fn labelled_count(&self) -> usize {
        self.label_counts.values().sum()
    }
}

/// Computes the statistics summary.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Summarize a processed table.
    ///
    /// Label statistics need `Final Label`. The country breakdown also needs
    /// `Country`. Rows missing either value are left out of the mappings but
    /// still count toward `total_count`.
    pub fn summarize(df: &DataFrame) -> PolarsResult<StatsSummary> {
        let mut summary = StatsSummary {
            total_count: df.height(),
            ..Default::default()
        };

        if !has_column(df, COL_FINAL_LABEL) {
            return Ok(summary);
        }

        let labels = string_values(df, COL_FINAL_LABEL)?;
        summary.label_counts = Self::value_counts(labels.iter().map(|l| l.as_deref()));
        summary.label_percentages = Self::percentages(&summary.label_counts);

        if has_column(df, COL_COUNTRY) {
            let countries = string_values(df, COL_COUNTRY)?;
            summary.country_label_breakdown = Self::cross_counts(&countries, &labels);
        }

        Ok(summary)
    }

    /// Count distinct non-null values.
    pub fn value_counts<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> LabelCounts {
        let mut counts = LabelCounts::new();
        for value in values.into_iter().flatten() {
            *counts.entry(value.to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Each count as a percentage of the sum, rounded to 2 decimals.
    pub fn percentages(counts: &LabelCounts) -> BTreeMap<String, f64> {
        let total: usize = counts.values().sum();
        if total == 0 {
            return BTreeMap::new();
        }

        counts
            .iter()
            .map(|(label, &count)| {
                let pct = count as f64 / total as f64 * 100.0;
                (label.clone(), round_to(pct, 2))
            })
            .collect()
    }

    /// Count (outer, inner) pairs where both values are present.
    pub fn cross_counts(
        outer: &[Option<String>],
        inner: &[Option<String>],
    ) -> BTreeMap<String, LabelCounts> {
        let mut breakdown: BTreeMap<String, LabelCounts> = BTreeMap::new();
        for (o, i) in outer.iter().zip(inner) {
            if let (Some(o), Some(i)) = (o, i) {
                *breakdown
                    .entry(o.clone())
                    .or_default()
                    .entry(i.clone())
                    .or_insert(0) += 1;
            }
        }
        breakdown
    }
}

/// Half-to-even rounding, so exact ties like 3.125 land on 3.12.
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_label_column_only_counts_rows() {
        let df = df!("Country" => ["France", "Egypt"]).unwrap();
        let stats = StatsCalculator::summarize(&df).unwrap();
        assert_eq!(stats.total_count, 2);
        assert!(stats.label_counts.is_empty());
        assert!(stats.label_percentages.is_empty());
        assert!(stats.country_label_breakdown.is_empty());
    }

    #[test]
    fn percentages_round_independently() {
        let df = df!("Final Label" => ["W", "X", "Y"]).unwrap();
        let stats = StatsCalculator::summarize(&df).unwrap();

        for label in ["W", "X", "Y"] {
            assert_eq!(stats.label_percentages[label], 33.33);
        }
        let sum: f64 = stats.label_percentages.values().sum();
        assert!((sum - 99.99).abs() < 1e-9);
    }

    #[test]
    fn exact_ties_round_to_even() {
        let mut labels = vec!["W"];
        labels.extend(std::iter::repeat("X").take(31));
        let df = df!("Final Label" => labels).unwrap();

        let stats = StatsCalculator::summarize(&df).unwrap();

        assert_eq!(stats.label_percentages["W"], 3.12);
        assert_eq!(stats.label_percentages["X"], 96.88);

        let counts: LabelCounts = [("Y".to_string(), 5), ("Z".to_string(), 27)]
            .into_iter()
            .collect();
        let pct = StatsCalculator::percentages(&counts);
        assert_eq!(pct["Y"], 15.62);
        assert_eq!(pct["Z"], 84.38);
    }

    #[test]
    fn missing_labels_are_excluded_from_distribution() {
        let df = df!(
            "Final Label" => [Some("W"), None, Some("W"), Some("Z")],
            "Country" => [Some("France"), Some("France"), None, Some("Egypt")],
        )
        .unwrap();

        let stats = StatsCalculator::summarize(&df).unwrap();

        assert_eq!(stats.total_count, 4);
        assert_eq!(stats.labelled_count(), 3);
        assert_eq!(stats.label_count("W"), 2);
        assert_eq!(stats.label_percentages["W"], 66.67);
        assert_eq!(stats.label_percentages["Z"], 33.33);

        assert_eq!(stats.country_label_count("France", "W"), 1);
        assert_eq!(stats.country_label_count("Egypt", "Z"), 1);
        assert_eq!(stats.country_label_count("Egypt", "W"), 0);
        assert_eq!(stats.country_label_count("Atlantis", "W"), 0);
        assert!(!stats.country_label_breakdown["Egypt"].contains_key("W"));
    }

    #[test]
    fn label_counts_sum_to_total_when_fully_labelled() {
        let df = df!(
            "Final Label" => ["W", "X", "X", "Unknown", "Z"],
            "Country" => ["India", "India", "Qatar", "Qatar", "Qatar"],
        )
        .unwrap();

        let stats = StatsCalculator::summarize(&df).unwrap();

        assert_eq!(stats.labelled_count(), stats.total_count);
        assert_eq!(stats.label_count("Unknown"), 1);
        assert_eq!(stats.country_label_breakdown["Qatar"].values().sum::<usize>(), 3);
    }

    #[test]
    fn summary_serializes_with_report_keys() {
        let df = df!("Final Label" => ["X"], "Country" => ["France"]).unwrap();
        let stats = StatsCalculator::summarize(&df).unwrap();

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["total_startups"], 1);
        assert_eq!(json["rocket_type_distribution"]["X"], 1);
        assert_eq!(json["percentages"]["X"], 100.0);
        assert_eq!(json["country_distribution"]["France"]["X"], 1);
    }
}
