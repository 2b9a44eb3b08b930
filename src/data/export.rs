//! Export Module
//! Writes the processed table as CSV and the statistics as JSON.

use crate::stats::StatsSummary;
use polars::prelude::*;
use serde::Serialize;
use std::fs::{self, File};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write the processed table with a header row, creating parent directories.
pub fn write_processed_csv(df: &mut DataFrame, path: &Path) -> Result<(), ExportError> {
    create_parent(path)?;
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    info!(path = %path.display(), rows = df.height(), "wrote processed csv");
    Ok(())
}

/// Write the statistics summary as pretty-printed JSON.
pub fn write_stats_json(stats: &StatsSummary, path: &Path) -> Result<(), ExportError> {
    write_json(stats, path)?;
    info!(path = %path.display(), "wrote statistics");
    Ok(())
}

/// Write any serializable report as pretty-printed JSON.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), ExportError> {
    create_parent(path)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, value)?;
    Ok(())
}

fn create_parent(path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_csv_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        let mut df = df!("Name" => ["Acme"], "Final Label" => ["X"]).unwrap();

        write_processed_csv(&mut df, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().next(), Some("Name,Final Label"));
        assert_eq!(written.lines().nth(1), Some("Acme,X"));
    }

    #[test]
    fn stats_json_uses_report_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        let stats = StatsSummary {
            total_count: 3,
            label_counts: [("W".to_string(), 3)].into_iter().collect(),
            ..Default::default()
        };

        write_stats_json(&stats, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["total_startups"], 3);
        assert_eq!(value["rocket_type_distribution"]["W"], 3);
        assert!(value["percentages"].as_object().unwrap().is_empty());
        assert!(value["country_distribution"].as_object().unwrap().is_empty());
    }
}
