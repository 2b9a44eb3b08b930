//! CSV Data Loader Module
//! Reads the uploaded startup table using Polars.

use crate::data::schema::{has_column, string_values, RECOGNIZED_COLUMNS};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Rows sampled for dtype inference.
const INFER_SCHEMA_ROWS: usize = 10_000;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("File not found: {0}")]
    NotFound(PathBuf),
}

/// Holds the most recently loaded startup table.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Load a headered CSV file. Malformed rows fail the whole load.
    pub fn load_csv(&mut self, file_path: impl AsRef<Path>) -> Result<&DataFrame, LoaderError> {
        let path = file_path.as_ref();
        if !path.is_file() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }
        self.file_path = Some(path.to_path_buf());

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .finish()?
            .collect()?;

        info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "loaded csv"
        );
        let unrecognized = unrecognized_columns(&df);
        if !unrecognized.is_empty() {
            debug!(?unrecognized, "columns passed through untouched");
        }

        Ok(&*self.df.insert(df))
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Recognized columns present in the loaded table.
    pub fn get_recognized_columns(&self) -> Vec<&'static str> {
        let Some(df) = &self.df else {
            return Vec::new();
        };

        RECOGNIZED_COLUMNS
            .iter()
            .copied()
            .filter(|name| has_column(df, name))
            .collect()
    }

    /// Sorted distinct non-null values of a column.
    pub fn get_unique_values(&self, column: &str) -> Vec<String> {
        let Some(df) = &self.df else {
            return Vec::new();
        };

        let mut values: Vec<String> = string_values(df, column)
            .map(|vals| vals.into_iter().flatten().collect())
            .unwrap_or_default();
        values.sort();
        values.dedup();
        values
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }
}

/// Columns of `df` outside the recognized set.
pub fn unrecognized_columns(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .filter(|name| !RECOGNIZED_COLUMNS.contains(&name.as_str()))
        .map(|name| name.to_string())
        .collect()
}
