//! Application configuration.
//!
//! Sources, later ones overriding earlier ones:
//! 1. `config/default.{toml,json,yaml}` in the working directory (optional)
//! 2. the file passed with `--config`
//! 3. `COIQ__<SECTION>__<KEY>` environment variables

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_CONFIG_FILE: &str = "config/default";
const ENV_PREFIX: &str = "COIQ";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub output: OutputConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

/// Where `process` writes its results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub processed_csv: String,
    pub stats_json: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            processed_csv: "processed_startups.csv".to_string(),
            stats_json: "stats.json".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn processed_csv_path(&self) -> PathBuf {
        self.dir.join(&self.processed_csv)
    }

    pub fn stats_json_path(&self) -> PathBuf {
        self.dir.join(&self.stats_json)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Rows kept in the country frequency table.
    pub top_countries: usize,
    pub top_sectors: usize,
    /// Columns to break the labels down by.
    pub dimensions: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_countries: 15,
            top_sectors: 10,
            dimensions: vec!["Region".to_string(), "Sector".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` takes precedence.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut settings = config::Config::builder()
        .add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false));
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    }
    settings = settings.add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"));

    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_without_any_source() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.report.top_countries, 15);
        assert_eq!(cfg.report.top_sectors, 10);
        assert_eq!(
            cfg.output.processed_csv_path(),
            PathBuf::from("./processed_startups.csv")
        );
        assert_eq!(cfg.logging.filter, "info");
    }

    #[test]
    fn file_overrides_only_what_it_sets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coiq.toml");
        fs::write(
            &path,
            "[output]\ndir = \"out\"\n\n[report]\ntop_countries = 5\ndimensions = [\"Gender\"]\n",
        )
        .unwrap();

        let cfg = load(Some(path.to_str().unwrap())).unwrap();

        assert_eq!(cfg.output.dir, PathBuf::from("out"));
        assert_eq!(cfg.output.stats_json, "stats.json");
        assert_eq!(cfg.report.top_countries, 5);
        assert_eq!(cfg.report.top_sectors, 10);
        assert_eq!(cfg.report.dimensions, vec!["Gender".to_string()]);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        assert!(load(Some("/definitely/not/here.toml")).is_err());
    }
}
