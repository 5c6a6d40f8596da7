use std::path::{Path, PathBuf};
use clap::Parser;
use serde::{Deserialize, Serialize};
use crate::data::mapping::ColumnMapping;
use crate::error::ConfigError;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "shotchart.json";

/// Chart and ingestion settings. Every field has a default so a partial
/// JSON file is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub columns: ColumnMapping,
    /// Number of histogram bins.
    pub bin_count: usize,
    /// Scatter surface size in points, `[width, height]`.
    pub scatter_size: [f32; 2],
    /// Histogram surface size in points, `[width, height]`.
    pub histogram_size: [f32; 2],
    /// Allowed zoom factor range, `[min, max]`.
    pub zoom_extent: [f64; 2],
    /// Shot marker radius in points.
    pub point_radius: f32,
    /// Quantile of shot distance used as the histogram upper bound.
    pub histogram_quantile: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Shot Chart".to_string(),
            columns: ColumnMapping::default(),
            bin_count: 30,
            scatter_size: [500.0, 470.0],
            histogram_size: [500.0, 140.0],
            zoom_extent: [0.8, 8.0],
            point_radius: 3.0,
            histogram_quantile: 0.99,
        }
    }
}

impl AppConfig {
    pub fn from_json(path: &Path, text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(path, &text)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Resolve the config: explicit path must load, the default file is
    /// optional, otherwise built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            Self::load(&default_path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Interactive shot chart over CSV or Excel shot logs
#[derive(Debug, Clone, Default, PartialEq, Eq, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Shot data file (.csv, .xls, .xlsx) to open at start-up
    pub data_file: Option<PathBuf>,

    /// JSON settings file (defaults to ./shotchart.json when present)
    #[arg(short, long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg = AppConfig::from_json(Path::new("t.json"), r#"{"bin_count": 12, "columns": {"x": "X"}}"#).unwrap();
        assert_eq!(cfg.bin_count, 12);
        assert_eq!(cfg.columns.x, "X");
        assert_eq!(cfg.columns.y, "LOC_Y");
        assert_eq!(cfg.zoom_extent, [0.8, 8.0]);
    }

    #[test]
    fn bad_json_reports_path() {
        let err = AppConfig::from_json(Path::new("bad.json"), "{").unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn cli_args_accept_data_and_config() {
        let args = CliArgs::try_parse_from(["shotchart", "shots.csv", "--config", "c.json"]).unwrap();
        assert_eq!(args.data_file, Some(PathBuf::from("shots.csv")));
        assert_eq!(args.config_file, Some(PathBuf::from("c.json")));

        let args = CliArgs::try_parse_from(["shotchart", "--config=x.json"]).unwrap();
        assert_eq!(args.data_file, None);
        assert_eq!(args.config_file, Some(PathBuf::from("x.json")));

        assert!(CliArgs::try_parse_from(["shotchart", "a.csv", "b.csv"]).is_err());
    }
}
