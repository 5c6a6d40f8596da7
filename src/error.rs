use std::path::PathBuf;
use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

/// Conditions that prevent a chart from being mounted at all.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid drawing surface: width={width}, height={height}")]
    InvalidSurface { width: f32, height: f32 },
}

/// Failures reading a shot table from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file format: .{0}")]
    UnsupportedFormat(String),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot open workbook: {0}")]
    Excel(#[from] calamine::Error),

    #[error("workbook has no sheets")]
    NoSheets,

    #[error("no header row found")]
    NoHeader,
}

/// Failures reading the JSON configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
