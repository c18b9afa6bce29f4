use std::path::PathBuf;

/// Failures reported by the analytics engine.
///
/// Every operation returns one of these instead of a sentinel number so a
/// caller can tell "no data" apart from a legitimate zero result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalyticsError {
    #[error("series contains no present samples")]
    EmptySeries,

    #[error("{method} needs at least {required} points, got {actual}")]
    InsufficientPoints {
        method: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("x-axis scale must be a positive finite number, got {0}")]
    InvalidScale(f64),

    #[error("x data has {x} values but y data has {y}")]
    MismatchedLengths { x: usize, y: usize },
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Failures while reading or writing an `AnalyticsConfig` file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot access config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(#[from] AnalyticsError),
}

/// Failures while loading tabular sample data.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("cannot read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot read workbook: {0}")]
    Excel(String),

    #[error("unsupported file format: .{0}")]
    UnsupportedFormat(String),

    #[error("no data found after header detection")]
    NoData,

    #[error("column {0:?} not found")]
    ColumnNotFound(String),
}
