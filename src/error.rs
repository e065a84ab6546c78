use thiserror::Error;

/// Failures the loaders can name precisely.
///
/// File-level plumbing (I/O, csv, JSON, parquet) is wrapped with
/// `anyhow::Context` at the call sites instead.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: unknown {column} label '{value}'")]
    UnknownLabel {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: '{value}' is not a valid year")]
    InvalidYear { row: usize, value: String },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("feature {index}: {reason}")]
    InvalidGeometry { index: usize, reason: String },
}
