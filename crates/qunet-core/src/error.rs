//! Error type shared by every qunet operation.

use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    // Input tables
    #[error("{path}: missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error("{path}: line {line}: column '{column}' is not a number: '{value}'")]
    Parse {
        path: PathBuf,
        line: u64,
        column: String,
        value: String,
    },

    #[error("{path}: malformed CSV: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    // Computation
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    // Files and configuration
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: invalid batch configuration: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path}: rendering failed: {message}")]
    Render { path: PathBuf, message: String },

    #[error("{failed} of {total} figures failed")]
    BatchFailed { failed: usize, total: usize },
}

impl Error {
    /// Wrap an I/O failure with the path that caused it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_message_names_column_and_path() {
        let err = Error::MissingColumn {
            path: PathBuf::from("data/1pair1path.csv"),
            column: "Fidelity".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Fidelity"));
        assert!(msg.contains("1pair1path.csv"));
    }

    #[test]
    fn test_io_helper_keeps_path() {
        let err = Error::io(
            "out/multiheat.png",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().starts_with("out/multiheat.png"));
    }
}
