//! Error type for the fallible edges of the crate.
//!
//! Formatting itself never fails; only config loading and PDF compilation do.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ExplainError {
    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Config file could not be parsed or holds an unusable value.
    #[error("config error: {message}")]
    Config { message: String },

    /// Typst rejected the generated markup.
    #[error("Typst compilation failed: {0}")]
    Typst(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

pub type Result<T> = std::result::Result<T, ExplainError>;

impl ExplainError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
