//! Error types for srcstatlib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while scanning files or writing reports
#[derive(Error, Debug)]
pub enum SrcstatError {
    /// The path does not exist or cannot be opened for reading
    #[error("failed to open file '{path}': {source}")]
    FileOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An I/O error occurred after the file was opened
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A report destination cannot be created or written
    #[error("failed to write output '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}
