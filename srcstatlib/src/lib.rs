//! # srcstatlib
//!
//! A line-oriented source statistics library: classifies every line of a file
//! as code, comment or empty and reports per-file and per-batch statistics.
//!
//! ## Overview
//!
//! The core is a single-pass, byte-level [`Classifier`] that recognizes `//`
//! line comments and `/* */` block comments while streaming a file in
//! fixed-size chunks. It keeps one byte of lookbehind and two comment flags,
//! so results never depend on where chunks are split.
//!
//! For every line it counts:
//!
//! - **Code** bytes: anything outside a comment except whitespace and `/`, `*`
//! - **Comment** bytes: the same, inside a comment
//! - **All** bytes: every byte, including the line break
//!
//! A line is a code line if it has code bytes, a comment line if it has comment
//! bytes (it can be both), and empty if it has neither.
//!
//! This is a heuristic, not a parser. String literals are not understood and
//! block comments do not nest.
//!
//! ## Example
//!
//! ```rust
//! use srcstatlib::{scan_batch, ScanOptions};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! let path = dir.path().join("lib.c");
//! fs::write(&path, "int x; // counter\n\n/* done */\n").unwrap();
//!
//! let batch = scan_batch(&[&path], &ScanOptions::new());
//! let stats = &batch.files()[0];
//! assert_eq!(stats.lines_all, 3);
//! assert_eq!(stats.lines_code, 1);
//! assert_eq!(stats.lines_comment, 2);
//! assert_eq!(stats.lines_empty, 1);
//! ```

pub mod data;
pub mod error;
pub mod output;

pub use data::{
    classify_bytes, scan_batch, scan_file, scan_file_with_sink, scan_reader, BatchStats,
    ByteAccumulator, Classifier, ClassifierState, FailureKind, FileStats, LineCounts, LineRecord,
    LineSink, LineTally, LogSink, LpfSummary, NoopSink, ScanFailure, ScanOptions,
    DEFAULT_CHUNK_SIZE,
};
pub use error::SrcstatError;
pub use output::{to_json, write_summary, write_tsv};

/// Result type for srcstatlib operations
pub type Result<T> = std::result::Result<T, SrcstatError>;
