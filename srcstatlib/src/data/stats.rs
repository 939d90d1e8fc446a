//! Core data structures for line statistics.
//!
//! Vocabulary used throughout the crate:
//!
//! - **All**: every line
//! - **Code**: lines containing at least one code byte
//! - **Comment**: lines containing at least one comment byte
//! - **Empty**: lines containing neither code nor comment bytes
//! - **Bpl**: bytes per line
//! - **Lpf**: lines per file
//!
//! A line may be both code and comment (`x = 1 // set x`), so `code + comment`
//! can exceed `all`. Empty lines are disjoint from both.

use crate::error::SrcstatError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

/// Running sum and maximum of one byte category, folded line by line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ByteAccumulator {
    pub sum: u64,
    pub max: u64,
}

impl ByteAccumulator {
    /// Fold the byte count of one finished line.
    pub fn add(&mut self, bytes: u64) {
        self.sum += bytes;
        self.max = self.max.max(bytes);
    }

    /// Average bytes per line over `lines` lines, `None` when there are no lines.
    pub fn average(&self, lines: u64) -> Option<f64> {
        if lines == 0 {
            None
        } else {
            Some(self.sum as f64 / lines as f64)
        }
    }
}

/// Line totals and byte accumulators gathered by one classifier run.
///
/// This is the raw, unfinalized form of [`FileStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineTally {
    pub lines_all: u64,
    pub lines_code: u64,
    pub lines_comment: u64,
    pub lines_empty: u64,
    pub bytes_all: ByteAccumulator,
    pub bytes_code: ByteAccumulator,
    pub bytes_comment: ByteAccumulator,
}

/// How a file scan failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The path could not be opened
    Open,
    /// Reading failed after a successful open
    Read,
}

/// A per-file failure, recorded on the file's stats instead of aborting the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl ScanFailure {
    /// Record `err` as a failure of the given kind.
    pub fn new(kind: FailureKind, err: &SrcstatError) -> Self {
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

impl fmt::Display for ScanFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Paths are not always valid UTF-8; serialize them lossily like `Display` does.
fn serialize_path_lossy<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

/// Statistics for a single file.
///
/// Averages are `None` when the file has no lines (empty file or failed scan).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileStats {
    #[serde(serialize_with = "serialize_path_lossy")]
    pub path: PathBuf,
    pub error: Option<ScanFailure>,
    pub lines_all: u64,
    pub lines_code: u64,
    pub lines_comment: u64,
    pub lines_empty: u64,
    pub max_bpl_all: u64,
    pub max_bpl_code: u64,
    pub max_bpl_comment: u64,
    pub avg_bpl_all: Option<f64>,
    pub avg_bpl_code: Option<f64>,
    pub avg_bpl_comment: Option<f64>,
}

impl FileStats {
    /// Create empty stats carrying only the path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Stats for a file that could not be scanned. All counters stay zero.
    pub fn failed(path: impl Into<PathBuf>, failure: ScanFailure) -> Self {
        Self {
            error: Some(failure),
            ..Self::new(path)
        }
    }

    /// Finalize a classifier tally into per-file stats.
    pub fn from_tally(path: impl Into<PathBuf>, tally: &LineTally) -> Self {
        let lines = tally.lines_all;
        Self {
            path: path.into(),
            error: None,
            lines_all: tally.lines_all,
            lines_code: tally.lines_code,
            lines_comment: tally.lines_comment,
            lines_empty: tally.lines_empty,
            max_bpl_all: tally.bytes_all.max,
            max_bpl_code: tally.bytes_code.max,
            max_bpl_comment: tally.bytes_comment.max,
            avg_bpl_all: tally.bytes_all.average(lines),
            avg_bpl_code: tally.bytes_code.average(lines),
            avg_bpl_comment: tally.bytes_comment.average(lines),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// The failure message, or the empty string when the scan succeeded.
    pub fn error_message(&self) -> &str {
        self.error.as_ref().map_or("", |e| e.message.as_str())
    }
}

/// Max and average lines-per-file of one category across a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LpfSummary {
    pub max: u64,
    /// `None` when no file in the batch scanned successfully
    pub avg: Option<f64>,
}

/// Statistics for a batch of files, in input order.
///
/// The cross-file reductions only consider files that scanned without error;
/// failed files still appear in [`BatchStats::files`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchStats {
    files: Vec<FileStats>,
    pub lpf_all: LpfSummary,
    pub lpf_code: LpfSummary,
    pub lpf_comment: LpfSummary,
    pub lpf_empty: LpfSummary,
}

impl BatchStats {
    /// Reduce finalized file stats into batch stats, keeping their order.
    pub fn from_files(files: Vec<FileStats>) -> Self {
        let valid: Vec<&FileStats> = files.iter().filter(|f| f.is_ok()).collect();
        let reduce = |lines: fn(&FileStats) -> u64| {
            let mut acc = ByteAccumulator::default();
            for file in &valid {
                acc.add(lines(file));
            }
            LpfSummary {
                max: acc.max,
                avg: acc.average(valid.len() as u64),
            }
        };

        let lpf_all = reduce(|f| f.lines_all);
        let lpf_code = reduce(|f| f.lines_code);
        let lpf_comment = reduce(|f| f.lines_comment);
        let lpf_empty = reduce(|f| f.lines_empty);

        Self {
            files,
            lpf_all,
            lpf_code,
            lpf_comment,
            lpf_empty,
        }
    }

    pub fn files(&self) -> &[FileStats] {
        &self.files
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Number of files that scanned without error.
    pub fn valid_count(&self) -> usize {
        self.files.iter().filter(|f| f.is_ok()).count()
    }

    pub fn error_count(&self) -> usize {
        self.file_count() - self.valid_count()
    }

    /// Failed files, in input order.
    pub fn failures(&self) -> impl Iterator<Item = &FileStats> {
        self.files.iter().filter(|f| !f.is_ok())
    }
}
