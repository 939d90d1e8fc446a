//! Data collection: classify lines and aggregate statistics.
//!
//! - **Classifier**: streaming byte-level state machine that splits lines into
//!   code, comment and empty
//! - **Statistics**: per-file and per-batch data structures
//! - **Counting**: file and batch scanning (`scan_file`, `scan_batch`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use srcstatlib::data::{scan_batch, ScanOptions};
//!
//! let batch = scan_batch(&["src/main.c"], &ScanOptions::new());
//! println!("Max code lines: {}", batch.lpf_code.max);
//! ```

pub mod classifier;
pub mod counter;
pub mod stats;

pub use classifier::{
    classify_bytes, Classifier, ClassifierState, LineCounts, LineRecord, LineSink, LogSink,
    NoopSink,
};
pub use counter::{
    scan_batch, scan_file, scan_file_with_sink, scan_reader, ScanOptions, DEFAULT_CHUNK_SIZE,
};
pub use stats::{
    BatchStats, ByteAccumulator, FailureKind, FileStats, LineTally, LpfSummary, ScanFailure,
};
