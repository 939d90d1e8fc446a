//! Output formatting: present batch stats as text, TSV or JSON.
//!
//! Writers take any [`std::io::Write`] so the caller decides whether the
//! report lands on stdout, in a file or in a buffer.
//!
//! ## Example
//!
//! ```rust
//! use srcstatlib::output::{write_summary, write_tsv};
//! use srcstatlib::{BatchStats, FileStats};
//!
//! let batch = BatchStats::from_files(vec![FileStats::new("a.c")]);
//!
//! let mut summary = Vec::new();
//! write_summary(&batch, &mut summary).unwrap();
//! assert!(String::from_utf8(summary).unwrap().starts_with("Files: 1\n"));
//!
//! let mut tsv = Vec::new();
//! write_tsv(&batch, &mut tsv).unwrap();
//! assert_eq!(String::from_utf8(tsv).unwrap().lines().count(), 2);
//! ```

pub mod json;
pub mod summary;
pub mod tsv;

pub use json::to_json;
pub use summary::write_summary;
pub use tsv::write_tsv;

/// Format an average with two decimals, or `none` when there is no data.
pub(crate) fn format_avg(avg: Option<f64>, none: &str) -> String {
    match avg {
        Some(v) => format!("{v:.2}"),
        None => none.to_string(),
    }
}
