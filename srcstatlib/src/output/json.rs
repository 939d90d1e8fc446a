//! JSON rendering of batch stats.

use serde::Serialize;

use crate::data::stats::{BatchStats, FileStats, LpfSummary};

#[derive(Serialize)]
struct BatchReport<'a> {
    file_count: usize,
    error_count: usize,
    lines_per_file: LinesPerFile<'a>,
    files: &'a [FileStats],
}

#[derive(Serialize)]
struct LinesPerFile<'a> {
    all: &'a LpfSummary,
    code: &'a LpfSummary,
    comment: &'a LpfSummary,
    empty: &'a LpfSummary,
}

/// Render the batch as pretty-printed JSON.
///
/// Averages without data serialize as `null`.
pub fn to_json(batch: &BatchStats) -> serde_json::Result<String> {
    let report = BatchReport {
        file_count: batch.file_count(),
        error_count: batch.error_count(),
        lines_per_file: LinesPerFile {
            all: &batch.lpf_all,
            code: &batch.lpf_code,
            comment: &batch.lpf_comment,
            empty: &batch.lpf_empty,
        },
        files: batch.files(),
    };
    serde_json::to_string_pretty(&report)
}
