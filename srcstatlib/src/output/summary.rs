//! Human-readable batch summary.

use std::io::{self, Write};

use super::format_avg;
use crate::data::stats::BatchStats;

/// Placeholder for averages over zero files.
pub const NO_DATA: &str = "n/a";

/// Write the batch summary: file count, then max and average lines per file
/// for each category. An `Errors:` line is added when some files failed.
pub fn write_summary<W: Write>(batch: &BatchStats, mut w: W) -> io::Result<()> {
    writeln!(w, "Files: {}", batch.file_count())?;
    if batch.error_count() > 0 {
        writeln!(w, "Errors: {}", batch.error_count())?;
    }

    let rows = [
        ("All", &batch.lpf_all),
        ("Code", &batch.lpf_code),
        ("Comment", &batch.lpf_comment),
        ("Empty", &batch.lpf_empty),
    ];
    for (name, lpf) in rows {
        let label = format!("Max LpF {name}:");
        writeln!(w, "{label:<17}{}", lpf.max)?;
    }
    for (name, lpf) in rows {
        let label = format!("Avg LpF {name}:");
        writeln!(w, "{label:<17}{}", format_avg(lpf.avg, NO_DATA))?;
    }
    Ok(())
}
