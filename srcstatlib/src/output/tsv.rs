//! Tab-separated per-file table.

use std::io::{self, Write};

use super::format_avg;
use crate::data::stats::{BatchStats, FileStats};

/// Column names, in output order.
pub const TSV_COLUMNS: [&str; 12] = [
    "Path",
    "Error",
    "LinesAll",
    "LinesCode",
    "LinesComment",
    "LinesEmpty",
    "MaxBplAll",
    "MaxBplCode",
    "MaxBplComment",
    "AvgBplAll",
    "AvgBplCode",
    "AvgBplComment",
];

fn row(file: &FileStats) -> Vec<String> {
    vec![
        file.path.display().to_string(),
        file.error_message().to_string(),
        file.lines_all.to_string(),
        file.lines_code.to_string(),
        file.lines_comment.to_string(),
        file.lines_empty.to_string(),
        file.max_bpl_all.to_string(),
        file.max_bpl_code.to_string(),
        file.max_bpl_comment.to_string(),
        format_avg(file.avg_bpl_all, ""),
        format_avg(file.avg_bpl_code, ""),
        format_avg(file.avg_bpl_comment, ""),
    ]
}

/// Write a header row and one row per file, in batch order.
///
/// `Error` is empty for files that scanned fine. Averages of files without
/// lines are left empty.
pub fn write_tsv<W: Write>(batch: &BatchStats, mut w: W) -> io::Result<()> {
    writeln!(w, "{}", TSV_COLUMNS.join("\t"))?;
    for file in batch.files() {
        writeln!(w, "{}", row(file).join("\t"))?;
    }
    w.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::classifier::classify_bytes;
    use crate::data::stats::{FailureKind, ScanFailure};

    fn render(batch: &BatchStats) -> String {
        let mut out = Vec::new();
        write_tsv(batch, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn header_row() {
        let text = render(&BatchStats::default());

        assert_eq!(
            text,
            "Path\tError\tLinesAll\tLinesCode\tLinesComment\tLinesEmpty\t\
             MaxBplAll\tMaxBplCode\tMaxBplComment\tAvgBplAll\tAvgBplCode\tAvgBplComment\n"
        );
    }

    #[test]
    fn rows_follow_batch_order() {
        let tally = classify_bytes(b"a=1\n// comment\n\n/* block\nstill block */\nb=2\n");
        let failure = ScanFailure {
            kind: FailureKind::Open,
            message: "failed to open file 'gone.c': not found".to_string(),
        };
        let batch = BatchStats::from_files(vec![
            FileStats::from_tally("fixture.c", &tally),
            FileStats::failed("gone.c", failure),
        ]);

        let text = render(&batch);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "fixture.c\t\t6\t2\t3\t1\t15\t3\t10\t7.33\t1.00\t3.67");
        assert_eq!(
            lines[2],
            "gone.c\tfailed to open file 'gone.c': not found\t0\t0\t0\t0\t0\t0\t0\t\t\t"
        );
    }
}
