//! File and batch scanning.
//!
//! This module drives the [`Classifier`] over real files: it opens each path,
//! streams it in fixed-size chunks, finalizes per-file stats and folds them
//! into batch stats. Per-file failures are recorded on the file, never
//! returned, so one bad path does not abort a batch.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use rayon::prelude::*;

use crate::error::SrcstatError;

use super::classifier::{Classifier, LineSink, LogSink, NoopSink};
use super::stats::{BatchStats, FailureKind, FileStats, LineTally, ScanFailure};

/// Read buffer size used when none is configured.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Options for scanning files.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Read buffer size in bytes. Only affects I/O, never results.
    pub chunk_size: usize,
    /// Scan the files of a batch in parallel
    pub parallel: bool,
    /// Report every finished line through the `log` facade
    pub debug: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            parallel: false,
            debug: false,
        }
    }
}

impl ScanOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the read buffer size. Zero is treated as one.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    /// Scan batch files in parallel. Output order stays the input order.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Log every finished line at debug level.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Stream `reader` through a classifier, `chunk_size` bytes at a time.
///
/// Interrupted reads are retried; any other error is returned and the
/// partial counts are dropped.
pub fn scan_reader<R: Read, S: LineSink>(
    mut reader: R,
    chunk_size: usize,
    sink: S,
) -> io::Result<LineTally> {
    let mut buffer = vec![0u8; chunk_size.max(1)];
    let mut classifier = Classifier::with_sink(sink);

    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => classifier.feed(&buffer[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(classifier.finish())
}

fn try_scan_file<S: LineSink>(
    path: &Path,
    chunk_size: usize,
    sink: S,
) -> std::result::Result<LineTally, ScanFailure> {
    let file = File::open(path).map_err(|source| {
        let err = SrcstatError::FileOpen {
            path: path.to_path_buf(),
            source,
        };
        ScanFailure::new(FailureKind::Open, &err)
    })?;

    scan_reader(file, chunk_size, sink).map_err(|source| {
        let err = SrcstatError::FileRead {
            path: path.to_path_buf(),
            source,
        };
        ScanFailure::new(FailureKind::Read, &err)
    })
}

/// Scan one file, reporting each line to `sink`.
///
/// Open and read failures end up in [`FileStats::error`] with all counters
/// zeroed. The file handle is dropped on every path out of this function.
pub fn scan_file_with_sink<S: LineSink>(
    path: impl AsRef<Path>,
    chunk_size: usize,
    sink: S,
) -> FileStats {
    let path = path.as_ref();
    match try_scan_file(path, chunk_size, sink) {
        Ok(tally) => FileStats::from_tally(path, &tally),
        Err(failure) => {
            log::warn!("{failure}");
            FileStats::failed(path, failure)
        }
    }
}

/// Scan a single file.
///
/// # Example
///
/// ```rust
/// use srcstatlib::{scan_file, FailureKind, ScanOptions};
/// use std::fs;
/// use tempfile::tempdir;
///
/// let dir = tempdir().unwrap();
/// let path = dir.path().join("main.c");
/// fs::write(&path, "int main() {\n  // nothing\n  return 0;\n}\n").unwrap();
///
/// let stats = scan_file(&path, &ScanOptions::new());
/// assert_eq!(stats.lines_all, 4);
/// assert_eq!(stats.lines_code, 3);
/// assert_eq!(stats.lines_comment, 1);
///
/// let missing = scan_file(dir.path().join("nope.c"), &ScanOptions::new());
/// assert_eq!(missing.error.unwrap().kind, FailureKind::Open);
/// ```
pub fn scan_file(path: impl AsRef<Path>, options: &ScanOptions) -> FileStats {
    let path = path.as_ref();
    if options.debug {
        let sink = LogSink::new(path.display().to_string());
        scan_file_with_sink(path, options.chunk_size, sink)
    } else {
        scan_file_with_sink(path, options.chunk_size, NoopSink)
    }
}

/// Scan every path and reduce the results into batch stats.
///
/// Files keep their input order, also when scanned in parallel. Failed files
/// are listed but left out of the max/average reductions.
///
/// # Example
///
/// ```rust
/// use srcstatlib::{scan_batch, ScanOptions};
/// use std::fs;
/// use tempfile::tempdir;
///
/// let dir = tempdir().unwrap();
/// let a = dir.path().join("a.c");
/// let b = dir.path().join("b.c");
/// fs::write(&a, "x();\ny();\n").unwrap();
/// fs::write(&b, "// only a comment\n").unwrap();
///
/// let batch = scan_batch(&[a, b], &ScanOptions::new());
/// assert_eq!(batch.file_count(), 2);
/// assert_eq!(batch.lpf_all.max, 2);
/// assert_eq!(batch.lpf_all.avg, Some(1.5));
/// ```
pub fn scan_batch<P>(paths: &[P], options: &ScanOptions) -> BatchStats
where
    P: AsRef<Path> + Sync,
{
    let files: Vec<FileStats> = if options.parallel {
        paths.par_iter().map(|p| scan_file(p, options)).collect()
    } else {
        paths.iter().map(|p| scan_file(p, options)).collect()
    };

    let batch = BatchStats::from_files(files);
    log::info!(
        "scanned {} files ({} failed)",
        batch.file_count(),
        batch.error_count()
    );
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    const SOURCE: &str = "a=1\n// comment\n\n/* block\nstill block */\nb=2\n";

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Yields `data` and then fails instead of reporting end of stream.
    struct FailingReader<'a> {
        data: &'a [u8],
    }

    impl Read for FailingReader<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.data.is_empty() {
                return Err(io::Error::new(io::ErrorKind::Other, "disk on fire"));
            }
            let n = buf.len().min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    /// Interrupts every other read.
    struct FlakyReader<'a> {
        data: &'a [u8],
        interrupt: bool,
    }

    impl Read for FlakyReader<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "again"));
            }
            self.data.read(buf)
        }
    }

    #[test]
    fn scan_reader_classifies_stream() {
        let tally = scan_reader(SOURCE.as_bytes(), 4, NoopSink).unwrap();

        assert_eq!(tally.lines_all, 6);
        assert_eq!(tally.lines_code, 2);
        assert_eq!(tally.lines_comment, 3);
        assert_eq!(tally.lines_empty, 1);
    }

    #[test]
    fn chunk_size_does_not_change_results() {
        let expected = scan_reader(SOURCE.as_bytes(), DEFAULT_CHUNK_SIZE, NoopSink).unwrap();
        for size in [0, 1, 2, 5, 13, 1024] {
            let tally = scan_reader(SOURCE.as_bytes(), size, NoopSink).unwrap();
            assert_eq!(tally, expected, "chunk size {size}");
        }
    }

    #[test]
    fn scan_reader_propagates_read_errors() {
        let reader = FailingReader {
            data: SOURCE.as_bytes(),
        };
        let err = scan_reader(reader, 8, NoopSink).unwrap_err();

        assert_eq!(err.to_string(), "disk on fire");
    }

    #[test]
    fn scan_reader_retries_interrupted_reads() {
        let reader = FlakyReader {
            data: SOURCE.as_bytes(),
            interrupt: false,
        };
        let tally = scan_reader(reader, 3, NoopSink).unwrap();

        assert_eq!(tally.lines_all, 6);
    }

    #[test]
    fn scan_file_finalizes_stats() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "fixture.c", SOURCE);

        let stats = scan_file(&path, &ScanOptions::new());

        assert!(stats.is_ok());
        assert_eq!(stats.path, path);
        assert_eq!(stats.lines_all, 6);
        assert_eq!(stats.lines_code, 2);
        assert_eq!(stats.lines_comment, 3);
        assert_eq!(stats.lines_empty, 1);
        assert_eq!(stats.max_bpl_all, 15);
        assert_eq!(stats.max_bpl_code, 3);
        assert_eq!(stats.max_bpl_comment, 10);
        assert_eq!(stats.avg_bpl_all, Some(44.0 / 6.0));
        assert_eq!(stats.avg_bpl_code, Some(1.0));
        assert_eq!(stats.avg_bpl_comment, Some(22.0 / 6.0));
    }

    #[test]
    fn scan_file_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "fixture.c", SOURCE);
        let options = ScanOptions::new().chunk_size(7);

        assert_eq!(scan_file(&path, &options), scan_file(&path, &options));
    }

    #[test]
    fn empty_file_has_no_averages() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "empty.c", "");

        let stats = scan_file(&path, &ScanOptions::new());

        assert!(stats.is_ok());
        assert_eq!(stats.lines_all, 0);
        assert_eq!(stats.avg_bpl_all, None);
    }

    #[test]
    fn missing_file_records_open_error() {
        let dir = tempdir().unwrap();
        let stats = scan_file(dir.path().join("missing.c"), &ScanOptions::new());

        let failure = stats.error.clone().unwrap();
        assert_eq!(failure.kind, FailureKind::Open);
        assert!(failure.message.starts_with("failed to open file"));
        assert!(failure.message.contains("missing.c"));
        assert_eq!(stats.lines_all, 0);
    }

    #[cfg(unix)]
    #[test]
    fn directory_records_read_error() {
        // opening a directory works on unix, reading it fails
        let dir = tempdir().unwrap();
        let stats = scan_file(dir.path(), &ScanOptions::new());

        let failure = stats.error.clone().unwrap();
        assert_eq!(failure.kind, FailureKind::Read);
        assert!(failure.message.starts_with("failed to read file"));
        assert_eq!(stats.lines_all, 0);
    }

    #[test]
    fn debug_option_does_not_change_results() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "fixture.c", SOURCE);

        let quiet = scan_file(&path, &ScanOptions::new());
        let loud = scan_file(&path, &ScanOptions::new().debug(true));

        assert_eq!(quiet, loud);
    }

    #[test]
    fn batch_with_unreadable_path() {
        let dir = tempdir().unwrap();
        let paths = vec![
            write(dir.path(), "one.c", "a();\nb();\nc();\nd();\n"),
            dir.path().join("missing.c"),
            write(dir.path(), "two.c", "// x\n\ny();\n"),
        ];

        let batch = scan_batch(&paths, &ScanOptions::new());

        assert_eq!(batch.file_count(), 3);
        assert_eq!(batch.valid_count(), 2);
        let missing = &batch.files()[1];
        assert_eq!(missing.path, paths[1]);
        assert!(!missing.error_message().is_empty());
        assert_eq!(missing.lines_all, 0);

        assert_eq!(batch.lpf_all.max, 4);
        assert_eq!(batch.lpf_all.avg, Some(3.5));
        assert_eq!(batch.lpf_code.max, 4);
        assert_eq!(batch.lpf_code.avg, Some(2.5));
        assert_eq!(batch.lpf_comment.avg, Some(0.5));
        assert_eq!(batch.lpf_empty.max, 1);
        assert_eq!(batch.lpf_empty.avg, Some(0.5));
    }

    #[test]
    fn parallel_batch_matches_sequential() {
        let dir = tempdir().unwrap();
        let mut paths = Vec::new();
        for i in 0..32 {
            let body = "x();\n// c\n\n".repeat(i + 1);
            paths.push(write(dir.path(), &format!("f{i}.c"), &body));
        }
        paths.insert(5, dir.path().join("missing.c"));

        let sequential = scan_batch(&paths, &ScanOptions::new());
        let parallel = scan_batch(&paths, &ScanOptions::new().parallel(true));

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn batch_of_failures_has_no_averages() {
        let batch = scan_batch(&["/definitely/not/here.c"], &ScanOptions::new());

        assert_eq!(batch.file_count(), 1);
        assert_eq!(batch.valid_count(), 0);
        assert_eq!(batch.lpf_all.avg, None);
    }

    #[test]
    fn chunk_size_builder_clamps_zero() {
        assert_eq!(ScanOptions::new().chunk_size(0).chunk_size, 1);
    }
}
