//! Streaming line classifier.
//!
//! The classifier consumes bytes in chunks of any size and sorts every byte of
//! a line into code or comment, tracking just enough state to survive chunk
//! boundaries: the two comment-mode flags and the previous byte.
//!
//! Recognized delimiters are `//` (to end of line), `/*` and `*/`. This is a
//! heuristic: string literals are not understood, so `"//"` starts a comment,
//! and block comments do not nest.
//!
//! Per byte:
//!
//! - `/` and `*` are delimiter candidates and are never counted as code or comment
//! - `\r`, space and tab are ignored
//! - `\n` ends the line
//! - anything else is a comment byte inside a comment, a code byte otherwise
//!
//! Every byte, including the terminating newline, counts toward the line's
//! total byte count.

use super::stats::LineTally;

/// Byte counters of a single line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineCounts {
    pub code: u64,
    pub comment: u64,
    pub all: u64,
}

impl LineCounts {
    /// A line with neither code nor comment bytes.
    pub fn is_empty(&self) -> bool {
        self.code == 0 && self.comment == 0
    }
}

/// A finished line as reported to a [`LineSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRecord {
    /// 1-based line number
    pub number: u64,
    pub counts: LineCounts,
}

/// Receives every line the classifier finishes.
pub trait LineSink {
    fn line(&mut self, record: &LineRecord);
}

impl<S: LineSink + ?Sized> LineSink for &mut S {
    fn line(&mut self, record: &LineRecord) {
        (**self).line(record)
    }
}

/// Discards all line records.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl LineSink for NoopSink {
    fn line(&mut self, _record: &LineRecord) {}
}

/// Forwards line records to the `log` facade at debug level.
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    label: String,
}

impl LogSink {
    /// `label` prefixes every message, usually the scanned path.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl LineSink for LogSink {
    fn line(&mut self, record: &LineRecord) {
        let c = record.counts;
        log::debug!(
            "{}: Line {:4}:  [{:3} {:3} {:3}]",
            self.label,
            record.number,
            c.code,
            c.comment,
            c.all
        );
    }
}

/// State carried across bytes and chunks.
///
/// At most one of the comment flags is set, and `in_line_comment` is always
/// false at the start of a line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifierState {
    pub line: LineCounts,
    pub in_block_comment: bool,
    pub in_line_comment: bool,
    /// `None` before the first byte
    pub prev_byte: Option<u8>,
}

impl ClassifierState {
    fn in_comment(&self) -> bool {
        self.in_block_comment || self.in_line_comment
    }

    /// Apply one byte that is not a line break.
    fn observe(&mut self, b: u8) {
        match b {
            b'/' => match self.prev_byte {
                Some(b'/') if !self.in_comment() => self.in_line_comment = true,
                Some(b'*') if self.in_block_comment => self.in_block_comment = false,
                _ => {}
            },
            b'*' => {
                if self.prev_byte == Some(b'/') && !self.in_comment() {
                    self.in_block_comment = true;
                }
            }
            b'\r' | b' ' | b'\t' => {}
            _ => {
                if self.in_comment() {
                    self.line.comment += 1;
                } else {
                    self.line.code += 1;
                }
            }
        }
    }

    /// True when bytes of an unterminated line are pending.
    pub fn has_partial_line(&self) -> bool {
        self.line.all > 0
    }
}

/// Single-pass classifier over a byte stream.
///
/// Feed it chunks with [`Classifier::feed`] and call [`Classifier::finish`] at
/// end of stream. The chunking never changes the result.
///
/// # Example
///
/// ```rust
/// use srcstatlib::Classifier;
///
/// let mut classifier = Classifier::new();
/// classifier.feed(b"int x; // co");
/// classifier.feed(b"unter\n/* a\nb */\n");
/// let tally = classifier.finish();
///
/// assert_eq!(tally.lines_all, 3);
/// assert_eq!(tally.lines_code, 1);
/// assert_eq!(tally.lines_comment, 3);
/// ```
#[derive(Debug)]
pub struct Classifier<S = NoopSink> {
    state: ClassifierState,
    tally: LineTally,
    sink: S,
}

impl Classifier<NoopSink> {
    pub fn new() -> Self {
        Self::with_sink(NoopSink)
    }
}

impl Default for Classifier<NoopSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: LineSink> Classifier<S> {
    /// Create a classifier that reports each finished line to `sink`.
    pub fn with_sink(sink: S) -> Self {
        Self {
            state: ClassifierState::default(),
            tally: LineTally::default(),
            sink,
        }
    }

    pub fn state(&self) -> &ClassifierState {
        &self.state
    }

    /// Totals of the lines finished so far.
    pub fn tally(&self) -> &LineTally {
        &self.tally
    }

    /// Process the next chunk of the stream.
    pub fn feed(&mut self, chunk: &[u8]) {
        for &b in chunk {
            self.step(b);
        }
    }

    fn step(&mut self, b: u8) {
        self.state.line.all += 1;
        if b == b'\n' {
            self.end_line();
        } else {
            self.state.observe(b);
        }
        self.state.prev_byte = Some(b);
    }

    fn end_line(&mut self) {
        let line = self.state.line;
        let tally = &mut self.tally;

        tally.lines_all += 1;
        if line.code > 0 {
            tally.lines_code += 1;
        }
        // a line may hold both code and comment
        if line.comment > 0 {
            tally.lines_comment += 1;
        }
        if line.is_empty() {
            tally.lines_empty += 1;
        }
        tally.bytes_all.add(line.all);
        tally.bytes_code.add(line.code);
        tally.bytes_comment.add(line.comment);

        self.sink.line(&LineRecord {
            number: tally.lines_all,
            counts: line,
        });

        self.state.line = LineCounts::default();
        self.state.in_line_comment = false;
    }

    /// End the stream and return the totals.
    ///
    /// An unterminated last line is counted as if it ended with a newline.
    pub fn finish(mut self) -> LineTally {
        if self.state.has_partial_line() {
            self.end_line();
        }
        self.tally
    }
}

/// Classify an in-memory buffer in one go.
///
/// ```rust
/// use srcstatlib::classify_bytes;
///
/// let tally = classify_bytes(b"a=1\n\n// note\n");
/// assert_eq!(tally.lines_all, 3);
/// assert_eq!(tally.lines_empty, 1);
/// ```
pub fn classify_bytes(bytes: &[u8]) -> LineTally {
    let mut classifier = Classifier::new();
    classifier.feed(bytes);
    classifier.finish()
}
