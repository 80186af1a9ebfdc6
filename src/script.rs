//! Submission scripts: reading and applying batches of results.
//!
//! Format: one submission per line, tab-delimited
//! `start<TAB>end[<TAB>result]`. A missing result submits the empty
//! (unprocessed) marker. Empty lines and `#` comments are skipped.

use crate::buffer::SequenceBuffer;
use crate::classify::Relation;
use crate::config::is_strict_submissions;
use crate::error::ScriptError;
use memchr::memchr;
use rustc_hash::FxHashMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

pub type Result<T> = std::result::Result<T, ScriptError>;

/// One submission read from a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRecord {
    /// 1-based line number in the source, 0 when built in memory.
    pub line: usize,
    pub start: usize,
    pub end: usize,
    pub result: String,
}

impl ScriptRecord {
    pub fn new(start: usize, end: usize, result: impl Into<String>) -> Self {
        Self {
            line: 0,
            start,
            end,
            result: result.into(),
        }
    }
}

impl fmt::Display for ScriptRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.start, self.end)?;
        if !self.result.is_empty() {
            write!(f, "\t{}", self.result)?;
        }
        Ok(())
    }
}

/// A streaming submission script reader.
pub struct ScriptReader<R: Read> {
    reader: BufReader<R>,
    line_number: usize,
    buffer: String,
}

impl ScriptReader<File> {
    /// Open a script from a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

impl<R: Read> ScriptReader<R> {
    /// Create a new script reader from any readable source.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            buffer: String::with_capacity(256),
        }
    }

    /// Read the next record.
    pub fn read_record(&mut self) -> Result<Option<ScriptRecord>> {
        loop {
            self.buffer.clear();
            let bytes_read = match self.reader.read_line(&mut self.buffer) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    return Err(ScriptError::Parse {
                        line: self.line_number + 1,
                        message: "Invalid UTF-8".to_string(),
                    });
                }
                Err(e) => return Err(e.into()),
            };
            if bytes_read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let line = self.buffer.trim_end_matches(['\n', '\r']);
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            return parse_record(trimmed, self.line_number).map(Some);
        }
    }

    /// Get an iterator over all records.
    pub fn records(self) -> ScriptRecordIter<R> {
        ScriptRecordIter { reader: self }
    }
}

/// Iterator over script records.
pub struct ScriptRecordIter<R: Read> {
    reader: ScriptReader<R>,
}

impl<R: Read> Iterator for ScriptRecordIter<R> {
    type Item = Result<ScriptRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

/// Parse one non-comment line.
///
/// Fields are located with memchr. The result is everything after the
/// second tab, kept verbatim.
pub fn parse_record(line: &str, line_number: usize) -> Result<ScriptRecord> {
    let bytes = line.as_bytes();

    let tab1 = memchr(b'\t', bytes).ok_or_else(|| ScriptError::Parse {
        line: line_number,
        message: "Expected at least 2 fields, got 1".to_string(),
    })?;
    let start = parse_position(&line[..tab1], "start", line_number)?;

    let rest = &line[tab1 + 1..];
    let (end_field, result) = match memchr(b'\t', rest.as_bytes()) {
        Some(tab2) => (&rest[..tab2], &rest[tab2 + 1..]),
        None => (rest, ""),
    };
    let end = parse_position(end_field, "end", line_number)?;

    if start > end {
        return Err(ScriptError::Parse {
            line: line_number,
            message: format!("Start ({}) > end ({})", start, end),
        });
    }

    Ok(ScriptRecord {
        line: line_number,
        start,
        end,
        result: result.to_string(),
    })
}

fn parse_position(s: &str, field_name: &str, line: usize) -> Result<usize> {
    s.trim().parse().map_err(|_| ScriptError::Parse {
        line,
        message: format!("Invalid {} position: '{}'", field_name, s),
    })
}

/// Read all records from a script file.
pub fn read_script<P: AsRef<Path>>(path: P) -> Result<Vec<ScriptRecord>> {
    ScriptReader::from_path(path)?.records().collect()
}

/// Parse records from a string (useful for testing).
pub fn parse_script(content: &str) -> Result<Vec<ScriptRecord>> {
    ScriptReader::new(content.as_bytes()).records().collect()
}

/// Write records to a writer.
pub fn write_script<W: io::Write>(writer: &mut W, records: &[ScriptRecord]) -> io::Result<()> {
    for record in records {
        writeln!(writer, "{}", record)?;
    }
    Ok(())
}

/// Statistics for a script run.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub submitted: usize,
    pub applied: usize,
    pub rejected: usize,
    /// Unprocessed subsequences left once the run finished.
    pub remaining: usize,
    pub relations: FxHashMap<Relation, usize>,
}

impl RunStats {
    /// Number of submissions applied with the given relation.
    pub fn relation_count(&self, relation: Relation) -> usize {
        self.relations.get(&relation).copied().unwrap_or(0)
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Submitted: {}", self.submitted)?;
        writeln!(f, "Applied:   {}", self.applied)?;
        writeln!(f, "Rejected:  {}", self.rejected)?;
        writeln!(f, "Remaining: {}", self.remaining)?;
        for relation in Relation::MATCHES {
            writeln!(f, "  {:<20}{}", relation.name(), self.relation_count(relation))?;
        }
        Ok(())
    }
}

/// Applies script records to a buffer in order.
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    /// Abort on the first submission that matches nothing.
    pub strict: bool,
}

impl Default for ScriptRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptRunner {
    /// Create a runner using the global strictness setting.
    pub fn new() -> Self {
        Self {
            strict: is_strict_submissions(),
        }
    }

    /// Set strict flag (builder pattern).
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Apply every record to `buffer`.
    ///
    /// Unmatched submissions are counted and skipped unless strict. Any
    /// other buffer error aborts the run with the offending line. Records
    /// applied before an abort stay applied.
    pub fn run<T, I>(&self, buffer: &mut SequenceBuffer<T>, records: I) -> Result<RunStats>
    where
        I: IntoIterator<Item = Result<ScriptRecord>>,
    {
        let mut stats = RunStats::default();

        for record in records {
            let record = record?;
            stats.submitted += 1;

            match buffer.submit(record.start, record.end, &record.result) {
                Ok(relation) => {
                    stats.applied += 1;
                    *stats.relations.entry(relation).or_insert(0) += 1;
                }
                Err(e) if e.is_recoverable() && !self.strict => {
                    stats.rejected += 1;
                }
                Err(source) => {
                    return Err(ScriptError::Buffer {
                        line: record.line,
                        source,
                    });
                }
            }
        }

        stats.remaining = buffer.intervals().unprocessed_count();
        Ok(stats)
    }

    /// Apply in-memory records.
    pub fn run_records<T>(
        &self,
        buffer: &mut SequenceBuffer<T>,
        records: &[ScriptRecord],
    ) -> Result<RunStats> {
        self.run(buffer, records.iter().cloned().map(Ok))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BufferError;
    use crate::render::ResultFormat;

    #[test]
    fn test_parse_records() {
        let content = "0\t3\tP\n4\t9\tQ\n";
        let records = parse_script(content).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            ScriptRecord {
                line: 1,
                start: 0,
                end: 3,
                result: "P".into()
            }
        );
        assert_eq!(records[1].line, 2);
        assert_eq!(records[1].result, "Q");
    }

    #[test]
    fn test_missing_result_is_unprocessed_marker() {
        let records = parse_script("0\t4\n").unwrap();
        assert_eq!(records[0].result, "");
    }

    #[test]
    fn test_result_keeps_tabs_and_spaces() {
        let records = parse_script("0\t4\ta b\tc\r\n").unwrap();
        assert_eq!(records[0].result, "a b\tc");
    }

    #[test]
    fn test_skip_comments_and_blank_lines() {
        let content = "# header\n\n0\t9\tX\n   \n";
        let records = parse_script(content).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].line, 3);
    }

    #[test]
    fn test_parse_errors_carry_line() {
        match parse_script("0\t1\tA\nfoo\t3\n") {
            Err(ScriptError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected: {:?}", other),
        }
        match parse_script("7\n") {
            Err(ScriptError::Parse { line, .. }) => assert_eq!(line, 1),
            other => panic!("unexpected: {:?}", other),
        }
        match parse_script("5\t3\tX\n") {
            Err(ScriptError::Parse { message, .. }) => {
                assert!(message.contains("Start (5) > end (3)"))
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let bytes: &[u8] = b"0\t1\tA\n\xff\xfe\t2\n";
        let mut reader = ScriptReader::new(bytes);

        assert_eq!(reader.read_record().unwrap().unwrap().line, 1);
        match reader.read_record() {
            Err(ScriptError::Parse { line, message }) => {
                assert_eq!(line, 2);
                assert_eq!(message, "Invalid UTF-8");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_record_display_roundtrip() {
        let records = vec![ScriptRecord::new(0, 3, "P"), ScriptRecord::new(4, 9, "")];
        let mut out = Vec::new();
        write_script(&mut out, &records).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0\t3\tP\n4\t9\n");
    }

    #[test]
    fn test_runner_applies_and_counts() {
        let mut buffer = SequenceBuffer::from_chars("ABCDEFGHIJ").unwrap();
        let records = parse_script("0\t3\tP\n2\t4\tZ\n4\t9\tQ\n").unwrap();

        let stats = ScriptRunner::new()
            .with_strict(false)
            .run_records(&mut buffer, &records)
            .unwrap();

        assert_eq!(stats.submitted, 3);
        assert_eq!(stats.applied, 2);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.relation_count(Relation::StartMatch), 1);
        assert_eq!(stats.relation_count(Relation::ExactMatch), 1);
        assert_eq!(stats.remaining, 0);
        assert_eq!(buffer.result_to_string(&ResultFormat::chars()), "P-Q");
    }

    #[test]
    fn test_remaining_counts_unprocessed() {
        let mut buffer = SequenceBuffer::from_chars("ABCDEFGHIJ").unwrap();
        let records = parse_script("3\t5\tR\n").unwrap();

        let stats = ScriptRunner::new()
            .with_strict(false)
            .run_records(&mut buffer, &records)
            .unwrap();

        assert_eq!(stats.remaining, 2);
        assert!(stats.to_string().contains("Remaining: 2"));
    }

    #[test]
    fn test_strict_runner_aborts_on_rejection() {
        let mut buffer = SequenceBuffer::from_chars("ABCDEFGHIJ").unwrap();
        let records = parse_script("0\t3\tP\n2\t4\tZ\n4\t9\tQ\n").unwrap();

        let err = ScriptRunner::new()
            .with_strict(true)
            .run_records(&mut buffer, &records)
            .unwrap_err();

        match err {
            ScriptError::Buffer { line, source } => {
                assert_eq!(line, 2);
                assert!(source.is_recoverable());
            }
            other => panic!("unexpected: {:?}", other),
        }
        // The first record stays applied
        assert_eq!(buffer.count(), 2);
    }

    #[test]
    fn test_runner_aborts_on_invalid_bounds() {
        let mut buffer = SequenceBuffer::from_chars("ABC").unwrap();
        let records = vec![ScriptRecord::new(0, 7, "X")];

        let err = ScriptRunner::new()
            .with_strict(false)
            .run_records(&mut buffer, &records)
            .unwrap_err();
        assert!(matches!(
            err,
            ScriptError::Buffer {
                source: BufferError::InvalidArgument(_),
                ..
            }
        ));
    }
}
