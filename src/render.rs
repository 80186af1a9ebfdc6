//! Rendering collaborators: element text, result strings and diagnostics.
//!
//! The partitioning engine never looks at element values. Everything in
//! this module is presentation and only reads from a buffer.

use crate::buffer::SequenceBuffer;
use crate::interval::Interval;
use std::fmt::{Display, Write as _};
use std::io::{self, BufWriter, Write};

/// Turns a run of original elements into text.
pub trait ElementRender<T> {
    fn render(&self, elements: &[T]) -> String;
}

/// Elements back to back, e.g. `ABC` for a character sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct Concat;

impl<T: Display> ElementRender<T> for Concat {
    fn render(&self, elements: &[T]) -> String {
        let mut out = String::new();
        for element in elements {
            let _ = write!(out, "{}", element);
        }
        out
    }
}

/// Elements joined by a separator, e.g. `two-three` for a word sequence.
#[derive(Debug, Clone)]
pub struct Joined {
    pub separator: String,
}

impl Joined {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl Default for Joined {
    fn default() -> Self {
        Self::new("-")
    }
}

impl<T: Display> ElementRender<T> for Joined {
    fn render(&self, elements: &[T]) -> String {
        let mut out = String::new();
        for (i, element) in elements.iter().enumerate() {
            if i > 0 {
                out.push_str(&self.separator);
            }
            let _ = write!(out, "{}", element);
        }
        out
    }
}

/// How a buffer's results are joined into one string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultFormat {
    /// Inserted between consecutive intervals.
    pub delimiter: String,
    /// Stands in for an unprocessed interval.
    pub placeholder: String,
}

impl Default for ResultFormat {
    fn default() -> Self {
        Self::chars()
    }
}

impl ResultFormat {
    /// Dash-delimited, the convention for character buffers.
    pub fn chars() -> Self {
        Self {
            delimiter: "-".to_string(),
            placeholder: "*".to_string(),
        }
    }

    /// No delimiter, the convention for word buffers.
    pub fn words() -> Self {
        Self {
            delimiter: String::new(),
            placeholder: "*".to_string(),
        }
    }

    /// Set the delimiter (builder pattern).
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Set the placeholder (builder pattern).
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Join intervals given in rank order.
    pub fn format<'a>(&self, intervals: impl Iterator<Item = &'a Interval>) -> String {
        let mut out = String::new();
        for (i, iv) in intervals.enumerate() {
            if i > 0 {
                out.push_str(&self.delimiter);
            }
            out.push_str(iv.result().unwrap_or(&self.placeholder));
        }
        out
    }
}

/// Tab-separated dump of a buffer for human inspection.
///
/// One line per interval: `rank start end substring processed result`.
/// Uses itoa for integer formatting. Tabs, newlines, carriage returns and
/// backslashes inside text columns are written as `\t`, `\n`, `\r` and
/// `\\` so every interval stays on one six-column row.
pub struct DiagnosticWriter<W: Write> {
    writer: BufWriter<W>,
    itoa_buf: itoa::Buffer,
}

impl<W: Write> DiagnosticWriter<W> {
    pub fn new(output: W) -> Self {
        Self {
            writer: BufWriter::new(output),
            itoa_buf: itoa::Buffer::new(),
        }
    }

    /// Write the sequence length and interval count as comment lines.
    pub fn write_header<T>(&mut self, buffer: &SequenceBuffer<T>) -> io::Result<()> {
        self.writer.write_all(b"# sequence_length\t")?;
        self.write_int(buffer.len())?;
        self.writer.write_all(b"\n# subsequences\t")?;
        self.write_int(buffer.count())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Write one line for `interval`.
    pub fn write_interval<T, R>(
        &mut self,
        buffer: &SequenceBuffer<T>,
        interval: &Interval,
        renderer: &R,
    ) -> io::Result<()>
    where
        R: ElementRender<T> + ?Sized,
    {
        let substring = buffer
            .render_interval(interval, renderer)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        self.write_int(interval.rank())?;
        self.writer.write_all(b"\t")?;
        self.write_int(interval.start())?;
        self.writer.write_all(b"\t")?;
        self.write_int(interval.end())?;
        self.writer.write_all(b"\t")?;
        self.write_text(&substring)?;
        self.writer.write_all(b"\t")?;
        let processed: &[u8] = if interval.is_processed() {
            b"true"
        } else {
            b"false"
        };
        self.writer.write_all(processed)?;
        self.writer.write_all(b"\t")?;
        self.write_text(interval.result().unwrap_or(""))?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Write the header followed by every interval in rank order.
    pub fn write_buffer<T, R>(&mut self, buffer: &SequenceBuffer<T>, renderer: &R) -> io::Result<()>
    where
        R: ElementRender<T> + ?Sized,
    {
        self.write_header(buffer)?;
        for interval in buffer.intervals().iter() {
            self.write_interval(buffer, interval, renderer)?;
        }
        Ok(())
    }

    #[inline]
    fn write_int(&mut self, n: usize) -> io::Result<()> {
        self.writer.write_all(self.itoa_buf.format(n).as_bytes())
    }

    fn write_text(&mut self, text: &str) -> io::Result<()> {
        let bytes = text.as_bytes();
        let mut from = 0;
        for (i, &b) in bytes.iter().enumerate() {
            let escaped: &[u8] = match b {
                b'\t' => b"\\t",
                b'\n' => b"\\n",
                b'\r' => b"\\r",
                b'\\' => b"\\\\",
                _ => continue,
            };
            self.writer.write_all(&bytes[from..i])?;
            self.writer.write_all(escaped)?;
            from = i + 1;
        }
        self.writer.write_all(&bytes[from..])
    }

    /// Flush the buffered writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_and_joined() {
        let chars = ['A', 'B', 'C'];
        assert_eq!(Concat.render(&chars[..]), "ABC");
        assert_eq!(Joined::default().render(&chars[..]), "A-B-C");
        assert_eq!(Joined::new(" ").render(&["x", "y"][..]), "x y");
        assert_eq!(ElementRender::<char>::render(&Concat, &[]), "");
    }

    #[test]
    fn test_result_format_placeholders() {
        let mut buffer = SequenceBuffer::from_chars("ABCDEFGHIJ").unwrap();
        buffer.submit(3, 5, "R").unwrap();

        assert_eq!(buffer.result_to_string(&ResultFormat::chars()), "*-R-*");
        assert_eq!(buffer.result_to_string(&ResultFormat::words()), "*R*");

        let custom = ResultFormat::chars()
            .with_delimiter("|")
            .with_placeholder("?");
        assert_eq!(buffer.result_to_string(&custom), "?|R|?");
    }

    #[test]
    fn test_diagnostic_writer() {
        let mut buffer = SequenceBuffer::from_chars("ABCDEFGHIJ").unwrap();
        buffer.submit(0, 3, "P").unwrap();

        let mut out = Vec::new();
        {
            let mut writer = DiagnosticWriter::new(&mut out);
            writer.write_buffer(&buffer, &Concat).unwrap();
            writer.flush().unwrap();
        }

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "# sequence_length\t10");
        assert_eq!(lines[1], "# subsequences\t2");
        assert_eq!(lines[2], "1\t0\t3\tABCD\ttrue\tP");
        assert_eq!(lines[3], "2\t4\t9\tEFGHIJ\tfalse\t");
    }

    #[test]
    fn test_diagnostic_writer_escapes_text_columns() {
        let mut buffer = SequenceBuffer::from_chars("AB\tCDE").unwrap();
        buffer.submit(0, 2, "x\ty\nz\\").unwrap();

        let mut out = Vec::new();
        {
            let mut writer = DiagnosticWriter::new(&mut out);
            writer.write_buffer(&buffer, &Concat).unwrap();
            writer.flush().unwrap();
        }

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "1\t0\t2\tAB\\t\ttrue\tx\\ty\\nz\\\\");
        assert_eq!(lines[2].split('\t').count(), 6);
        assert_eq!(lines[3], "2\t3\t5\tCDE\tfalse\t");
    }
}
