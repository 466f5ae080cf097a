//! Destinations for `print` output.
//!
//! Programs write whole lines. The evaluator hands each rendered value to an
//! [`OutputSink`] in evaluation order:
//! - [`WriterSink`]: any `io::Write`, stdout by default
//! - [`BufferSink`]: captures lines for tests and embedding
//! - [`NullSink`]: discards everything

use std::io::{self, BufWriter, Stdout, Write};

/// An ordered, append-only line channel.
pub trait OutputSink {
    /// Append one line. The sink supplies the line terminator.
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Push buffered output to its destination.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Sink over an `io::Write`, one `\n`-terminated line per print.
pub struct WriterSink<W: Write> {
    writer: W,
}

/// Buffered standard output.
pub type StdoutSink = WriterSink<BufWriter<Stdout>>;

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<BufWriter<Stdout>> {
    /// Buffered stdout. Call [`OutputSink::flush`] before exiting.
    pub fn stdout() -> Self {
        Self::new(BufWriter::new(io::stdout()))
    }
}

impl<W: Write> OutputSink for WriterSink<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Captures printed lines in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferSink {
    lines: Vec<String>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captured lines, without terminators.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Captured output as it would appear on a terminal.
    pub fn output(&self) -> String {
        self.lines.iter().map(|line| format!("{line}\n")).collect()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl OutputSink for BufferSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.lines.push(line.to_string());
        Ok(())
    }
}

/// Discards all output.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn write_line(&mut self, _line: &str) -> io::Result<()> {
        Ok(())
    }
}
