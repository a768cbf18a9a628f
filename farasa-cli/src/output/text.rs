//! Plain text output formatter

use super::OutputFormatter;
use anyhow::Result;
use std::io::{self, Write};

/// Plain text formatter - outputs each result as-is
///
/// With several sources, each result is preceded by a `==> source <==`
/// header line.
pub struct TextFormatter<W: Write> {
    writer: W,
    headers: bool,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W, headers: bool) -> Self {
        Self { writer, headers }
    }
}

impl TextFormatter<io::Stdout> {
    /// Create a formatter that writes to stdout
    pub fn stdout(headers: bool) -> Self {
        Self::new(io::stdout(), headers)
    }
}

impl<W: Write + Send + Sync> OutputFormatter for TextFormatter<W> {
    fn format_result(&mut self, source: &str, output: &str) -> Result<()> {
        if self.headers {
            writeln!(self.writer, "==> {source} <==")?;
        }
        writeln!(self.writer, "{output}")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
