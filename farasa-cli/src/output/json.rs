//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// JSON formatter - outputs results as a JSON array
pub struct JsonFormatter<W: Write> {
    writer: W,
    task: String,
    mode: String,
    pretty: bool,
    results: Vec<ResultData>,
}

/// Data structure for JSON output
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ResultData {
    /// Input file, `<text>` or `<stdin>`
    pub source: String,
    /// Task name
    pub task: String,
    /// Execution mode
    pub mode: String,
    /// Raw worker output
    pub output: String,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W, task: impl Into<String>, mode: impl Into<String>, pretty: bool) -> Self {
        Self {
            writer,
            task: task.into(),
            mode: mode.into(),
            pretty,
            results: Vec::new(),
        }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for JsonFormatter<W> {
    fn format_result(&mut self, source: &str, output: &str) -> Result<()> {
        self.results.push(ResultData {
            source: source.to_string(),
            task: self.task.clone(),
            mode: self.mode.clone(),
            output: output.to_string(),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &self.results)?;
        } else {
            serde_json::to_writer(&mut self.writer, &self.results)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_results() {
        let mut formatter = JsonFormatter::new(Vec::new(), "stem", "standalone", false);
        formatter.format_result("a.txt", "كتب").unwrap();
        formatter.format_result("b.txt", "درس").unwrap();
        formatter.finish().unwrap();

        let parsed: Vec<ResultData> = serde_json::from_slice(&formatter.writer).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].source, "b.txt");
        assert_eq!(parsed[1].output, "درس");
        assert_eq!(parsed[0].task, "stem");
        assert_eq!(parsed[0].mode, "standalone");
    }

    #[test]
    fn test_empty_array() {
        let mut formatter = JsonFormatter::new(Vec::new(), "NER", "interactive", true);
        formatter.finish().unwrap();
        assert_eq!(String::from_utf8(formatter.writer).unwrap(), "[]\n");
    }
}
