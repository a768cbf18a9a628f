//! Input handling module

pub mod file_reader;
pub mod glob_resolver;

pub use file_reader::FileReader;
pub use glob_resolver::resolve_patterns;

use anyhow::Result;
use std::path::PathBuf;

/// One unit of work for the run command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Text given on the command line
    Text(String),
    /// A resolved input file
    File(PathBuf),
    /// Standard input
    Stdin,
}

impl InputSource {
    /// Name used in output and progress messages
    pub fn label(&self) -> String {
        match self {
            InputSource::Text(_) => "<text>".to_string(),
            InputSource::File(path) => path.display().to_string(),
            InputSource::Stdin => "<stdin>".to_string(),
        }
    }

    /// Read the full text of this source
    pub fn read(&self) -> Result<String> {
        match self {
            InputSource::Text(text) => Ok(text.clone()),
            InputSource::File(path) => FileReader::read_text(path),
            InputSource::Stdin => FileReader::read_stdin(),
        }
    }
}
