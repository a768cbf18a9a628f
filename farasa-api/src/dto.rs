//! Data Transfer Objects for API

use crate::error::{ApiError, Result};
use std::fs;
use std::io::Read;
use std::path::PathBuf;

/// Input source for a task
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Input {
    /// Raw text string
    Text(String),
    /// File path
    File(PathBuf),
    /// Raw bytes (UTF-8)
    Bytes(Vec<u8>),
    /// Reader (not serializable)
    #[cfg_attr(feature = "serde", serde(skip))]
    Reader(Box<dyn Read>),
}

impl std::fmt::Debug for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Input::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Input::File(path) => f.debug_tuple("File").field(path).finish(),
            Input::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Input::Reader(_) => f.debug_tuple("Reader").field(&"<dyn Read>").finish(),
        }
    }
}

impl Input {
    /// Create input from text
    pub fn from_text(text: impl Into<String>) -> Self {
        Input::Text(text.into())
    }

    /// Create input from file path
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Input::File(path.into())
    }

    /// Create input from a reader
    pub fn from_reader<R: Read + 'static>(reader: R) -> Self {
        Input::Reader(Box::new(reader))
    }

    /// Read the text content from the input
    pub fn read_text(self) -> Result<String> {
        match self {
            Input::Text(text) => Ok(text),
            Input::File(path) => fs::read_to_string(&path).map_err(ApiError::Io),
            Input::Bytes(bytes) => String::from_utf8(bytes).map_err(ApiError::Utf8),
            Input::Reader(mut reader) => {
                let mut buffer = String::new();
                reader.read_to_string(&mut buffer).map_err(ApiError::Io)?;
                Ok(buffer)
            }
        }
    }
}

/// Tag with its `-`-separated feature groups split out
///
/// `NSUFF-FP` becomes base `NSUFF` with features `["FP"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProcessedTag {
    /// Tag before the first `-`
    pub base: String,
    /// Remaining groups, each a run of single-letter features
    pub features: Vec<String>,
}

impl ProcessedTag {
    /// Split a raw tag
    pub fn parse(tag: &str) -> Self {
        let mut parts = tag.split('-');
        let base = parts.next().unwrap_or_default().to_string();
        Self {
            base,
            features: parts.map(str::to_string).collect(),
        }
    }
}

/// One word of POS tagger output, possibly made of several sub-tokens
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaggedToken {
    /// Surface sub-tokens, as the tagger split them
    pub tokens: Vec<String>,
    /// One raw tag per sub-token
    pub tags: Vec<String>,
}

impl TaggedToken {
    /// Single sub-token with its tag
    pub fn new(token: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            tokens: vec![token.into()],
            tags: vec![tag.into()],
        }
    }

    /// Append a connected sub-token
    pub fn push(&mut self, token: impl Into<String>, tag: impl Into<String>) {
        self.tokens.push(token.into());
        self.tags.push(tag.into());
    }

    /// Append all sub-tokens of another token
    pub fn extend(&mut self, other: TaggedToken) {
        self.tokens.extend(other.tokens);
        self.tags.extend(other.tags);
    }

    /// Last sub-token
    pub fn last_token(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }

    /// Joined surface form with segmentation marks removed
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.trim())
            .collect::<String>()
            .replace('+', "")
    }

    /// Tags split into base and feature groups
    pub fn processed_tags(&self) -> Vec<ProcessedTag> {
        self.tags.iter().map(|t| ProcessedTag::parse(t)).collect()
    }
}

impl std::fmt::Display for TaggedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.text(), self.tags.join("+"))
    }
}

/// One row of dependency parser output
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DependencyToken {
    /// Zero-based position in the sentence
    pub index: usize,
    /// Surface form
    pub text: String,
    /// Lemma
    pub lemma: String,
    /// Coarse POS tag, upper-cased
    pub pos: String,
    /// Fine-grained POS tag
    pub xpos: String,
    /// Morphological features
    pub morph: Vec<String>,
    /// Zero-based index of the head.
    ///
    /// A root (`---` relation) heads itself: its head column is not read
    /// and is not kept, even when it holds a number.
    pub head_index: usize,
    /// Surface form of the head
    pub head: String,
    /// Relation label, lower-cased; `root` for the sentence root
    pub dep: String,
}

impl DependencyToken {
    /// Whether this token is the sentence root
    pub fn is_root(&self) -> bool {
        self.dep == "root"
    }
}
