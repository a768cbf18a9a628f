//! Task identity and execution mode

use std::fmt;
use std::str::FromStr;

/// The linguistic operation a facade performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Task {
    /// Word segmentation
    Segment,
    /// Stemming (segmenter binary with `-l true`)
    Stem,
    /// Part-of-speech tagging
    Pos,
    /// Named entity recognition
    Ner,
    /// Diacritization
    Diacritize,
    /// Spell checking
    SpellCheck,
    /// Lemmatization
    Lemmatize,
    /// Dependency parsing
    DepParse,
}

impl Task {
    /// All tasks, in declaration order
    pub const ALL: [Task; 8] = [
        Task::Segment,
        Task::Stem,
        Task::Pos,
        Task::Ner,
        Task::Diacritize,
        Task::SpellCheck,
        Task::Lemmatize,
        Task::DepParse,
    ];

    /// Stable name, used as the cache partition and in fingerprints
    pub fn as_str(&self) -> &'static str {
        match self {
            Task::Segment => "segment",
            Task::Stem => "stem",
            Task::Pos => "POS",
            Task::Ner => "NER",
            Task::Diacritize => "diacritize",
            Task::SpellCheck => "spell_check",
            Task::Lemmatize => "lemmatize",
            Task::DepParse => "depparse",
        }
    }

    /// Bundled binary location relative to the binary directory.
    ///
    /// `None` for tasks whose binary is not shipped with the toolkit
    /// archive and must be supplied explicitly.
    pub fn bundled_binary(&self) -> Option<&'static str> {
        match self {
            Task::Segment | Task::Stem => Some("lib/FarasaSegmenterJar.jar"),
            Task::Pos => Some("FarasaPOSJar.jar"),
            Task::Ner => Some("FarasaNERJar.jar"),
            Task::Diacritize => Some("FarasaDiacritizeJar.jar"),
            Task::SpellCheck | Task::Lemmatize | Task::DepParse => None,
        }
    }

    /// Flags appended after the binary path
    pub fn task_flags(&self) -> &'static [&'static str] {
        match self {
            Task::Stem => &["-l", "true"],
            _ => &[],
        }
    }

    /// Whether the worker speaks the line protocol
    pub fn supports_interactive(&self) -> bool {
        !matches!(self, Task::SpellCheck)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Task {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Task::ALL
            .into_iter()
            .find(|task| task.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown task '{s}'"))
    }
}

/// How requests reach the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExecutionMode {
    /// Fresh process per call, file-based I/O
    #[default]
    Standalone,
    /// One long-lived process, line-framed over stdin/stdout
    Interactive,
}

impl ExecutionMode {
    /// Name used in fingerprints and log output
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Standalone => "standalone",
            ExecutionMode::Interactive => "interactive",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
