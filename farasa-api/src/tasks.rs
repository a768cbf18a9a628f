//! One facade per linguistic task

use crate::config::Config;
use crate::dto::{DependencyToken, Input, TaggedToken};
use crate::error::{ApiError, Result};
use crate::postprocess;
use farasa_engine::{ExecutionMode, Task, TaskProcessor};

macro_rules! task_facade {
    ($(#[$meta:meta])* $name:ident, $task:expr, $method:ident) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            processor: TaskProcessor,
        }

        impl $name {
            /// Task this facade runs
            pub const TASK: Task = $task;

            /// Create with the default (standalone, cached) configuration
            pub fn new() -> Result<Self> {
                Self::with_config(Config::default())
            }

            /// Create with an explicit configuration
            pub fn with_config(config: Config) -> Result<Self> {
                let processor = TaskProcessor::new(Self::TASK, config.into_engine())?;
                Ok(Self { processor })
            }

            /// Wrap an already-built processor for the same task
            pub fn from_processor(processor: TaskProcessor) -> Result<Self> {
                if processor.task() != Self::TASK {
                    return Err(ApiError::Config(format!(
                        "{} needs a {} processor, got {}",
                        stringify!($name),
                        Self::TASK,
                        processor.task()
                    )));
                }
                Ok(Self { processor })
            }

            /// Run the task and return the worker's raw output
            pub fn $method(&mut self, text: &str) -> Result<String> {
                Ok(self.processor.execute(text)?)
            }

            /// Run the task on any input source
            pub fn process(&mut self, input: Input) -> Result<String> {
                let text = input.read_text()?;
                self.$method(&text)
            }

            /// Execution mode fixed at construction
            pub fn mode(&self) -> ExecutionMode {
                self.processor.mode()
            }

            /// Drop every cached result for this task
            pub fn clear_cache(&self) {
                self.processor.clear_cache();
            }

            /// Stop the interactive worker, if any
            pub fn terminate(&mut self) {
                self.processor.terminate();
            }

            /// Underlying processor
            pub fn processor(&self) -> &TaskProcessor {
                &self.processor
            }
        }
    };
}

task_facade!(
    /// Word segmentation
    Segmenter,
    Task::Segment,
    segment
);
task_facade!(
    /// Light stemming
    Stemmer,
    Task::Stem,
    stem
);
task_facade!(
    /// Part-of-speech tagging
    PosTagger,
    Task::Pos,
    tag
);
task_facade!(
    /// Named entity recognition
    NamedEntityRecognizer,
    Task::Ner,
    recognize
);
task_facade!(
    /// Diacritization
    Diacritizer,
    Task::Diacritize,
    diacritize
);
task_facade!(
    /// Spelling correction; standalone mode only
    SpellChecker,
    Task::SpellCheck,
    spell_check
);
task_facade!(
    /// Lemmatization
    Lemmatizer,
    Task::Lemmatize,
    lemmatize
);
task_facade!(
    /// Dependency parsing
    DependencyParser,
    Task::DepParse,
    parse
);

impl Segmenter {
    /// Segment `text` and strip the segmentation marks again
    ///
    /// The worker separates words with spaces.
    pub fn desegment(&mut self, text: &str) -> Result<String> {
        let segmented = self.segment(text)?;
        Ok(postprocess::desegment(&segmented, " "))
    }
}

impl PosTagger {
    /// Tag `text` and rebuild tokens from the slash-delimited output
    pub fn tag_segments(
        &mut self,
        text: &str,
        combine_subtokens: bool,
    ) -> Result<Vec<TaggedToken>> {
        let tagged = self.tag(text)?;
        postprocess::parse_tagged(&tagged, combine_subtokens)
    }
}

impl DependencyParser {
    /// Parse `text` into one token list per sentence
    pub fn parse_segments(&mut self, text: &str) -> Result<Vec<Vec<DependencyToken>>> {
        let rows = self.parse(text)?;
        postprocess::parse_dependencies(&rows)
    }
}

/// Run `task` once on `text` with `config`
///
/// Builds a throwaway processor; keep a facade around for repeated calls.
pub fn run_task(task: Task, text: &str, config: Config) -> Result<String> {
    tracing::debug!(%task, mode = %config.execution_mode(), "one-off task run");
    let mut processor = TaskProcessor::new(task, config.into_engine())?;
    let output = processor.execute(text);
    processor.terminate();
    Ok(output?)
}
