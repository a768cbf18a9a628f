//! Run command implementation

use super::{init_logging, parse_interpreter, parse_interpreter_line};
use crate::config::CliConfig;
use crate::error::CliError;
use crate::input::{resolve_patterns, InputSource};
use crate::output::{JsonFormatter, OutputFormatter, TextFormatter};
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use farasa_api::{Config, ExecutionMode, Task, TaskProcessor};
use rayon::prelude::*;
use std::fs::File;
use std::io::{self, BufWriter, IsTerminal};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Arguments for the run command
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Task to run: segment, stem, pos, ner, diacritize, spell_check, lemmatize, depparse
    #[arg(value_name = "TASK")]
    pub task: Task,

    /// Input files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", conflicts_with = "text")]
    pub input: Vec<String>,

    /// Text to process instead of files
    #[arg(short, long, value_name = "TEXT")]
    pub text: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (default: from config, else text)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Keep one primed worker alive and send it one line at a time
    #[arg(long)]
    pub interactive: bool,

    /// Worker binary to use instead of the bundled one
    #[arg(long, value_name = "FILE")]
    pub binary: Option<PathBuf>,

    /// Interpreter command line (default: java -Dfile.encoding=UTF-8 -jar)
    #[arg(long, value_name = "COMMAND")]
    pub interpreter: Option<String>,

    /// Directory holding the toolkit binaries
    #[arg(long, value_name = "DIR", env = "FARASA_BIN_DIR")]
    pub bin_dir: Option<PathBuf>,

    /// Cache directory
    #[arg(long, value_name = "DIR", env = "FARASA_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Do not read or write the result cache
    #[arg(long)]
    pub no_cache: bool,

    /// Per-call timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Skip the Java version check
    #[arg(long)]
    pub skip_java_check: bool,

    /// Process files in parallel (standalone mode only)
    #[arg(short, long)]
    pub parallel: bool,

    /// Worker threads for --parallel (default: all cores)
    #[arg(long, value_name = "N", requires = "parallel")]
    pub threads: Option<usize>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Raw worker output
    Text,
    /// JSON array of results with source, task and mode
    Json,
}

impl OutputFormat {
    /// Parse the `[output] format` config value
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => {
                Err(CliError::ConfigError(format!("unknown output format '{other}'")).into())
            }
        }
    }
}

/// Label and worker output of one input source
type Outcome = (String, String);

impl RunArgs {
    /// Execute the run command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, self.quiet);

        log::info!("Starting {} run", self.task);
        log::debug!("Arguments: {:?}", self);

        let file_config = CliConfig::load_or_default(self.config.as_deref())?;
        let config = self.build_config(&file_config)?;
        let format = match self.format {
            Some(format) => format,
            None => OutputFormat::from_name(&file_config.output.format)?,
        };
        if self.parallel && config.execution_mode() == ExecutionMode::Interactive {
            return Err(CliError::ConfigError(
                "--parallel needs standalone mode".to_string(),
            )
            .into());
        }

        let sources = self.collect_sources()?;
        log::info!("Processing {} input(s)", sources.len());

        let mut reporter = ProgressReporter::new(self.quiet);
        reporter.start(sources.len() as u64);
        let results = if self.parallel {
            self.run_parallel(&config, &sources, &reporter)
        } else {
            self.run_sequential(config.clone(), &sources, &reporter)
        };
        reporter.finish();
        let results = results?;

        let mut formatter = self.formatter(
            format,
            config.execution_mode(),
            file_config.output.pretty_json,
            sources.len() > 1,
        )?;
        for (source, output) in &results {
            formatter.format_result(source, output)?;
        }
        formatter.finish()?;

        Ok(())
    }

    /// Merge flags over the config file into a facade configuration
    fn build_config(&self, file: &CliConfig) -> Result<Config> {
        let runtime = &file.runtime;
        let mut builder = Config::builder()
            .interactive(self.interactive || runtime.interactive)
            .cache(!self.no_cache && file.cache.enabled)
            .verify_runtime(!self.skip_java_check && runtime.verify_java);

        if let Some(line) = &self.interpreter {
            builder = builder.interpreter(parse_interpreter_line(line)?);
        } else if let Some(words) = &runtime.interpreter {
            builder = builder.interpreter(parse_interpreter(words)?);
        }
        if let Some(dir) = self.bin_dir.as_ref().or(runtime.bin_dir.as_ref()) {
            builder = builder.bin_dir(dir.clone());
        }
        if let Some(binary) = &self.binary {
            builder = builder.binary_path(binary.clone());
        }
        if let Some(dir) = self.cache_dir.as_ref().or(file.cache.dir.as_ref()) {
            builder = builder.cache_dir(dir.clone());
        }
        if let Some(dir) = &runtime.temp_dir {
            builder = builder.temp_dir(dir.clone());
        }
        if let Some(ms) = self.timeout_ms.or(runtime.timeout_ms) {
            builder = builder.timeout(Duration::from_millis(ms));
        }

        builder.build().context("Invalid configuration")
    }

    fn collect_sources(&self) -> Result<Vec<InputSource>> {
        if let Some(text) = &self.text {
            return Ok(vec![InputSource::Text(text.clone())]);
        }
        if !self.input.is_empty() {
            let files = resolve_patterns(&self.input)?;
            return Ok(files.into_iter().map(InputSource::File).collect());
        }
        if io::stdin().is_terminal() {
            return Err(CliError::NoInput.into());
        }
        Ok(vec![InputSource::Stdin])
    }

    /// One processor for every source, in order
    fn run_sequential(
        &self,
        config: Config,
        sources: &[InputSource],
        reporter: &ProgressReporter,
    ) -> Result<Vec<Outcome>> {
        let mut processor = TaskProcessor::new(self.task, config.into_engine())
            .with_context(|| format!("Failed to start {} worker", self.task))?;

        let mut results = Vec::with_capacity(sources.len());
        for source in sources {
            let outcome = process_source(&mut processor, source)?;
            reporter.completed(&outcome.0);
            results.push(outcome);
        }
        processor.terminate();
        Ok(results)
    }

    /// One processor per pool thread; results keep input order
    fn run_parallel(
        &self,
        config: &Config,
        sources: &[InputSource],
        reporter: &ProgressReporter,
    ) -> Result<Vec<Outcome>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads.unwrap_or(0))
            .build()
            .context("Failed to build thread pool")?;
        let task = self.task;
        log::debug!("Running {task} on {} threads", pool.current_num_threads());

        pool.install(|| {
            sources
                .par_iter()
                .map_init(
                    || TaskProcessor::new(task, config.engine().clone()),
                    |processor, source| {
                        let processor = processor
                            .as_mut()
                            .map_err(|e| anyhow::anyhow!("Failed to start {task} worker: {e}"))?;
                        let outcome = process_source(processor, source)?;
                        reporter.completed(&outcome.0);
                        Ok(outcome)
                    },
                )
                .collect::<Result<Vec<_>>>()
        })
    }

    fn formatter(
        &self,
        format: OutputFormat,
        mode: ExecutionMode,
        pretty_json: bool,
        headers: bool,
    ) -> Result<Box<dyn OutputFormatter>> {
        let formatter: Box<dyn OutputFormatter> = match (&self.output, format) {
            (Some(path), OutputFormat::Text) => {
                Box::new(TextFormatter::new(create_output(path)?, headers))
            }
            (None, OutputFormat::Text) => Box::new(TextFormatter::stdout(headers)),
            (Some(path), OutputFormat::Json) => Box::new(JsonFormatter::new(
                create_output(path)?,
                self.task.as_str(),
                mode.as_str(),
                pretty_json,
            )),
            (None, OutputFormat::Json) => Box::new(JsonFormatter::new(
                io::stdout(),
                self.task.as_str(),
                mode.as_str(),
                pretty_json,
            )),
        };
        Ok(formatter)
    }
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn process_source(processor: &mut TaskProcessor, source: &InputSource) -> Result<Outcome> {
    let label = source.label();
    let text = source.read()?;
    let output = processor
        .execute(&text)
        .with_context(|| format!("Failed to process {label}"))?;
    Ok((label, output))
}
