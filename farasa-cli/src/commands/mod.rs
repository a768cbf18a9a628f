//! CLI command implementations

use crate::error::CliError;
use anyhow::Result;
use clap::Subcommand;
use farasa_api::{Interpreter, Task};

pub mod cache;
pub mod check;
pub mod generate_config;
pub mod run;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a task over text, files or stdin
    Run(run::RunArgs),

    /// Inspect or clear the result cache
    Cache {
        #[command(subcommand)]
        subcommand: cache::CacheCommands,
    },

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },

    /// Check the Java runtime and the toolkit binaries
    Check(check::CheckArgs),

    /// Write a configuration file template
    GenerateConfig(generate_config::GenerateConfigArgs),
}

impl Commands {
    /// Execute the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Run(args) => args.execute(),
            Commands::Cache { subcommand } => subcommand.execute(),
            Commands::List { subcommand } => {
                subcommand.execute();
                Ok(())
            }
            Commands::Check(args) => args.execute(),
            Commands::GenerateConfig(args) => args.execute(),
        }
    }
}

/// List subcommands
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// List tasks with their binaries
    Tasks,

    /// List available output formats
    Formats,
}

impl ListCommands {
    /// Print the requested listing
    pub fn execute(&self) {
        match self {
            ListCommands::Tasks => {
                println!("{:<12} {:<30} INTERACTIVE", "TASK", "BINARY");
                for task in Task::ALL {
                    println!(
                        "{:<12} {:<30} {}",
                        task.as_str(),
                        task.bundled_binary().unwrap_or("(--binary required)"),
                        if task.supports_interactive() { "yes" } else { "no" }
                    );
                }
            }
            ListCommands::Formats => {
                println!("text  raw worker output, one block per input");
                println!("json  array of {{source, task, mode, output}} records");
            }
        }
    }
}

/// Initialize logging based on verbosity level
pub fn init_logging(verbose: u8, quiet: bool) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    if !quiet {
        // A logger may already be installed when commands run in-process
        let _ = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(log_level),
        )
        .try_init();
    }
}

/// Parse an interpreter command line such as `java -Xmx2g -jar`
pub fn parse_interpreter<S: AsRef<str>>(words: &[S]) -> Result<Interpreter> {
    match words.split_first() {
        Some((program, args)) if !program.as_ref().is_empty() => Ok(Interpreter::new(
            program.as_ref(),
            args.iter().map(|a| a.as_ref().to_string()),
        )),
        _ => Err(CliError::ConfigError("interpreter command is empty".to_string()).into()),
    }
}

/// Same as [`parse_interpreter`], splitting a single string on whitespace
pub fn parse_interpreter_line(line: &str) -> Result<Interpreter> {
    parse_interpreter(&line.split_whitespace().collect::<Vec<_>>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_interpreter_line() {
        let interpreter = parse_interpreter_line("java -Xmx2g -jar").unwrap();
        assert_eq!(interpreter.program, "java");
        assert_eq!(interpreter.args, vec!["-Xmx2g", "-jar"]);

        let interpreter = parse_interpreter_line("sh").unwrap();
        assert_eq!(interpreter.program, "sh");
        assert!(interpreter.args.is_empty());
    }

    #[test]
    fn test_parse_interpreter_empty() {
        assert!(parse_interpreter_line("   ").is_err());
        assert!(parse_interpreter::<String>(&[]).is_err());
    }

    #[test]
    fn test_commands_debug_format() {
        let list_cmd = Commands::List {
            subcommand: ListCommands::Tasks,
        };

        let debug_str = format!("{:?}", list_cmd);
        assert!(debug_str.contains("List"));
        assert!(debug_str.contains("Tasks"));
    }
}
