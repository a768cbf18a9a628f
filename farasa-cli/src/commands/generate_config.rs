//! Generate config command implementation

use anyhow::{bail, Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

const TEMPLATE: &str = r#"# farasa CLI configuration
#
# Pass with `farasa run <TASK> --config <FILE>`. Command-line flags win
# over values set here.

[runtime]
# Interpreter command line, program first
# interpreter = ["java", "-Dfile.encoding=UTF-8", "-jar"]

# Directory holding the extracted toolkit binaries (also FARASA_BIN_DIR)
# bin_dir = "/opt/farasa/farasa_bin"

# Keep one primed worker alive per run instead of one process per input
interactive = false

# Per-call timeout in milliseconds; unset waits forever
# timeout_ms = 60000

# Scratch directory for standalone temp files
# temp_dir = "/tmp/farasa"

# Check the Java version before starting workers
verify_java = true

[cache]
# Memoize worker outputs on disk
enabled = true

# Cache root (also FARASA_CACHE_DIR)
# dir = "/var/cache/farasa"

[output]
# "text" or "json"
format = "text"
pretty_json = true
"#;

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        if self.output.exists() && !self.force {
            bail!(
                "{} already exists; pass --force to overwrite",
                self.output.display()
            );
        }

        fs::write(&self.output, TEMPLATE)
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Configuration template written to {}", self.output.display());
        println!();
        println!("Use it for processing:");
        println!(
            "   farasa run segment -i input.txt --config {}",
            self.output.display()
        );

        Ok(())
    }
}
