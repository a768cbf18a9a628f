//! Interpreter preflight

use crate::error::{EngineError, Result};
use crate::Task;
use regex::Regex;
use std::process::Command;
use std::sync::OnceLock;

/// Oldest Java release the toolkit runs on
pub const MIN_JAVA_VERSION: f32 = 1.7;

/// Version reported by the interpreter
#[derive(Debug, Clone, PartialEq)]
pub struct JavaVersion {
    /// Leading `major[.minor]` as a number, e.g. `1.8` or `17.0`
    pub number: f32,
    /// Full `-version` output
    pub raw: String,
}

impl JavaVersion {
    /// Whether the toolkit is expected to run on this version
    pub fn is_supported(&self) -> bool {
        self.number >= MIN_JAVA_VERSION
    }
}

fn version_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r#""(\d+(\.\d+)?)"#).ok())
        .as_ref()
}

/// Extract the quoted version number from `java -version` output
pub fn parse_java_version(output: &str) -> Option<JavaVersion> {
    let captures = version_pattern()?.captures(output)?;
    let number = captures.get(1)?.as_str().parse().ok()?;
    Some(JavaVersion {
        number,
        raw: output.trim().to_string(),
    })
}

/// Run `<program> -version` and check the reported version.
///
/// An interpreter that cannot be started is a launch error for `task`.
/// Old or unrecognised versions only produce a warning.
pub fn check_java_version(program: &str, task: Task) -> Result<Option<JavaVersion>> {
    let output = Command::new(program)
        .arg("-version")
        .output()
        .map_err(|source| EngineError::Launch {
            task,
            program: program.to_string(),
            source,
        })?;

    // java prints its banner on stderr
    let mut banner = String::from_utf8_lossy(&output.stderr).into_owned();
    banner.push_str(&String::from_utf8_lossy(&output.stdout));

    match parse_java_version(&banner) {
        Some(version) if version.is_supported() => {
            tracing::debug!(version = version.number, "java version is compatible");
            Ok(Some(version))
        }
        Some(version) => {
            tracing::warn!(
                version = version.number,
                "old java version; the toolkit requires Java {MIN_JAVA_VERSION} or above"
            );
            Ok(Some(version))
        }
        None => {
            tracing::warn!(%program, "could not determine the interpreter version");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_legacy_version() {
        let banner = r#"java version "1.8.0_381"
Java(TM) SE Runtime Environment (build 1.8.0_381-b09)"#;
        let version = parse_java_version(banner).unwrap();
        assert_eq!(version.number, 1.8);
        assert!(version.is_supported());
    }

    #[test]
    fn test_parse_modern_version() {
        let banner = r#"openjdk version "17.0.8" 2023-07-18"#;
        assert_eq!(parse_java_version(banner).unwrap().number, 17.0);

        let banner = r#"openjdk version "21" 2023-09-19"#;
        assert_eq!(parse_java_version(banner).unwrap().number, 21.0);
    }

    #[test]
    fn test_parse_old_version_is_unsupported() {
        let version = parse_java_version(r#"java version "1.6.0_45""#).unwrap();
        assert!(!version.is_supported());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_java_version("command not found").is_none());
    }

    #[test]
    fn test_missing_interpreter_is_launch_error() {
        let result = check_java_version("no-such-java-binary-here", Task::Pos);
        assert!(matches!(result, Err(EngineError::Launch { task: Task::Pos, .. })));
    }
}
