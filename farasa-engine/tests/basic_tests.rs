//! Basic tests for farasa-engine

use farasa_engine::*;
use std::time::Duration;

#[test]
fn test_engine_config_creation() {
    let config = EngineConfig::default();
    assert_eq!(config.execution_mode, ExecutionMode::Standalone);
    assert_eq!(config.interpreter, Interpreter::java());
    assert!(config.verify_runtime);

    let interactive = EngineConfig::interactive();
    assert_eq!(interactive.execution_mode, ExecutionMode::Interactive);
    assert_eq!(interactive.priming_token, "اختبار");
}

#[test]
fn test_every_task_has_a_distinct_partition() {
    let mut names: Vec<_> = Task::ALL.iter().map(|t| t.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), Task::ALL.len());
}

#[test]
fn test_fingerprints_never_collide_across_task_or_mode() {
    let text = "يُشار إلى أن اللغة العربية";
    let mut fingerprints = Vec::new();
    for task in Task::ALL {
        for mode in [ExecutionMode::Standalone, ExecutionMode::Interactive] {
            fingerprints.push(CacheStore::fingerprint(task, mode, text));
        }
    }
    let total = fingerprints.len();
    fingerprints.sort();
    fingerprints.dedup();
    assert_eq!(fingerprints.len(), total);
}

#[test]
fn test_builder_surfaces_config_errors_before_spawning() {
    let result = TaskProcessorBuilder::new(Task::DepParse)
        .verify_runtime(false)
        .timeout(Some(Duration::from_secs(1)))
        .build();
    match result {
        Err(EngineError::Config(msg)) => assert!(msg.contains("depparse")),
        other => panic!("expected Config error, got {other:?}"),
    }
}
