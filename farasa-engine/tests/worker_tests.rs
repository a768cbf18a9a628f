//! End-to-end tests against stand-in worker scripts

#![cfg(unix)]

use farasa_engine::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Standalone worker: records each run, copies its input aside, and writes
/// `<flags>|<input>` to the output file.
fn recording_worker(dir: &Path) -> PathBuf {
    let body = format!(
        r#"flags=""
while [ $# -gt 0 ]; do
  case "$1" in
    -i) in="$2"; shift 2 ;;
    -o) out="$2"; shift 2 ;;
    *) flags="$flags $1"; shift ;;
  esac
done
echo run >> "{log}"
cp "$in" "{seen}"
{{ printf '%s|' "$flags"; cat "$in"; }} > "$out"
"#,
        log = dir.join("runs.log").display(),
        seen = dir.join("seen.txt").display(),
    );
    write_script(dir, "recording.sh", &body)
}

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

fn run_count(dir: &Path) -> usize {
    fs::read_to_string(dir.join("runs.log"))
        .map(|log| log.lines().count())
        .unwrap_or(0)
}

fn builder(task: Task, script: &Path) -> TaskProcessorBuilder {
    TaskProcessorBuilder::new(task)
        .interpreter(Interpreter::new("sh", Vec::<String>::new()))
        .binary(script)
        .verify_runtime(false)
}

#[test]
fn test_stem_standalone_scenario() {
    let dir = TempDir::new().unwrap();
    let script = recording_worker(dir.path());
    let mut stemmer = builder(Task::Stem, &script)
        .cache_dir(dir.path().join("cache"))
        .temp_dir(dir.path().join("scratch"))
        .build()
        .unwrap();

    let first = stemmer.execute("اختبار").unwrap();
    assert_eq!(first, "-l true|اختبار");
    assert_eq!(fs::read_to_string(dir.path().join("seen.txt")).unwrap(), "اختبار");
    assert_eq!(run_count(dir.path()), 1);

    let second = stemmer.execute("اختبار").unwrap();
    assert_eq!(second, first);
    assert_eq!(run_count(dir.path()), 1);

    let entry = stemmer
        .cache()
        .unwrap()
        .entry_path(Task::Stem, ExecutionMode::Standalone, "اختبار");
    assert!(entry.starts_with(dir.path().join("cache").join("stem")));
    assert!(entry.is_file());
}

#[test]
fn test_cache_survives_processor_restart() {
    let dir = TempDir::new().unwrap();
    let script = recording_worker(dir.path());
    let cache_dir = dir.path().join("cache");

    let mut first = builder(Task::Segment, &script)
        .cache_dir(&cache_dir)
        .build()
        .unwrap();
    let output = first.execute("كلمة").unwrap();
    drop(first);

    let mut second = builder(Task::Segment, &script)
        .cache_dir(&cache_dir)
        .build()
        .unwrap();
    assert_eq!(second.execute("كلمة").unwrap(), output);
    assert_eq!(run_count(dir.path()), 1);
}

#[test]
fn test_disabling_cache_changes_nothing_but_latency() {
    let dir = TempDir::new().unwrap();
    let script = recording_worker(dir.path());

    let mut cached = builder(Task::Segment, &script)
        .cache_dir(dir.path().join("cache"))
        .build()
        .unwrap();
    let mut uncached = builder(Task::Segment, &script).cache(false).build().unwrap();

    assert_eq!(
        cached.execute("نص قصير").unwrap(),
        uncached.execute("نص قصير").unwrap()
    );
}

#[test]
fn test_standalone_leaves_no_temp_files() {
    let dir = TempDir::new().unwrap();
    let scratch = dir.path().join("scratch");
    let good = recording_worker(dir.path());
    let bad = write_script(dir.path(), "bad.sh", "echo boom >&2; exit 1\n");

    let mut ok = builder(Task::Segment, &good)
        .cache(false)
        .temp_dir(&scratch)
        .build()
        .unwrap();
    ok.execute("نص").unwrap();
    assert_eq!(fs::read_dir(&scratch).unwrap().count(), 0);

    let mut failing = builder(Task::Segment, &bad)
        .cache(false)
        .temp_dir(&scratch)
        .build()
        .unwrap();
    match failing.execute("نص") {
        Err(EngineError::Execution { code, stderr, .. }) => {
            assert_eq!(code, Some(1));
            assert_eq!(stderr.trim(), "boom");
        }
        other => panic!("expected Execution error, got {other:?}"),
    }
    assert_eq!(fs::read_dir(&scratch).unwrap().count(), 0);
}

#[test]
fn test_failed_execution_is_not_cached() {
    let dir = TempDir::new().unwrap();
    let bad = write_script(dir.path(), "bad.sh", "exit 2\n");
    let mut processor = builder(Task::Ner, &bad)
        .cache_dir(dir.path().join("cache"))
        .build()
        .unwrap();
    assert!(processor.execute("x").is_err());
    assert_eq!(
        processor.cache().unwrap().stats(Task::Ner),
        CacheStats::default()
    );
}

#[test]
fn test_interactive_ordering_with_uneven_latency() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        dir.path(),
        "ordered.sh",
        r#"while IFS= read -r line; do
  case "$line" in slow*) sleep 0.2 ;; esac
  printf 'r:%s\n' "$line"
done
"#,
    );
    let mut processor = builder(Task::Pos, &script)
        .interactive(true)
        .cache(false)
        .build()
        .unwrap();

    assert_eq!(processor.execute("slow one").unwrap(), "r:slow one");
    assert_eq!(processor.execute("fast two").unwrap(), "r:fast two");
    assert_eq!(processor.execute("slow three").unwrap(), "r:slow three");
    assert_eq!(
        processor.execute("slow a\nfast b\nslow c").unwrap(),
        "r:slow a\nr:fast b\nr:slow c"
    );
}

#[test]
fn test_interactive_recovers_from_closed_worker() {
    let dir = TempDir::new().unwrap();
    // Answers exactly one line, then exits
    let script = write_script(
        dir.path(),
        "one_shot.sh",
        "IFS= read -r line; printf 'r:%s\\n' \"$line\"\n",
    );
    let command = CommandDescriptor::for_task(
        Task::Diacritize,
        &Interpreter::new("sh", Vec::<String>::new()),
        dir.path(),
        Some(&script),
    )
    .unwrap();

    let mut session = InteractiveSession::new(command, "اختبار", None);
    session.initialize().unwrap();
    let first_pid = session.worker_pid();

    assert_eq!(session.submit_line("second").unwrap(), "r:second");
    assert_eq!(session.respawn_count(), 1);
    assert_ne!(session.worker_pid(), first_pid);
    assert_eq!(session.status(), SessionStatus::Ready);

    assert_eq!(session.submit_line("third").unwrap(), "r:third");
    assert_eq!(session.respawn_count(), 2);
}

#[test]
fn test_interactive_gives_up_after_one_respawn() {
    let dir = TempDir::new().unwrap();
    let counter = dir.path().join("spawns");
    // First spawn answers the priming line; every later spawn dies at once
    let body = format!(
        r#"n=$(cat "{counter}" 2>/dev/null || echo 0)
n=$((n+1))
echo "$n" > "{counter}"
if [ "$n" -gt 1 ]; then exit 1; fi
IFS= read -r line; printf 'r:%s\n' "$line"
"#,
        counter = counter.display()
    );
    let script = write_script(dir.path(), "dying.sh", &body);
    let mut processor = builder(Task::Ner, &script)
        .interactive(true)
        .cache(false)
        .build()
        .unwrap();

    match processor.execute("request") {
        Err(EngineError::Pipe { task, mode, .. }) => {
            assert_eq!(task, Task::Ner);
            assert_eq!(mode, ExecutionMode::Interactive);
        }
        other => panic!("expected Pipe error, got {other:?}"),
    }
    assert_eq!(fs::read_to_string(&counter).unwrap().trim(), "2");

    // No further respawns: the session must be reinitialized explicitly
    assert!(matches!(
        processor.execute("again"),
        Err(EngineError::NotInitialized { .. })
    ));
    assert_eq!(fs::read_to_string(&counter).unwrap().trim(), "2");
}

#[test]
fn test_interactive_terminate() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        dir.path(),
        "echo.sh",
        "while IFS= read -r line; do printf 'r:%s\\n' \"$line\"; done\n",
    );
    let mut processor = builder(Task::Segment, &script)
        .interactive(true)
        .cache(false)
        .build()
        .unwrap();
    assert_eq!(processor.execute("x").unwrap(), "r:x");

    processor.terminate();
    assert!(matches!(
        processor.execute("y"),
        Err(EngineError::NotInitialized { .. })
    ));
}

#[test]
fn test_interactive_and_standalone_cache_separately() {
    let dir = TempDir::new().unwrap();
    let cache_dir = dir.path().join("cache");
    let standalone_script = recording_worker(dir.path());
    let interactive_script = write_script(
        dir.path(),
        "echo.sh",
        "while IFS= read -r line; do printf 'i:%s\\n' \"$line\"; done\n",
    );

    let mut standalone = builder(Task::Segment, &standalone_script)
        .cache_dir(&cache_dir)
        .build()
        .unwrap();
    let mut interactive = builder(Task::Segment, &interactive_script)
        .interactive(true)
        .cache_dir(&cache_dir)
        .build()
        .unwrap();

    assert_eq!(standalone.execute("w").unwrap(), "|w");
    assert_eq!(interactive.execute("w").unwrap(), "i:w");
    assert_eq!(standalone.cache().unwrap().stats(Task::Segment).entries, 2);
}
