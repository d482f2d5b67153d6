//! End-to-end tests for the bench-score binary and pipeline
//!
//! Each test writes a results payload into a scratch directory and checks the
//! report produced from it.

use bench_score::eval::{report_file_name, score_run, ResponseLog, ResultsFile};
use bench_score::scoring::RunWindow;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn bench_score() -> Command {
    Command::new(env!("CARGO_BIN_EXE_bench-score"))
}

fn results_payload() -> Value {
    json!({
        "evalId": "eval-2024-05-01T10:00:00",
        "results": {
            "timestamp": "2024-05-01T10:00:00.000Z",
            "table": { "head": { "prompts": [] }, "body": [] },
            "stats": { "successes": 3, "failures": 1 },
            "results": [
                {
                    "provider": { "id": "openai:gpt-4o" },
                    "vars": {
                        "name": "long_context_recall",
                        "difficulties": { "context_length": 3, "reasoning_depth": 1, "instruction_compliance": 1 },
                        "_conversation": [{ "role": "user", "content": "..." }],
                        "prompt": "recall the fact"
                    },
                    "score": 1,
                    "response": { "output": "42" }
                },
                {
                    "provider": { "id": "anthropic:claude" },
                    "vars": {
                        "name": "long_context_recall",
                        "difficulties": { "context_length": 3, "reasoning_depth": 1, "instruction_compliance": 1 }
                    },
                    "score": 0
                },
                {
                    "provider": { "id": "anthropic:claude" },
                    "vars": {
                        "name": "multi_step_math",
                        "difficulties": { "context_length": 1, "reasoning_depth": 4, "instruction_compliance": 2 }
                    },
                    "score": 1
                },
                {
                    "provider": { "id": "anthropic:claude" },
                    "vars": {
                        "name": "multi_step_math",
                        "difficulties": { "context_length": 1, "reasoning_depth": 4, "instruction_compliance": 2 }
                    },
                    "score": 0.5
                }
            ]
        }
    })
}

fn write_payload(dir: &Path, payload: &Value) -> PathBuf {
    let path = dir.join("results.json");
    fs::write(&path, serde_json::to_string_pretty(payload).unwrap()).unwrap();
    path
}

fn run(cmd: &mut Command) -> Output {
    let output = cmd.output().expect("Failed to run bench-score");
    if !output.status.success() {
        panic!(
            "bench-score failed:\n{}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
    output
}

#[test]
fn score_writes_single_report() {
    let temp = tempfile::tempdir().unwrap();
    let input = write_payload(temp.path(), &results_payload());
    let output_dir = temp.path().join("logs");

    let output = run(bench_score()
        .arg("score")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output_dir)
        .args(["--ended-at", "2024-05-01T11:00:00Z"]));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("#1 anthropic:claude - 10.50/12"));
    assert!(stdout.contains("#2 openai:gpt-4o - 5.00/12"));

    let files: Vec<PathBuf> = fs::read_dir(&output_dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);
    assert_eq!(
        files[0].file_name().unwrap().to_str().unwrap(),
        report_file_name("eval-2024-05-01T10:00:00", "2024-05-01T10:00:00.000Z")
    );

    let log = ResponseLog::load(&files[0]).unwrap();
    assert_eq!(log.stats.llms, vec!["anthropic:claude", "openai:gpt-4o"]);
    assert_eq!(log.stats.max_total_score, 12);
    assert_eq!(log.stats.max_reasoning_depth, 5);
    assert_eq!(log.stats.start_time.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    assert_eq!(log.stats.end_time.to_rfc3339(), "2024-05-01T11:00:00+00:00");

    let claude = &log.scores[0];
    assert_eq!(claude.llm_id, "anthropic:claude");
    assert_eq!(claude.scores.len(), 3);
    assert_eq!(claude.scores[2].repeat, 2);
    assert_eq!(claude.scores[2].test_score, 3.5);
    assert_eq!(claude.aggregated_scores.reasoning_depth, 6.0);

    let raw = serde_json::to_value(&log.results).unwrap();
    assert!(raw.get("table").is_none());
    assert!(raw.get("stats").is_none());
    assert!(raw["results"][0]["vars"].get("_conversation").is_none());
    assert!(raw["results"][0]["vars"].get("prompt").is_none());
    assert_eq!(raw["results"][0]["response"]["output"], json!("42"));
}

#[test]
fn dry_run_writes_nothing() {
    let temp = tempfile::tempdir().unwrap();
    let input = write_payload(temp.path(), &results_payload());
    let output_dir = temp.path().join("logs");

    let output = run(bench_score()
        .arg("score")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output_dir)
        .arg("--dry-run"));

    assert!(String::from_utf8_lossy(&output.stdout).contains("Dry run mode"));
    assert!(!output_dir.exists());
}

#[test]
fn unknown_input_fails() {
    let temp = tempfile::tempdir().unwrap();
    let output = bench_score()
        .arg("score")
        .arg("--input")
        .arg(temp.path().join("missing.json"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load results file"));
}

#[test]
fn config_sets_output_dir_and_show_renders() {
    let temp = tempfile::tempdir().unwrap();
    let config_path = temp.path().join("bench-score.yaml");
    let output_dir = temp.path().join("configured");
    fs::write(
        &config_path,
        format!(
            "name: Weekly Run\noutput_dir: {}\npretty: false\n",
            output_dir.display()
        ),
    )
    .unwrap();
    let input = write_payload(temp.path(), &results_payload());

    run(bench_score()
        .arg("score")
        .arg("--input")
        .arg(&input)
        .arg("--config")
        .arg(&config_path));

    let report = fs::read_dir(&output_dir)
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .path();
    let content = fs::read_to_string(&report).unwrap();
    assert_eq!(content.lines().count(), 1);

    let output = run(bench_score()
        .arg("show")
        .arg(&report)
        .arg("--config")
        .arg(&config_path));
    let markdown = String::from_utf8_lossy(&output.stdout);
    assert!(markdown.contains("# Benchmark Report: Weekly Run"));
    assert!(markdown.contains("| 1 | anthropic:claude | 10.50/12 |"));
}

#[test]
fn init_writes_sample_config() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("sample.yaml");

    run(bench_score().arg("init").arg("--output").arg(&path));

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("output_dir"));
    assert!(content.contains("Nightly LLM Benchmark"));
}

#[test]
fn empty_results_still_write_one_report() {
    let temp = tempfile::tempdir().unwrap();
    let raw: ResultsFile = serde_json::from_value(json!({
        "evalId": "eval-empty",
        "results": { "timestamp": "2024-05-01T10:00:00Z", "results": [] }
    }))
    .unwrap();
    let window = RunWindow::resolve(&raw.results.timestamp, None, None).unwrap();

    let scored = score_run(raw, window).unwrap();
    assert!(scored.scores.is_empty());

    let output_dir = temp.path().join("logs");
    fs::create_dir_all(&output_dir).unwrap();
    scored.save(&output_dir, true).unwrap();

    assert_eq!(fs::read_dir(&output_dir).unwrap().count(), 1);
}

#[test]
fn logs_go_to_stderr_not_stdout() {
    let temp = tempfile::tempdir().unwrap();
    let input = write_payload(temp.path(), &results_payload());

    let output = run(bench_score()
        .arg("score")
        .arg("--input")
        .arg(&input)
        .arg("--dry-run"));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Loading results from"));
    assert!(!stdout.contains("Loading results from"));
    assert!(stdout.contains("SCORING COMPLETE"));
}

#[test]
fn malformed_json_error_names_the_file() {
    let temp = tempfile::tempdir().unwrap();
    let input = temp.path().join("truncated.json");
    fs::write(&input, "{ \"evalId\": ").unwrap();

    let output = bench_score()
        .arg("score")
        .arg("--input")
        .arg(&input)
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("truncated.json"));
}
