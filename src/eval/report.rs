use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use super::results::{RawResults, ResultsFile, TestCase};
use crate::error::{Result, ScoreError};
use crate::scoring::{rank_evals, LlmEval, TestStats};

/// Report written at the end of a scoring run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseLog {
    /// Evaluation identifier of the benchmark run
    pub eval_id: String,
    /// Timestamp of the raw results
    pub timestamp: String,
    /// When this report was generated
    pub generated_at: DateTime<Utc>,
    /// Best achievable scores of the run
    pub stats: TestStats,
    /// Test cases referenced by the run
    pub tests: Vec<TestCase>,
    /// Per-provider evaluations
    pub scores: Vec<LlmEval>,
    /// Sanitized raw results
    pub results: RawResults,
}

/// File name of the report for a run: `<timestamp>_<evalId>.json`
pub fn report_file_name(eval_id: &str, timestamp: &str) -> String {
    let stamp: String = timestamp
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    let id: String = eval_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();

    format!("{}_{}.json", stamp, id)
}

/// Assemble the report and write it as a single file under `output_dir`.
///
/// The directory is created if needed. Returns the path of the written file.
pub fn generate_response_logs(
    raw: &ResultsFile,
    scores: &[LlmEval],
    stats: &TestStats,
    tests: &[TestCase],
    output_dir: &Path,
    pretty: bool,
) -> Result<PathBuf> {
    let log = ResponseLog {
        eval_id: raw.eval_id.clone(),
        timestamp: raw.results.timestamp.clone(),
        generated_at: Utc::now(),
        stats: stats.clone(),
        tests: tests.to_vec(),
        scores: scores.to_vec(),
        results: raw.results.clone(),
    };

    std::fs::create_dir_all(output_dir).map_err(|e| ScoreError::io(output_dir, e))?;

    let path = output_dir.join(report_file_name(&log.eval_id, &log.timestamp));
    log.save_json(&path, pretty)?;
    info!("Saved report to {:?}", path);

    Ok(path)
}

impl ResponseLog {
    /// Save the report to a JSON file
    pub fn save_json(&self, path: &Path, pretty: bool) -> Result<()> {
        let content = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        std::fs::write(path, content).map_err(|e| ScoreError::io(path, e))?;
        Ok(())
    }

    /// Load a previously written report
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ScoreError::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| ScoreError::parse(path, e))
    }

    /// Generate a human-readable report
    pub fn render_markdown(&self, title: &str) -> String {
        let mut report = String::new();
        let stats = &self.stats;

        report.push_str(&format!("# Benchmark Report: {}\n\n", title));
        report.push_str(&format!("Evaluation ID: {}\n", self.eval_id));
        report.push_str(&format!("Started: {}\n", stats.start_time));
        report.push_str(&format!("Ended: {}\n", stats.end_time));
        report.push_str(&format!("Generated: {}\n", self.generated_at));
        report.push('\n');

        report.push_str("## Summary\n\n");
        report.push_str(&format!("- Models: {}\n", stats.llms.len()));
        report.push_str(&format!("- Tests: {}\n", self.tests.len()));
        report.push_str(&format!("- Executions: {}\n", self.results.results.len()));
        report.push_str(&format!("- Max Total Score: {}\n", stats.max_total_score));
        report.push_str(&format!(
            "- Max Context Length: {}\n",
            stats.max_context_length
        ));
        report.push_str(&format!(
            "- Max Reasoning Depth: {}\n",
            stats.max_reasoning_depth
        ));
        report.push_str(&format!(
            "- Max Instruction Compliance: {}\n",
            stats.max_instruction_compliance
        ));
        report.push('\n');

        report.push_str("## Model Rankings\n\n");
        report.push_str(
            "| Rank | Model | Total | Context Length | Reasoning Depth | Instruction Compliance |\n",
        );
        report.push_str(
            "|------|-------|-------|----------------|-----------------|------------------------|\n",
        );

        for (rank, eval) in rank_evals(&self.scores) {
            let aggregated = &eval.aggregated_scores;
            report.push_str(&format!(
                "| {} | {} | {:.2}/{} | {:.2} | {:.2} | {:.2} |\n",
                rank,
                eval.llm_id,
                eval.total_score,
                stats.max_total_score,
                aggregated.context_length,
                aggregated.reasoning_depth,
                aggregated.instruction_compliance
            ));
        }

        report.push_str("\n## Tests\n\n");
        report.push_str("| Test | Max Score |\n");
        report.push_str("|------|-----------|\n");
        for test in &stats.tests {
            report.push_str(&format!("| {} | {} |\n", test.name, test.max_score));
        }

        report.push_str("\n## Individual Scores\n\n");
        for eval in &self.scores {
            report.push_str(&format!("### {}\n", eval.llm_id));
            for score in &eval.scores {
                report.push_str(&format!(
                    "- {} (run {}): assertion {:.2}, weighted {:.2}\n",
                    score.test_name, score.repeat, score.assertion_score, score.test_score
                ));
            }
            report.push('\n');
        }

        report
    }
}
