use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

use super::report::generate_response_logs;
use super::results::{extract_llms, extract_testcases, result_laundry, ResultsFile, TestCase};
use crate::error::Result;
use crate::scoring::{evaluation_score, get_test_stats, LlmEval, RunWindow, TestStats};

/// Everything derived from one results payload, ready to be written
#[derive(Debug, Clone)]
pub struct ScoredRun {
    /// Input payload with verbose fields stripped
    pub raw: ResultsFile,
    pub tests: Vec<TestCase>,
    pub scores: Vec<LlmEval>,
    pub stats: TestStats,
}

impl ScoredRun {
    /// Write the report for this run under `output_dir`
    pub fn save(&self, output_dir: &Path, pretty: bool) -> Result<PathBuf> {
        generate_response_logs(
            &self.raw,
            &self.scores,
            &self.stats,
            &self.tests,
            output_dir,
            pretty,
        )
    }
}

/// Run the scoring pipeline over one results payload
pub fn score_run(mut raw: ResultsFile, window: RunWindow) -> Result<ScoredRun> {
    if raw.eval_id.is_empty() {
        raw.eval_id = format!("eval-{}", Uuid::new_v4());
        info!("Results carry no evalId, using {}", raw.eval_id);
    }

    info!(
        "Scoring evaluation {} ({} results)",
        raw.eval_id,
        raw.results.results.len()
    );

    let providers = extract_llms(&raw.results);
    let tests = extract_testcases(&raw.results);
    info!("Found {} models and {} tests", providers.len(), tests.len());

    let scores = evaluation_score(&providers, &tests, &raw.results)?;
    let stats = get_test_stats(&scores, &tests, window.start_time, window.end_time);

    result_laundry(&mut raw.results);

    Ok(ScoredRun {
        raw,
        tests,
        scores,
        stats,
    })
}
