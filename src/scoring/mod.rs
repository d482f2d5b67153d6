// Scoring engine - weights assertion scores by test difficulty and
// aggregates them per provider

mod stats;

pub use stats::{get_test_stats, RunWindow, TestMaxScore, TestStats};

use crate::error::{Result, ScoreError};
use crate::eval::{Difficulties, RawResults, TestCase};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// One scored execution of a test by one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestScore {
    pub test_name: String,
    /// Raw assertion outcome before weighting
    pub assertion_score: f64,
    /// Assertion score times the sum of the test's weights
    pub test_score: f64,
    /// 1-based execution count of this test for the provider
    pub repeat: u32,
}

/// Weighted totals per difficulty dimension
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionScores {
    pub context_length: f64,
    pub reasoning_depth: f64,
    pub instruction_compliance: f64,
}

impl DimensionScores {
    fn accumulate(&mut self, assertion_score: f64, difficulties: &Difficulties) {
        self.context_length += assertion_score * f64::from(difficulties.context_length);
        self.reasoning_depth += assertion_score * f64::from(difficulties.reasoning_depth);
        self.instruction_compliance +=
            assertion_score * f64::from(difficulties.instruction_compliance);
    }
}

/// Evaluation of a single provider across the run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmEval {
    pub llm_id: String,
    pub scores: Vec<TestScore>,
    pub aggregated_scores: DimensionScores,
    pub total_score: f64,
}

pub fn calculate_total_score(aggregated: &DimensionScores) -> f64 {
    aggregated.context_length + aggregated.reasoning_depth + aggregated.instruction_compliance
}

/// Look up a test's weights by exact name
pub fn find_difficulties<'a>(test_name: &str, tests: &'a [TestCase]) -> Result<&'a Difficulties> {
    tests
        .iter()
        .find(|t| t.name == test_name)
        .map(|t| &t.difficulties)
        .ok_or_else(|| ScoreError::UnknownTest {
            name: test_name.to_string(),
        })
}

/// Score every execution of `llm_id`, in result order
pub fn get_llm_scores(llm_id: &str, results: &RawResults, tests: &[TestCase]) -> Result<Vec<TestScore>> {
    let mut seen: HashMap<&str, u32> = HashMap::new();
    let mut scores = Vec::new();

    for entry in results
        .results
        .iter()
        .filter(|e| e.provider_id() == Some(llm_id))
    {
        let Some(test_name) = entry.test_name() else {
            debug!("Skipping result for {} without test name", llm_id);
            continue;
        };

        let difficulties = find_difficulties(test_name, tests)?;
        let assertion_score = entry.score;

        let repeat = seen.entry(test_name).or_insert(0);
        *repeat += 1;

        scores.push(TestScore {
            test_name: test_name.to_string(),
            assertion_score,
            test_score: assertion_score * difficulties.sum() as f64,
            repeat: *repeat,
        });
    }

    Ok(scores)
}

/// Sum weighted assertion scores per dimension. Repeats count in full.
pub fn get_aggregated_scores(scores: &[TestScore], tests: &[TestCase]) -> Result<DimensionScores> {
    let mut aggregated = DimensionScores::default();

    for score in scores {
        let difficulties = find_difficulties(&score.test_name, tests)?;
        aggregated.accumulate(score.assertion_score, difficulties);
    }

    Ok(aggregated)
}

/// Evaluate every provider, keeping the order of `providers`
pub fn evaluation_score(
    providers: &[String],
    tests: &[TestCase],
    results: &RawResults,
) -> Result<Vec<LlmEval>> {
    providers
        .iter()
        .map(|llm_id| {
            let scores = get_llm_scores(llm_id, results, tests)?;
            let aggregated_scores = get_aggregated_scores(&scores, tests)?;
            let total_score = calculate_total_score(&aggregated_scores);

            info!(
                "Scored {}: {} executions, total {:.2}",
                llm_id,
                scores.len(),
                total_score
            );

            Ok(LlmEval {
                llm_id: llm_id.clone(),
                scores,
                aggregated_scores,
                total_score,
            })
        })
        .collect()
}

/// Order evaluations by total score, best first, with 1-based ranks.
/// Ties keep their input order.
pub fn rank_evals(evals: &[LlmEval]) -> Vec<(usize, &LlmEval)> {
    let mut ranked: Vec<&LlmEval> = evals.iter().collect();
    ranked.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));

    ranked
        .into_iter()
        .enumerate()
        .map(|(i, eval)| (i + 1, eval))
        .collect()
}
