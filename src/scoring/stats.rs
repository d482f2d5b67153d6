//! Run-wide maxima for a benchmark run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::LlmEval;
use crate::error::{Result, ScoreError};
use crate::eval::TestCase;

/// Best achievable score of a single test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestMaxScore {
    pub name: String,
    pub max_score: u64,
}

/// Maximum achievable scores of a run, assuming every assertion passes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestStats {
    pub llms: Vec<String>,
    pub max_total_score: u64,
    pub max_context_length: u64,
    pub max_reasoning_depth: u64,
    pub max_instruction_compliance: u64,
    pub tests: Vec<TestMaxScore>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Wall-clock bounds of the benchmark run that produced the results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunWindow {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl RunWindow {
    /// Resolve the run window from explicit overrides, falling back to the
    /// raw results timestamp for the start and the current time for the end.
    pub fn resolve(
        raw_timestamp: &str,
        started_at: Option<&str>,
        ended_at: Option<&str>,
    ) -> Result<Self> {
        let start_time = parse_timestamp(started_at.unwrap_or(raw_timestamp))?;
        let end_time = match ended_at {
            Some(value) => parse_timestamp(value)?,
            None => Utc::now(),
        };

        Ok(Self {
            start_time,
            end_time,
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|source| ScoreError::InvalidTimestamp {
            value: value.to_string(),
            source,
        })
}

pub fn get_test_stats(
    scores: &[LlmEval],
    tests: &[TestCase],
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> TestStats {
    let max_context_length: u64 = tests
        .iter()
        .map(|t| u64::from(t.difficulties.context_length))
        .sum();
    let max_reasoning_depth: u64 = tests
        .iter()
        .map(|t| u64::from(t.difficulties.reasoning_depth))
        .sum();
    let max_instruction_compliance: u64 = tests
        .iter()
        .map(|t| u64::from(t.difficulties.instruction_compliance))
        .sum();

    TestStats {
        llms: scores.iter().map(|s| s.llm_id.clone()).collect(),
        max_total_score: max_context_length + max_reasoning_depth + max_instruction_compliance,
        max_context_length,
        max_reasoning_depth,
        max_instruction_compliance,
        tests: tests
            .iter()
            .map(|t| TestMaxScore {
                name: t.name.clone(),
                max_score: t.difficulties.sum(),
            })
            .collect(),
        start_time,
        end_time,
    }
}
