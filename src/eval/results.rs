use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{Result, ScoreError};

/// Per-dimension weights attached to a test case
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulties {
    #[serde(default, deserialize_with = "deserialize_weight")]
    pub context_length: u32,
    #[serde(default, deserialize_with = "deserialize_weight")]
    pub reasoning_depth: u32,
    #[serde(default, deserialize_with = "deserialize_weight")]
    pub instruction_compliance: u32,
}

impl Difficulties {
    pub fn new(context_length: u32, reasoning_depth: u32, instruction_compliance: u32) -> Self {
        Self {
            context_length,
            reasoning_depth,
            instruction_compliance,
        }
    }

    /// Sum of all three weights
    pub fn sum(&self) -> u64 {
        u64::from(self.context_length)
            + u64::from(self.reasoning_depth)
            + u64::from(self.instruction_compliance)
    }
}

/// Weights arrive as JSON numbers; integral floats such as `2.0` and null
/// are accepted, null counting as zero.
fn deserialize_weight<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(0);
    };

    if value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(de::Error::custom(format!(
            "invalid difficulty weight {}, expected a non-negative integer",
            value
        )));
    }

    Ok(value as u32)
}

/// A null assertion score counts as a failed assertion
fn deserialize_score<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// A distinct test case referenced by a benchmark run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub difficulties: Difficulties,
}

/// Provider (model) identity of a result entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Test variables of a result entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vars {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulties: Option<Difficulties>,
    /// Full conversation transcript, dropped before the log is written
    #[serde(
        rename = "_conversation",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub conversation: Option<Value>,
    /// Rendered prompt, dropped before the log is written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One benchmark execution record as produced by the harness
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawResultEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
    #[serde(default)]
    pub vars: Vars,
    /// Assertion score (0, 1 or fractional)
    #[serde(default, deserialize_with = "deserialize_score")]
    pub score: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawResultEntry {
    pub fn provider_id(&self) -> Option<&str> {
        self.provider.as_ref().and_then(|p| p.id.as_deref())
    }

    pub fn test_name(&self) -> Option<&str> {
        self.vars.name.as_deref()
    }
}

/// The raw results container of one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawResults {
    pub timestamp: String,
    #[serde(default)]
    pub results: Vec<RawResultEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Input payload handed over by the benchmark harness
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultsFile {
    #[serde(rename = "evalId", default)]
    pub eval_id: String,
    pub results: RawResults,
}

impl ResultsFile {
    /// Load a results payload from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ScoreError::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| ScoreError::parse(path, e))
    }
}

/// Strip presentational and transcript data from the raw results.
///
/// Removes `table` and `stats` from the container and `_conversation` and
/// `prompt` from every entry's vars. Absent fields are left alone, so calling
/// this more than once is harmless.
pub fn result_laundry(results: &mut RawResults) {
    results.table = None;
    results.stats = None;

    for entry in &mut results.results {
        entry.vars.conversation = None;
        entry.vars.prompt = None;
    }
}

/// Distinct provider ids in the run, sorted alphabetically
pub fn extract_llms(results: &RawResults) -> Vec<String> {
    let mut llms = BTreeSet::new();

    for (index, entry) in results.results.iter().enumerate() {
        match entry.provider_id() {
            Some(id) => {
                llms.insert(id.to_string());
            }
            None => debug!("Skipping result {} without provider id", index),
        }
    }

    llms.into_iter().collect()
}

/// Distinct test cases in the run, sorted by name.
///
/// The first occurrence of a name decides its difficulties.
pub fn extract_testcases(results: &RawResults) -> Vec<TestCase> {
    let mut tests: BTreeMap<String, Difficulties> = BTreeMap::new();

    for (index, entry) in results.results.iter().enumerate() {
        let Some(name) = entry.test_name() else {
            debug!("Skipping result {} without test name", index);
            continue;
        };

        if tests.contains_key(name) {
            continue;
        }

        let difficulties = entry.vars.difficulties.unwrap_or_else(|| {
            warn!("Test '{}' has no difficulties, weighting it as zero", name);
            Difficulties::default()
        });
        tests.insert(name.to_string(), difficulties);
    }

    tests
        .into_iter()
        .map(|(name, difficulties)| TestCase { name, difficulties })
        .collect()
}
