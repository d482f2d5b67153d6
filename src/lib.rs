//! Difficulty-weighted scoring for LLM benchmark runs.
//!
//! Raw results flow through a linear pipeline: sanitize, extract providers
//! and test cases, score each provider, compute run-wide maxima, and write a
//! single report file.

pub mod cli;
pub mod error;
pub mod eval;
pub mod scoring;

pub use error::{Result, ScoreError};
