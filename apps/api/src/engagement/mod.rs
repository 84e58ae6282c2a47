// Engagement analysis: classification, coaching questions, and insights.
// All LLM calls go through the injected `TextGenerator`; all writes through `InsightStore`.

pub mod advisor;
pub mod classifier;
pub mod fallback;
pub mod handlers;
pub mod insights;
pub mod metrics;
pub mod prompts;
pub mod questions;

use thiserror::Error;

use crate::llm_client::LlmError;
use crate::store::StoreError;

/// The single failure kind that routes a request onto the fallback path.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("text generation failed: {0}")]
    Llm(#[from] LlmError),

    #[error("unexpected completion shape: {0}")]
    Shape(String),

    #[error("storing result failed: {0}")]
    Store(#[from] StoreError),
}
