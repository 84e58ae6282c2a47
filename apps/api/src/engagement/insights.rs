//! Insight records: the narrative analysis of one member's engagement.

use serde::{Deserialize, Serialize};

use crate::engagement::metrics::EngagementMetrics;
use crate::engagement::prompts::INSIGHT_PROMPT_TEMPLATE;
use crate::engagement::GenerationError;
use crate::llm_client::{parse_json_completion, GenerationParams};

pub const INSIGHT_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.7,
    max_tokens: 1000,
};

const DEFAULT_CONFIDENCE: f64 = 0.8;
const DEFAULT_TITLE: &str = "Performance Analysis";

/// Retention risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[serde(alias = "Low", alias = "LOW")]
    Low,
    #[serde(alias = "Medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "High", alias = "HIGH")]
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightRecord {
    pub assessment: String,
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
    pub factors: Vec<String>,
    pub recommendations: Vec<String>,
    pub risk_level: RiskLevel,
    /// In [0, 1]. Absent in the completion → 0.8.
    #[serde(default = "default_confidence")]
    pub confidence_score: f64,
}

fn default_confidence() -> f64 {
    DEFAULT_CONFIDENCE
}

impl InsightRecord {
    /// Title stored with the insight row.
    pub fn title(&self) -> &str {
        let assessment = self.assessment.trim();
        if assessment.is_empty() {
            DEFAULT_TITLE
        } else {
            assessment
        }
    }
}

pub fn build_prompt(metrics: &EngagementMetrics) -> String {
    INSIGHT_PROMPT_TEMPLATE
        .replace("{messages_sent}", &metrics.messages_sent.to_string())
        .replace("{participation}", &metrics.participation_percent())
        .replace("{response_time}", &format!("{:.1}", metrics.avg_response_time))
        .replace("{collaboration}", &format!("{:.1}", metrics.collaboration_score))
        .replace("{trend}", metrics.trend_label("stable"))
}

/// Parses a completion into an `InsightRecord`. Missing keys, wrong types,
/// an unknown risk level, or a confidence outside [0, 1] are all failures.
pub fn parse_insight(completion: &str) -> Result<InsightRecord, GenerationError> {
    let record: InsightRecord =
        parse_json_completion(completion).map_err(|e| GenerationError::Shape(e.to_string()))?;

    if !(0.0..=1.0).contains(&record.confidence_score) {
        return Err(GenerationError::Shape(format!(
            "confidence_score {} outside [0, 1]",
            record.confidence_score
        )));
    }

    Ok(record)
}
