//! Coaching questions: question types, prompt building, and the parse boundary
//! for generated question lists.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engagement::classifier::EngagementCategory;
use crate::engagement::metrics::EngagementMetrics;
use crate::engagement::prompts::{
    CUSTOM_PROMPT_TEMPLATE, OVERPERFORMING_PROMPT_TEMPLATE, SILENT_QUITTING_PROMPT_TEMPLATE,
    UNDERPERFORMING_PROMPT_TEMPLATE,
};
use crate::engagement::GenerationError;
use crate::llm_client::{parse_json_completion, GenerationParams};

/// Every generated batch must contain exactly this many questions.
pub const QUESTIONS_PER_BATCH: usize = 5;

pub const QUESTION_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.7,
    max_tokens: 800,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Underperforming,
    Overperforming,
    SilentQuitting,
    Custom,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Underperforming => "underperforming",
            QuestionType::Overperforming => "overperforming",
            QuestionType::SilentQuitting => "silent_quitting",
            QuestionType::Custom => "custom",
        }
    }

    /// Higher is more urgent. Stored with each question; nothing orders by it yet.
    pub fn priority(&self) -> i16 {
        match self {
            QuestionType::SilentQuitting => 5,
            QuestionType::Underperforming => 4,
            QuestionType::Custom => 3,
            QuestionType::Overperforming => 2,
        }
    }

    /// Question type for a classified member. `Normal` has no question set.
    pub fn for_category(category: EngagementCategory) -> Option<Self> {
        match category {
            EngagementCategory::Underperforming => Some(QuestionType::Underperforming),
            EngagementCategory::Overperforming => Some(QuestionType::Overperforming),
            EngagementCategory::SilentQuitting => Some(QuestionType::SilentQuitting),
            EngagementCategory::Normal => None,
        }
    }
}

/// Whether a result came from the text generator or the fixed fallback set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    Generated,
    Fallback,
}

/// Questions for one member, in the order the generator returned them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBatch {
    pub question_type: QuestionType,
    pub priority: i16,
    pub questions: Vec<String>,
    pub source: ResultSource,
}

/// Fills the prompt template for a question type.
pub fn build_prompt(
    question_type: QuestionType,
    metrics: &EngagementMetrics,
    custom_request: Option<&str>,
) -> String {
    let (template, unknown_trend) = match question_type {
        QuestionType::Underperforming => (UNDERPERFORMING_PROMPT_TEMPLATE, "unknown"),
        QuestionType::Overperforming => (OVERPERFORMING_PROMPT_TEMPLATE, "unknown"),
        QuestionType::SilentQuitting => (SILENT_QUITTING_PROMPT_TEMPLATE, "declining"),
        QuestionType::Custom => (CUSTOM_PROMPT_TEMPLATE, "unknown"),
    };

    template
        .replace("{messages_sent}", &metrics.messages_sent.to_string())
        .replace("{participation}", &metrics.participation_percent())
        .replace("{response_time}", &format!("{:.1}", metrics.avg_response_time))
        .replace("{collaboration}", &format!("{:.1}", metrics.collaboration_score))
        .replace("{trend}", metrics.trend_label(unknown_trend))
        .replace("{days_since_active}", &metrics.days_since_active.to_string())
        .replace("{participation_drop}", &metrics.participation_drop_percent())
        .replace("{custom_request}", custom_request.unwrap_or_default())
}

/// Parses a completion into exactly `QUESTIONS_PER_BATCH` non-blank questions.
pub fn parse_questions(completion: &str) -> Result<Vec<String>, GenerationError> {
    let questions: Vec<String> =
        parse_json_completion(completion).map_err(|e| GenerationError::Shape(e.to_string()))?;

    if questions.len() != QUESTIONS_PER_BATCH {
        return Err(GenerationError::Shape(format!(
            "expected {QUESTIONS_PER_BATCH} questions, got {}",
            questions.len()
        )));
    }

    let questions: Vec<String> = questions.into_iter().map(|q| q.trim().to_string()).collect();
    if questions.iter().any(|q| q.is_empty()) {
        return Err(GenerationError::Shape("blank question in batch".to_string()));
    }

    Ok(questions)
}

/// Short human-readable note stored alongside each question.
pub fn context_for(
    question_type: QuestionType,
    metrics: &EngagementMetrics,
    custom_request: Option<&str>,
) -> String {
    match question_type {
        QuestionType::Underperforming => format!(
            "Low engagement: {} participation",
            metrics.participation_percent()
        ),
        QuestionType::Overperforming => format!(
            "High performance: {} participation",
            metrics.participation_percent()
        ),
        QuestionType::SilentQuitting => "Potential disengagement detected".to_string(),
        QuestionType::Custom => custom_request.unwrap_or_default().to_string(),
    }
}

/// Metrics payload stored with each question; custom requests carry the request text.
pub fn metadata_for(
    metrics: &EngagementMetrics,
    custom_request: Option<&str>,
) -> Result<Value, serde_json::Error> {
    let mut metadata = serde_json::to_value(metrics)?;
    if let (Some(request), Some(map)) = (custom_request, metadata.as_object_mut()) {
        map.insert("custom_request".to_string(), Value::String(request.to_string()));
    }
    Ok(metadata)
}
