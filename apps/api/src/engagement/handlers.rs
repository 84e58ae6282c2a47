//! Axum route handlers for the engagement API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engagement::classifier::EngagementCategory;
use crate::engagement::metrics::EngagementMetrics;
use crate::engagement::questions::{QuestionBatch, QuestionType};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsRequest {
    pub user_id: Option<String>,
    pub user_metrics: Option<EngagementMetrics>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub custom_request: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub result: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyRequest {
    pub user_metrics: EngagementMetrics,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub category: EngagementCategory,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoQuestionsRequest {
    pub user_id: String,
    pub user_metrics: EngagementMetrics,
}

#[derive(Debug, Serialize)]
pub struct AutoQuestionsResponse {
    pub category: EngagementCategory,
    /// `None` for members classified as normal.
    pub batch: Option<QuestionBatch>,
}

/// What a POST /api/v1/insights call asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightsKind {
    Questions(QuestionType),
    Insight,
}

impl InsightsKind {
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "underperforming" => Some(InsightsKind::Questions(QuestionType::Underperforming)),
            "overperforming" => Some(InsightsKind::Questions(QuestionType::Overperforming)),
            "silent_quitting" => Some(InsightsKind::Questions(QuestionType::SilentQuitting)),
            "custom" => Some(InsightsKind::Questions(QuestionType::Custom)),
            "insights" => Some(InsightsKind::Insight),
            _ => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/insights
///
/// Generates questions for the requested type, or an insight record for
/// `type = "insights"`. Generation failures never surface here; the
/// fallback content is returned instead.
pub async fn handle_insights(
    State(state): State<AppState>,
    payload: Result<Json<InsightsRequest>, JsonRejection>,
) -> Result<Json<InsightsResponse>, AppError> {
    let Json(request) = payload?;

    let (user_id, metrics) = match (request.user_id, request.user_metrics) {
        (Some(user_id), Some(metrics)) if !user_id.trim().is_empty() => (user_id, metrics),
        _ => return Err(AppError::Validation("Missing required fields".to_string())),
    };

    let kind = request
        .kind
        .as_deref()
        .and_then(InsightsKind::parse)
        .ok_or_else(|| AppError::Validation("Invalid type".to_string()))?;

    let result = match kind {
        InsightsKind::Questions(question_type) => {
            let custom_request = request
                .custom_request
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty());
            if question_type == QuestionType::Custom && custom_request.is_none() {
                return Err(AppError::Validation(
                    "Custom request is required for custom type".to_string(),
                ));
            }
            let batch = state
                .advisor
                .generate_questions(&user_id, question_type, &metrics, custom_request)
                .await;
            serde_json::to_value(batch.questions)
        }
        InsightsKind::Insight => {
            let record = state.advisor.generate_insight(&user_id, &metrics).await;
            serde_json::to_value(record)
        }
    }
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize result: {e}")))?;

    Ok(Json(InsightsResponse { result }))
}

/// POST /api/v1/classify
pub async fn handle_classify(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<ClassifyResponse>, AppError> {
    let Json(request) = payload?;
    Ok(Json(ClassifyResponse {
        category: state.advisor.classify(&request.user_metrics),
    }))
}

/// POST /api/v1/questions/auto
///
/// Classifies the member and generates the matching question set.
/// Normal members get no questions and no generation call.
pub async fn handle_auto_questions(
    State(state): State<AppState>,
    payload: Result<Json<AutoQuestionsRequest>, JsonRejection>,
) -> Result<Json<AutoQuestionsResponse>, AppError> {
    let Json(request) = payload?;
    if request.user_id.trim().is_empty() {
        return Err(AppError::Validation("userId cannot be empty".to_string()));
    }

    let category = state.advisor.classify(&request.user_metrics);
    let batch = match QuestionType::for_category(category) {
        Some(question_type) => Some(
            state
                .advisor
                .generate_questions(&request.user_id, question_type, &request.user_metrics, None)
                .await,
        ),
        None => None,
    };

    Ok(Json(AutoQuestionsResponse { category, batch }))
}
