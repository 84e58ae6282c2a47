//! Insert-only persistence for generated questions and insights.
//!
//! The advisor only ever appends rows; nothing in the core reads them back.
//! Backends: `PgInsightStore` (sqlx) and `RestInsightStore` (Supabase / PostgREST).

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::config::StoreTarget;
use crate::db::create_pool;

pub mod postgres;
pub mod rest;

pub use postgres::PgInsightStore;
pub use rest::RestInsightStore;

pub const QUESTIONS_TABLE: &str = "ai_questions";
pub const INSIGHTS_TABLE: &str = "ai_insights";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One generated coaching question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionRow {
    pub id: Uuid,
    pub user_id: String,
    pub question_type: String,
    pub question: String,
    pub context: String,
    pub priority: i16,
    pub metadata: Value,
}

/// One generated insight. `description` is the full record as JSON text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightRow {
    pub id: Uuid,
    pub user_id: String,
    pub insight_type: String,
    pub title: String,
    pub description: String,
    pub confidence_score: f64,
    pub suggested_actions: Vec<String>,
    pub metadata: Value,
}

#[async_trait]
pub trait InsightStore: Send + Sync {
    async fn insert_question(&self, row: &QuestionRow) -> Result<(), StoreError>;
    async fn insert_insight(&self, row: &InsightRow) -> Result<(), StoreError>;
}

/// Builds the store selected by configuration.
pub async fn connect(target: &StoreTarget) -> anyhow::Result<Arc<dyn InsightStore>> {
    match target {
        StoreTarget::Postgres { database_url } => {
            let pool = create_pool(database_url).await?;
            Ok(Arc::new(PgInsightStore::new(pool)))
        }
        StoreTarget::Rest {
            base_url,
            service_key,
        } => {
            info!("Using REST store at {base_url}");
            Ok(Arc::new(RestInsightStore::new(
                base_url.clone(),
                service_key.clone(),
            )?))
        }
    }
}
