use async_trait::async_trait;
use sqlx::PgPool;

use crate::store::{InsightRow, InsightStore, QuestionRow, StoreError};

/// Writes rows straight into Postgres.
#[derive(Clone)]
pub struct PgInsightStore {
    pool: PgPool,
}

impl PgInsightStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InsightStore for PgInsightStore {
    async fn insert_question(&self, row: &QuestionRow) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO ai_questions
                (id, user_id, question_type, question, context, priority, metadata)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(row.id)
        .bind(&row.user_id)
        .bind(&row.question_type)
        .bind(&row.question)
        .bind(&row.context)
        .bind(row.priority)
        .bind(&row.metadata)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_insight(&self, row: &InsightRow) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO ai_insights
                (id, user_id, insight_type, title, description,
                 confidence_score, suggested_actions, metadata)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(row.id)
        .bind(&row.user_id)
        .bind(&row.insight_type)
        .bind(&row.title)
        .bind(&row.description)
        .bind(row.confidence_score)
        .bind(&row.suggested_actions)
        .bind(&row.metadata)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
