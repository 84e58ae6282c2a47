//! Engagement advisor. Orchestrates generation, persistence, and fallback.
//!
//! Flow (questions): build prompt → LLM → parse 5 strings → persist one row
//! per question → return. A generation failure returns the fixed set for
//! the question type and writes nothing; a failed write returns it too.
//!
//! Flow (insight): build prompt → LLM → parse record → persist one row →
//! return. Either failure returns the participation-based template.
//!
//! Neither path returns an error. A failed write is treated like a failed
//! generation and returns the fallback; writes already made are not undone.

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::engagement::classifier::{classify, EngagementCategory};
use crate::engagement::fallback::{fallback_insight, fallback_questions};
use crate::engagement::insights::{self, parse_insight, InsightRecord, INSIGHT_PARAMS};
use crate::engagement::metrics::EngagementMetrics;
use crate::engagement::prompts::ADVISOR_SYSTEM_PROMPT;
use crate::engagement::questions::{
    self, context_for, metadata_for, parse_questions, QuestionBatch, QuestionType, ResultSource,
    QUESTION_PARAMS,
};
use crate::engagement::GenerationError;
use crate::llm_client::TextGenerator;
use crate::store::{InsightRow, InsightStore, QuestionRow, StoreError};

/// Holds the two external capabilities. Stateless between calls.
#[derive(Clone)]
pub struct EngagementAdvisor {
    llm: Arc<dyn TextGenerator>,
    store: Arc<dyn InsightStore>,
}

impl EngagementAdvisor {
    pub fn new(llm: Arc<dyn TextGenerator>, store: Arc<dyn InsightStore>) -> Self {
        Self { llm, store }
    }

    pub fn classify(&self, metrics: &EngagementMetrics) -> EngagementCategory {
        classify(metrics)
    }

    /// Generates coaching questions for `user_id`. Always returns a batch:
    /// 5 questions, or 1 on the custom-request fallback path.
    pub async fn generate_questions(
        &self,
        user_id: &str,
        question_type: QuestionType,
        metrics: &EngagementMetrics,
        custom_request: Option<&str>,
    ) -> QuestionBatch {
        match self
            .produce_questions(user_id, question_type, metrics, custom_request)
            .await
        {
            Ok(generated) => {
                info!(
                    "Generated {} {} questions for {}",
                    generated.len(),
                    question_type.as_str(),
                    user_id
                );
                QuestionBatch {
                    question_type,
                    priority: question_type.priority(),
                    questions: generated,
                    source: ResultSource::Generated,
                }
            }
            Err(e) => {
                log_failure(&e, &format!("{} questions for {user_id}", question_type.as_str()));
                QuestionBatch {
                    question_type,
                    priority: question_type.priority(),
                    questions: fallback_questions(question_type, custom_request),
                    source: ResultSource::Fallback,
                }
            }
        }
    }

    /// Generates an insight record for `user_id`. Never fails.
    pub async fn generate_insight(&self, user_id: &str, metrics: &EngagementMetrics) -> InsightRecord {
        match self.produce_insight(user_id, metrics).await {
            Ok(record) => {
                info!(
                    "Generated insight for {user_id}: risk={:?}, confidence={:.2}",
                    record.risk_level, record.confidence_score
                );
                record
            }
            Err(e) => {
                log_failure(&e, &format!("insight for {user_id}"));
                fallback_insight(metrics)
            }
        }
    }

    /// Generate then persist. A failed write fails the whole call; rows
    /// already written stay.
    async fn produce_questions(
        &self,
        user_id: &str,
        question_type: QuestionType,
        metrics: &EngagementMetrics,
        custom_request: Option<&str>,
    ) -> Result<Vec<String>, GenerationError> {
        let prompt = questions::build_prompt(question_type, metrics, custom_request);
        let generated = self.request_questions(&prompt).await?;
        self.persist_questions(user_id, question_type, metrics, custom_request, &generated)
            .await?;
        Ok(generated)
    }

    async fn produce_insight(
        &self,
        user_id: &str,
        metrics: &EngagementMetrics,
    ) -> Result<InsightRecord, GenerationError> {
        let prompt = insights::build_prompt(metrics);
        let record = self.request_insight(&prompt).await?;
        self.persist_insight(user_id, metrics, &record).await?;
        Ok(record)
    }

    async fn request_questions(&self, prompt: &str) -> Result<Vec<String>, GenerationError> {
        let completion = self
            .llm
            .complete(ADVISOR_SYSTEM_PROMPT, prompt, QUESTION_PARAMS)
            .await?;
        parse_questions(&completion)
    }

    async fn request_insight(&self, prompt: &str) -> Result<InsightRecord, GenerationError> {
        let completion = self
            .llm
            .complete(ADVISOR_SYSTEM_PROMPT, prompt, INSIGHT_PARAMS)
            .await?;
        parse_insight(&completion)
    }

    /// Writes one row per question, stopping at the first failure.
    async fn persist_questions(
        &self,
        user_id: &str,
        question_type: QuestionType,
        metrics: &EngagementMetrics,
        custom_request: Option<&str>,
        generated: &[String],
    ) -> Result<(), StoreError> {
        let context = context_for(question_type, metrics, custom_request);
        let metadata = metadata_for(metrics, custom_request)?;

        for question in generated {
            let row = QuestionRow {
                id: Uuid::new_v4(),
                user_id: user_id.to_string(),
                question_type: question_type.as_str().to_string(),
                question: question.clone(),
                context: context.clone(),
                priority: question_type.priority(),
                metadata: metadata.clone(),
            };
            self.store.insert_question(&row).await?;
        }

        Ok(())
    }

    async fn persist_insight(
        &self,
        user_id: &str,
        metrics: &EngagementMetrics,
        record: &InsightRecord,
    ) -> Result<(), StoreError> {
        let row = InsightRow {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            insight_type: classify(metrics).as_str().to_string(),
            title: record.title().to_string(),
            description: serde_json::to_string(record)?,
            confidence_score: record.confidence_score,
            suggested_actions: record.recommendations.clone(),
            metadata: serde_json::to_value(metrics)?,
        };
        self.store.insert_insight(&row).await
    }
}

fn log_failure(e: &GenerationError, what: &str) {
    match e {
        GenerationError::Store(_) => error!("Failed to store {what}: {e}; using fallback"),
        _ => warn!("Error generating {what}: {e}; using fallback"),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::engagement::fallback::{
        OVERPERFORMING_QUESTIONS, SILENT_QUITTING_QUESTIONS, UNDERPERFORMING_QUESTIONS,
    };
    use crate::engagement::insights::RiskLevel;
    use crate::llm_client::{GenerationParams, LlmError};

    /// Replays a fixed completion, or fails every call when `completion` is `None`.
    pub(crate) struct FakeGenerator {
        completion: Option<String>,
        pub calls: Mutex<Vec<(String, GenerationParams)>>,
    }

    impl FakeGenerator {
        pub(crate) fn replying(completion: &str) -> Self {
            Self {
                completion: Some(completion.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                completion: None,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn complete(
            &self,
            _system: &str,
            prompt: &str,
            params: GenerationParams,
        ) -> Result<String, LlmError> {
            self.calls.lock().unwrap().push((prompt.to_string(), params));
            self.completion.clone().ok_or(LlmError::Api {
                status: 503,
                message: "connection reset by peer".to_string(),
            })
        }
    }

    /// Records every row; fails inserts after `fail_after` successful ones.
    #[derive(Default)]
    pub(crate) struct MemoryStore {
        pub questions: Mutex<Vec<QuestionRow>>,
        pub insights: Mutex<Vec<InsightRow>>,
        fail_after: Option<usize>,
    }

    impl MemoryStore {
        pub(crate) fn failing_after(n: usize) -> Self {
            Self {
                fail_after: Some(n),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl InsightStore for MemoryStore {
        async fn insert_question(&self, row: &QuestionRow) -> Result<(), StoreError> {
            let mut questions = self.questions.lock().unwrap();
            if self.fail_after.is_some_and(|n| questions.len() >= n) {
                return Err(StoreError::Api {
                    status: 500,
                    message: "insert failed".to_string(),
                });
            }
            questions.push(row.clone());
            Ok(())
        }

        async fn insert_insight(&self, row: &InsightRow) -> Result<(), StoreError> {
            if self.fail_after == Some(0) {
                return Err(StoreError::Api {
                    status: 500,
                    message: "insert failed".to_string(),
                });
            }
            self.insights.lock().unwrap().push(row.clone());
            Ok(())
        }
    }

    const FIVE_QUESTIONS: &str = r#"[
        "What has been getting in the way lately?",
        "Which support would help most this month?",
        "How manageable are your current priorities?",
        "What part of the job still motivates you?",
        "What should we try together over the next two weeks?"
    ]"#;

    const INSIGHT_JSON: &str = r#"{
        "assessment": "Quiet but steady contributor",
        "strengths": ["Reliable delivery"],
        "concerns": ["Low visibility in channels"],
        "factors": ["Timezone gap"],
        "recommendations": ["Pair on a cross-team task", "Weekly async update"],
        "risk_level": "high",
        "confidence_score": 0.55
    }"#;

    fn underperformer() -> EngagementMetrics {
        EngagementMetrics {
            messages_sent: 15,
            participation_rate: 0.25,
            avg_response_time: 4.5,
            collaboration_score: 0.4,
            days_since_active: 3,
            ..Default::default()
        }
    }

    fn advisor(llm: Arc<FakeGenerator>, store: Arc<MemoryStore>) -> EngagementAdvisor {
        EngagementAdvisor::new(llm, store)
    }

    #[tokio::test]
    async fn test_generated_questions_are_returned_and_stored() {
        let llm = Arc::new(FakeGenerator::replying(FIVE_QUESTIONS));
        let store = Arc::new(MemoryStore::default());
        let batch = advisor(llm.clone(), store.clone())
            .generate_questions("U123456", QuestionType::Underperforming, &underperformer(), None)
            .await;

        assert_eq!(batch.source, ResultSource::Generated);
        assert_eq!(batch.questions.len(), 5);
        assert_eq!(batch.priority, 4);

        let rows = store.questions.lock().unwrap();
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r.user_id == "U123456"));
        assert!(rows.iter().all(|r| r.question_type == "underperforming"));
        assert_eq!(rows[0].context, "Low engagement: 25.0% participation");
        assert_eq!(rows[0].metadata["messages_sent"], 15);
        assert_eq!(rows[4].question, batch.questions[4]);

        let calls = llm.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, QUESTION_PARAMS);
    }

    #[tokio::test]
    async fn test_network_error_returns_fixed_questions_without_writes() {
        let store = Arc::new(MemoryStore::default());
        let batch = advisor(Arc::new(FakeGenerator::failing()), store.clone())
            .generate_questions("U123456", QuestionType::Underperforming, &underperformer(), None)
            .await;

        assert_eq!(batch.source, ResultSource::Fallback);
        assert_eq!(batch.questions, UNDERPERFORMING_QUESTIONS.to_vec());
        assert!(store.questions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_completion_uses_fallback() {
        let store = Arc::new(MemoryStore::default());
        let batch = advisor(
            Arc::new(FakeGenerator::replying("1. How are you?\n2. Anything blocking you?")),
            store.clone(),
        )
        .generate_questions("U9", QuestionType::SilentQuitting, &underperformer(), None)
        .await;

        assert_eq!(batch.questions, SILENT_QUITTING_QUESTIONS.to_vec());
        assert_eq!(batch.priority, 5);
        assert!(store.questions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_custom_fallback_is_single_question() {
        let batch = advisor(
            Arc::new(FakeGenerator::failing()),
            Arc::new(MemoryStore::default()),
        )
        .generate_questions(
            "U9",
            QuestionType::Custom,
            &underperformer(),
            Some("recent reorg"),
        )
        .await;

        assert_eq!(batch.questions.len(), 1);
        assert!(batch.questions[0].contains("'recent reorg'"));
        assert_eq!(batch.priority, 3);
    }

    #[tokio::test]
    async fn test_custom_rows_carry_request_in_context_and_metadata() {
        let store = Arc::new(MemoryStore::default());
        advisor(Arc::new(FakeGenerator::replying(FIVE_QUESTIONS)), store.clone())
            .generate_questions(
                "U9",
                QuestionType::Custom,
                &underperformer(),
                Some("recent reorg"),
            )
            .await;

        let rows = store.questions.lock().unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].context, "recent reorg");
        assert_eq!(rows[0].metadata["custom_request"], "recent reorg");
    }

    #[tokio::test]
    async fn test_partial_store_failure_returns_fallback_and_keeps_written_rows() {
        let store = Arc::new(MemoryStore::failing_after(3));
        let batch = advisor(Arc::new(FakeGenerator::replying(FIVE_QUESTIONS)), store.clone())
            .generate_questions("U1", QuestionType::Overperforming, &underperformer(), None)
            .await;

        assert_eq!(batch.source, ResultSource::Fallback);
        assert_eq!(batch.questions, OVERPERFORMING_QUESTIONS.to_vec());
        assert_eq!(store.questions.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_store_down_returns_fixed_questions() {
        let store = Arc::new(MemoryStore::failing_after(0));
        let batch = advisor(Arc::new(FakeGenerator::replying(FIVE_QUESTIONS)), store.clone())
            .generate_questions("U1", QuestionType::Underperforming, &underperformer(), None)
            .await;

        assert_eq!(batch.source, ResultSource::Fallback);
        assert_eq!(batch.questions, UNDERPERFORMING_QUESTIONS.to_vec());
        assert!(store.questions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generated_insight_is_stored_with_classified_type() {
        let llm = Arc::new(FakeGenerator::replying(INSIGHT_JSON));
        let store = Arc::new(MemoryStore::default());
        let record = advisor(llm.clone(), store.clone())
            .generate_insight("U123456", &underperformer())
            .await;

        assert_eq!(record.risk_level, RiskLevel::High);

        let rows = store.insights.lock().unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.insight_type, "underperforming");
        assert_eq!(row.title, "Quiet but steady contributor");
        assert_eq!(row.suggested_actions, record.recommendations);
        assert!((row.confidence_score - 0.55).abs() < f64::EPSILON);
        let description: InsightRecord = serde_json::from_str(&row.description).unwrap();
        assert_eq!(description, record);

        assert_eq!(llm.calls.lock().unwrap()[0].1, INSIGHT_PARAMS);
    }

    #[tokio::test]
    async fn test_insight_failure_uses_participation_template() {
        let store = Arc::new(MemoryStore::default());
        let record = advisor(Arc::new(FakeGenerator::failing()), store.clone())
            .generate_insight("U1", &underperformer())
            .await;

        assert_eq!(record.assessment, "Low engagement detected");
        assert_eq!(record.risk_level, RiskLevel::Medium);
        assert!(store.insights.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insight_store_failure_returns_participation_template() {
        let record = advisor(
            Arc::new(FakeGenerator::replying(INSIGHT_JSON)),
            Arc::new(MemoryStore::failing_after(0)),
        )
        .generate_insight("U1", &underperformer())
        .await;

        assert_eq!(record, fallback_insight(&underperformer()));
        assert_eq!(record.assessment, "Low engagement detected");
    }
}
