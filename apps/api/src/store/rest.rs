use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::store::{InsightRow, InsightStore, QuestionRow, StoreError, INSIGHTS_TABLE, QUESTIONS_TABLE};

/// Inserts rows through the Supabase / PostgREST table API:
/// `POST {base_url}/rest/v1/{table}` with the service key.
#[derive(Clone)]
pub struct RestInsightStore {
    client: Client,
    base_url: String,
    service_key: String,
}

impl RestInsightStore {
    pub fn new(base_url: String, service_key: String) -> Result<Self, StoreError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
        })
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    /// Inserts one row (or an array of rows) into `table`.
    pub async fn insert_json<T: Serialize + ?Sized>(
        &self,
        table: &str,
        body: &T,
    ) -> Result<(), StoreError> {
        let response = self
            .client
            .post(self.table_url(table))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", "return=minimal")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    /// Reads at most one row from `table`; used as a reachability check.
    pub async fn select_one(&self, table: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .get(self.table_url(table))
            .query(&[("select", "*"), ("limit", "1")])
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl InsightStore for RestInsightStore {
    async fn insert_question(&self, row: &QuestionRow) -> Result<(), StoreError> {
        self.insert_json(QUESTIONS_TABLE, row).await
    }

    async fn insert_insight(&self, row: &InsightRow) -> Result<(), StoreError> {
        self.insert_json(INSIGHTS_TABLE, row).await
    }
}
