use anyhow::{Context, Result};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Where generated questions and insights are written.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreTarget {
    /// Direct Postgres connection through sqlx.
    Postgres { database_url: String },
    /// Supabase / PostgREST table API.
    Rest { base_url: String, service_key: String },
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub llm_model: String,
    pub store: StoreTarget,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: optional_env("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            llm_model: optional_env("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            store: store_target_from_env()?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
        })
    }
}

/// Picks the persistence backend. `DATABASE_URL` wins when both are set.
pub fn store_target_from_env() -> Result<StoreTarget> {
    resolve_store_target(
        optional_env("DATABASE_URL"),
        optional_env("SUPABASE_URL"),
        optional_env("SUPABASE_SERVICE_KEY"),
    )
}

fn resolve_store_target(
    database_url: Option<String>,
    supabase_url: Option<String>,
    supabase_key: Option<String>,
) -> Result<StoreTarget> {
    match (database_url, supabase_url, supabase_key) {
        (Some(database_url), _, _) => Ok(StoreTarget::Postgres { database_url }),
        (None, Some(base_url), Some(service_key)) => Ok(StoreTarget::Rest {
            base_url,
            service_key,
        }),
        _ => anyhow::bail!(
            "No store configured: set DATABASE_URL, or SUPABASE_URL and SUPABASE_SERVICE_KEY"
        ),
    }
}

/// Credentials for the connectivity probes. Every field is optional;
/// a missing value only fails the probe that needs it.
#[derive(Debug, Clone, Default)]
pub struct ProbeConfig {
    pub database_url: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_service_key: Option<String>,
    pub airtable_api_key: Option<String>,
    pub airtable_base_id: Option<String>,
    pub airtable_table_name: Option<String>,
    pub akkio_api_key: Option<String>,
    pub akkio_model_id: Option<String>,
    pub vercel_api_key: Option<String>,
    pub vercel_team_id: Option<String>,
    pub daytona_api_key: Option<String>,
    pub daytona_project_id: Option<String>,
    pub aci_api_key: Option<String>,
    pub slack_client_id: Option<String>,
    pub slack_redirect_uri: Option<String>,
    pub gmail_client_id: Option<String>,
    pub gmail_redirect_uri: Option<String>,
}

impl ProbeConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        ProbeConfig {
            database_url: optional_env("DATABASE_URL"),
            supabase_url: optional_env("SUPABASE_URL"),
            supabase_service_key: optional_env("SUPABASE_SERVICE_KEY"),
            airtable_api_key: optional_env("AIRTABLE_API_KEY"),
            airtable_base_id: optional_env("AIRTABLE_BASE_ID"),
            airtable_table_name: optional_env("AIRTABLE_TABLE_NAME"),
            akkio_api_key: optional_env("AKKIO_API_KEY"),
            akkio_model_id: optional_env("AKKIO_MODEL_ID"),
            vercel_api_key: optional_env("VERCEL_API_KEY"),
            vercel_team_id: optional_env("VERCEL_TEAM_ID"),
            daytona_api_key: optional_env("DAYTONA_API_KEY"),
            daytona_project_id: optional_env("DAYTONA_PROJECT_ID"),
            aci_api_key: optional_env("ACI_API_KEY"),
            slack_client_id: optional_env("SLACK_CLIENT_ID"),
            slack_redirect_uri: optional_env("SLACK_REDIRECT_URI"),
            gmail_client_id: optional_env("GMAIL_CLIENT_ID"),
            gmail_redirect_uri: optional_env("GMAIL_REDIRECT_URI"),
        }
    }

    /// Store the probes should exercise, if any is configured.
    pub fn store_target(&self) -> Option<StoreTarget> {
        resolve_store_target(
            self.database_url.clone(),
            self.supabase_url.clone(),
            self.supabase_service_key.clone(),
        )
        .ok()
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads a variable, treating empty strings as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
