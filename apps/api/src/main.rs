mod cli;
mod config;
mod db;
mod engagement;
mod errors;
mod ingest;
mod llm_client;
mod probes;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Commands};
use crate::config::{Config, ProbeConfig};
use crate::db::{create_pool, run_migrations};
use crate::engagement::advisor::EngagementAdvisor;
use crate::engagement::handlers::InsightsKind;
use crate::engagement::metrics::EngagementMetrics;
use crate::engagement::questions::QuestionType;
use crate::ingest::derive::derive_metrics;
use crate::ingest::slack_export::{import_snapshot, load_export};
use crate::llm_client::LlmClient;
use crate::probes::ProbeOptions;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve => serve().await,
        Commands::InitDb => {
            let pool = create_pool(&database_url()?).await?;
            run_migrations(&pool).await?;
            println!("Schema ready.");
            Ok(())
        }
        Commands::ImportSlack { path } => {
            let snapshot = load_export(&path)
                .with_context(|| format!("failed to read export at {}", path.display()))?;
            let pool = create_pool(&database_url()?).await?;
            let summary = import_snapshot(&pool, &snapshot).await?;
            println!(
                "Imported {} channels, {} users, and {} messages from {}.",
                summary.channels,
                summary.users,
                summary.messages,
                path.display()
            );
            Ok(())
        }
        Commands::Probe {
            export_path,
            dummy_out,
        } => {
            let config = ProbeConfig::from_env();
            let options = ProbeOptions {
                export_path,
                dummy_out,
            };
            let results = probes::run_all(&config, &options).await;
            probes::print_summary(&results);
            Ok(())
        }
        Commands::DeriveMetrics { path } => {
            let snapshot = load_export(&path)
                .with_context(|| format!("failed to read export at {}", path.display()))?;
            let users = derive_metrics(&snapshot, Utc::now());
            println!("{}", serde_json::to_string_pretty(&users)?);
            Ok(())
        }
        Commands::Analyze {
            user_id,
            metrics,
            export,
            kind,
            custom_request,
        } => {
            let metrics = match (metrics, export) {
                (Some(path), _) => read_metrics(&path)?,
                (None, Some(path)) => export_metrics(&path, &user_id)?,
                (None, None) => anyhow::bail!("either --metrics or --export is required"),
            };
            analyze(&user_id, &metrics, kind.as_deref(), custom_request.as_deref()).await
        }
    }
}

async fn serve() -> Result<()> {
    let config = Config::from_env()?;
    info!("Starting Insights API v{}", env!("CARGO_PKG_VERSION"));

    let advisor = build_advisor(&config).await?;
    let state = AppState { advisor };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the dashboard host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_advisor(config: &Config) -> Result<EngagementAdvisor> {
    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        config.llm_model.clone(),
    )?;
    info!("LLM client initialized (model: {})", llm.model());

    let store = store::connect(&config.store).await?;
    Ok(EngagementAdvisor::new(Arc::new(llm), store))
}

fn read_metrics(path: &Path) -> Result<EngagementMetrics> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid metrics JSON in {}", path.display()))
}

fn export_metrics(path: &Path, user_id: &str) -> Result<EngagementMetrics> {
    let snapshot = load_export(path)
        .with_context(|| format!("failed to read export at {}", path.display()))?;
    derive_metrics(&snapshot, Utc::now())
        .into_iter()
        .find(|user| user.user_id == user_id)
        .map(|user| user.metrics)
        .with_context(|| format!("no messages from {user_id} in {}", path.display()))
}

async fn analyze(
    user_id: &str,
    metrics: &EngagementMetrics,
    kind: Option<&str>,
    custom_request: Option<&str>,
) -> Result<()> {
    let kind = match kind {
        Some(kind) => {
            Some(InsightsKind::parse(kind).with_context(|| format!("unknown type: {kind}"))?)
        }
        None => None,
    };
    let custom_request = custom_request.map(str::trim).filter(|r| !r.is_empty());
    if kind == Some(InsightsKind::Questions(QuestionType::Custom)) && custom_request.is_none() {
        anyhow::bail!("--custom-request is required for the custom type");
    }

    let config = Config::from_env()?;
    let advisor = build_advisor(&config).await?;

    let output = match kind {
        Some(InsightsKind::Insight) => {
            serde_json::to_value(advisor.generate_insight(user_id, metrics).await)?
        }
        Some(InsightsKind::Questions(question_type)) => serde_json::to_value(
            advisor
                .generate_questions(user_id, question_type, metrics, custom_request)
                .await,
        )?,
        None => {
            let category = advisor.classify(metrics);
            let batch = match QuestionType::for_category(category) {
                Some(question_type) => Some(
                    advisor
                        .generate_questions(user_id, question_type, metrics, None)
                        .await,
                ),
                None => None,
            };
            json!({ "category": category, "batch": batch })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn database_url() -> Result<String> {
    std::env::var("DATABASE_URL").context("DATABASE_URL must be set for this command")
}
