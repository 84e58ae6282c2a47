//! Connectivity probes: smoke checks against third-party services.
//!
//! Each probe prints a human-readable ✓/✗ line and returns a bool. Probes
//! share no state, do not retry, and never abort the run.

use std::path::PathBuf;

use tracing::info;

use crate::config::ProbeConfig;

pub mod chat_export;
pub mod oauth;
pub mod services;
pub mod store;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub name: &'static str,
    pub passed: bool,
}

/// Command-line options for the chat-export probe.
#[derive(Debug, Clone, Default)]
pub struct ProbeOptions {
    /// Real export directory; the built-in dummy dataset is used when absent.
    pub export_path: Option<PathBuf>,
    /// Where to write the dummy dataset, if anywhere.
    pub dummy_out: Option<PathBuf>,
}

/// Runs every probe in a fixed order.
pub async fn run_all(config: &ProbeConfig, options: &ProbeOptions) -> Vec<ProbeResult> {
    let client = reqwest::Client::new();

    let results = vec![
        ProbeResult {
            name: "Store",
            passed: store::probe_store(config).await,
        },
        ProbeResult {
            name: "Slack export",
            passed: chat_export::probe_chat_export(options),
        },
        ProbeResult {
            name: "Airtable API",
            passed: services::probe_airtable(config),
        },
        ProbeResult {
            name: "Akkio API",
            passed: services::probe_akkio(config),
        },
        ProbeResult {
            name: "Vercel API",
            passed: services::probe_vercel(&client, config).await,
        },
        ProbeResult {
            name: "Daytona API",
            passed: services::probe_daytona(config),
        },
        ProbeResult {
            name: "ACI API",
            passed: services::probe_aci(&client, config).await,
        },
        ProbeResult {
            name: "Slack OAuth Setup",
            passed: oauth::probe_slack_oauth(config),
        },
        ProbeResult {
            name: "Gmail OAuth Setup",
            passed: oauth::probe_gmail_oauth(config),
        },
    ];

    let passed = results.iter().filter(|r| r.passed).count();
    info!("Probes finished: {passed}/{} passed", results.len());
    results
}

pub fn summary_lines(results: &[ProbeResult]) -> Vec<String> {
    results
        .iter()
        .map(|r| format!("{}: {}", r.name, mark(r.passed)))
        .collect()
}

pub fn print_summary(results: &[ProbeResult]) {
    println!("\nTest Results:");
    for line in summary_lines(results) {
        println!("{line}");
    }
}

pub(crate) fn mark(passed: bool) -> &'static str {
    if passed {
        "✓"
    } else {
        "✗"
    }
}

/// Prints the "missing configuration" line and returns false.
pub(crate) fn missing_config(service: &str) -> bool {
    println!("✗ Missing {service} configuration");
    tracing::warn!("{service} probe skipped: configuration missing");
    false
}

/// True when every value is present and non-blank.
pub(crate) fn all_present(values: &[&Option<String>]) -> bool {
    values
        .iter()
        .all(|v| v.as_deref().is_some_and(|s| !s.trim().is_empty()))
}
