//! Credential and reachability checks for the SaaS integrations.

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::warn;

use crate::config::ProbeConfig;
use crate::probes::{all_present, missing_config};

const ACI_HEALTH_URL: &str = "https://api.aci.dev/v1/health";
const VERCEL_USER_URL: &str = "https://api.vercel.com/v2/user";
const VERCEL_PROJECTS_URL: &str = "https://api.vercel.com/v9/projects";

pub fn airtable_endpoint(base_id: &str, table_name: &str) -> String {
    format!("https://api.airtable.com/v0/{base_id}/{table_name}")
}

pub fn probe_airtable(config: &ProbeConfig) -> bool {
    println!("\nTesting Airtable API...");
    match (
        config.airtable_api_key.as_deref(),
        config.airtable_base_id.as_deref(),
        config.airtable_table_name.as_deref(),
    ) {
        (Some(_), Some(base_id), Some(table_name)) => {
            println!(
                "✓ Airtable endpoint configured: {}",
                airtable_endpoint(base_id, table_name)
            );
            true
        }
        _ => missing_config("Airtable"),
    }
}

pub fn probe_akkio(config: &ProbeConfig) -> bool {
    println!("\nTesting Akkio API...");
    credentials_probe("Akkio", &[&config.akkio_api_key, &config.akkio_model_id])
}

/// Fetches the Vercel account, then lists projects. Passes iff the
/// account request returns 200; the project listing is informational.
pub async fn probe_vercel(client: &Client, config: &ProbeConfig) -> bool {
    println!("\nTesting Vercel API...");
    let Some(api_key) = config.vercel_api_key.as_deref() else {
        return missing_config("Vercel");
    };

    let response = match client.get(VERCEL_USER_URL).bearer_auth(api_key).send().await {
        Ok(response) => response,
        Err(e) => {
            println!("✗ Error testing Vercel API: {e}");
            return false;
        }
    };
    if response.status() != StatusCode::OK {
        println!("✗ Failed to connect to Vercel API: {}", response.status());
        return false;
    }

    let account: Value = response.json().await.unwrap_or_default();
    println!("✓ Successfully connected to Vercel API");
    println!("✓ Authenticated as: {}", vercel_email(&account));

    let mut projects = client.get(VERCEL_PROJECTS_URL).bearer_auth(api_key);
    if let Some(team_id) = config.vercel_team_id.as_deref() {
        projects = projects.query(&[("teamId", team_id)]);
    }
    match projects.send().await {
        Ok(response) if response.status() == StatusCode::OK => {
            let listing: Value = response.json().await.unwrap_or_default();
            println!("✓ Found {} projects", project_count(&listing));
        }
        Ok(response) => warn!("Vercel project listing returned {}", response.status()),
        Err(e) => warn!("Vercel project listing failed: {e}"),
    }
    true
}

fn vercel_email(account: &Value) -> &str {
    account["user"]["email"].as_str().unwrap_or("unknown")
}

fn project_count(listing: &Value) -> usize {
    listing["projects"].as_array().map_or(0, Vec::len)
}

pub fn probe_daytona(config: &ProbeConfig) -> bool {
    println!("\nTesting Daytona API...");
    credentials_probe(
        "Daytona",
        &[&config.daytona_api_key, &config.daytona_project_id],
    )
}

fn credentials_probe(service: &str, values: &[&Option<String>]) -> bool {
    if !all_present(values) {
        return missing_config(service);
    }
    println!("✓ {service} credentials configured");
    true
}

/// Calls the ACI health endpoint; passes only on HTTP 200.
pub async fn probe_aci(client: &Client, config: &ProbeConfig) -> bool {
    println!("\nTesting ACI API...");
    let Some(api_key) = config.aci_api_key.as_deref() else {
        return missing_config("ACI");
    };

    let passed = match client.get(ACI_HEALTH_URL).bearer_auth(api_key).send().await {
        Ok(response) => response.status() == StatusCode::OK,
        Err(e) => {
            warn!("ACI health request failed: {e}");
            false
        }
    };

    println!(
        "ACI API Connection: {}",
        if passed { "OK" } else { "Failed" }
    );
    passed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> ProbeConfig {
        let v = |s: &str| Some(s.to_string());
        ProbeConfig {
            airtable_api_key: v("key"),
            airtable_base_id: v("appXYZ"),
            airtable_table_name: v("Engagement"),
            akkio_api_key: v("key"),
            akkio_model_id: v("model"),
            vercel_api_key: v("key"),
            vercel_team_id: v("team"),
            daytona_api_key: v("key"),
            daytona_project_id: v("proj"),
            ..Default::default()
        }
    }

    #[test]
    fn test_airtable_endpoint_shape() {
        assert_eq!(
            airtable_endpoint("appXYZ", "Engagement"),
            "https://api.airtable.com/v0/appXYZ/Engagement"
        );
    }

    #[test]
    fn test_configured_services_pass() {
        let config = configured();
        assert!(probe_airtable(&config));
        assert!(probe_akkio(&config));
        assert!(probe_daytona(&config));
    }

    #[test]
    fn test_missing_credentials_fail() {
        let config = ProbeConfig {
            daytona_project_id: None,
            airtable_table_name: None,
            ..configured()
        };
        assert!(!probe_daytona(&config));
        assert!(!probe_airtable(&config));
        assert!(probe_akkio(&config));
    }

    #[tokio::test]
    async fn test_vercel_without_key_fails_without_request() {
        let client = Client::new();
        let config = ProbeConfig {
            vercel_api_key: None,
            ..configured()
        };
        assert!(!probe_vercel(&client, &config).await);
    }

    #[test]
    fn test_vercel_account_and_project_summary() {
        let account = serde_json::json!({"user": {"email": "ops@example.com"}});
        assert_eq!(vercel_email(&account), "ops@example.com");
        assert_eq!(vercel_email(&serde_json::json!({})), "unknown");

        let listing = serde_json::json!({"projects": [{"name": "web"}, {"name": "api"}]});
        assert_eq!(project_count(&listing), 2);
        assert_eq!(project_count(&serde_json::json!({})), 0);
    }

    #[tokio::test]
    async fn test_aci_without_key_fails_without_request() {
        let client = Client::new();
        assert!(!probe_aci(&client, &ProbeConfig::default()).await);
    }
}
