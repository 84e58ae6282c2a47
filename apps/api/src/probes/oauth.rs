//! OAuth setup checks. Only the authorization URL is built and printed;
//! no token exchange happens here.

use reqwest::Url;

use crate::config::ProbeConfig;
use crate::probes::missing_config;

const SLACK_AUTHORIZE_URL: &str = "https://slack.com/oauth/v2/authorize";
const GMAIL_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GMAIL_SEND_SCOPE: &str = "https://www.googleapis.com/auth/gmail.send";

pub fn slack_authorize_url(client_id: &str, redirect_uri: &str) -> Option<Url> {
    Url::parse_with_params(
        SLACK_AUTHORIZE_URL,
        &[
            ("client_id", client_id),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
        ],
    )
    .ok()
}

pub fn gmail_authorize_url(client_id: &str, redirect_uri: &str) -> Option<Url> {
    Url::parse_with_params(
        GMAIL_AUTHORIZE_URL,
        &[
            ("client_id", client_id),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", GMAIL_SEND_SCOPE),
            ("access_type", "offline"),
        ],
    )
    .ok()
}

pub fn probe_slack_oauth(config: &ProbeConfig) -> bool {
    print_authorize_url(
        "Slack",
        config.slack_client_id.as_deref(),
        config.slack_redirect_uri.as_deref(),
        slack_authorize_url,
    )
}

pub fn probe_gmail_oauth(config: &ProbeConfig) -> bool {
    print_authorize_url(
        "Gmail",
        config.gmail_client_id.as_deref(),
        config.gmail_redirect_uri.as_deref(),
        gmail_authorize_url,
    )
}

fn print_authorize_url(
    provider: &str,
    client_id: Option<&str>,
    redirect_uri: Option<&str>,
    build: fn(&str, &str) -> Option<Url>,
) -> bool {
    let (Some(client_id), Some(redirect_uri)) = (client_id, redirect_uri) else {
        return missing_config(&format!("{provider} OAuth"));
    };

    match build(client_id, redirect_uri) {
        Some(url) => {
            println!("\n{provider} Authorization URL:");
            println!("{url}");
            true
        }
        None => {
            println!("✗ Could not build {provider} authorization URL");
            false
        }
    }
}
