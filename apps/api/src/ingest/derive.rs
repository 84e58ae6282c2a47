//! Per-user engagement metrics computed from an imported chat export.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::engagement::metrics::{EngagementMetrics, EngagementTrend};
use crate::ingest::slack_export::ExportSnapshot;

/// Response times are not derivable from an export; every user gets this.
pub const DEFAULT_RESPONSE_HOURS: f64 = 12.0;
const MAX_COLLABORATION_SCORE: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedUser {
    pub user_id: String,
    pub metrics: EngagementMetrics,
    pub last_active: DateTime<Utc>,
}

#[derive(Default)]
struct UserStats {
    messages: u32,
    channels: BTreeSet<String>,
    threads: u32,
    last_active: Option<DateTime<Utc>>,
}

/// Metrics for every user with at least one timestamped message, sorted by
/// user id. `days_since_active` is measured against `as_of`.
pub fn derive_metrics(snapshot: &ExportSnapshot, as_of: DateTime<Utc>) -> Vec<DerivedUser> {
    let mut stats: BTreeMap<&str, UserStats> = BTreeMap::new();

    for message in &snapshot.messages {
        let Some(sent_at) = parse_ts(&message.ts) else {
            debug!("Skipping message {} with unreadable ts {:?}", message.id, message.ts);
            continue;
        };
        let entry = stats.entry(message.user_id.as_str()).or_default();
        entry.messages += 1;
        entry.channels.insert(message.channel_id.clone());
        if message.thread_ts.is_some() {
            entry.threads += 1;
        }
        entry.last_active = entry.last_active.max(Some(sent_at));
    }

    let total: u32 = stats.values().map(|s| s.messages).sum();
    if total == 0 {
        return Vec::new();
    }
    let average = f64::from(total) / stats.len() as f64;

    stats
        .into_iter()
        .filter_map(|(user_id, s)| {
            let last_active = s.last_active?;
            let messages = f64::from(s.messages);
            let collaboration = s.channels.len() as f64 * 0.5 + f64::from(s.threads) * 0.1;

            Some(DerivedUser {
                user_id: user_id.to_string(),
                metrics: EngagementMetrics {
                    messages_sent: s.messages,
                    participation_rate: messages / f64::from(total),
                    avg_response_time: DEFAULT_RESPONSE_HOURS,
                    collaboration_score: collaboration.min(MAX_COLLABORATION_SCORE),
                    engagement_trend: trend_against(messages, average),
                    days_since_active: (as_of - last_active).num_days().max(0) as u32,
                    participation_drop: 0.0,
                },
                last_active,
            })
        })
        .collect()
}

fn trend_against(messages: f64, average: f64) -> EngagementTrend {
    if messages > average * 1.2 {
        EngagementTrend::Increasing
    } else if messages < average * 0.5 {
        EngagementTrend::Decreasing
    } else {
        EngagementTrend::Stable
    }
}

/// Chat timestamps are fractional epoch seconds, e.g. `1624982400.000`.
fn parse_ts(ts: &str) -> Option<DateTime<Utc>> {
    let seconds: f64 = ts.trim().parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    let whole = seconds.trunc();
    let nanos = ((seconds - whole) * 1e9).round() as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
}
