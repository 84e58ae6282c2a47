//! Engagement metrics for a single team member, as supplied by the caller.

use serde::{Deserialize, Serialize};

/// Direction of a member's recent engagement.
/// Any unrecognised string deserializes to `Unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EngagementTrend {
    Increasing,
    Stable,
    Decreasing,
    #[default]
    Unknown,
}

impl EngagementTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngagementTrend::Increasing => "increasing",
            EngagementTrend::Stable => "stable",
            EngagementTrend::Decreasing => "decreasing",
            EngagementTrend::Unknown => "unknown",
        }
    }
}

impl From<String> for EngagementTrend {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "increasing" => EngagementTrend::Increasing,
            "stable" => EngagementTrend::Stable,
            // "declining" shows up in hand-written payloads
            "decreasing" | "declining" => EngagementTrend::Decreasing,
            _ => EngagementTrend::Unknown,
        }
    }
}

impl From<EngagementTrend> for String {
    fn from(trend: EngagementTrend) -> Self {
        trend.as_str().to_string()
    }
}

/// Flat engagement record for one person over the last 30 days.
/// Missing fields take the defaults below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementMetrics {
    pub messages_sent: u32,
    /// Fraction in [0, 1].
    pub participation_rate: f64,
    /// Hours.
    pub avg_response_time: f64,
    pub collaboration_score: f64,
    pub engagement_trend: EngagementTrend,
    pub days_since_active: u32,
    /// Rate delta against the previous period.
    pub participation_drop: f64,
}

impl EngagementMetrics {
    /// Participation rendered as a percentage with one decimal, e.g. `25.0%`.
    pub fn participation_percent(&self) -> String {
        format_percent(self.participation_rate)
    }

    pub fn participation_drop_percent(&self) -> String {
        format_percent(self.participation_drop)
    }

    /// Trend label for a prompt, with `default` standing in for `Unknown`.
    pub fn trend_label(&self, default: &'static str) -> &'static str {
        match self.engagement_trend {
            EngagementTrend::Unknown => default,
            trend => trend.as_str(),
        }
    }
}

fn format_percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_label_defaults_only_when_unknown() {
        let mut metrics = EngagementMetrics::default();
        assert_eq!(metrics.trend_label("stable"), "stable");
        metrics.engagement_trend = EngagementTrend::Increasing;
        assert_eq!(metrics.trend_label("stable"), "increasing");
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let metrics: EngagementMetrics =
            serde_json::from_str(r#"{"messages_sent": 15, "participation_rate": 0.25}"#).unwrap();
        assert_eq!(metrics.messages_sent, 15);
        assert_eq!(metrics.days_since_active, 0);
        assert_eq!(metrics.engagement_trend, EngagementTrend::Unknown);
        assert_eq!(metrics.participation_drop, 0.0);
    }

    #[test]
    fn test_trend_accepts_free_form_strings() {
        let trend: EngagementTrend = serde_json::from_str(r#""Decreasing""#).unwrap();
        assert_eq!(trend, EngagementTrend::Decreasing);
        let trend: EngagementTrend = serde_json::from_str(r#""declining""#).unwrap();
        assert_eq!(trend, EngagementTrend::Decreasing);
        let trend: EngagementTrend = serde_json::from_str(r#""sideways""#).unwrap();
        assert_eq!(trend, EngagementTrend::Unknown);
    }

    #[test]
    fn test_trend_serializes_lowercase() {
        let json = serde_json::to_string(&EngagementTrend::Increasing).unwrap();
        assert_eq!(json, r#""increasing""#);
    }

    #[test]
    fn test_participation_percent_one_decimal() {
        let metrics = EngagementMetrics {
            participation_rate: 0.256,
            ..Default::default()
        };
        assert_eq!(metrics.participation_percent(), "25.6%");
    }
}
