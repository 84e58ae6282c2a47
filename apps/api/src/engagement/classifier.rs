//! Engagement classification: a pure threshold policy over `EngagementMetrics`.
//!
//! Rules are evaluated in order and the first match wins:
//! 1. underperforming: participation < 0.3 OR messages < 10
//! 2. overperforming:  participation > 0.8 AND messages > 50
//! 3. silent_quitting: days since active > 7
//! 4. normal

use serde::{Deserialize, Serialize};

use crate::engagement::metrics::EngagementMetrics;

const LOW_PARTICIPATION: f64 = 0.3;
const MIN_MESSAGES: u32 = 10;
const HIGH_PARTICIPATION: f64 = 0.8;
const HIGH_MESSAGES: u32 = 50;
const MAX_IDLE_DAYS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementCategory {
    Underperforming,
    Overperforming,
    SilentQuitting,
    Normal,
}

impl EngagementCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngagementCategory::Underperforming => "underperforming",
            EngagementCategory::Overperforming => "overperforming",
            EngagementCategory::SilentQuitting => "silent_quitting",
            EngagementCategory::Normal => "normal",
        }
    }
}

pub fn classify(metrics: &EngagementMetrics) -> EngagementCategory {
    if metrics.participation_rate < LOW_PARTICIPATION || metrics.messages_sent < MIN_MESSAGES {
        EngagementCategory::Underperforming
    } else if metrics.participation_rate > HIGH_PARTICIPATION
        && metrics.messages_sent > HIGH_MESSAGES
    {
        EngagementCategory::Overperforming
    } else if metrics.days_since_active > MAX_IDLE_DAYS {
        EngagementCategory::SilentQuitting
    } else {
        EngagementCategory::Normal
    }
}
