//! Hand-authored questions and insights used whenever generation fails.

use crate::engagement::insights::{InsightRecord, RiskLevel};
use crate::engagement::metrics::EngagementMetrics;
use crate::engagement::questions::QuestionType;

pub const UNDERPERFORMING_QUESTIONS: [&str; 5] = [
    "How are you feeling about your current workload and priorities?",
    "What challenges or obstacles are you facing that I might not be aware of?",
    "Is there any additional support or resources you need to be more effective?",
    "How do you prefer to receive feedback and stay connected with the team?",
    "What would make your work experience more engaging and fulfilling?",
];

pub const OVERPERFORMING_QUESTIONS: [&str; 5] = [
    "What aspects of your work do you find most energizing and rewarding?",
    "Are there any new challenges or projects you'd be interested in taking on?",
    "How can we better leverage your strengths to benefit the team?",
    "What are your career goals and how can I support your growth?",
    "Would you be interested in mentoring or leading initiatives for other team members?",
];

pub const SILENT_QUITTING_QUESTIONS: [&str; 5] = [
    "How are you doing overall, both professionally and personally?",
    "What aspects of your work do you find most and least satisfying?",
    "Is there anything about your role or our team that's causing frustration?",
    "What changes could we make to improve your work experience?",
    "How can I better support you and help you feel more connected to the team?",
];

/// Fallback questions for a question type. Custom requests get a single
/// question quoting the request.
pub fn fallback_questions(question_type: QuestionType, custom_request: Option<&str>) -> Vec<String> {
    let fixed: &[&str] = match question_type {
        QuestionType::Underperforming => &UNDERPERFORMING_QUESTIONS,
        QuestionType::Overperforming => &OVERPERFORMING_QUESTIONS,
        QuestionType::SilentQuitting => &SILENT_QUITTING_QUESTIONS,
        QuestionType::Custom => {
            return vec![format!(
                "Based on your request about '{}', what specific support or changes would be most helpful for this team member?",
                custom_request.unwrap_or_default()
            )];
        }
    };
    fixed.iter().map(|q| q.to_string()).collect()
}

/// Fallback insight chosen by participation rate alone.
pub fn fallback_insight(metrics: &EngagementMetrics) -> InsightRecord {
    let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    if metrics.participation_rate < 0.3 {
        InsightRecord {
            assessment: "Low engagement detected".to_string(),
            strengths: owned(&["Potential for improvement"]),
            concerns: owned(&["Low participation in team communications"]),
            factors: owned(&["Workload", "Communication preferences", "Role clarity"]),
            recommendations: owned(&[
                "Schedule 1:1 meeting",
                "Assess workload",
                "Clarify expectations",
            ]),
            risk_level: RiskLevel::Medium,
            confidence_score: 0.7,
        }
    } else if metrics.participation_rate > 0.8 {
        InsightRecord {
            assessment: "High performer with strong engagement".to_string(),
            strengths: owned(&["Active communicator", "Team collaborator"]),
            concerns: owned(&["Potential burnout risk"]),
            factors: owned(&["High motivation", "Strong team connection"]),
            recommendations: owned(&["Recognize contributions", "Explore growth opportunities"]),
            risk_level: RiskLevel::Low,
            confidence_score: 0.8,
        }
    } else {
        InsightRecord {
            assessment: "Stable performance with room for growth".to_string(),
            strengths: owned(&["Consistent engagement"]),
            concerns: owned(&["Could increase participation"]),
            factors: owned(&["Role satisfaction", "Team dynamics"]),
            recommendations: owned(&["Regular check-ins", "Encourage more participation"]),
            risk_level: RiskLevel::Low,
            confidence_score: 0.6,
        }
    }
}
