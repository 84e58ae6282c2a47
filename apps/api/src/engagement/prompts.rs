// All LLM prompt constants for the engagement module.
// Placeholders are `{name}` tokens replaced by `questions::build_prompt`
// and `insights::build_prompt`.

/// Sent as the system message on every engagement completion.
pub const ADVISOR_SYSTEM_PROMPT: &str = "You advise engineering managers on team engagement. \
    Reply with the JSON value the request asks for and nothing else: \
    no prose before or after it and no markdown fences.";

/// Underperforming prompt. Replace: {messages_sent}, {participation}, {response_time}, {trend}
pub const UNDERPERFORMING_PROMPT_TEMPLATE: &str = r#"You are an HR expert helping managers have constructive conversations with underperforming team members.

Based on these Slack engagement metrics:
- Messages sent last 30 days: {messages_sent}
- Participation rate: {participation}
- Response time: {response_time} hours
- Engagement trend: {trend}

Generate 5 thoughtful, non-confrontational questions that a manager could ask to:
1. Understand potential barriers or challenges
2. Identify support needed
3. Explore workload and priorities
4. Assess job satisfaction and motivation
5. Collaboratively find solutions

Make questions open-ended, empathetic, and solution-focused.
Return as a JSON array of exactly 5 strings."#;

/// Overperforming prompt. Replace: {messages_sent}, {participation}, {response_time}, {collaboration}
pub const OVERPERFORMING_PROMPT_TEMPLATE: &str = r#"You are an HR expert helping managers engage with high-performing team members.

Based on these excellent Slack engagement metrics:
- Messages sent last 30 days: {messages_sent}
- Participation rate: {participation}
- Response time: {response_time} hours
- Collaboration score: {collaboration}

Generate 5 engaging questions that a manager could ask to:
1. Recognize and appreciate their contributions
2. Understand what drives their success
3. Explore career growth opportunities
4. Identify ways to leverage their strengths
5. Discuss potential leadership or mentoring roles

Make questions appreciative, growth-focused, and opportunity-oriented.
Return as a JSON array of exactly 5 strings."#;

/// Silent-quitting prompt. Replace: {messages_sent}, {days_since_active}, {participation_drop}, {trend}
pub const SILENT_QUITTING_PROMPT_TEMPLATE: &str = r#"You are an HR expert helping managers address potential disengagement.

Based on these concerning Slack patterns:
- Messages sent last 30 days: {messages_sent}
- Days since last activity: {days_since_active}
- Participation drop: {participation_drop}
- Engagement trend: {trend}

Generate 5 sensitive, empathetic questions that a manager could ask to:
1. Check on their wellbeing and job satisfaction
2. Understand any challenges or frustrations
3. Explore workload and work-life balance
4. Identify what support or changes might help
5. Rebuild engagement and connection

Make questions caring, non-judgmental, and focused on understanding their experience.
Return as a JSON array of exactly 5 strings."#;

/// Custom-request prompt. Replace: {messages_sent}, {participation}, {response_time}, {collaboration}, {custom_request}
pub const CUSTOM_PROMPT_TEMPLATE: &str = r#"You are an HR expert helping a manager with a specific situation.

Team member's Slack metrics:
- Messages sent last 30 days: {messages_sent}
- Participation rate: {participation}
- Response time: {response_time} hours
- Collaboration score: {collaboration}

Manager's specific request: "{custom_request}"

Generate 5 thoughtful questions that address the manager's request while considering the team member's performance data.
Make questions professional, constructive, and actionable.
Return as a JSON array of exactly 5 strings."#;

/// Insight prompt. Replace: {messages_sent}, {participation}, {response_time}, {collaboration}, {trend}
pub const INSIGHT_PROMPT_TEMPLATE: &str = r#"You are an HR analytics expert providing insights about team member performance.

Slack engagement data:
- Messages sent last 30 days: {messages_sent}
- Participation rate: {participation}
- Response time: {response_time} hours
- Collaboration score: {collaboration}
- Engagement trend: {trend}

Provide a comprehensive analysis including:
1. Overall performance assessment
2. Key strengths and areas of concern
3. Potential underlying factors
4. Recommended actions for the manager
5. Risk level (low/medium/high) for retention

Return a JSON object with this EXACT schema:
{
  "assessment": "one-sentence overall assessment",
  "strengths": ["..."],
  "concerns": ["..."],
  "factors": ["..."],
  "recommendations": ["..."],
  "risk_level": "low",
  "confidence_score": 0.8
}"#;
