use crate::engagement::advisor::EngagementAdvisor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Carries the text generator and store; cheap to clone.
    pub advisor: EngagementAdvisor,
}
