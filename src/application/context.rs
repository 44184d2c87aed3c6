use crate::domain::services::admission::AdmissionPolicy;
use crate::infrastructure::db::repositories::Repositories;
use crate::infrastructure::events::WebhookEventBus;

/// Shared application resources used by the use cases.
pub struct AppContext {
    pub repos: Repositories,
    pub admission: AdmissionPolicy,
    pub event_bus: WebhookEventBus,
}

impl AppContext {
    /// Build a new application context with shared repositories and services.
    pub fn new(repos: Repositories, admission: AdmissionPolicy, event_bus: WebhookEventBus) -> Self {
        Self {
            repos,
            admission,
            event_bus,
        }
    }
}
