use std::sync::Arc;

use crate::edit::SubscriptionEditService;
use crate::gateway::types::ErrorFormat;
use crate::user_auth::JwtAuthService;

/// Gateway application state (shared, immutable)
#[derive(Clone)]
pub struct AppState {
    /// Subscription edit service all edit routes delegate to
    pub edit_service: Arc<dyn SubscriptionEditService>,
    /// Bearer token verifier
    pub auth: Arc<JwtAuthService>,
    /// Failure body policy
    pub error_format: ErrorFormat,
}

impl AppState {
    pub fn new(
        edit_service: Arc<dyn SubscriptionEditService>,
        auth: Arc<JwtAuthService>,
        error_format: ErrorFormat,
    ) -> Self {
        Self {
            edit_service,
            auth,
            error_format,
        }
    }
}
