//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::edit::{EditHistoryEntry, EditRequest, EditResponse, PaymentInitiationResponse};
use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::{ErrorEnvelope, PaymentInitiationRequest, ProcessPaymentRequest};

/// Bearer JWT issued by the identity provider
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "HS256 token. `sub` is the caller email, roles come from `role` or `roles`.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tiffin Subscription Edit API",
        version = "1.0.0",
        description = "Price, apply and pay for changes to a tiffin subscription plan.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::edit::calculate_edit_price,
        crate::gateway::handlers::edit::apply_subscription_edit,
        crate::gateway::handlers::edit::initiate_payment,
        crate::gateway::handlers::edit::process_edit_payment,
        crate::gateway::handlers::edit::get_edit_history,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorEnvelope,
            EditRequest,
            EditResponse,
            EditHistoryEntry,
            PaymentInitiationRequest,
            PaymentInitiationResponse,
            ProcessPaymentRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Subscription Edit", description = "Plan edits and edit payments (auth required)"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;
