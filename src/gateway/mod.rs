pub mod cors;
pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;


use anyhow::Context;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{AppConfig, CorsConfig};
use crate::edit::SubscriptionEditService;
use crate::user_auth::{JwtAuthService, Role, jwt_auth_middleware, require_roles};
use state::AppState;

/// Base path of the edit endpoints
pub const EDIT_BASE_PATH: &str = "/api/subscriptions/edit";

const USER_ONLY: &[Role] = &[Role::User];
const USER_OR_VENDOR: &[Role] = &[Role::User, Role::Vendor];

/// Build the complete router.
///
/// Layer order on edit routes, outermost first: JWT verification, role
/// guard, handler.
pub fn build_router(state: Arc<AppState>, cors: &CorsConfig) -> Router {
    // Customer-only routes
    let user_routes = Router::new()
        .route("/calculate", post(handlers::calculate_edit_price))
        .route("/apply", post(handlers::apply_subscription_edit))
        .route("/payment/initiate", post(handlers::initiate_payment))
        .route(
            "/{subscription_id}/payment",
            post(handlers::process_edit_payment),
        )
        .route_layer(from_fn_with_state(USER_ONLY, require_roles));

    // Vendors may read history of subscriptions they serve
    let history_routes = Router::new()
        .route(
            "/{subscription_id}/history",
            get(handlers::get_edit_history),
        )
        .route_layer(from_fn_with_state(USER_OR_VENDOR, require_roles));

    let edit_routes = user_routes
        .merge(history_routes)
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        .route("/api/health", get(handlers::health_check))
        .nest(EDIT_BASE_PATH, edit_routes)
        .with_state(state)
        // OpenAPI / Swagger UI (stateless, added after with_state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors::create_cors_layer(cors))
}

/// Start HTTP Gateway server
pub async fn run_server(
    config: &AppConfig,
    edit_service: Arc<dyn SubscriptionEditService>,
) -> anyhow::Result<()> {
    let auth = Arc::new(JwtAuthService::new(config.auth.jwt_secret.clone()));
    let state = Arc::new(AppState::new(
        edit_service.clone(),
        auth,
        config.gateway.error_format,
    ));
    let app = build_router(state, &config.cors);

    // Bind address
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!(
        edit_service = edit_service.name(),
        error_format = ?config.gateway.error_format,
        "Gateway listening on http://{}",
        addr
    );
    tracing::info!("API Docs: http://{}/docs", addr);
    tracing::info!("Edit API: {}/* (auth required)", EDIT_BASE_PATH);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
