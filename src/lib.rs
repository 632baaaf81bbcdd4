//! Tiffin subscription edit gateway
//!
//! HTTP layer in front of the subscription edit service: customers price and
//! apply changes to their tiffin plan, pay for them, and read the edit
//! history.
//!
//! # Modules
//!
//! - [`edit`] - Edit DTOs, typed failures and the `SubscriptionEditService` seam
//! - [`user_auth`] - JWT verification and role guard
//! - [`gateway`] - Router, handlers, error mapping, OpenAPI
//! - [`config`] - YAML configuration
//! - [`logging`] - tracing subscriber setup

pub mod config;
pub mod edit;
pub mod gateway;
pub mod logging;
pub mod user_auth;

// Convenient re-exports at crate root
pub use config::AppConfig;
pub use edit::{
    EditError, EditHistoryEntry, EditRequest, EditResponse, EditResult,
    PaymentInitiationResponse, RemoteEditService, SubscriptionEditService,
};
pub use gateway::{build_router, run_server};
pub use user_auth::{CallerIdentity, JwtAuthService, Role};
