//! HTTP handlers
//!
//! - [`edit`]: subscription edit and payment endpoints
//! - [`health`]: liveness

pub mod edit;
pub mod health;

pub use edit::{
    apply_subscription_edit, calculate_edit_price, get_edit_history, initiate_payment,
    process_edit_payment,
};
pub use health::{HealthResponse, health_check};
