//! Subscription edit domain
//!
//! - [`types`]: request/response records forwarded through the gateway
//! - [`error`]: typed failures of the edit service
//! - [`service`]: the `SubscriptionEditService` seam
//! - [`remote`]: HTTP implementation talking to the upstream service

pub mod error;
pub mod remote;
pub mod service;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use error::EditError;
pub use remote::{CALLER_EMAIL_HEADER, RemoteEditService};
pub use service::{EditResult, SubscriptionEditService};
pub use types::{EditHistoryEntry, EditRequest, EditResponse, PaymentInitiationResponse};
