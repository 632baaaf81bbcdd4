//! Subscription edit service seam
//!
//! The gateway never prices, mutates or pays for anything itself. Every
//! operation is delegated through this trait; implementations own the
//! modification lifecycle (proposed -> priced -> applied -> paid) and resolve
//! any races between overlapping calls.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;

use super::error::EditError;
use super::types::{EditRequest, EditResponse, PaymentInitiationResponse};

pub type EditResult<T> = Result<T, EditError>;

/// External collaborator behind the edit/payment endpoints.
///
/// `caller_email` is the authenticated caller, forwarded as an opaque
/// authorization key.
#[async_trait]
pub trait SubscriptionEditService: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    async fn calculate_edit_price(
        &self,
        request: EditRequest,
        caller_email: &str,
    ) -> EditResult<EditResponse>;

    async fn apply_subscription_edit(
        &self,
        request: EditRequest,
        caller_email: &str,
    ) -> EditResult<EditResponse>;

    async fn initiate_payment_by_modification_id(
        &self,
        modification_id: &str,
        payment_method: &str,
        caller_email: &str,
    ) -> EditResult<PaymentInitiationResponse>;

    async fn process_edit_payment(
        &self,
        subscription_id: &str,
        caller_email: &str,
        payment_method: &str,
        amount: Decimal,
    ) -> EditResult<PaymentInitiationResponse>;

    /// History rows exactly as the service produced them
    async fn get_edit_history(
        &self,
        subscription_id: &str,
        caller_email: &str,
    ) -> EditResult<Value>;
}
