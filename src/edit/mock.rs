//! Recording edit service for tests.
//!
//! Records every call with its arguments and answers with either a canned
//! success or a configured failure.

use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;

use super::error::EditError;
use super::service::{EditResult, SubscriptionEditService};
use super::types::{EditRequest, EditResponse, PaymentInitiationResponse};

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Calculate {
        request: EditRequest,
        caller: String,
    },
    Apply {
        request: EditRequest,
        caller: String,
    },
    InitiatePayment {
        modification_id: String,
        payment_method: String,
        caller: String,
    },
    ProcessPayment {
        subscription_id: String,
        caller: String,
        payment_method: String,
        amount: Decimal,
    },
    History {
        subscription_id: String,
        caller: String,
    },
}

#[derive(Default)]
pub struct RecordingEditService {
    calls: Mutex<Vec<RecordedCall>>,
    failure: Option<EditError>,
    pub edit_response: EditResponse,
    pub payment_response: PaymentInitiationResponse,
    pub history: Value,
}

impl RecordingEditService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation fails with `err`
    pub fn failing(err: EditError) -> Self {
        Self {
            failure: Some(err),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record<T: Clone>(&self, call: RecordedCall, ok: &T) -> EditResult<T> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(ok.clone()),
        }
    }
}

#[async_trait]
impl SubscriptionEditService for RecordingEditService {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn calculate_edit_price(
        &self,
        request: EditRequest,
        caller_email: &str,
    ) -> EditResult<EditResponse> {
        let call = RecordedCall::Calculate {
            request,
            caller: caller_email.to_string(),
        };
        self.record(call, &self.edit_response)
    }

    async fn apply_subscription_edit(
        &self,
        request: EditRequest,
        caller_email: &str,
    ) -> EditResult<EditResponse> {
        let call = RecordedCall::Apply {
            request,
            caller: caller_email.to_string(),
        };
        self.record(call, &self.edit_response)
    }

    async fn initiate_payment_by_modification_id(
        &self,
        modification_id: &str,
        payment_method: &str,
        caller_email: &str,
    ) -> EditResult<PaymentInitiationResponse> {
        let call = RecordedCall::InitiatePayment {
            modification_id: modification_id.to_string(),
            payment_method: payment_method.to_string(),
            caller: caller_email.to_string(),
        };
        self.record(call, &self.payment_response)
    }

    async fn process_edit_payment(
        &self,
        subscription_id: &str,
        caller_email: &str,
        payment_method: &str,
        amount: Decimal,
    ) -> EditResult<PaymentInitiationResponse> {
        let call = RecordedCall::ProcessPayment {
            subscription_id: subscription_id.to_string(),
            caller: caller_email.to_string(),
            payment_method: payment_method.to_string(),
            amount,
        };
        self.record(call, &self.payment_response)
    }

    async fn get_edit_history(
        &self,
        subscription_id: &str,
        caller_email: &str,
    ) -> EditResult<Value> {
        let call = RecordedCall::History {
            subscription_id: subscription_id.to_string(),
            caller: caller_email.to_string(),
        };
        self.record(call, &self.history)
    }
}
