//! Subscription edit DTOs
//!
//! These records cross the gateway unchanged. The gateway only checks that an
//! `EditRequest` names a subscription; everything else is owned by the
//! subscription edit service. Service payloads are held as raw JSON so that
//! ids, nulls and number formatting reach the caller exactly as produced;
//! accessors read the few fields the gateway logs.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Subscription ids arrive as strings or numbers and are forwarded as sent.
fn deserialize_subscription_ref<'de, D>(deserializer: D) -> Result<Value, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        v @ (Value::String(_) | Value::Number(_)) => Ok(v),
        Value::Null => Err(serde::de::Error::custom("subscriptionId is required")),
        _ => Err(serde::de::Error::custom(
            "subscriptionId must be a string or a number",
        )),
    }
}

/// Render a scalar id field as text for logs and lookups.
fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read an amount sent either as a JSON number or a numeric string.
fn decimal_of(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .ok()
        .or_else(|| Decimal::from_scientific(&text).ok())
}

// ============================================================================
// Requests
// ============================================================================

/// Requested change to a subscription plan.
///
/// The tiffin front end sends `newSchedule`, `editReason`, `additionalPayment`
/// and `refundAmount`; other clients send other shapes (`newPlan`, ...). All of
/// them are forwarded as-is in `changes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditRequest {
    /// Subscription being edited (string or number)
    #[schema(value_type = String, example = "SUB-1024")]
    #[serde(deserialize_with = "deserialize_subscription_ref")]
    pub subscription_id: Value,
    /// Requested change fields, opaque to the gateway
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub changes: Map<String, Value>,
}

impl EditRequest {
    pub fn new(subscription_id: impl Into<String>) -> Self {
        Self {
            subscription_id: Value::String(subscription_id.into()),
            changes: Map::new(),
        }
    }

    /// Add a change field (builder style, mostly for tooling and tests)
    pub fn with_change(mut self, key: impl Into<String>, value: Value) -> Self {
        self.changes.insert(key.into(), value);
        self
    }

    /// Subscription id as text, whatever JSON type the caller used
    pub fn subscription_key(&self) -> String {
        id_text(&self.subscription_id).unwrap_or_default()
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Price delta and/or pending modification produced by the edit service.
///
/// Known fields: `modificationId`, `editHistoryId`, `paymentId`, `editStatus`
/// (`PENDING_PAYMENT`, `COMPLETED`, `PROCESSED`, `REFUND_APPROVED`, ...),
/// `additionalPayment`, `additionalPaymentAmount`, `refundAmount`, `oldCost`,
/// `newCost`, `message`, `paymentMethod`, `vendorName`, `vendorPhone`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object, example = json!({
    "modificationId": "MOD-42",
    "editStatus": "PENDING_PAYMENT",
    "additionalPayment": 250.0,
    "oldCost": 3000,
    "newCost": 3250
}))]
pub struct EditResponse(pub Value);

impl EditResponse {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn modification_id(&self) -> Option<String> {
        self.0.get("modificationId").and_then(id_text)
    }

    pub fn edit_status(&self) -> Option<&str> {
        self.0.get("editStatus").and_then(Value::as_str)
    }

    pub fn additional_payment(&self) -> Option<Decimal> {
        self.0.get("additionalPayment").and_then(decimal_of)
    }

    pub fn refund_amount(&self) -> Option<Decimal> {
        self.0.get("refundAmount").and_then(decimal_of)
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// Payment session data returned by the payment gateway integration.
///
/// For eSewa `paymentData` holds the form fields the browser must POST to
/// `paymentUrl`; for Khalti only `paymentUrl` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object, example = json!({
    "paymentUrl": "https://rc-epay.esewa.com.np/api/epay/main/v2/form",
    "paymentData": {"amount": "250", "signature": "..."},
    "transactionUuid": "2c0e6b4a"
}))]
pub struct PaymentInitiationResponse(pub Value);

impl PaymentInitiationResponse {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn payment_url(&self) -> Option<&str> {
        self.0.get("paymentUrl").and_then(Value::as_str)
    }

    pub fn payment_id(&self) -> Option<String> {
        self.0.get("paymentId").and_then(id_text)
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// One recorded edit of a subscription, as documented in OpenAPI.
///
/// History is returned verbatim as the service's JSON; this type only
/// describes the usual row shape.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditHistoryEntry {
    #[schema(value_type = String, example = "H-7")]
    pub edit_history_id: Value,
    #[schema(value_type = String, example = "SUB-1024")]
    pub subscription_id: Value,
    #[schema(example = "COMPLETED")]
    pub edit_status: Option<String>,
    pub edit_reason: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub additional_payment: Option<Value>,
    #[schema(value_type = Option<f64>)]
    pub refund_amount: Option<Value>,
    pub created_at: Option<String>,
}
