//! Payment request bodies

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use super::money::LenientDecimal;

/// Any non-null value; strings pass unchanged, other JSON is rendered as text.
fn deserialize_present_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Err(serde::de::Error::custom("paymentMethod is required")),
        Value::String(s) => Ok(s),
        other => Ok(other.to_string()),
    }
}

/// Body of `POST /payment/initiate`
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInitiationRequest {
    #[validate(length(min = 1, message = "modificationId is required"))]
    #[schema(example = "MOD-42")]
    pub modification_id: String,
    #[validate(length(min = 1, message = "paymentMethod is required"))]
    #[schema(example = "ESEWA")]
    pub payment_method: String,
}

/// Body of `POST /{subscriptionId}/payment`
///
/// `amount` accepts `250.0` or `"250.0"`. Only a missing or null field, or
/// an amount that is not a number, is refused here.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPaymentRequest {
    #[serde(deserialize_with = "deserialize_present_text")]
    #[schema(example = "KHALTI")]
    pub payment_method: String,
    #[schema(value_type = f64, example = 250.0)]
    pub amount: LenientDecimal,
}
