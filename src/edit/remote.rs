//! Remote subscription edit service
//!
//! Forwards each operation to the upstream subscription service over HTTP and
//! turns upstream statuses back into typed [`EditError`]s.

use std::time::Duration;

use anyhow::{Context, bail};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::EditError;
use super::service::{EditResult, SubscriptionEditService};
use super::types::{EditRequest, EditResponse, PaymentInitiationResponse};
use crate::config::UpstreamConfig;

/// Header carrying the authenticated caller to the upstream service
pub const CALLER_EMAIL_HEADER: &str = "X-Caller-Email";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InitiatePaymentBody<'a> {
    modification_id: &'a str,
    payment_method: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProcessPaymentBody<'a> {
    payment_method: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
}

/// HTTP client for the upstream subscription edit service
pub struct RemoteEditService {
    client: Client,
    base_url: Url,
}

impl RemoteEditService {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid upstream base URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            bail!("Upstream base URL cannot carry a path: {}", base_url);
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build upstream HTTP client")?;
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &UpstreamConfig) -> anyhow::Result<Self> {
        Self::new(&config.base_url, Duration::from_millis(config.timeout_ms))
    }

    /// Append percent-encoded path segments to the base URL
    fn endpoint(&self, segments: &[&str]) -> EditResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| EditError::Internal("Invalid upstream base URL".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        op: &'static str,
        request: RequestBuilder,
        caller_email: &str,
    ) -> EditResult<T> {
        let response = request
            .header(CALLER_EMAIL_HEADER, caller_email)
            .send()
            .await
            .map_err(|e| {
                warn!(op, error = %e, "Subscription edit service unreachable");
                EditError::Internal("Subscription edit service unavailable".to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                warn!(op, error = %e, "Undecodable response from subscription edit service");
                EditError::Internal("Invalid response from subscription edit service".to_string())
            });
        }

        let body = response.text().await.unwrap_or_default();
        let message = failure_message(&body, status);
        debug!(op, status = status.as_u16(), message = %message, "Upstream rejected edit operation");
        Err(error_for_status(status, message))
    }
}

/// Pick the human-readable message out of an upstream failure body.
///
/// Accepts `{"message": ..}`, `{"msg": ..}`, `{"error": ..}`, a bare JSON
/// string or plain text; falls back to the status reason.
pub(crate) fn failure_message(body: &str, status: StatusCode) -> String {
    let body = body.trim();
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(s) = value.as_str() {
            return s.to_string();
        }
        for key in ["message", "msg", "error"] {
            if let Some(s) = value.get(key).and_then(|v| v.as_str()) {
                return s.to_string();
            }
        }
    }
    if !body.is_empty() {
        return body.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("Subscription edit failed")
        .to_string()
}

pub(crate) fn error_for_status(status: StatusCode, message: String) -> EditError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => EditError::Rejected(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => EditError::Forbidden(message),
        StatusCode::NOT_FOUND => EditError::NotFound(message),
        StatusCode::CONFLICT => EditError::InvalidState(message),
        _ => EditError::Internal(message),
    }
}

#[async_trait]
impl SubscriptionEditService for RemoteEditService {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn calculate_edit_price(
        &self,
        request: EditRequest,
        caller_email: &str,
    ) -> EditResult<EditResponse> {
        let url = self.endpoint(&["calculate"])?;
        self.send("calculate", self.client.post(url).json(&request), caller_email)
            .await
    }

    async fn apply_subscription_edit(
        &self,
        request: EditRequest,
        caller_email: &str,
    ) -> EditResult<EditResponse> {
        let url = self.endpoint(&["apply"])?;
        self.send("apply", self.client.post(url).json(&request), caller_email)
            .await
    }

    async fn initiate_payment_by_modification_id(
        &self,
        modification_id: &str,
        payment_method: &str,
        caller_email: &str,
    ) -> EditResult<PaymentInitiationResponse> {
        let url = self.endpoint(&["payment", "initiate"])?;
        let body = InitiatePaymentBody {
            modification_id,
            payment_method,
        };
        self.send(
            "payment_initiate",
            self.client.post(url).json(&body),
            caller_email,
        )
        .await
    }

    async fn process_edit_payment(
        &self,
        subscription_id: &str,
        caller_email: &str,
        payment_method: &str,
        amount: Decimal,
    ) -> EditResult<PaymentInitiationResponse> {
        let url = self.endpoint(&[subscription_id, "payment"])?;
        let body = ProcessPaymentBody {
            payment_method,
            amount,
        };
        self.send(
            "process_payment",
            self.client.post(url).json(&body),
            caller_email,
        )
        .await
    }

    async fn get_edit_history(
        &self,
        subscription_id: &str,
        caller_email: &str,
    ) -> EditResult<Value> {
        let url = self.endpoint(&[subscription_id, "history"])?;
        self.send("history", self.client.get(url), caller_email)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::str::FromStr;

    fn service(server: &MockServer) -> RemoteEditService {
        RemoteEditService::new(&server.url("/internal/edit"), Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn test_failure_message_variants() {
        assert_eq!(
            failure_message(r#"{"message":"Subscription not active"}"#, StatusCode::BAD_REQUEST),
            "Subscription not active"
        );
        assert_eq!(
            failure_message(r#"{"msg":"nope"}"#, StatusCode::BAD_REQUEST),
            "nope"
        );
        assert_eq!(
            failure_message(r#""plain json string""#, StatusCode::BAD_REQUEST),
            "plain json string"
        );
        assert_eq!(
            failure_message("Edit window closed", StatusCode::BAD_REQUEST),
            "Edit window closed"
        );
        assert_eq!(failure_message("", StatusCode::NOT_FOUND), "Not Found");
    }

    #[test]
    fn test_error_for_status() {
        assert!(matches!(
            error_for_status(StatusCode::BAD_REQUEST, "m".into()),
            EditError::Rejected(_)
        ));
        assert!(matches!(
            error_for_status(StatusCode::FORBIDDEN, "m".into()),
            EditError::Forbidden(_)
        ));
        assert!(matches!(
            error_for_status(StatusCode::NOT_FOUND, "m".into()),
            EditError::NotFound(_)
        ));
        assert!(matches!(
            error_for_status(StatusCode::CONFLICT, "m".into()),
            EditError::InvalidState(_)
        ));
        assert!(matches!(
            error_for_status(StatusCode::BAD_GATEWAY, "m".into()),
            EditError::Internal(_)
        ));
    }

    #[test]
    fn test_rejects_non_base_url() {
        assert!(RemoteEditService::new("mailto:ops@example.com", Duration::from_secs(1)).is_err());
        assert!(RemoteEditService::new("not a url", Duration::from_secs(1)).is_err());
    }

    #[tokio::test]
    async fn test_calculate_forwards_request_and_caller() {
        let server = MockServer::start_async().await;
        let upstream = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/internal/edit/calculate")
                    .header(CALLER_EMAIL_HEADER, "a@x.com")
                    .json_body(json!({"subscriptionId": "S1", "newPlan": "weekly-veg"}));
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"additionalPayment": 150.0, "editStatus": "PENDING_PAYMENT"}));
            })
            .await;

        let request = EditRequest::new("S1").with_change("newPlan", json!("weekly-veg"));
        let resp = service(&server)
            .calculate_edit_price(request, "a@x.com")
            .await
            .unwrap();

        upstream.assert_async().await;
        assert_eq!(resp.additional_payment(), Some(Decimal::from(150)));
        assert_eq!(resp.edit_status(), Some("PENDING_PAYMENT"));
    }

    #[tokio::test]
    async fn test_process_payment_sends_numeric_amount() {
        let server = MockServer::start_async().await;
        let upstream = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/internal/edit/S1/payment")
                    .json_body(json!({"paymentMethod": "KHALTI", "amount": 250.5}));
                then.status(200)
                    .json_body(json!({"paymentUrl": "https://pay.khalti.com/?pidx=abc"}));
            })
            .await;

        let resp = service(&server)
            .process_edit_payment("S1", "a@x.com", "KHALTI", Decimal::from_str("250.5").unwrap())
            .await
            .unwrap();

        upstream.assert_async().await;
        assert_eq!(resp.payment_url(), Some("https://pay.khalti.com/?pidx=abc"));
    }

    #[tokio::test]
    async fn test_history_uses_subscription_segment() {
        let server = MockServer::start_async().await;
        let upstream = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/internal/edit/SUB-1/history")
                    .header(CALLER_EMAIL_HEADER, "v@x.com");
                then.status(200)
                    .json_body(json!([{"editHistoryId": "H1", "editStatus": "COMPLETED"}]));
            })
            .await;

        let history = service(&server)
            .get_edit_history("SUB-1", "v@x.com")
            .await
            .unwrap();

        upstream.assert_async().await;
        assert_eq!(history[0]["editHistoryId"], "H1");
    }

    #[tokio::test]
    async fn test_numeric_ids_and_nulls_pass_through_unchanged() {
        const EDIT: &str = r#"{"modificationId":42,"paymentId":null,"additionalPayment":100}"#;
        const HISTORY: &str = r#"[{"editHistoryId":7,"subscriptionId":1024,"editReason":null,"refundAmount":0}]"#;

        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/internal/edit/calculate");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(EDIT);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/internal/edit/1024/history");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(HISTORY);
            })
            .await;

        let svc = service(&server);
        let resp = svc
            .calculate_edit_price(EditRequest::new("S1"), "a@x.com")
            .await
            .unwrap();
        assert_eq!(resp.modification_id().as_deref(), Some("42"));
        assert_eq!(serde_json::to_string(&resp).unwrap(), EDIT);

        let history = svc.get_edit_history("1024", "a@x.com").await.unwrap();
        assert_eq!(serde_json::to_string(&history).unwrap(), HISTORY);
    }

    #[tokio::test]
    async fn test_upstream_conflict_maps_to_invalid_state() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/internal/edit/payment/initiate");
                then.status(409)
                    .json_body(json!({"message": "Modification already paid"}));
            })
            .await;

        let err = service(&server)
            .initiate_payment_by_modification_id("MOD-1", "ESEWA", "a@x.com")
            .await
            .unwrap_err();

        assert_eq!(
            err,
            EditError::InvalidState("Modification already paid".to_string())
        );
    }

    #[tokio::test]
    async fn test_upstream_bad_request_maps_to_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/internal/edit/apply");
                then.status(400).body("Please calculate price difference first");
            })
            .await;

        let err = service(&server)
            .apply_subscription_edit(EditRequest::new("S1"), "a@x.com")
            .await
            .unwrap_err();

        assert_eq!(
            err,
            EditError::Rejected("Please calculate price difference first".to_string())
        );
    }

    #[tokio::test]
    async fn test_undecodable_success_body_is_internal() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/internal/edit/S1/history");
                then.status(200).body("<html>oops</html>");
            })
            .await;

        let err = service(&server)
            .get_edit_history("S1", "a@x.com")
            .await
            .unwrap_err();

        assert!(matches!(err, EditError::Internal(_)));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_internal() {
        // Port 9 (discard) is closed on test hosts
        let svc = RemoteEditService::new("http://127.0.0.1:9/edit", Duration::from_millis(500)).unwrap();
        let err = svc.get_edit_history("S1", "a@x.com").await.unwrap_err();
        assert!(matches!(err, EditError::Internal(_)));
    }
}
