//! Subscription edit and payment handlers
//!
//! Each handler extracts the caller placed by the auth middleware, checks the
//! body shape, delegates to the edit service and maps the outcome. Body
//! rejections never reach the service.

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde_json::Value;
use tracing::{info, warn};
use validator::Validate;

use super::super::state::AppState;
use super::super::types::{
    ApiError, ApiResult, ErrorEnvelope, FailureBody, PaymentInitiationRequest,
    ProcessPaymentRequest,
};
use crate::edit::{
    EditError, EditHistoryEntry, EditRequest, EditResponse, PaymentInitiationResponse,
};
use crate::user_auth::CallerIdentity;

fn invalid_body(rejection: JsonRejection) -> EditError {
    EditError::InvalidInput(rejection.body_text())
}

/// Log a failed operation and convert it for the route's body policy.
fn fail(
    state: &AppState,
    op: &str,
    caller: &CallerIdentity,
    err: EditError,
    body: FailureBody,
) -> ApiError {
    warn!(caller = %caller.email, error = %err, "[EDIT] {} failed", op);
    ApiError::from_edit(err, state.error_format, body)
}

/// Calculate the price difference of a requested edit
#[utoipa::path(
    post,
    path = "/api/subscriptions/edit/calculate",
    request_body = EditRequest,
    responses(
        (status = 200, description = "Price calculation", body = EditResponse),
        (status = 400, description = "Edit rejected (legacy: text/plain message)"),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Caller lacks role USER", body = ErrorEnvelope)
    ),
    security(("bearer_auth" = [])),
    tag = "Subscription Edit"
)]
pub async fn calculate_edit_price(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CallerIdentity>,
    body: Result<Json<EditRequest>, JsonRejection>,
) -> ApiResult<Json<EditResponse>> {
    const OP: &str = "calculate";
    let Json(request) = body
        .map_err(|r| fail(&state, OP, &caller, invalid_body(r), FailureBody::Message))?;

    info!(
        caller = %caller.email,
        subscription_id = %request.subscription_key(),
        "[EDIT] calculate edit price"
    );

    state
        .edit_service
        .calculate_edit_price(request, &caller.email)
        .await
        .map(Json)
        .map_err(|e| fail(&state, OP, &caller, e, FailureBody::Message))
}

/// Apply a subscription edit
///
/// Depending on the price difference the edit completes immediately, waits
/// for an additional payment or schedules a refund.
#[utoipa::path(
    post,
    path = "/api/subscriptions/edit/apply",
    request_body = EditRequest,
    responses(
        (status = 200, description = "Edit applied or pending payment", body = EditResponse),
        (status = 400, description = "Edit rejected (legacy: text/plain message)"),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Caller lacks role USER", body = ErrorEnvelope)
    ),
    security(("bearer_auth" = [])),
    tag = "Subscription Edit"
)]
pub async fn apply_subscription_edit(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CallerIdentity>,
    body: Result<Json<EditRequest>, JsonRejection>,
) -> ApiResult<Json<EditResponse>> {
    const OP: &str = "apply";
    let Json(request) = body
        .map_err(|r| fail(&state, OP, &caller, invalid_body(r), FailureBody::Message))?;

    info!(
        caller = %caller.email,
        subscription_id = %request.subscription_key(),
        "[EDIT] apply subscription edit"
    );

    state
        .edit_service
        .apply_subscription_edit(request, &caller.email)
        .await
        .map(|resp| {
            info!(
                caller = %caller.email,
                modification_id = ?resp.modification_id(),
                edit_status = ?resp.edit_status(),
                "[EDIT] edit applied"
            );
            Json(resp)
        })
        .map_err(|e| fail(&state, OP, &caller, e, FailureBody::Message))
}

/// Start the payment of a pending modification
#[utoipa::path(
    post,
    path = "/api/subscriptions/edit/payment/initiate",
    request_body = PaymentInitiationRequest,
    responses(
        (status = 200, description = "Payment gateway session", body = PaymentInitiationResponse),
        (status = 400, description = "Payment could not be started (legacy: empty body)"),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Caller lacks role USER", body = ErrorEnvelope)
    ),
    security(("bearer_auth" = [])),
    tag = "Subscription Edit"
)]
pub async fn initiate_payment(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CallerIdentity>,
    body: Result<Json<PaymentInitiationRequest>, JsonRejection>,
) -> ApiResult<Json<PaymentInitiationResponse>> {
    const OP: &str = "payment initiation";
    let Json(req) =
        body.map_err(|r| fail(&state, OP, &caller, invalid_body(r), FailureBody::Empty))?;
    req.validate().map_err(|e| {
        fail(
            &state,
            OP,
            &caller,
            EditError::InvalidInput(e.to_string()),
            FailureBody::Empty,
        )
    })?;

    info!(
        caller = %caller.email,
        modification_id = %req.modification_id,
        payment_method = %req.payment_method,
        "[EDIT] initiate payment"
    );

    state
        .edit_service
        .initiate_payment_by_modification_id(
            &req.modification_id,
            &req.payment_method,
            &caller.email,
        )
        .await
        .map(Json)
        .map_err(|e| fail(&state, OP, &caller, e, FailureBody::Empty))
}

/// Pay for an edit of a subscription
///
/// `amount` may be a JSON number or a numeric string.
#[utoipa::path(
    post,
    path = "/api/subscriptions/edit/{subscription_id}/payment",
    params(("subscription_id" = String, Path, description = "Subscription id")),
    request_body = ProcessPaymentRequest,
    responses(
        (status = 200, description = "Payment gateway session", body = PaymentInitiationResponse),
        (status = 400, description = "Invalid body or payment failed (legacy: empty body)"),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Caller lacks role USER", body = ErrorEnvelope)
    ),
    security(("bearer_auth" = [])),
    tag = "Subscription Edit"
)]
pub async fn process_edit_payment(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CallerIdentity>,
    Path(subscription_id): Path<String>,
    body: Result<Json<ProcessPaymentRequest>, JsonRejection>,
) -> ApiResult<Json<PaymentInitiationResponse>> {
    const OP: &str = "edit payment";
    let Json(req) =
        body.map_err(|r| fail(&state, OP, &caller, invalid_body(r), FailureBody::Empty))?;
    let amount = req.amount.inner();

    info!(
        caller = %caller.email,
        subscription_id = %subscription_id,
        payment_method = %req.payment_method,
        %amount,
        "[EDIT] process edit payment"
    );

    state
        .edit_service
        .process_edit_payment(&subscription_id, &caller.email, &req.payment_method, amount)
        .await
        .map(Json)
        .map_err(|e| fail(&state, OP, &caller, e, FailureBody::Empty))
}

/// Edit history of a subscription
#[utoipa::path(
    get,
    path = "/api/subscriptions/edit/{subscription_id}/history",
    params(("subscription_id" = String, Path, description = "Subscription id")),
    responses(
        (status = 200, description = "Edit history, newest first", body = [EditHistoryEntry]),
        (status = 400, description = "History unavailable (legacy: text/plain message)"),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Caller lacks role USER or VENDOR", body = ErrorEnvelope)
    ),
    security(("bearer_auth" = [])),
    tag = "Subscription Edit"
)]
pub async fn get_edit_history(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CallerIdentity>,
    Path(subscription_id): Path<String>,
) -> ApiResult<Json<Value>> {
    info!(
        caller = %caller.email,
        subscription_id = %subscription_id,
        "[EDIT] get edit history"
    );

    state
        .edit_service
        .get_edit_history(&subscription_id, &caller.email)
        .await
        .map(Json)
        .map_err(|e| fail(&state, "history", &caller, e, FailureBody::Message))
}
