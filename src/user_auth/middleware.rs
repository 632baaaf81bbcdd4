use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::identity::{CallerIdentity, Role};
use crate::gateway::{
    state::AppState,
    types::{ApiResponse, error_codes},
};

/// Rejection returned by the auth layers before a handler runs.
pub type AuthRejection = (StatusCode, Json<ApiResponse<()>>);

fn reject(status: StatusCode, code: i32, msg: &str) -> AuthRejection {
    (status, Json(ApiResponse::<()>::error(code, msg)))
}

pub async fn jwt_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthRejection> {
    // 1. Extract Authorization header
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            reject(
                StatusCode::UNAUTHORIZED,
                error_codes::MISSING_AUTH,
                "Missing Authorization header",
            )
        })?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            reject(
                StatusCode::UNAUTHORIZED,
                error_codes::AUTH_FAILED,
                "Invalid token format",
            )
        })?;

    // 2. Verify token
    match state.auth.verify_token(token) {
        Ok(claims) => {
            // 3. Inject caller identity
            let identity = claims.into_identity();
            tracing::debug!(caller = %identity.email, roles = ?identity.roles, "authenticated");
            request.extensions_mut().insert(identity);
            Ok(next.run(request).await)
        }
        Err(e) => {
            tracing::debug!("token rejected: {}", e);
            Err(reject(
                StatusCode::UNAUTHORIZED,
                error_codes::AUTH_FAILED,
                "Invalid or expired token",
            ))
        }
    }
}

/// Role guard, installed per route group:
///
/// ```ignore
/// router.route_layer(from_fn_with_state(&[Role::User][..], require_roles))
/// ```
///
/// Must sit inside [`jwt_auth_middleware`].
pub async fn require_roles(
    State(allowed): State<&'static [Role]>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AuthRejection> {
    let identity = request
        .extensions()
        .get::<CallerIdentity>()
        .ok_or_else(|| {
            reject(
                StatusCode::UNAUTHORIZED,
                error_codes::MISSING_AUTH,
                "Not authenticated",
            )
        })?;

    if !identity.has_any_role(allowed) {
        tracing::warn!(
            caller = %identity.email,
            roles = ?identity.roles,
            required = ?allowed,
            "role check failed"
        );
        return Err(reject(
            StatusCode::FORBIDDEN,
            error_codes::FORBIDDEN,
            "Access denied",
        ));
    }

    Ok(next.run(request).await)
}
