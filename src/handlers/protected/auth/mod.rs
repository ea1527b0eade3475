// handlers/protected/auth - session introspection and teardown

use serde_json::{json, Value};

use axum::Extension;

use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /api/auth/whoami - Current session identity
pub async fn session_whoami(Extension(auth): Extension<AuthUser>) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "id": auth.user_id,
        "name": auth.name,
        "email": auth.email,
    })))
}

/// DELETE /api/auth/session - Sign out
///
/// Tokens are stateless, so there is nothing to revoke server-side; the
/// client discards its token. This endpoint exists so sign-out is an
/// explicit, loggable action.
pub async fn session_logout(Extension(auth): Extension<AuthUser>) -> ApiResult<Value> {
    tracing::info!(user_id = %auth.user_id, "Session ended");
    Ok(ApiResponse::success(json!({ "signed_out": true })))
}
