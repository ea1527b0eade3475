// handlers/protected/dashboard.rs - GET /api/dashboard handler

use axum::{extract::State, Extension};
use serde_json::{json, Value};

use crate::cache::{PageCache, DASHBOARD_ROUTE};
use crate::config;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /api/dashboard - The cached dashboard view
///
/// Serves the caller's rendered dashboard from the page cache when a fresh
/// entry exists; otherwise refetches from the store, caches the result, and
/// returns it. Mutations elsewhere invalidate the whole route, so the next
/// request after a create or delete always rebuilds.
pub async fn dashboard_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Value> {
    let cache_enabled = config::config().cache.enable_page_cache;
    let key = PageCache::view_key(DASHBOARD_ROUTE, auth.user_id);

    if cache_enabled {
        if let Some(view) = state.page_cache.get(&key).await {
            return Ok(ApiResponse::success(json!({
                "view": view.body,
                "cached": true,
                "rendered_at": view.rendered_at,
            })));
        }
    }

    let notes = state.note_service.get_notes(&auth).await?;
    let body = json!({
        "user": { "id": auth.user_id, "name": auth.name },
        "notes": notes,
    });

    if cache_enabled {
        state.page_cache.put(key, body.clone()).await;
    }

    Ok(ApiResponse::success(json!({
        "view": body,
        "cached": false,
        "rendered_at": chrono::Utc::now(),
    })))
}
