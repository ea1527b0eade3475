use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

pub const DASHBOARD_ROUTE: &str = "/dashboard";

/// A rendered view held in the page cache.
#[derive(Debug, Clone)]
pub struct CachedView {
    pub body: Value,
    pub rendered_at: DateTime<Utc>,
}

/// In-process page-view cache.
///
/// Entries are keyed "<route>:<user_id>" but invalidation is route-wide:
/// a mutation by any user drops every cached rendering of that route,
/// matching the original dashboard revalidation behavior. Reads never
/// invalidate.
#[derive(Clone, Default)]
pub struct PageCache {
    views: Arc<RwLock<HashMap<String, CachedView>>>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache key for one user's rendering of a route.
    pub fn view_key(route: &str, user_id: uuid::Uuid) -> String {
        format!("{}:{}", route, user_id)
    }

    pub async fn get(&self, key: &str) -> Option<CachedView> {
        self.views.read().await.get(key).cloned()
    }

    pub async fn put(&self, key: String, body: Value) {
        let view = CachedView {
            body,
            rendered_at: Utc::now(),
        };
        self.views.write().await.insert(key, view);
    }

    /// Drop every cached view of the given route, for all users.
    pub async fn invalidate(&self, route: &str) {
        let prefix = format!("{}:", route);
        let mut views = self.views.write().await;
        let before = views.len();
        views.retain(|key, _| key.as_str() != route && !key.starts_with(&prefix));
        debug!("Invalidated {} cached view(s) for {}", before - views.len(), route);
    }
}
