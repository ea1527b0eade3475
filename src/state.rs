use sqlx::PgPool;
use std::sync::Arc;

use crate::cache::PageCache;
use crate::database::store::{PgStore, UserStore};
use crate::services::NoteService;

/// Process-wide dependencies, built once in main and injected into every
/// handler. The pool's lifecycle belongs to the entry point; operations
/// only borrow it through the stores.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub note_service: NoteService,
    pub user_store: Arc<dyn UserStore>,
    pub page_cache: PageCache,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool.clone()));
        let page_cache = PageCache::new();
        let note_service = NoteService::new(store.clone(), page_cache.clone());

        Self {
            pool,
            note_service,
            user_store: store,
            page_cache,
        }
    }
}
