use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::cache::{PageCache, DASHBOARD_ROUTE};
use crate::database::models::Note;
use crate::database::store::{NoteStore, StoreError};
use crate::middleware::AuthUser;

#[derive(Debug, Error)]
pub enum NoteError {
    /// Raised both when the note belongs to someone else and when the id
    /// does not exist at all. The conflation is observable behavior carried
    /// over from the original service: callers cannot probe which ids exist.
    #[error("Forbidden")]
    Forbidden,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The note CRUD core. Holds the injected store gateway and the page cache;
/// the caller identity arrives per-call from the session middleware.
#[derive(Clone)]
pub struct NoteService {
    store: Arc<dyn NoteStore>,
    page_cache: PageCache,
}

impl NoteService {
    pub fn new(store: Arc<dyn NoteStore>, page_cache: PageCache) -> Self {
        Self { store, page_cache }
    }

    /// Insert a note owned by the caller and return it with its generated
    /// id and timestamp. Title and content emptiness is the client's
    /// concern; nothing is validated here.
    pub async fn create_note(
        &self,
        auth: &AuthUser,
        title: &str,
        content: &str,
    ) -> Result<Note, NoteError> {
        let note = self.store.insert(auth.user_id, title, content).await?;

        tracing::info!(user_id = %auth.user_id, note_id = %note.id, "Note created");
        self.page_cache.invalidate(DASHBOARD_ROUTE).await;

        Ok(note)
    }

    /// All of the caller's notes, newest first. Unbounded by design.
    pub async fn get_notes(&self, auth: &AuthUser) -> Result<Vec<Note>, NoteError> {
        let notes = self.store.list_by_author(auth.user_id).await?;
        Ok(notes)
    }

    /// Delete one of the caller's notes.
    ///
    /// Fetch and delete are two separate store calls with no transaction
    /// around them; a concurrent delete in between makes the second call a
    /// no-op. Accepted risk, matching the original.
    pub async fn delete_note(&self, auth: &AuthUser, id: Uuid) -> Result<(), NoteError> {
        let note = self.store.find_by_id(id).await?;

        match note {
            Some(note) if note.author_id == auth.user_id => {}
            _ => return Err(NoteError::Forbidden),
        }

        self.store.delete(id).await?;

        tracing::info!(user_id = %auth.user_id, note_id = %id, "Note deleted");
        self.page_cache.invalidate(DASHBOARD_ROUTE).await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    /// In-memory store mirroring the Postgres gateway's contract, with a
    /// counter standing in for wall-clock ordering so back-to-back inserts
    /// still sort deterministically.
    #[derive(Default)]
    struct MemStore {
        notes: Mutex<HashMap<Uuid, (Note, u64)>>,
        seq: Mutex<u64>,
    }

    #[async_trait]
    impl NoteStore for MemStore {
        async fn insert(
            &self,
            author_id: Uuid,
            title: &str,
            content: &str,
        ) -> Result<Note, StoreError> {
            let note = Note {
                id: Uuid::new_v4(),
                title: title.to_string(),
                content: content.to_string(),
                author_id,
                created_at: Utc::now(),
            };
            let mut seq = self.seq.lock().await;
            *seq += 1;
            self.notes
                .lock()
                .await
                .insert(note.id, (note.clone(), *seq));
            Ok(note)
        }

        async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Note>, StoreError> {
            let notes = self.notes.lock().await;
            let mut owned: Vec<(Note, u64)> = notes
                .values()
                .filter(|(n, _)| n.author_id == author_id)
                .cloned()
                .collect();
            owned.sort_by(|a, b| b.1.cmp(&a.1));
            Ok(owned.into_iter().map(|(n, _)| n).collect())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Note>, StoreError> {
            Ok(self.notes.lock().await.get(&id).map(|(n, _)| n.clone()))
        }

        async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
            self.notes.lock().await.remove(&id);
            Ok(())
        }
    }

    fn session(name: &str) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
        }
    }

    fn service() -> (NoteService, PageCache) {
        let cache = PageCache::new();
        let service = NoteService::new(Arc::new(MemStore::default()), cache.clone());
        (service, cache)
    }

    #[tokio::test]
    async fn created_note_lists_first() {
        let (service, _) = service();
        let alice = session("Alice");

        service.create_note(&alice, "T1", "C1").await.unwrap();
        let created = service.create_note(&alice, "T2", "C2").await.unwrap();

        let notes = service.get_notes(&alice).await.unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].id, created.id, "newest note first");
    }

    #[tokio::test]
    async fn notes_are_scoped_to_their_owner() {
        let (service, _) = service();
        let alice = session("Alice");
        let bob = session("Bob");

        service.create_note(&alice, "T1", "C1").await.unwrap();

        assert!(service.get_notes(&bob).await.unwrap().is_empty());

        let alices = service.get_notes(&alice).await.unwrap();
        assert_eq!(alices.len(), 1);
        assert_eq!(alices[0].title, "T1");
        assert_eq!(alices[0].author_id, alice.user_id);
    }

    #[tokio::test]
    async fn non_owner_delete_is_forbidden_and_leaves_note() {
        let (service, _) = service();
        let alice = session("Alice");
        let bob = session("Bob");

        let note = service.create_note(&alice, "T1", "C1").await.unwrap();

        let err = service.delete_note(&bob, note.id).await.unwrap_err();
        assert!(matches!(err, NoteError::Forbidden));

        let remaining = service.get_notes(&alice).await.unwrap();
        assert_eq!(remaining.len(), 1, "note untouched after forbidden delete");
    }

    #[tokio::test]
    async fn double_delete_second_call_is_forbidden() {
        let (service, _) = service();
        let alice = session("Alice");

        let note = service.create_note(&alice, "T1", "C1").await.unwrap();

        service.delete_note(&alice, note.id).await.unwrap();
        let err = service.delete_note(&alice, note.id).await.unwrap_err();
        assert!(matches!(err, NoteError::Forbidden));
    }

    #[tokio::test]
    async fn missing_id_is_forbidden_not_a_distinct_not_found() {
        let (service, _) = service();
        let alice = session("Alice");

        let err = service.delete_note(&alice, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, NoteError::Forbidden));
    }

    #[tokio::test]
    async fn mutations_invalidate_the_dashboard_cache() {
        let (service, cache) = service();
        let alice = session("Alice");
        let key = PageCache::view_key(DASHBOARD_ROUTE, alice.user_id);

        cache.put(key.clone(), serde_json::json!({"stale": true})).await;
        let note = service.create_note(&alice, "T1", "C1").await.unwrap();
        assert!(cache.get(&key).await.is_none(), "create invalidates");

        cache.put(key.clone(), serde_json::json!({"stale": true})).await;
        service.delete_note(&alice, note.id).await.unwrap();
        assert!(cache.get(&key).await.is_none(), "delete invalidates");
    }

    #[tokio::test]
    async fn reads_do_not_invalidate() {
        let (service, cache) = service();
        let alice = session("Alice");
        let key = PageCache::view_key(DASHBOARD_ROUTE, alice.user_id);

        cache.put(key.clone(), serde_json::json!({"fresh": true})).await;
        service.get_notes(&alice).await.unwrap();
        assert!(cache.get(&key).await.is_some());
    }

    #[tokio::test]
    async fn empty_title_and_content_are_accepted_server_side() {
        // Emptiness checks live in the presentation layer only.
        let (service, _) = service();
        let alice = session("Alice");

        let note = service.create_note(&alice, "", "").await.unwrap();
        assert_eq!(note.title, "");
        assert_eq!(note.content, "");
    }
}
