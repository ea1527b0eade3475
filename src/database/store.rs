use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Note, User};

/// Errors surfaced by the store gateways. SQL detail stays here; the error
/// layer maps these to generic 5xx responses.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::ConnectionError(err.to_string())
            }
            other => StoreError::Sqlx(other),
        }
    }
}

/// Persistence boundary for notes. Each method is one atomic statement;
/// there is deliberately no combined fetch-and-delete primitive, so the
/// service's ownership check is two separate calls.
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn insert(&self, author_id: Uuid, title: &str, content: &str)
        -> Result<Note, StoreError>;

    /// All notes for one owner, newest first.
    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Note>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Note>, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

/// Identity records minted at session issuance.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert or refresh a user by email, keeping the id stable across
    /// logins.
    async fn upsert(&self, name: &str, email: &str, provider: &str) -> Result<User, StoreError>;
}

/// Postgres-backed store used in production.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteStore for PgStore {
    async fn insert(
        &self,
        author_id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<Note, StoreError> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (id, title, content, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, content, author_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(content)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(note)
    }

    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Note>, StoreError> {
        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, title, content, author_id, created_at
            FROM notes
            WHERE author_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notes)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Note>, StoreError> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, title, content, author_id, created_at
            FROM notes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(note)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        // A concurrent delete between the service's fetch and this call
        // makes this a no-op; that race is accepted behavior.
        sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn upsert(&self, name: &str, email: &str, provider: &str) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, provider)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email)
            DO UPDATE SET name = EXCLUDED.name, provider = EXCLUDED.provider
            RETURNING id, name, email, provider, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(provider)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }
}
