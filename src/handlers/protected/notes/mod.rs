// handlers/protected/notes - the note CRUD surface
//
// Every handler here sits behind the session middleware; the AuthUser
// extension is the caller's verified identity. No shared authorization
// chain beyond that - each operation delegates to the service, which
// re-checks ownership where it matters.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Note;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
}

/// GET /api/notes - List the caller's notes, newest first
pub async fn notes_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Vec<Note>> {
    let notes = state.note_service.get_notes(&auth).await?;
    Ok(ApiResponse::success(notes))
}

/// POST /api/notes - Create a note owned by the caller
///
/// Title and content are stored as sent; emptiness checks are the client's
/// responsibility.
pub async fn notes_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateNoteRequest>,
) -> ApiResult<Note> {
    let note = state
        .note_service
        .create_note(&auth, &payload.title, &payload.content)
        .await?;
    Ok(ApiResponse::created(note))
}

/// DELETE /api/notes/:id - Delete one of the caller's notes
///
/// A note owned by someone else and an id that does not exist both come
/// back 403; the API does not reveal which ids exist.
pub async fn note_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    state.note_service.delete_note(&auth, id).await?;
    Ok(ApiResponse::<()>::no_content())
}
