use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::dto::{
    CancelPendingResponse, CreateEntryRequest, DeleteResponse, EditEntryRequest, EntryMatch,
    HighlightSpan, SearchQuery, UndoResponse,
};
use crate::error::{AppError, AppResult};
use crate::models::entry::MoodEntry;
use crate::search;
use crate::vault::EntryDraft;
use crate::AppState;

pub async fn list_entries(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Vec<MoodEntry>>> {
    let entries = state.vault.list_entries(auth_user.id).await?;
    Ok(Json(entries))
}

/// Fetch-then-filter: the match itself is the same pure, client-side-style
/// substring filter the mobile app runs, exposed here with highlight ranges
/// so the UI can mark up hits without recomputing them.
pub async fn search_entries(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<EntryMatch>>> {
    let entries = state.vault.list_entries(auth_user.id).await?;

    let matches = search::filter_entries(&entries, &query.q)
        .into_iter()
        .cloned()
        .map(|entry| {
            let spans_of = |text: &str| -> Vec<HighlightSpan> {
                search::highlight_spans(text, &query.q)
                    .into_iter()
                    .map(HighlightSpan::from)
                    .collect()
            };
            let mood_spans = entry.mood.as_ref().map(|m| spans_of(m.label())).unwrap_or_default();
            let card_spans = entry.card.as_ref().map(|c| spans_of(&c.name)).unwrap_or_default();
            let journal_spans = spans_of(&entry.journal);
            EntryMatch {
                entry,
                mood_spans,
                card_spans,
                journal_spans,
            }
        })
        .collect();

    Ok(Json(matches))
}

pub async fn create_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateEntryRequest>,
) -> AppResult<Json<MoodEntry>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let draft = EntryDraft {
        mood: body.mood,
        card: body.card,
        journal: body.journal,
        date: body.date.unwrap_or_else(|| Utc::now().date_naive()),
    };
    let entry = state.vault.create_entry(auth_user.id, draft).await?;
    Ok(Json(entry))
}

pub async fn edit_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(entry_id): Path<Uuid>,
    Json(body): Json<EditEntryRequest>,
) -> AppResult<Json<MoodEntry>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let entry = state
        .vault
        .edit_entry(auth_user.id, entry_id, &body.journal)
        .await?;
    Ok(Json(entry))
}

/// Optimistic delete: the entry disappears from subsequent fetches
/// immediately; the remote commit happens after the grace period unless
/// undone first.
pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(entry_id): Path<Uuid>,
) -> AppResult<Json<DeleteResponse>> {
    state.vault.delete_entry(auth_user.id, entry_id).await?;
    Ok(Json(DeleteResponse {
        deleted: true,
        id: entry_id,
        undo_grace_ms: state.vault.grace_period().as_millis() as u64,
    }))
}

pub async fn undo_delete(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(entry_id): Path<Uuid>,
) -> AppResult<Json<UndoResponse>> {
    let entry = state.vault.undo_delete(auth_user.id, entry_id).await?;
    Ok(Json(UndoResponse {
        restored: entry.is_some(),
        entry,
    }))
}

/// Disarm all pending deletions for the user without committing them.
/// Called when the vault view is abandoned.
pub async fn cancel_pending(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<CancelPendingResponse>> {
    let cancelled = state.vault.cancel_pending(auth_user.id).await?;
    Ok(Json(CancelPendingResponse { cancelled }))
}
