//! Request/response DTOs for the HTTP surface.
//!
//! Conventions follow the rest of the API:
//! - `*Request` → deserialized from client JSON body or query params
//! - `*Response` → serialized to client JSON
//! - Input validation via `validator` derive macros

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::card::DailyCard;
use crate::models::entry::{Mood, MoodEntry};

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

// ---------------------------------------------------------------------------
// Daily card
// ---------------------------------------------------------------------------

/// The date the client considers "today" (device-local). Defaults to the
/// server's current date when absent.
#[derive(Debug, Deserialize)]
pub struct TodayQuery {
    pub date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEntryRequest {
    pub mood: Option<Mood>,
    pub card: Option<DailyCard>,
    #[validate(length(max = 20000, message = "Journal text is too long"))]
    #[serde(default)]
    pub journal: String,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditEntryRequest {
    #[validate(length(max = 20000, message = "Journal text is too long"))]
    pub journal: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub id: Uuid,
    /// How long the client has to undo before the delete commits.
    pub undo_grace_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct UndoResponse {
    pub restored: bool,
    pub entry: Option<MoodEntry>,
}

#[derive(Debug, Serialize)]
pub struct CancelPendingResponse {
    pub cancelled: usize,
}

/// Half-open byte range into the matched text, original casing preserved.
#[derive(Debug, Serialize, PartialEq)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
}

impl From<std::ops::Range<usize>> for HighlightSpan {
    fn from(r: std::ops::Range<usize>) -> Self {
        Self {
            start: r.start,
            end: r.end,
        }
    }
}

/// One search hit: the entry plus highlight ranges per matched field.
#[derive(Debug, Serialize)]
pub struct EntryMatch {
    #[serde(flatten)]
    pub entry: MoodEntry,
    pub mood_spans: Vec<HighlightSpan>,
    pub card_spans: Vec<HighlightSpan>,
    pub journal_spans: Vec<HighlightSpan>,
}
