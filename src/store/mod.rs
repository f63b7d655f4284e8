//! The authoritative entry store.
//!
//! Everything durable lives behind this trait: the per-user daily card, the
//! journal entries, and the card catalog. The Postgres backend is the real
//! one; tests run against the in-memory backend.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::card::{DailyCard, MoodCard};
use crate::models::entry::MoodEntry;

pub mod postgres;

#[cfg(test)]
pub mod memory;

#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Card already recorded for `(user, day)`, if any.
    async fn get_daily_card(&self, user: Uuid, day: NaiveDate) -> AppResult<Option<DailyCard>>;

    /// Record the card for `(user, day)`. Concurrent first resolutions of
    /// the same day are last-write-wins; see `DailyCardResolver`.
    async fn put_daily_card(&self, user: Uuid, day: NaiveDate, card: &DailyCard) -> AppResult<()>;

    /// Full card catalog, unfiltered.
    async fn get_card_catalog(&self) -> AppResult<Vec<MoodCard>>;

    /// All entries for `user`, ordered by `created_at` descending.
    async fn list_entries(&self, user: Uuid) -> AppResult<Vec<MoodEntry>>;

    async fn get_entry(&self, user: Uuid, id: Uuid) -> AppResult<Option<MoodEntry>>;

    /// Write an entry at its own identity. Upsert: re-inserting an id that
    /// already exists overwrites it, which is what lets an undo restore a
    /// snapshot without caring whether the delete committed in between.
    async fn insert_entry(&self, user: Uuid, entry: &MoodEntry) -> AppResult<()>;

    /// Overwrite the journal text and stamp `edited_at`; every other field
    /// is left untouched. `NotFound` if the row vanished.
    async fn update_journal(
        &self,
        user: Uuid,
        id: Uuid,
        journal: &str,
        edited_at: DateTime<Utc>,
    ) -> AppResult<MoodEntry>;

    async fn delete_entry(&self, user: Uuid, id: Uuid) -> AppResult<()>;
}
