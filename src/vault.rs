//! Journal vault: the ordered entry list and its safe mutations.
//!
//! Deletion is two-phase and optimistic. Phase one drops the entry from the
//! visible list immediately and parks a snapshot in a single-slot-per-id
//! pending map. Phase two is a grace timer (default 3 s): if it fires with
//! no intervening undo it commits the delete to the store and clears the
//! slot. Until then the deletion is fully reversible; once committed it is
//! not reversible through this flow.
//!
//! The commit task removes the pending slot *before* touching the store, and
//! an undo claims the slot before disarming the timer. Whoever takes the
//! slot owns the outcome, so a late undo can never resurrect a committed
//! deletion.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::card::DailyCard;
use crate::models::entry::{Mood, MoodEntry};
use crate::store::EntryStore;

/// Fields supplied by the client when saving a journal entry.
pub struct EntryDraft {
    pub mood: Option<Mood>,
    pub card: Option<DailyCard>,
    pub journal: String,
    pub date: NaiveDate,
}

struct PendingDeletion {
    user: Uuid,
    snapshot: MoodEntry,
    timer: JoinHandle<()>,
}

pub struct JournalVault {
    store: Arc<dyn EntryStore>,
    grace: Duration,
    pending: Arc<Mutex<HashMap<Uuid, PendingDeletion>>>,
}

impl JournalVault {
    pub fn new(store: Arc<dyn EntryStore>, grace: Duration) -> Self {
        Self {
            store,
            grace,
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn grace_period(&self) -> Duration {
        self.grace
    }

    /// Entries for `user`, most recent first, minus any with an in-flight
    /// pending deletion, since a refetch during the grace window must not show
    /// an optimistically deleted entry.
    pub async fn list_entries(&self, user: Uuid) -> AppResult<Vec<MoodEntry>> {
        let entries = self.store.list_entries(user).await?;
        let pending = self.pending.lock().await;
        Ok(entries
            .into_iter()
            .filter(|e| !pending.contains_key(&e.id))
            .collect())
    }

    /// Persist a new entry; id and `created_at` are assigned here.
    pub async fn create_entry(&self, user: Uuid, draft: EntryDraft) -> AppResult<MoodEntry> {
        let entry = MoodEntry {
            id: Uuid::new_v4(),
            mood: draft.mood,
            card: draft.card,
            journal: draft.journal,
            date: draft.date,
            created_at: Utc::now(),
            edited_at: None,
        };
        self.store.insert_entry(user, &entry).await?;
        Ok(entry)
    }

    /// Phase one of the optimistic delete. Snapshots the entry, arms the
    /// grace timer, and replaces (disarming) any prior pending deletion for
    /// the same id, so at most one timer is ever live per entry.
    pub async fn delete_entry(&self, user: Uuid, id: Uuid) -> AppResult<()> {
        let snapshot = match self.store.get_entry(user, id).await? {
            Some(entry) => entry,
            None => {
                // Already pending: keep its snapshot and just re-arm below.
                let pending = self.pending.lock().await;
                match pending.get(&id) {
                    Some(p) if p.user == user => p.snapshot.clone(),
                    _ => return Err(AppError::NotFound("Entry not found".into())),
                }
            }
        };

        let timer = tokio::spawn({
            let store = Arc::clone(&self.store);
            let pending = Arc::clone(&self.pending);
            let grace = self.grace;
            async move {
                tokio::time::sleep(grace).await;
                // Claim the slot first; an undo that got here before us
                // already emptied it and the commit must not run.
                let claimed = pending.lock().await.remove(&id);
                if let Some(p) = claimed {
                    if let Err(err) = store.delete_entry(p.user, id).await {
                        tracing::warn!(
                            entry_id = %id,
                            error = %err,
                            "Deferred delete commit failed; entry remains in store"
                        );
                    } else {
                        tracing::debug!(entry_id = %id, "Deletion committed");
                    }
                }
            }
        });

        let mut pending = self.pending.lock().await;
        if let Some(prev) = pending.insert(id, PendingDeletion { user, snapshot, timer }) {
            prev.timer.abort();
        }
        Ok(())
    }

    /// Reverse an in-flight deletion. Returns the restored entry, or `None`
    /// if nothing was pending for `id` (timer already fired, or no prior
    /// delete). A strict no-op that never resurrects a committed delete.
    pub async fn undo_delete(&self, user: Uuid, id: Uuid) -> AppResult<Option<MoodEntry>> {
        let claimed = {
            let mut pending = self.pending.lock().await;
            if pending.get(&id).map_or(false, |p| p.user == user) {
                pending.remove(&id)
            } else {
                None
            }
        };

        let Some(p) = claimed else {
            return Ok(None);
        };
        p.timer.abort();

        // The commit never ran, so this is normally a no-op upsert; it also
        // re-establishes the exact snapshot if anything raced us.
        self.store.insert_entry(p.user, &p.snapshot).await?;
        Ok(Some(p.snapshot))
    }

    /// Overwrite the journal text and stamp `edited_at`. `mood`, `card`,
    /// `created_at` and `id` are untouched.
    pub async fn edit_entry(&self, user: Uuid, id: Uuid, journal: &str) -> AppResult<MoodEntry> {
        let edited_at: DateTime<Utc> = Utc::now();
        self.store.update_journal(user, id, journal, edited_at).await
    }

    /// Disarm every pending deletion for `user` without committing any of
    /// them. Called when the user leaves the vault view, so a deletion
    /// cannot commit after the view it belonged to is gone.
    pub async fn cancel_pending(&self, user: Uuid) -> AppResult<usize> {
        let mut pending = self.pending.lock().await;
        let ids: Vec<Uuid> = pending
            .iter()
            .filter(|(_, p)| p.user == user)
            .map(|(id, _)| *id)
            .collect();
        for id in &ids {
            if let Some(p) = pending.remove(id) {
                p.timer.abort();
            }
        }
        Ok(ids.len())
    }
}
