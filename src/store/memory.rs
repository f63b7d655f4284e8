//! In-memory store backend used by the core tests.
//!
//! Mimics the remote store closely enough to exercise the resolver and
//! vault flows: it can be flipped "offline" to simulate an unreachable
//! backend, and it counts writes and deletes so tests can assert how often
//! the remote side was actually touched.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::card::{DailyCard, MoodCard};
use crate::models::entry::MoodEntry;
use crate::store::EntryStore;

#[derive(Default)]
pub struct MemoryStore {
    pub catalog: Mutex<Vec<MoodCard>>,
    pub daily_cards: Mutex<HashMap<(Uuid, NaiveDate), DailyCard>>,
    pub entries: Mutex<HashMap<Uuid, (Uuid, MoodEntry)>>,
    pub offline: AtomicBool,
    pub put_card_calls: AtomicU64,
    pub delete_calls: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn delete_calls(&self) -> u64 {
        self.delete_calls.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> AppResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::Store("connection refused".into()));
        }
        Ok(())
    }

    pub async fn seed_catalog(&self, cards: Vec<MoodCard>) {
        *self.catalog.lock().await = cards;
    }
}

#[async_trait]
impl EntryStore for MemoryStore {
    async fn get_daily_card(&self, user: Uuid, day: NaiveDate) -> AppResult<Option<DailyCard>> {
        self.check_online()?;
        Ok(self.daily_cards.lock().await.get(&(user, day)).cloned())
    }

    async fn put_daily_card(&self, user: Uuid, day: NaiveDate, card: &DailyCard) -> AppResult<()> {
        self.check_online()?;
        self.put_card_calls.fetch_add(1, Ordering::SeqCst);
        self.daily_cards
            .lock()
            .await
            .insert((user, day), card.clone());
        Ok(())
    }

    async fn get_card_catalog(&self) -> AppResult<Vec<MoodCard>> {
        self.check_online()?;
        Ok(self.catalog.lock().await.clone())
    }

    async fn list_entries(&self, user: Uuid) -> AppResult<Vec<MoodEntry>> {
        self.check_online()?;
        let mut list: Vec<MoodEntry> = self
            .entries
            .lock()
            .await
            .values()
            .filter(|(owner, _)| *owner == user)
            .map(|(_, e)| e.clone())
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    async fn get_entry(&self, user: Uuid, id: Uuid) -> AppResult<Option<MoodEntry>> {
        self.check_online()?;
        Ok(self
            .entries
            .lock()
            .await
            .get(&id)
            .filter(|(owner, _)| *owner == user)
            .map(|(_, e)| e.clone()))
    }

    async fn insert_entry(&self, user: Uuid, entry: &MoodEntry) -> AppResult<()> {
        self.check_online()?;
        self.entries
            .lock()
            .await
            .insert(entry.id, (user, entry.clone()));
        Ok(())
    }

    async fn update_journal(
        &self,
        user: Uuid,
        id: Uuid,
        journal: &str,
        edited_at: DateTime<Utc>,
    ) -> AppResult<MoodEntry> {
        self.check_online()?;
        let mut entries = self.entries.lock().await;
        match entries.get_mut(&id).filter(|(owner, _)| *owner == user) {
            Some((_, entry)) => {
                entry.journal = journal.to_string();
                entry.edited_at = Some(edited_at);
                Ok(entry.clone())
            }
            None => Err(AppError::NotFound("Entry not found".into())),
        }
    }

    async fn delete_entry(&self, user: Uuid, id: Uuid) -> AppResult<()> {
        self.check_online()?;
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        let mut entries = self.entries.lock().await;
        if entries
            .get(&id)
            .map(|(owner, _)| *owner == user)
            .unwrap_or(false)
        {
            entries.remove(&id);
        }
        Ok(())
    }
}
