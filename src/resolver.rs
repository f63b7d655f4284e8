//! Daily card resolution.
//!
//! Exactly one card per user per calendar day. The store is the source of
//! truth; the local cache is a write-through mirror that doubles as a
//! stale-but-available fallback when the store is unreachable.
//!
//! Steps 1-4 of `resolve_todays_card` are not transactional: two concurrent
//! first resolutions of a new day can both miss and both write, and the
//! store's last write wins. Accepted weak consistency; the read-after-write
//! idempotence contract still holds once a card is recorded.

use std::sync::Arc;

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::assets;
use crate::cache::LocalCache;
use crate::error::{AppError, AppResult};
use crate::models::card::DailyCard;
use crate::store::EntryStore;

pub struct DailyCardResolver {
    store: Arc<dyn EntryStore>,
    cache: Arc<dyn LocalCache>,
}

fn cache_key(user: Uuid, day: NaiveDate) -> String {
    format!("daily_card:{}:{}", user, day.format("%Y-%m-%d"))
}

impl DailyCardResolver {
    pub fn new(store: Arc<dyn EntryStore>, cache: Arc<dyn LocalCache>) -> Self {
        Self { store, cache }
    }

    /// Resolve the card for `(user, today)`, creating and persisting one on
    /// first access. Repeated calls for the same day return the identical
    /// card. No automatic retries; the caller decides whether to retry.
    pub async fn resolve_todays_card(&self, user: Uuid, today: NaiveDate) -> AppResult<DailyCard> {
        let key = cache_key(user, today);

        match self.store.get_daily_card(user, today).await {
            Ok(Some(card)) => {
                self.mirror(&key, &card).await;
                return Ok(card);
            }
            Ok(None) => {}
            Err(err) => return self.fallback_to_cache(&key, err).await,
        }

        // First resolution of this day: pick among catalog cards that have
        // a bundled image, persist, mirror.
        let catalog = self.store.get_card_catalog().await?;
        let valid: Vec<_> = catalog
            .into_iter()
            .filter(|card| assets::has_image(&card.name))
            .collect();

        if valid.is_empty() {
            return Err(AppError::EmptyCatalog);
        }

        let chosen = valid
            .choose(&mut rand::thread_rng())
            .cloned()
            .expect("non-empty after filter");
        let card = DailyCard::from(chosen);

        self.store.put_daily_card(user, today, &card).await?;
        self.mirror(&key, &card).await;

        tracing::info!(user = %user, day = %today, card = %card.name, "Recorded daily card");
        Ok(card)
    }

    async fn mirror(&self, key: &str, card: &DailyCard) {
        match serde_json::to_string(card) {
            Ok(json) => self.cache.set(key, json).await,
            Err(err) => tracing::warn!(error = %err, "Failed to serialize daily card for cache"),
        }
    }

    /// Store unreachable: serve the cached mirror if we have one, otherwise
    /// surface a resolution failure. The original error is logged, never
    /// silently dropped.
    async fn fallback_to_cache(&self, key: &str, err: AppError) -> AppResult<DailyCard> {
        if let Some(json) = self.cache.get(key).await {
            if let Ok(card) = serde_json::from_str::<DailyCard>(&json) {
                tracing::warn!(error = %err, "Store unreachable; serving cached daily card");
                return Ok(card);
            }
        }
        tracing::error!(error = %err, "Store unreachable and no cached daily card");
        Err(AppError::ResolutionFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::models::card::MoodCard;
    use crate::store::memory::MemoryStore;

    fn card(name: &str) -> MoodCard {
        MoodCard {
            name: name.into(),
            meaning: format!("Meaning of {name}."),
            description: format!("A longer reading for {name}."),
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    async fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .seed_catalog(vec![
                card("The Fool"),
                card("The Tower"),
                card("The Star"),
                // No bundled image for these two; excluded from selection.
                card("The Unknown Arcana"),
                card("Forgotten Card"),
            ])
            .await;
        store
    }

    fn resolver(store: Arc<MemoryStore>, cache: Arc<MemoryCache>) -> DailyCardResolver {
        DailyCardResolver::new(store, cache)
    }

    #[tokio::test]
    async fn repeated_resolution_is_idempotent() {
        let store = seeded_store().await;
        let cache = Arc::new(MemoryCache::new());
        let r = resolver(store.clone(), cache.clone());
        let user = Uuid::new_v4();

        let first = r.resolve_todays_card(user, day()).await.unwrap();
        for _ in 0..10 {
            let again = r.resolve_todays_card(user, day()).await.unwrap();
            assert_eq!(again, first);
        }
        // Only the first resolution wrote to the store.
        assert_eq!(store.put_card_calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn resolution_survives_process_restart() {
        let store = seeded_store().await;
        let user = Uuid::new_v4();

        let first = resolver(store.clone(), Arc::new(MemoryCache::new()))
            .resolve_todays_card(user, day())
            .await
            .unwrap();

        // Fresh resolver and empty cache, same durable store.
        let after_restart = resolver(store.clone(), Arc::new(MemoryCache::new()))
            .resolve_todays_card(user, day())
            .await
            .unwrap();
        assert_eq!(after_restart, first);
    }

    #[tokio::test]
    async fn selection_only_uses_cards_with_images() {
        let store = seeded_store().await;
        let r = resolver(store.clone(), Arc::new(MemoryCache::new()));

        // Many users, many draws; none may land on an imageless card.
        for _ in 0..50 {
            let chosen = r
                .resolve_todays_card(Uuid::new_v4(), day())
                .await
                .unwrap();
            assert!(
                ["The Fool", "The Tower", "The Star"].contains(&chosen.name.as_str()),
                "chose invalid card {}",
                chosen.name
            );
        }
    }

    #[tokio::test]
    async fn empty_valid_catalog_is_an_error() {
        let store = Arc::new(MemoryStore::new());
        store
            .seed_catalog(vec![card("The Unknown Arcana"), card("Forgotten Card")])
            .await;
        let r = resolver(store, Arc::new(MemoryCache::new()));

        let err = r
            .resolve_todays_card(Uuid::new_v4(), day())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EmptyCatalog));
    }

    #[tokio::test]
    async fn new_date_gets_a_fresh_resolution() {
        let store = seeded_store().await;
        let r = resolver(store.clone(), Arc::new(MemoryCache::new()));
        let user = Uuid::new_v4();

        let d1 = day();
        let d2 = d1.succ_opt().unwrap();
        r.resolve_todays_card(user, d1).await.unwrap();
        r.resolve_todays_card(user, d2).await.unwrap();
        assert_eq!(store.put_card_calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn offline_falls_back_to_cached_card() {
        let store = seeded_store().await;
        let cache = Arc::new(MemoryCache::new());
        let r = resolver(store.clone(), cache.clone());
        let user = Uuid::new_v4();

        let resolved = r.resolve_todays_card(user, day()).await.unwrap();

        store.set_offline(true);
        let stale = r.resolve_todays_card(user, day()).await.unwrap();
        assert_eq!(stale, resolved);
    }

    #[tokio::test]
    async fn offline_without_cache_fails_resolution() {
        let store = seeded_store().await;
        store.set_offline(true);
        let r = resolver(store, Arc::new(MemoryCache::new()));

        let err = r
            .resolve_todays_card(Uuid::new_v4(), day())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ResolutionFailed));
    }
}
