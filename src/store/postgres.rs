use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::card::{DailyCard, MoodCard};
use crate::models::entry::{Mood, MoodEntry};
use crate::store::EntryStore;

pub struct PgEntryStore {
    pool: PgPool,
}

impl PgEntryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Row shape for `mood_entries`; `mood` and `card` are jsonb documents.
#[derive(Debug, FromRow)]
struct EntryRow {
    id: Uuid,
    mood: Option<Json<Mood>>,
    card: Option<Json<DailyCard>>,
    journal: String,
    entry_date: NaiveDate,
    created_at: DateTime<Utc>,
    edited_at: Option<DateTime<Utc>>,
}

impl From<EntryRow> for MoodEntry {
    fn from(row: EntryRow) -> Self {
        Self {
            id: row.id,
            mood: row.mood.map(|Json(m)| m),
            card: row.card.map(|Json(c)| c),
            journal: row.journal,
            date: row.entry_date,
            created_at: row.created_at,
            edited_at: row.edited_at,
        }
    }
}

#[async_trait]
impl EntryStore for PgEntryStore {
    async fn get_daily_card(&self, user: Uuid, day: NaiveDate) -> AppResult<Option<DailyCard>> {
        let card = sqlx::query_as::<_, (Json<DailyCard>,)>(
            "SELECT card FROM daily_cards WHERE user_id = $1 AND day = $2",
        )
        .bind(user)
        .bind(day)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card.map(|(Json(c),)| c))
    }

    async fn put_daily_card(&self, user: Uuid, day: NaiveDate, card: &DailyCard) -> AppResult<()> {
        // Last write wins on a concurrent first resolution of the same day.
        sqlx::query(
            r#"
            INSERT INTO daily_cards (user_id, day, card)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, day) DO UPDATE SET card = EXCLUDED.card
            "#,
        )
        .bind(user)
        .bind(day)
        .bind(Json(card))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_card_catalog(&self) -> AppResult<Vec<MoodCard>> {
        let cards = sqlx::query_as::<_, MoodCard>(
            "SELECT name, meaning, description FROM cards ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    async fn list_entries(&self, user: Uuid) -> AppResult<Vec<MoodEntry>> {
        let rows = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT id, mood, card, journal, entry_date, created_at, edited_at
            FROM mood_entries
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(MoodEntry::from).collect())
    }

    async fn get_entry(&self, user: Uuid, id: Uuid) -> AppResult<Option<MoodEntry>> {
        let row = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT id, mood, card, journal, entry_date, created_at, edited_at
            FROM mood_entries
            WHERE user_id = $1 AND id = $2
            "#,
        )
        .bind(user)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(MoodEntry::from))
    }

    async fn insert_entry(&self, user: Uuid, entry: &MoodEntry) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO mood_entries (id, user_id, mood, card, journal, entry_date, created_at, edited_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                mood = EXCLUDED.mood,
                card = EXCLUDED.card,
                journal = EXCLUDED.journal,
                entry_date = EXCLUDED.entry_date,
                created_at = EXCLUDED.created_at,
                edited_at = EXCLUDED.edited_at
            "#,
        )
        .bind(entry.id)
        .bind(user)
        .bind(entry.mood.as_ref().map(Json))
        .bind(entry.card.as_ref().map(Json))
        .bind(&entry.journal)
        .bind(entry.date)
        .bind(entry.created_at)
        .bind(entry.edited_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_journal(
        &self,
        user: Uuid,
        id: Uuid,
        journal: &str,
        edited_at: DateTime<Utc>,
    ) -> AppResult<MoodEntry> {
        let row = sqlx::query_as::<_, EntryRow>(
            r#"
            UPDATE mood_entries
            SET journal = $3, edited_at = $4
            WHERE user_id = $1 AND id = $2
            RETURNING id, mood, card, journal, entry_date, created_at, edited_at
            "#,
        )
        .bind(user)
        .bind(id)
        .bind(journal)
        .bind(edited_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("Entry not found".into()))?;

        Ok(row.into())
    }

    async fn delete_entry(&self, user: Uuid, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM mood_entries WHERE user_id = $1 AND id = $2")
            .bind(user)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
