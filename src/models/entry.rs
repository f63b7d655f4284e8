use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::card::DailyCard;

/// What the user tagged the entry with: either a picked mood card
/// (name + meaning) or a bare text label. Free-write entries carry no mood
/// at all (`MoodEntry::mood` is `None`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Mood {
    Card { name: String, meaning: String },
    Label(String),
}

impl Mood {
    /// Display label used for search matching.
    pub fn label(&self) -> &str {
        match self {
            Mood::Card { name, .. } => name,
            Mood::Label(text) => text,
        }
    }
}

/// One persisted journal record.
///
/// Invariants: `id` is unique within a user's collection; `edited_at`, when
/// present, is >= `created_at`. Mutated only by an explicit journal edit;
/// destroyed only by an explicit delete after its undo grace period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: Uuid,
    pub mood: Option<Mood>,
    pub card: Option<DailyCard>,
    pub journal: String,
    /// Calendar day the entry belongs to (client-local date).
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_label_for_card_and_text() {
        let card = Mood::Card {
            name: "Joy".into(),
            meaning: "A deep sense of delight and energy.".into(),
        };
        assert_eq!(card.label(), "Joy");
        assert_eq!(Mood::Label("quiet evening".into()).label(), "quiet evening");
    }

    #[test]
    fn mood_serializes_untagged() {
        let card = Mood::Card {
            name: "Awe".into(),
            meaning: "A sense of wonder and reverence.".into(),
        };
        let v = serde_json::to_value(&card).unwrap();
        assert_eq!(v["name"], "Awe");

        let label: Mood = serde_json::from_value(serde_json::json!("restless")).unwrap();
        assert_eq!(label, Mood::Label("restless".into()));
    }
}
