use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Catalog entry: a selectable card with display name, meaning text and a
/// reading. The image asset is not stored; it is resolved from the name via
/// `crate::assets`. Cards without a resolvable image are excluded from daily
/// selection (a validity filter, not an error).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MoodCard {
    pub name: String,
    pub meaning: String,
    pub description: String,
}

/// The single card locked in for one user and one calendar date. Created on
/// first resolution for a `(user, day)` key and immutable afterwards; the
/// remote store is the durable owner, the local cache a disposable mirror.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCard {
    pub name: String,
    pub meaning: String,
    pub description: String,
}

impl From<MoodCard> for DailyCard {
    fn from(card: MoodCard) -> Self {
        Self {
            name: card.name,
            meaning: card.meaning,
            description: card.description,
        }
    }
}
