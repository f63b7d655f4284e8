//! Client-side entry search: pure, synchronous filtering over an
//! already-fetched list, plus highlight-range computation for the UI.

use std::ops::Range;

use crate::models::entry::MoodEntry;

/// Whether an entry matches a query: case-insensitive substring match
/// against the mood label, the card name, or the journal text. An empty
/// query matches everything.
pub fn entry_matches(entry: &MoodEntry, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();

    let mood_hit = entry
        .mood
        .as_ref()
        .map(|m| m.label().to_lowercase().contains(&needle))
        .unwrap_or(false);
    let card_hit = entry
        .card
        .as_ref()
        .map(|c| c.name.to_lowercase().contains(&needle))
        .unwrap_or(false);
    let journal_hit = entry.journal.to_lowercase().contains(&needle);

    mood_hit || card_hit || journal_hit
}

/// Filter a fetched list down to entries matching `query`, preserving order.
pub fn filter_entries<'a>(entries: &'a [MoodEntry], query: &str) -> Vec<&'a MoodEntry> {
    entries.iter().filter(|e| entry_matches(e, query)).collect()
}

/// Byte ranges of every non-overlapping case-insensitive occurrence of
/// `query` in `text`. Ranges index into the original text, so slicing them
/// preserves the original casing. An empty query yields no ranges.
pub fn highlight_spans(text: &str, query: &str) -> Vec<Range<usize>> {
    let needle: Vec<char> = query.chars().collect();
    if needle.is_empty() {
        return Vec::new();
    }

    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut spans = Vec::new();
    let mut i = 0;
    while i + needle.len() <= chars.len() {
        let window = &chars[i..i + needle.len()];
        let hit = window
            .iter()
            .zip(needle.iter())
            .all(|((_, a), b)| chars_eq_ignore_case(*a, *b));
        if hit {
            let start = window[0].0;
            let end = match chars.get(i + needle.len()) {
                Some((offset, _)) => *offset,
                None => text.len(),
            };
            spans.push(start..end);
            i += needle.len();
        } else {
            i += 1;
        }
    }
    spans
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    use crate::models::card::DailyCard;
    use crate::models::entry::Mood;

    fn entry(journal: &str) -> MoodEntry {
        MoodEntry {
            id: Uuid::new_v4(),
            mood: None,
            card: None,
            journal: journal.into(),
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            created_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap(),
            edited_at: None,
        }
    }

    fn fixture() -> Vec<MoodEntry> {
        vec![
            entry("I feel calm today"),
            entry("Angry morning"),
            entry("Peaceful calm evening"),
        ]
    }

    #[test]
    fn query_matches_journal_substring() {
        let entries = fixture();
        let hits = filter_entries(&entries, "calm");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].journal, "I feel calm today");
        assert_eq!(hits[1].journal, "Peaceful calm evening");
    }

    #[test]
    fn query_is_case_insensitive() {
        let entries = fixture();
        let upper = filter_entries(&entries, "CALM");
        let lower = filter_entries(&entries, "calm");
        assert_eq!(upper.len(), 2);
        assert_eq!(
            upper.iter().map(|e| e.id).collect::<Vec<_>>(),
            lower.iter().map(|e| e.id).collect::<Vec<_>>(),
        );
    }

    #[test]
    fn empty_query_matches_everything() {
        let entries = fixture();
        assert_eq!(filter_entries(&entries, "").len(), 3);
    }

    #[test]
    fn matches_mood_label_and_card_name() {
        let mut e = entry("nothing relevant");
        e.mood = Some(Mood::Card {
            name: "Contentment".into(),
            meaning: "A calm and satisfied emotional state.".into(),
        });
        assert!(entry_matches(&e, "content"));

        let mut e = entry("nothing relevant");
        e.card = Some(DailyCard {
            name: "The Hermit".into(),
            meaning: "Introspection.".into(),
            description: String::new(),
        });
        assert!(entry_matches(&e, "hermit"));
        assert!(!entry_matches(&e, "tower"));
    }

    #[test]
    fn free_write_entry_matches_only_on_journal() {
        let e = entry("Angry morning");
        assert!(entry_matches(&e, "angry"));
        assert!(!entry_matches(&e, "calm"));
    }

    #[test]
    fn highlight_single_occurrence() {
        let spans = highlight_spans("Peaceful calm evening", "calm");
        assert_eq!(spans, vec![9..13]);
        assert_eq!(&"Peaceful calm evening"[9..13], "calm");
    }

    #[test]
    fn highlight_preserves_original_casing() {
        let text = "Calm seas, calm mind, CALM heart";
        let spans = highlight_spans(text, "calm");
        assert_eq!(spans.len(), 3);
        let found: Vec<&str> = spans.iter().map(|r| &text[r.clone()]).collect();
        assert_eq!(found, vec!["Calm", "calm", "CALM"]);
    }

    #[test]
    fn highlight_occurrences_do_not_overlap() {
        let spans = highlight_spans("aaaa", "aa");
        assert_eq!(spans, vec![0..2, 2..4]);
    }

    #[test]
    fn highlight_empty_query_yields_no_ranges() {
        assert!(highlight_spans("anything", "").is_empty());
    }

    #[test]
    fn highlight_handles_multibyte_text() {
        let text = "café CALM café";
        let spans = highlight_spans(text, "calm");
        assert_eq!(spans.len(), 1);
        assert_eq!(&text[spans[0].clone()], "CALM");
    }
}
