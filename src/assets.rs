//! Card image asset manifest.
//!
//! The mobile client bundles one image per card, keyed by the card name with
//! any leading "The " article stripped. A catalog card is only eligible for
//! daily selection when its name resolves to a bundled image; cards without
//! one are skipped, never errored on.

/// Lowercased keys of every bundled card image.
const IMAGE_KEYS: &[&str] = &[
    "fool",
    "magician",
    "high priestess",
    "empress",
    "emperor",
    "hierophant",
    "lovers",
    "chariot",
    "strength",
    "hermit",
    "wheel of fortune",
    "justice",
    "hanged man",
    "death",
    "temperance",
    "devil",
    "tower",
    "star",
    "moon",
    "sun",
    "judgement",
    "world",
];

/// Normalize a card name to its asset key: lowercase, strip a single
/// leading "the " article, trim whitespace.
pub fn image_key(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let stripped = lowered.strip_prefix("the ").unwrap_or(&lowered);
    stripped.trim().to_string()
}

/// Whether a card name resolves to a bundled image.
pub fn has_image(name: &str) -> bool {
    let key = image_key(name);
    IMAGE_KEYS.contains(&key.as_str())
}
