//! Input sanitization for survey payloads.
//!
//! Runs before validation: free-text fields are trimmed, stripped of control
//! and markup characters, and length-capped. Symptom tags come from an open
//! vocabulary, so they are normalised into identifiers (`"Hair loss"` →
//! `"hair_loss"`) rather than rejected; only tags with nothing left are dropped.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Lenient, SurveyPayload, SymptomSet};

/// Maximum length of a free-text field, in characters.
pub const MAX_TEXT_LENGTH: usize = 100;

/// Maximum length of a normalised symptom tag, in characters.
pub const MAX_TAG_LENGTH: usize = 40;

static TAG_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s\-]+").unwrap());

static NON_TAG_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}_]").unwrap());

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\p{Cc}\p{Cf}<>"'`\\]"#).unwrap());

/// Clean a single free-text value.
pub fn sanitize_text(raw: &str) -> String {
    let cleaned = UNSAFE_CHARS.replace_all(raw, "");
    cleaned.trim().chars().take(MAX_TEXT_LENGTH).collect()
}

/// Lower-case a tag, join words with `_`, strip everything else, and cap
/// the length. `None` when nothing usable remains.
pub fn normalize_symptom_tag(raw: &str) -> Option<String> {
    let lowered = raw.trim().to_lowercase();
    let joined = TAG_SEPARATORS.replace_all(&lowered, "_");
    let cleaned = NON_TAG_CHARS.replace_all(&joined, "");
    let tag: String = cleaned.trim_matches('_').chars().take(MAX_TAG_LENGTH).collect();
    (!tag.is_empty()).then_some(tag)
}

/// Normalise every tag of a set. Tags that collapse to the same identifier
/// are merged.
pub fn normalize_symptoms(symptoms: &SymptomSet) -> SymptomSet {
    SymptomSet::new(symptoms.iter().filter_map(normalize_symptom_tag))
}

/// Sanitize every text field of a payload in place.
pub fn sanitize_survey(payload: &mut SurveyPayload) {
    for field in [
        &mut payload.city,
        &mut payload.activity,
        &mut payload.stress,
        &mut payload.pcos,
    ] {
        if let Lenient::Value(text) = field {
            *text = sanitize_text(text);
        }
    }

    if let Lenient::Value(symptoms) = &mut payload.symptoms {
        let normalized = normalize_symptoms(symptoms);
        let dropped = symptoms.len() - normalized.len();
        if dropped > 0 {
            tracing::debug!(dropped, "Dropped empty or duplicate symptom tags");
        }
        *symptoms = normalized;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_markup_and_control_characters() {
        assert_eq!(sanitize_text("  <b>Pune</b>\u{0007} "), "bPune/b");
        assert_eq!(sanitize_text("New\u{200B} Delhi"), "New Delhi");
        assert_eq!(sanitize_text("\"high\"'"), "high");
    }

    #[test]
    fn caps_length_on_char_boundary() {
        let long = "é".repeat(MAX_TEXT_LENGTH + 20);
        assert_eq!(sanitize_text(&long).chars().count(), MAX_TEXT_LENGTH);
    }

    #[test]
    fn symptom_tags_are_normalised() {
        assert_eq!(normalize_symptom_tag("irregular_cycles").as_deref(), Some("irregular_cycles"));
        assert_eq!(normalize_symptom_tag("Acne").as_deref(), Some("acne"));
        assert_eq!(normalize_symptom_tag(" Hair  loss ").as_deref(), Some("hair_loss"));
        assert_eq!(normalize_symptom_tag("mood-changes").as_deref(), Some("mood_changes"));
        assert_eq!(normalize_symptom_tag("<img>").as_deref(), Some("img"));
        assert_eq!(normalize_symptom_tag(&"a".repeat(50)).map(|t| t.len()), Some(MAX_TAG_LENGTH));
        assert_eq!(normalize_symptom_tag(" <> "), None);
    }

    #[test]
    fn normalising_keeps_tag_count() {
        let set = normalize_symptoms(&SymptomSet::new(["Acne", "hair loss", "Brain fog"]));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["acne", "hair_loss", "brain_fog"]);
    }

    #[test]
    fn sanitizes_payload_in_place() {
        let mut payload: SurveyPayload = serde_json::from_value(json!({
            "city": " <script>Hyderabad ",
            "stress": " high\n",
            "symptoms": ["acne", "<>", "Weight Gain", "DROP TABLE"]
        }))
        .unwrap();

        sanitize_survey(&mut payload);

        assert_eq!(payload.city.as_ref().map(String::as_str), Some("scriptHyderabad"));
        assert_eq!(payload.stress.as_ref().map(String::as_str), Some("high"));
        let tags: Vec<_> = payload.symptoms.as_ref().unwrap().iter().collect();
        assert_eq!(tags, vec!["acne", "weight_gain", "drop_table"]);
    }
}
