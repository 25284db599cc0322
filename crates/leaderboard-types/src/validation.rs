use std::collections::BTreeMap;
use std::fmt;

use crate::api::CreateEntryRequest;

pub const MAX_PLAYER_NAME_LEN: usize = 100;
pub const MAX_LEVEL_LEN: usize = 50;

/// A create request that passed validation. Only this type reaches the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub player_name: String,
    pub score: i64,
    pub level: String,
}

/// Per-field validation messages, keyed by the camelCase wire name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a single-field failure (bad path or query values).
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.fields().collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl CreateEntryRequest {
    /// Check every field and collect all failures, so the caller learns
    /// about each bad field in one round trip.
    pub fn validate(self) -> Result<NewEntry, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let player_name = required_text(&mut errors, "playerName", self.player_name, MAX_PLAYER_NAME_LEN);
        let level = required_text(&mut errors, "level", self.level, MAX_LEVEL_LEN);

        let score = match self.score {
            None => {
                errors.add("score", "The score field is required.");
                None
            }
            Some(score) if score < 0 => {
                errors.add(
                    "score",
                    format!("The field score must be between 0 and {}.", i64::MAX),
                );
                None
            }
            Some(score) => Some(score),
        };

        match (player_name, score, level) {
            (Some(player_name), Some(score), Some(level)) if errors.is_empty() => Ok(NewEntry {
                player_name,
                score,
                level,
            }),
            _ => Err(errors),
        }
    }
}

fn required_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<String>,
    max_len: usize,
) -> Option<String> {
    let value = match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => {
            errors.add(field, format!("The {} field is required.", field));
            return None;
        }
    };

    if value.chars().count() > max_len {
        errors.add(
            field,
            format!(
                "The field {} must be a string with a maximum length of {}.",
                field, max_len
            ),
        );
        return None;
    }

    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: Option<&str>, score: Option<i64>, level: Option<&str>) -> CreateEntryRequest {
        CreateEntryRequest {
            player_name: name.map(str::to_string),
            score,
            level: level.map(str::to_string),
        }
    }

    #[test]
    fn valid_request_passes() {
        let entry = request(Some("Sam"), Some(500), Some("L1")).validate().unwrap();
        assert_eq!(
            entry,
            NewEntry {
                player_name: "Sam".into(),
                score: 500,
                level: "L1".into(),
            }
        );
    }

    #[test]
    fn zero_score_is_allowed() {
        assert!(request(Some("Sam"), Some(0), Some("L1")).validate().is_ok());
    }

    #[test]
    fn negative_score_rejected() {
        let errors = request(Some("Sam"), Some(-1), Some("L1")).validate().unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["score"]);
    }

    #[test]
    fn all_missing_fields_reported_together() {
        let errors = request(None, None, None).validate().unwrap_err();
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec!["level", "playerName", "score"]
        );
        let map = errors.into_map();
        assert_eq!(map["score"], vec!["The score field is required.".to_string()]);
    }

    #[test]
    fn blank_name_is_missing() {
        let errors = request(Some("   "), Some(1), Some("L1")).validate().unwrap_err();
        assert_eq!(
            errors.into_map()["playerName"],
            vec!["The playerName field is required.".to_string()]
        );
    }

    #[test]
    fn length_limits_count_characters() {
        let name = "é".repeat(MAX_PLAYER_NAME_LEN);
        assert!(request(Some(&name), Some(1), Some("L1")).validate().is_ok());

        let name = "a".repeat(MAX_PLAYER_NAME_LEN + 1);
        let errors = request(Some(&name), Some(1), Some("L1")).validate().unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["playerName"]);

        let level = "x".repeat(MAX_LEVEL_LEN);
        assert!(request(Some("Sam"), Some(1), Some(&level)).validate().is_ok());

        let level = "x".repeat(MAX_LEVEL_LEN + 1);
        let errors = request(Some("Sam"), Some(1), Some(&level)).validate().unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["level"]);
    }
}
