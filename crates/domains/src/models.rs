//! # Domain Models
//!
//! These structs represent the entities the board service persists and hands
//! to the presentation layer. Stored documents use camelCase field names and
//! integer-microsecond timestamps so store-side ordering by `updatedAt` is exact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Collection holding one document per board.
pub const BOARDS_COLLECTION: &str = "boards";
/// Collection holding one profile document per subject id.
pub const USERS_COLLECTION: &str = "users";

/// A persisted whiteboard session owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    /// Store-assigned document id. Older documents created through the save
    /// path may lack the field, so readers fill it from the snapshot id.
    #[serde(default)]
    pub board_id: String,
    pub user_id: String,
    pub board_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    /// Thumbnail payload, usually a data URL string.
    #[serde(default)]
    pub image: Option<Value>,
    /// Stroke/point records, opaque to this layer. Normally an array.
    #[serde(default = "empty_sequence", deserialize_with = "null_as_empty")]
    pub drawing: Value,
    /// Text annotation records, opaque to this layer. Normally an array.
    #[serde(default = "empty_sequence", deserialize_with = "null_as_empty")]
    pub writing: Value,
    #[serde(default)]
    pub writing_window: Option<Value>,
    #[serde(with = "chrono::serde::ts_microseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_microseconds")]
    pub updated_at: DateTime<Utc>,
}

/// Metadata supplied when a board is created from the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBoard {
    pub board_name: String,
    #[serde(default)]
    pub class_code: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
}

/// Editable content of a board as returned to the whiteboard client.
///
/// `Default` is the payload served for a name with no stored board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardContent {
    pub image: Option<Value>,
    pub drawing: Value,
    pub writing: Value,
    pub writing_window: Option<Value>,
}

impl Default for BoardContent {
    fn default() -> Self {
        Self {
            image: None,
            drawing: empty_sequence(),
            writing: empty_sequence(),
            writing_window: None,
        }
    }
}

impl From<&Board> for BoardContent {
    fn from(board: &Board) -> Self {
        Self {
            image: board.image.clone().filter(is_truthy),
            drawing: board.drawing.clone(),
            writing: board.writing.clone(),
            writing_window: board.writing_window.clone().filter(is_truthy),
        }
    }
}

/// Content as posted by the client. Every field may be missing or hold any
/// JSON value, falsy ones included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentUpdate {
    #[serde(default)]
    pub image: Option<Value>,
    #[serde(default)]
    pub drawing: Option<Value>,
    #[serde(default)]
    pub writing: Option<Value>,
    #[serde(default)]
    pub writing_window: Option<Value>,
}

impl ContentUpdate {
    /// Applies the save defaults: a falsy image or window becomes absent and
    /// a falsy drawing or writing becomes `[]`. Truthy values are kept as sent.
    pub fn normalized(self) -> BoardContent {
        BoardContent {
            image: self.image.filter(is_truthy),
            drawing: self.drawing.filter(is_truthy).unwrap_or_else(empty_sequence),
            writing: self.writing.filter(is_truthy).unwrap_or_else(empty_sequence),
            writing_window: self.writing_window.filter(is_truthy),
        }
    }
}

/// Profile record kept under `users/{subject_id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// What the identity verifier vouches for after checking a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject_id: String,
    pub email: Option<String>,
}

/// The authenticated subject making a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerIdentity {
    pub subject_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// JSON truthiness: `null`, `false`, `0`, and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// `[]`, the stored form of an empty drawing or writing.
pub fn empty_sequence() -> Value {
    Value::Array(Vec::new())
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Value, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.unwrap_or_else(empty_sequence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn board_reads_documents_missing_content_fields() {
        let board: Board = serde_json::from_value(json!({
            "userId": "u1",
            "boardName": "Algebra",
            "drawing": null,
            "createdAt": 1_700_000_000_000_000i64,
            "updatedAt": 1_700_000_000_000_000i64,
        }))
        .unwrap();

        assert_eq!(board.board_id, "");
        assert_eq!(board.drawing, json!([]));
        assert_eq!(board.writing, json!([]));
        assert_eq!(board.writing_window, None);
        assert_eq!(board.class_code, None);
    }

    #[test]
    fn board_serializes_camel_case_with_micro_timestamps() {
        let at = DateTime::from_timestamp_micros(1_700_000_000_000_001).unwrap();
        let board = Board {
            board_id: "b1".into(),
            user_id: "u1".into(),
            board_name: "Algebra".into(),
            class_code: Some("M1".into()),
            tags: None,
            image: None,
            drawing: empty_sequence(),
            writing: empty_sequence(),
            writing_window: None,
            created_at: at,
            updated_at: at,
        };
        let value = serde_json::to_value(&board).unwrap();

        assert_eq!(value["boardId"], "b1");
        assert_eq!(value["classCode"], "M1");
        assert!(value.get("tags").is_none());
        assert_eq!(value["updatedAt"], json!(1_700_000_000_000_001i64));
    }

    #[test]
    fn content_update_applies_save_defaults() {
        let content = ContentUpdate {
            image: Some(json!("")),
            drawing: None,
            writing: Some(json!([{"text": "hi"}])),
            writing_window: Some(json!(0)),
        }
        .normalized();

        assert_eq!(content.image, None);
        assert_eq!(content.drawing, json!([]));
        assert_eq!(content.writing, json!([{"text": "hi"}]));
        assert_eq!(content.writing_window, None);
    }

    #[test]
    fn content_update_accepts_falsy_values_of_any_type() {
        let update: ContentUpdate = serde_json::from_value(json!({
            "image": false,
            "drawing": false,
            "writing": 0,
            "writingWindow": "",
        }))
        .unwrap();

        assert_eq!(update.normalized(), BoardContent::default());
    }

    #[test]
    fn truthy_non_sequence_content_is_kept_as_sent() {
        let content = ContentUpdate {
            drawing: Some(json!({"strokes": 2})),
            ..ContentUpdate::default()
        }
        .normalized();

        assert_eq!(content.drawing, json!({"strokes": 2}));
        assert_eq!(content.writing, json!([]));
    }

    #[test]
    fn default_content_matches_empty_payload() {
        let value = serde_json::to_value(BoardContent::default()).unwrap();
        assert_eq!(
            value,
            json!({"image": null, "drawing": [], "writing": [], "writingWindow": null})
        );
    }

    #[test]
    fn truthiness_follows_json_rules() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!("x")));
    }
}
