//! The note record and its timestamp rules.
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Title shown for notes whose title is empty
pub const DEFAULT_TITLE: &str = "Untitled";

/// Represents a single note in our system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier for the note
    pub id: String,
    /// Note title
    pub title: String,
    /// Note body text
    pub content: String,
    /// When the note was created, in milliseconds since the Unix epoch
    pub created_at: i64,
    /// Last modification time, in milliseconds since the Unix epoch
    pub updated_at: i64,
}

impl Note {
    /// Title to display, falling back to "Untitled" for blank titles.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            DEFAULT_TITLE
        } else {
            &self.title
        }
    }

    /// Bumps `updated_at` to `now`, never moving it below `created_at`.
    pub fn touch(&mut self, now: i64) {
        self.updated_at = now.max(self.created_at);
    }

    pub fn set_title(&mut self, title: impl Into<String>, now: i64) {
        self.title = title.into();
        self.touch(now);
    }

    pub fn set_content(&mut self, content: impl Into<String>, now: i64) {
        self.content = content.into();
        self.touch(now);
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Note {
        Note {
            id: "abc".to_string(),
            title: String::new(),
            content: String::new(),
            created_at: 1_000,
            updated_at: 1_000,
        }
    }

    #[test]
    fn blank_title_displays_as_untitled() {
        let mut note = sample();
        assert_eq!(note.display_title(), "Untitled");
        note.title = "   ".to_string();
        assert_eq!(note.display_title(), "Untitled");
        note.title = "Groceries".to_string();
        assert_eq!(note.display_title(), "Groceries");
    }

    #[test]
    fn touch_never_goes_below_created_at() {
        let mut note = sample();
        note.set_content("hello", 500);
        assert_eq!(note.updated_at, 1_000);
        note.set_title("later", 2_000);
        assert_eq!(note.updated_at, 2_000);
        assert_eq!(note.created_at, 1_000);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["createdAt"], 1_000);
        assert_eq!(value["updatedAt"], 1_000);
        assert!(value.get("created_at").is_none());
    }
}
