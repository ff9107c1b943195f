//! Word, character and byte counts for note content.
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStats {
    /// Maximal runs of non-whitespace characters
    pub word_count: usize,
    /// Length in UTF-16 code units
    pub character_count: usize,
    /// Length when encoded as UTF-8
    pub storage_bytes: usize,
}

pub fn text_stats(content: &str) -> TextStats {
    TextStats {
        word_count: content.split_whitespace().count(),
        character_count: content.encode_utf16().count(),
        storage_bytes: content.len(),
    }
}
