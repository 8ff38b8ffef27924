//! Result types for similarity queries.

use serde::{Deserialize, Serialize};

/// One ranked result: the emoji, a human-readable description and the
/// token-overlap score. The score equals the number of bracketed tokens
/// when keywords are shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarEntry {
    pub emoji: String,
    pub description: String,
    pub score: usize,
}

impl SimilarEntry {
    pub fn new<E: Into<String>, D: Into<String>>(emoji: E, description: D, score: usize) -> Self {
        Self {
            emoji: emoji.into(),
            description: description.into(),
            score,
        }
    }
}

impl From<SimilarEntry> for (String, String, usize) {
    fn from(entry: SimilarEntry) -> Self {
        (entry.emoji, entry.description, entry.score)
    }
}

impl std::fmt::Display for SimilarEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}\t{}", self.emoji, self.description, self.score)
    }
}

/// Render a result description: the display name, optionally suffixed by
/// the bracketed comma-joined matched tokens.
pub fn render(name: &str, matched: &[&str], show_keywords: bool) -> String {
    if !show_keywords {
        return name.to_string();
    }
    let tokens = matched.join(", ");
    if name.is_empty() {
        format!("[{tokens}]")
    } else {
        format!("{name} [{tokens}]")
    }
}
