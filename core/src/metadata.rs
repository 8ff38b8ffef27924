//! Language-independent emoji metadata: Unicode category tag, semantic
//! group tag and the canonical listing order used for tie-breaks.
//!
//! The table is a JSON array payload:
//!
//! ```json
//! [
//!   { "emoji": "🐫", "category": "So", "group": "nature", "order": 1494 }
//! ]
//! ```
//!
//! `order` is fixed per emoji and independent of any language list; the
//! search engine uses it only for deterministic tie-breaking, never for
//! scoring.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::EmojiError;
use crate::utils;

type Map<K, V> = HashMap<K, V, ahash::RandomState>;

/// Canonical index assigned to emoji missing from the table: they sort
/// after every indexed emoji.
pub const UNORDERED: u32 = u32::MAX;

/// One emoji's language-independent metadata row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiMeta {
    pub emoji: String,
    /// Unicode general-category abbreviation, e.g. "So".
    #[serde(default)]
    pub category: String,
    /// Semantic group, e.g. "people", "nature".
    #[serde(default)]
    pub group: String,
    /// Position in the fixed Unicode emoji listing order.
    pub order: u32,
}

/// Lookup table keyed by NFC-normalized codepoint sequence.
#[derive(Debug, Clone, Default)]
pub struct MetadataTable {
    map: Map<String, EmojiMeta>,
}

impl MetadataTable {
    pub fn parse(payload: &str) -> Result<Self, EmojiError> {
        let rows: Vec<EmojiMeta> =
            serde_json::from_str(payload).map_err(|e| EmojiError::CorruptAnnotationData {
                locale: "metadata".to_string(),
                reason: e.to_string(),
            })?;
        let mut map: Map<String, EmojiMeta> = Map::default();
        for row in rows {
            map.insert(utils::normalize(&row.emoji), row);
        }
        tracing::debug!(emoji_count = map.len(), "parsed emoji metadata table");
        Ok(Self { map })
    }

    pub fn get(&self, emoji: &str) -> Option<&EmojiMeta> {
        self.map.get(emoji)
    }

    /// Canonical ordering key for tie-breaks; [`UNORDERED`] when the
    /// emoji is not in the table.
    pub fn canonical_index(&self, emoji: &str) -> u32 {
        self.map.get(emoji).map(|m| m.order).unwrap_or(UNORDERED)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_lookup() {
        let table = MetadataTable::parse(
            r#"[
                { "emoji": "🐫", "category": "So", "group": "nature", "order": 1494 },
                { "emoji": "🐪", "category": "So", "group": "nature", "order": 1493 }
            ]"#,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("🐫").unwrap().group, "nature");
        assert_eq!(table.canonical_index("🐪"), 1493);
    }

    #[test]
    fn missing_emoji_sorts_last() {
        let table = MetadataTable::default();
        assert_eq!(table.canonical_index("🐫"), UNORDERED);
    }

    #[test]
    fn corrupt_table_is_fatal() {
        let err = MetadataTable::parse("[{").unwrap_err();
        assert!(matches!(
            err,
            EmojiError::CorruptAnnotationData { ref locale, .. } if locale == "metadata"
        ));
    }
}
