//! Immutable emoji catalog merged across the resolved locales.
//!
//! One [`EmojiRecord`] per emoji known to at least one resolved locale.
//! A record's `combined_tokens` bag concatenates, in order: the glyph
//! itself, the Unicode category tag, the group tag, then each locale's
//! augmented keywords followed by its name, in the caller's language
//! preference order. The bag order is load-bearing: scoring reports
//! matched tokens in this order.
//!
//! Built once per matcher construction and never mutated; safe for
//! unsynchronized concurrent reads.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::annotation::LocaleAnnotations;
use crate::metadata::MetadataTable;
use crate::translit::Augmenter;
use crate::utils;

type Map<K, V> = HashMap<K, V, ahash::RandomState>;

/// One locale's contribution to a record, in resolution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub locale: String,
    pub name: String,
    pub keywords: Vec<String>,
}

/// One catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiRecord {
    /// Full codepoint sequence (skin-tone modifiers and ZWJ sequences are
    /// atomic keys, never split).
    pub key: String,
    /// Unicode general-category abbreviation, e.g. "So"; empty when the
    /// metadata table does not know the emoji.
    pub category_tag: String,
    /// Semantic group, e.g. "people"; empty when unknown.
    pub group_tag: String,
    /// Per-locale annotations in language-priority order as resolved for
    /// the matcher instance that built this record.
    pub per_language_entries: Vec<LanguageEntry>,
    /// The matchable token bag. Invariant: `key` is the first token.
    pub combined_tokens: Vec<String>,
    /// Fixed language-independent ordering key, used only for tie-breaks.
    pub canonical_index: u32,
}

impl EmojiRecord {
    /// Display name: the first language in priority order that supplied a
    /// non-empty one.
    pub fn display_name(&self) -> &str {
        self.per_language_entries
            .iter()
            .map(|e| e.name.as_str())
            .find(|n| !n.is_empty())
            .unwrap_or("")
    }
}

/// Mapping from codepoint sequence to [`EmojiRecord`], with a
/// variation-selector-stripped alias index so `☺` resolves to the `☺️`
/// record.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Map<String, EmojiRecord>,
    aliases: Map<String, String>,
}

fn strip_variation_selectors(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '\u{FE00}'..='\u{FE0F}'))
        .collect()
}

impl Catalog {
    /// Exact record by key, no alias resolution.
    pub fn get(&self, key: &str) -> Option<&EmojiRecord> {
        self.records.get(key)
    }

    /// Resolve a query to a record: NFC-normalized exact match first, then
    /// the variation-selector-stripped alias index.
    pub fn lookup(&self, query: &str) -> Option<&EmojiRecord> {
        let query = utils::normalize(query);
        if let Some(record) = self.records.get(&query) {
            return Some(record);
        }
        let stripped = strip_variation_selectors(&query);
        self.aliases
            .get(&stripped)
            .and_then(|key| self.records.get(key))
    }

    pub fn records(&self) -> impl Iterator<Item = &EmojiRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Merge resolved locales into a catalog.
///
/// `resolved` is in the caller's language-preference order and may repeat
/// a concrete locale; repeats are kept as-is, so their tokens appear (and
/// count) once per occurrence.
pub fn build_catalog(
    resolved: &[Arc<LocaleAnnotations>],
    metadata: &MetadataTable,
    augmenter: &Augmenter,
) -> Catalog {
    let mut entries: Map<String, Vec<LanguageEntry>> = Map::default();
    for locale_annotations in resolved {
        let locale = locale_annotations.locale().to_string();
        for (emoji, annotation) in locale_annotations.iter() {
            entries
                .entry(emoji.clone())
                .or_default()
                .push(LanguageEntry {
                    locale: locale.clone(),
                    name: annotation.name.clone(),
                    keywords: annotation.keywords.clone(),
                });
        }
    }

    let mut records: Map<String, EmojiRecord> = Map::default();
    for (key, per_language_entries) in entries {
        let mut combined_tokens = vec![key.clone()];
        if let Some(meta) = metadata.get(&key) {
            if !meta.category.is_empty() {
                combined_tokens.push(meta.category.clone());
            }
            if !meta.group.is_empty() {
                combined_tokens.push(meta.group.clone());
            }
        }
        for entry in &per_language_entries {
            let mut sequence = entry.keywords.clone();
            // A name already present among this locale's keywords merges
            // into them instead of counting as a second token; the same
            // string from another locale still counts separately.
            if !entry.name.is_empty() && !entry.keywords.iter().any(|kw| *kw == entry.name) {
                sequence.push(entry.name.clone());
            }
            combined_tokens.extend(augmenter.augment(&entry.locale, &sequence));
        }
        let (category_tag, group_tag) = metadata
            .get(&key)
            .map(|m| (m.category.clone(), m.group.clone()))
            .unwrap_or_default();
        records.insert(
            key.clone(),
            EmojiRecord {
                canonical_index: metadata.canonical_index(&key),
                key,
                category_tag,
                group_tag,
                per_language_entries,
                combined_tokens,
            },
        );
    }

    // Alias index built over sorted keys so collisions resolve
    // deterministically (smallest key wins).
    let mut aliases: Map<String, String> = Map::default();
    let mut keys: Vec<&String> = records.keys().collect();
    keys.sort();
    for key in keys {
        let stripped = strip_variation_selectors(key);
        if stripped != *key && !records.contains_key(&stripped) {
            aliases.entry(stripped).or_insert_with(|| key.clone());
        }
    }

    tracing::debug!(
        emoji_count = records.len(),
        alias_count = aliases.len(),
        "built emoji catalog"
    );
    Catalog { records, aliases }
}
