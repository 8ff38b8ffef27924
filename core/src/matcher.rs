//! The emoji similarity matcher: configuration, construction and the
//! `similar` query.
//!
//! Construction is the only phase that performs I/O (annotation loading
//! and catalog building); `similar` is a pure, reentrant computation over
//! the immutable catalog, bounded by O(|catalog| x average token-bag
//! size), and safe to call from any number of threads against one shared
//! matcher.

use std::sync::Arc;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::annotation::{AnnotationRepository, AnnotationSource, LocaleAnnotations};
use crate::candidate::{render, SimilarEntry};
use crate::catalog::{build_catalog, Catalog, EmojiRecord};
use crate::error::EmojiError;
use crate::locale::fallback_chain;
use crate::translit::Augmenter;

/// Matcher configuration: the caller's ordered language preference list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Locale tags in preference order, e.g. `["de_CH", "en_US"]`.
    pub languages: Vec<String>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string()],
        }
    }
}

impl MatcherConfig {
    pub fn new<L: Into<String>, I: IntoIterator<Item = L>>(languages: I) -> Self {
        Self {
            languages: languages.into_iter().map(Into::into).collect(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, EmojiError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), EmojiError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| EmojiError::Configuration(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, EmojiError> {
        toml::from_str(content).map_err(|e| EmojiError::Configuration(e.to_string()))
    }
}

/// Finds and ranks emoji sharing descriptive meaning with a query emoji.
///
/// The catalog is built once at construction for the configured language
/// list and never mutated afterwards.
#[derive(Debug)]
pub struct EmojiMatcher {
    catalog: Catalog,
    resolved_locales: Vec<String>,
}

impl EmojiMatcher {
    /// Build a matcher over `source` with the process-detected
    /// transliteration capabilities.
    pub fn new(
        config: &MatcherConfig,
        source: Arc<dyn AnnotationSource>,
    ) -> Result<Self, EmojiError> {
        Self::from_repository(
            config,
            &AnnotationRepository::new(source),
            &Augmenter::detected(),
        )
    }

    /// Build a matcher over a shared repository (reusing its parsed-locale
    /// cache) with explicitly injected transliteration providers.
    ///
    /// Each requested language resolves independently to the first locale
    /// in its fallback chain that loads; winners are concatenated in the
    /// caller's original preference order without deduplication, so two
    /// requested languages may contribute the same concrete locale twice.
    /// Languages with no loadable chain member are skipped; if that
    /// leaves nothing, or the list is empty, construction fails with
    /// `Configuration`. A corrupt payload in a locale that did resolve is
    /// fatal.
    pub fn from_repository(
        config: &MatcherConfig,
        repository: &AnnotationRepository,
        augmenter: &Augmenter,
    ) -> Result<Self, EmojiError> {
        if config.languages.is_empty() {
            return Err(EmojiError::Configuration(
                "language list is empty".to_string(),
            ));
        }

        let mut resolved: Vec<Arc<LocaleAnnotations>> = Vec::new();
        for language in &config.languages {
            let mut winner = None;
            for candidate in fallback_chain(language) {
                match repository.load(&candidate) {
                    Ok(annotations) => {
                        winner = Some(annotations);
                        break;
                    }
                    Err(EmojiError::DataUnavailable { .. }) => continue,
                    Err(other) => return Err(other),
                }
            }
            match winner {
                Some(annotations) => resolved.push(annotations),
                None => {
                    tracing::warn!(%language, "no annotation data anywhere in fallback chain")
                }
            }
        }
        if resolved.is_empty() {
            return Err(EmojiError::Configuration(format!(
                "no resolvable locale among {:?}",
                config.languages
            )));
        }

        let metadata = repository.metadata()?;
        let catalog = build_catalog(&resolved, &metadata, augmenter);
        let resolved_locales: Vec<String> =
            resolved.iter().map(|a| a.locale().to_string()).collect();
        tracing::info!(
            locales = ?resolved_locales,
            emoji_count = catalog.len(),
            "emoji matcher ready"
        );
        Ok(Self {
            catalog,
            resolved_locales,
        })
    }

    /// Concrete locales backing this matcher, in preference order,
    /// repeats included.
    pub fn resolved_locales(&self) -> &[String] {
        &self.resolved_locales
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Rank emoji by shared descriptive meaning with `query`, keywords
    /// shown in the descriptions.
    pub fn similar(&self, query: &str, match_limit: usize) -> Vec<SimilarEntry> {
        self.similar_with(query, match_limit, true)
    }

    /// Rank emoji by shared descriptive meaning with `query`.
    ///
    /// A query that is not a catalog key yields an empty result; arbitrary
    /// text legitimately has no emoji match. Each candidate scores the
    /// number of its own tokens, counted with multiplicity, that appear in
    /// the query's token set; the query's own record therefore always
    /// scores the size of its full token bag. Results sort by score
    /// descending, then canonical index ascending, then key, and are
    /// truncated to `match_limit`. `show_keywords` controls the bracketed
    /// matched-token suffix on descriptions; emoji and scores are
    /// unaffected by it.
    pub fn similar_with(
        &self,
        query: &str,
        match_limit: usize,
        show_keywords: bool,
    ) -> Vec<SimilarEntry> {
        if match_limit == 0 {
            return Vec::new();
        }
        let Some(query_record) = self.catalog.lookup(query) else {
            return Vec::new();
        };
        let reference: AHashSet<&str> = query_record
            .combined_tokens
            .iter()
            .map(String::as_str)
            .collect();

        let mut scored: Vec<(&EmojiRecord, Vec<&str>)> = Vec::new();
        for record in self.catalog.records() {
            let matched: Vec<&str> = record
                .combined_tokens
                .iter()
                .map(String::as_str)
                .filter(|token| reference.contains(token))
                .collect();
            if !matched.is_empty() {
                scored.push((record, matched));
            }
        }
        scored.sort_by(|(a, matched_a), (b, matched_b)| {
            matched_b
                .len()
                .cmp(&matched_a.len())
                .then(a.canonical_index.cmp(&b.canonical_index))
                .then_with(|| a.key.cmp(&b.key))
        });
        scored.truncate(match_limit);

        scored
            .into_iter()
            .map(|(record, matched)| SimilarEntry {
                emoji: record.key.clone(),
                description: render(record.display_name(), &matched, show_keywords),
                score: matched.len(),
            })
            .collect()
    }
}
