//! Annotation repository: per-locale emoji name/keyword data.
//!
//! One locale's data is a JSON payload in the shape
//!
//! ```json
//! {
//!   "locale": "en",
//!   "annotations": {
//!     "🐫": { "name": "two-hump camel", "keywords": ["bactrian", "camel", "hump"] }
//!   }
//! }
//! ```
//!
//! Payloads are handed to the core by an [`AnnotationSource`] collaborator;
//! the core never searches the filesystem or the host on its own. Parsed
//! locales are cached in an LRU keyed by normalized locale tag so matcher
//! instances sharing a repository never re-parse the same corpus file.
//!
//! Public API:
//! - `LocaleAnnotation` — (name, keywords) for one emoji in one locale
//! - `LocaleAnnotations` — parsed map for one locale, bincode round-trip
//! - `AnnotationSource` — payload provider trait (`FsAnnotationSource`,
//!   `MemoryAnnotationSource`)
//! - `AnnotationRepository` — caching loader with fallback-aware errors

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use lru::LruCache;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::EmojiError;
use crate::locale::normalize_tag;
use crate::metadata::MetadataTable;
use crate::utils;

type Map<K, V> = HashMap<K, V, ahash::RandomState>;

/// Parsed locales kept hot across matcher constructions.
const LOCALE_CACHE_CAP: usize = 64;

/// Curated (name, keyword-list) data for one emoji in one locale.
///
/// Keywords keep the order declared by the annotation source; duplicates
/// within the locale are removed at parse time. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleAnnotation {
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PayloadEntry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AnnotationPayload {
    #[serde(default)]
    #[allow(dead_code)]
    locale: String,
    annotations: HashMap<String, PayloadEntry>,
}

/// All annotations of one resolved locale, keyed by NFC-normalized
/// codepoint sequence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocaleAnnotations {
    locale: String,
    map: Map<String, LocaleAnnotation>,
}

impl LocaleAnnotations {
    /// Parse a JSON payload for `locale`.
    ///
    /// Emoji keys are NFC-normalized and in-locale duplicate keywords are
    /// dropped (first occurrence wins, order otherwise preserved).
    pub fn parse(locale: &str, payload: &str) -> Result<Self, EmojiError> {
        let payload: AnnotationPayload =
            serde_json::from_str(payload).map_err(|e| EmojiError::CorruptAnnotationData {
                locale: locale.to_string(),
                reason: e.to_string(),
            })?;
        let mut map: Map<String, LocaleAnnotation> = Map::default();
        for (emoji, entry) in payload.annotations {
            let mut seen = ahash::AHashSet::new();
            let mut keywords = Vec::with_capacity(entry.keywords.len());
            for kw in entry.keywords {
                if seen.insert(kw.clone()) {
                    keywords.push(kw);
                }
            }
            map.insert(
                utils::normalize(&emoji),
                LocaleAnnotation {
                    name: entry.name,
                    keywords,
                },
            );
        }
        tracing::debug!(locale, emoji_count = map.len(), "parsed annotation payload");
        Ok(Self {
            locale: locale.to_string(),
            map,
        })
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn get(&self, emoji: &str) -> Option<&LocaleAnnotation> {
        self.map.get(emoji)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &LocaleAnnotation)> {
        self.map.iter()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Save the parsed locale to a bincode artifact for fast startup.
    pub fn save_bincode<P: AsRef<Path>>(&self, path: P) -> Result<(), EmojiError> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        bincode::serialize_into(writer, self)?;
        Ok(())
    }

    /// Load a locale from a bincode artifact produced by `save_bincode`.
    pub fn load_bincode<P: AsRef<Path>>(path: P) -> Result<Self, EmojiError> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let annotations: Self = bincode::deserialize_from(reader)?;
        Ok(annotations)
    }
}

/// Collaborator boundary: supplies raw annotation payloads by locale tag,
/// or a not-found signal. Implementations decide where payloads live; the
/// core only consumes them.
pub trait AnnotationSource: Send + Sync {
    /// Raw JSON payload for an exact locale tag. `Ok(None)` means the
    /// source has no data for it (the caller then walks the fallback
    /// chain); an error means the payload exists but could not be read
    /// and must surface instead of triggering a silent fallback.
    fn annotations(&self, locale: &str) -> Result<Option<String>, EmojiError>;

    /// Raw JSON payload of the language-independent emoji metadata table
    /// (category/group tags, canonical ordering). `Ok(None)` if the
    /// source does not carry one.
    fn metadata(&self) -> Result<Option<String>, EmojiError> {
        Ok(None)
    }
}

/// Reads `<dir>/<locale>.json` payloads and `<dir>/emoji.json` metadata
/// from a caller-supplied directory.
#[derive(Debug, Clone)]
pub struct FsAnnotationSource {
    dir: PathBuf,
}

impl FsAnnotationSource {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }
}

/// Only a missing file is the not-found signal; any other read failure
/// (permissions, a directory in the file's place) surfaces as `Io`.
fn read_payload(path: PathBuf) -> Result<Option<String>, EmojiError> {
    match std::fs::read_to_string(&path) {
        Ok(payload) => Ok(Some(payload)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(EmojiError::Io(e)),
    }
}

impl AnnotationSource for FsAnnotationSource {
    fn annotations(&self, locale: &str) -> Result<Option<String>, EmojiError> {
        read_payload(self.dir.join(format!("{locale}.json")))
    }

    fn metadata(&self) -> Result<Option<String>, EmojiError> {
        read_payload(self.dir.join("emoji.json"))
    }
}

/// In-memory payload registry for tests and embedders that ship their own
/// corpus.
#[derive(Debug, Clone, Default)]
pub struct MemoryAnnotationSource {
    payloads: HashMap<String, String>,
    metadata: Option<String>,
}

impl MemoryAnnotationSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locale<L: Into<String>, P: Into<String>>(mut self, locale: L, payload: P) -> Self {
        self.payloads.insert(locale.into(), payload.into());
        self
    }

    pub fn with_metadata<P: Into<String>>(mut self, payload: P) -> Self {
        self.metadata = Some(payload.into());
        self
    }
}

impl AnnotationSource for MemoryAnnotationSource {
    fn annotations(&self, locale: &str) -> Result<Option<String>, EmojiError> {
        Ok(self.payloads.get(locale).cloned())
    }

    fn metadata(&self) -> Result<Option<String>, EmojiError> {
        Ok(self.metadata.clone())
    }
}

/// Caching loader over an [`AnnotationSource`].
///
/// Share one repository (via `Arc`) between matcher instances with
/// overlapping language lists to parse each locale at most once. The LRU
/// is the only interior-mutability point; parsed locales are handed out as
/// `Arc` and safe for unsynchronized concurrent reads.
pub struct AnnotationRepository {
    source: Arc<dyn AnnotationSource>,
    cache: Mutex<LruCache<String, Arc<LocaleAnnotations>>>,
    metadata: OnceCell<Arc<MetadataTable>>,
}

impl AnnotationRepository {
    pub fn new(source: Arc<dyn AnnotationSource>) -> Self {
        // LOCALE_CACHE_CAP is a nonzero constant.
        let cap = NonZeroUsize::new(LOCALE_CACHE_CAP).unwrap_or(NonZeroUsize::MIN);
        Self {
            source,
            cache: Mutex::new(LruCache::new(cap)),
            metadata: OnceCell::new(),
        }
    }

    /// Load annotations for one exact locale.
    ///
    /// `DataUnavailable` if the source has no payload for the tag (the
    /// caller then retries with the next fallback candidate);
    /// `CorruptAnnotationData` if a resolved payload fails to parse.
    pub fn load(&self, locale: &str) -> Result<Arc<LocaleAnnotations>, EmojiError> {
        let locale = normalize_tag(locale);
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(hit) = cache.get(&locale) {
                tracing::debug!(%locale, "annotation cache hit");
                return Ok(Arc::clone(hit));
            }
        }
        let payload = self
            .source
            .annotations(&locale)?
            .ok_or_else(|| EmojiError::DataUnavailable {
                locale: locale.clone(),
            })?;
        let annotations = Arc::new(LocaleAnnotations::parse(&locale, &payload)?);
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(locale, Arc::clone(&annotations));
        }
        Ok(annotations)
    }

    /// The language-independent metadata table, parsed once.
    ///
    /// A source without metadata yields an empty table: records then carry
    /// no category/group tokens and sort after indexed ones.
    pub fn metadata(&self) -> Result<Arc<MetadataTable>, EmojiError> {
        self.metadata
            .get_or_try_init(|| match self.source.metadata()? {
                Some(payload) => Ok(Arc::new(MetadataTable::parse(&payload)?)),
                None => {
                    tracing::warn!("annotation source has no emoji metadata table");
                    Ok(Arc::new(MetadataTable::default()))
                }
            })
            .map(Arc::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EN: &str = r#"{
        "locale": "en",
        "annotations": {
            "🐫": { "name": "two-hump camel", "keywords": ["bactrian", "camel", "hump", "camel"] }
        }
    }"#;

    #[test]
    fn parse_dedups_keywords_in_order() {
        let ann = LocaleAnnotations::parse("en", EN).unwrap();
        let camel = ann.get("🐫").unwrap();
        assert_eq!(camel.name, "two-hump camel");
        assert_eq!(camel.keywords, vec!["bactrian", "camel", "hump"]);
    }

    #[test]
    fn parse_rejects_corrupt_payload() {
        let err = LocaleAnnotations::parse("en", "{ not json").unwrap_err();
        match err {
            EmojiError::CorruptAnnotationData { locale, .. } => assert_eq!(locale, "en"),
            other => panic!("expected CorruptAnnotationData, got {other:?}"),
        }
    }

    #[test]
    fn repository_reports_missing_locale() {
        let repo = AnnotationRepository::new(Arc::new(MemoryAnnotationSource::new()));
        let err = repo.load("de_CH").unwrap_err();
        match err {
            EmojiError::DataUnavailable { locale } => assert_eq!(locale, "de_CH"),
            other => panic!("expected DataUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn repository_caches_parsed_locales() {
        let source = MemoryAnnotationSource::new().with_locale("en", EN);
        let repo = AnnotationRepository::new(Arc::new(source));
        let first = repo.load("en").unwrap();
        let second = repo.load("en").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn repository_normalizes_locale_keys() {
        let source = MemoryAnnotationSource::new().with_locale("en", EN);
        let repo = AnnotationRepository::new(Arc::new(source));
        assert!(repo.load("EN.UTF-8").is_ok());
    }

    #[test]
    fn fs_source_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let repo = AnnotationRepository::new(Arc::new(FsAnnotationSource::new(dir.path())));
        let err = repo.load("sv").unwrap_err();
        match err {
            EmojiError::DataUnavailable { locale } => assert_eq!(locale, "sv"),
            other => panic!("expected DataUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn fs_source_surfaces_unreadable_payloads() {
        // A directory where the payload file should be fails with a
        // non-NotFound kind; that must not be mistaken for missing data.
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sv.json")).unwrap();
        let repo = AnnotationRepository::new(Arc::new(FsAnnotationSource::new(dir.path())));
        let err = repo.load("sv").unwrap_err();
        match err {
            EmojiError::Io(_) => {}
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn bincode_roundtrip() {
        let ann = LocaleAnnotations::parse("en", EN).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("en.bin");
        ann.save_bincode(&path).unwrap();
        let loaded = LocaleAnnotations::load_bincode(&path).unwrap();
        assert_eq!(loaded.locale(), "en");
        assert_eq!(loaded.get("🐫"), ann.get("🐫"));
    }
}
