//! libemoji-core
//!
//! Emoji similarity matching over curated multilingual annotations: given
//! a query emoji (or emoji sequence) and an ordered language preference
//! list, find and rank other emoji that share descriptive meaning,
//! optionally enriched with script transliteration (pinyin, kana/romaji).
//!
//! The engine operates over a closed corpus of emoji codepoint sequences;
//! it is not a general fuzzy-text search and performs no host or
//! filesystem discovery of its own — annotation payloads come from an
//! injected [`AnnotationSource`].
//!
//! Public API:
//! - `EmojiMatcher` / `MatcherConfig` - construction and the `similar` query
//! - `SimilarEntry` - one ranked result (emoji, description, score)
//! - `AnnotationRepository`, `AnnotationSource` - cached per-locale data loading
//! - `Catalog` / `EmojiRecord` - the immutable merged token-bag catalog
//! - `Augmenter`, `Transliterator`, `Capabilities` - optional transliteration
//! - `fallback_chain` - pure locale fallback resolution
//! - `EmojiError` - typed construction/loading failures

pub mod annotation;
pub use annotation::{
    AnnotationRepository, AnnotationSource, FsAnnotationSource, LocaleAnnotation,
    LocaleAnnotations, MemoryAnnotationSource,
};

pub mod candidate;
pub use candidate::{render, SimilarEntry};

pub mod catalog;
pub use catalog::{build_catalog, Catalog, EmojiRecord, LanguageEntry};

pub mod error;
pub use error::EmojiError;

pub mod locale;
pub use locale::{fallback_chain, language_of, normalize_tag, ROOT_LOCALE};

pub mod matcher;
pub use matcher::{EmojiMatcher, MatcherConfig};

pub mod metadata;
pub use metadata::{EmojiMeta, MetadataTable};

pub mod translit;
pub use translit::{
    Augmenter, Capabilities, NoopTransliterator, StaticTransliterator, Transliterator,
};
#[cfg(feature = "translit-kana")]
pub use translit::KakasiTransliterator;
#[cfg(feature = "translit-pinyin")]
pub use translit::PinyinTransliterator;

/// Utility helpers.
pub mod utils {
    /// Normalize input strings (NFC) and trim whitespace.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect::<String>().trim().to_string()
    }
}
