//! Error types for libemoji-core.
//!
//! Construction-time failures are the only fatal ones: a locale whose
//! annotation payload resolves but does not parse indicates corpus
//! corruption and must not be swallowed. Query-time "no match" is not an
//! error and is expressed as an empty result, never through this enum.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmojiError {
    /// No annotation payload exists for this exact locale tag. Callers
    /// normally retry along the locale fallback chain; this only surfaces
    /// from direct repository use.
    #[error("no annotation data available for locale '{locale}'")]
    DataUnavailable { locale: String },

    /// The annotation source produced a payload for this locale but the
    /// payload failed to parse. Fatal: the curated corpus is assumed
    /// intact and is not re-validated at query time.
    #[error("corrupt annotation data for locale '{locale}': {reason}")]
    CorruptAnnotationData { locale: String, reason: String },

    /// Invalid matcher configuration: empty language list, or none of the
    /// requested languages resolved to any loadable locale.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Bincode (de)serialization of a compiled annotation artifact failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for EmojiError {
    fn from(e: bincode::Error) -> Self {
        EmojiError::Serialization(e.to_string())
    }
}
