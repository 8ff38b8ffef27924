//! Transliteration augmentation: romanized/phonetic readings appended to
//! annotation token sequences.
//!
//! Chinese locales get pinyin readings, Japanese locales get kana and
//! romaji readings. Availability is a per-process capability decided by
//! the compiled feature set (`translit-pinyin`, `translit-kana`) and
//! detected exactly once; a missing capability degrades to the identity
//! augmentation — fewer tokens, lower scores, never an error.
//!
//! Providers are injected rather than read from globals, so tests can use
//! a table-driven [`StaticTransliterator`] regardless of features.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::locale::language_of;

/// Produces ordered readings for a text in a locale's script.
///
/// The first reading is the in-script phonetic form (pinyin with tone
/// marks, hiragana); later readings are secondary romanizations (romaji).
/// Empty output means the text or locale is unsupported.
pub trait Transliterator: Send + Sync {
    fn transliterate(&self, text: &str, locale: &str) -> Vec<String>;
}

/// No readings for anything; augmentation with it is the identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTransliterator;

impl Transliterator for NoopTransliterator {
    fn transliterate(&self, _text: &str, _locale: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Fixed-table transliterator for tests and embedders with precomputed
/// readings.
#[derive(Debug, Clone, Default)]
pub struct StaticTransliterator {
    readings: HashMap<String, Vec<String>>,
}

impl StaticTransliterator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reading<T: Into<String>>(mut self, text: T, readings: &[&str]) -> Self {
        self.readings
            .insert(text.into(), readings.iter().map(|r| r.to_string()).collect());
        self
    }
}

impl Transliterator for StaticTransliterator {
    fn transliterate(&self, text: &str, _locale: &str) -> Vec<String> {
        self.readings.get(text).cloned().unwrap_or_default()
    }
}

/// Hanzi → tone-marked pinyin, syllables joined (`赛马` → `sàimǎ`).
#[cfg(feature = "translit-pinyin")]
#[derive(Debug, Clone, Copy, Default)]
pub struct PinyinTransliterator;

#[cfg(feature = "translit-pinyin")]
impl Transliterator for PinyinTransliterator {
    fn transliterate(&self, text: &str, _locale: &str) -> Vec<String> {
        use pinyin::ToPinyin;
        let mut reading = String::new();
        let mut converted = false;
        for (ch, syllable) in text.chars().zip(text.to_pinyin()) {
            match syllable {
                Some(p) => {
                    reading.push_str(p.with_tone());
                    converted = true;
                }
                None => reading.push(ch),
            }
        }
        if converted && reading != text {
            vec![reading]
        } else {
            Vec::new()
        }
    }
}

/// Japanese → [hiragana, romaji] readings via kakasi.
#[cfg(feature = "translit-kana")]
#[derive(Debug, Clone, Copy, Default)]
pub struct KakasiTransliterator;

#[cfg(feature = "translit-kana")]
impl Transliterator for KakasiTransliterator {
    fn transliterate(&self, text: &str, _locale: &str) -> Vec<String> {
        let result = kakasi::convert(text);
        let romaji: String = result.romaji.split_whitespace().collect();
        // Hiragana first even when identical to the input: the augmenter
        // interleaves position zero and sends the rest to the tail, which
        // keeps romaji trailing for kana-only keywords.
        vec![result.hiragana, romaji]
    }
}

/// Which transliteration subsystems this process can use. Resolved once,
/// read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub pinyin: bool,
    pub kana: bool,
}

static DETECTED: Lazy<Capabilities> = Lazy::new(|| Capabilities {
    pinyin: cfg!(feature = "translit-pinyin"),
    kana: cfg!(feature = "translit-kana"),
});

impl Capabilities {
    /// The process-wide capability set implied by the compiled features.
    pub fn detect() -> Self {
        *DETECTED
    }

    pub const fn none() -> Self {
        Self {
            pinyin: false,
            kana: false,
        }
    }
}

#[cfg(feature = "translit-pinyin")]
fn default_pinyin() -> Option<Arc<dyn Transliterator>> {
    Some(Arc::new(PinyinTransliterator))
}

#[cfg(not(feature = "translit-pinyin"))]
fn default_pinyin() -> Option<Arc<dyn Transliterator>> {
    None
}

#[cfg(feature = "translit-kana")]
fn default_kana() -> Option<Arc<dyn Transliterator>> {
    Some(Arc::new(KakasiTransliterator))
}

#[cfg(not(feature = "translit-kana"))]
fn default_kana() -> Option<Arc<dyn Transliterator>> {
    None
}

/// Routes token sequences through the transliterator matching the
/// locale's language family and splices the readings in.
///
/// Placement rule: a token's first reading, when non-empty and different
/// from the token, is inserted directly after it; every later reading is
/// appended after the whole sequence, in token order. This yields pinyin
/// interleaved with its hanzi and romaji collected at the end of the bag.
#[derive(Clone)]
pub struct Augmenter {
    pinyin: Option<Arc<dyn Transliterator>>,
    kana: Option<Arc<dyn Transliterator>>,
}

impl Augmenter {
    /// Providers for every capability the process detected.
    pub fn detected() -> Self {
        let caps = Capabilities::detect();
        Self {
            pinyin: if caps.pinyin { default_pinyin() } else { None },
            kana: if caps.kana { default_kana() } else { None },
        }
    }

    /// No providers; `augment` is the identity for every locale.
    pub fn disabled() -> Self {
        Self {
            pinyin: None,
            kana: None,
        }
    }

    /// Explicitly injected providers.
    pub fn with_providers(
        pinyin: Option<Arc<dyn Transliterator>>,
        kana: Option<Arc<dyn Transliterator>>,
    ) -> Self {
        Self { pinyin, kana }
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            pinyin: self.pinyin.is_some(),
            kana: self.kana.is_some(),
        }
    }

    fn provider_for(&self, locale: &str) -> Option<&dyn Transliterator> {
        match language_of(locale).as_str() {
            "zh" => self.pinyin.as_deref(),
            "ja" => self.kana.as_deref(),
            _ => None,
        }
    }

    /// Augment one locale's token sequence with readings.
    pub fn augment(&self, locale: &str, tokens: &[String]) -> Vec<String> {
        let Some(provider) = self.provider_for(locale) else {
            return tokens.to_vec();
        };
        let mut out = Vec::with_capacity(tokens.len() * 2);
        let mut tail = Vec::new();
        for token in tokens {
            out.push(token.clone());
            let mut readings = provider.transliterate(token, locale).into_iter();
            if let Some(first) = readings.next() {
                if !first.is_empty() && first != *token {
                    out.push(first);
                }
            }
            for rest in readings {
                if !rest.is_empty() && rest != *token {
                    tail.push(rest);
                }
            }
        }
        out.extend(tail);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn disabled_augmenter_is_identity() {
        let aug = Augmenter::disabled();
        let toks = tokens(&["赛马", "马"]);
        assert_eq!(aug.augment("zh_CN", &toks), toks);
        assert_eq!(aug.capabilities(), Capabilities::none());
    }

    #[test]
    fn unrelated_language_is_untouched() {
        let table = StaticTransliterator::new().with_reading("camel", &["kamel"]);
        let aug = Augmenter::with_providers(Some(Arc::new(table)), None);
        let toks = tokens(&["camel"]);
        assert_eq!(aug.augment("en_US", &toks), toks);
    }

    #[test]
    fn single_reading_is_interleaved() {
        let table = StaticTransliterator::new()
            .with_reading("赛马", &["sàimǎ"])
            .with_reading("马", &["mǎ"]);
        let aug = Augmenter::with_providers(Some(Arc::new(table)), None);
        assert_eq!(
            aug.augment("zh_CN", &tokens(&["赛马", "马"])),
            tokens(&["赛马", "sàimǎ", "马", "mǎ"])
        );
    }

    #[test]
    fn secondary_readings_trail_in_token_order() {
        let table = StaticTransliterator::new()
            .with_reading("動物", &["どうぶつ", "doubutsu"])
            .with_reading("ひな", &["ひな", "hina"]);
        let aug = Augmenter::with_providers(None, Some(Arc::new(table)));
        // Kana equal to its token is skipped; romaji always trails.
        assert_eq!(
            aug.augment("ja_JP", &tokens(&["ひな", "動物"])),
            tokens(&["ひな", "動物", "どうぶつ", "hina", "doubutsu"])
        );
    }

    #[test]
    fn detect_matches_compiled_features() {
        let caps = Capabilities::detect();
        assert_eq!(caps.pinyin, cfg!(feature = "translit-pinyin"));
        assert_eq!(caps.kana, cfg!(feature = "translit-kana"));
    }

    #[cfg(feature = "translit-pinyin")]
    #[test]
    fn pinyin_backend_reads_hanzi() {
        let tr = PinyinTransliterator;
        assert_eq!(tr.transliterate("马", "zh_CN"), vec!["mǎ".to_string()]);
        assert!(tr.transliterate("abc", "zh_CN").is_empty());
    }

    #[cfg(feature = "translit-kana")]
    #[test]
    fn kakasi_backend_reads_kanji() {
        let tr = KakasiTransliterator;
        let readings = tr.transliterate("動物", "ja_JP");
        assert_eq!(readings, vec!["どうぶつ".to_string(), "doubutsu".to_string()]);
    }
}
