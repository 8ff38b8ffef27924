//! Locale tag normalization and fallback chains.
//!
//! Resolution of a requested language to concrete annotation data happens
//! in two pure steps kept free of I/O so they are testable with synthetic
//! locale tables:
//! - `normalize_tag` canonicalizes a raw tag (`"de-ch.UTF-8"` → `"de_CH"`)
//! - `fallback_chain` lists the candidate locales to try, most specific
//!   first, ending with the root locale (`"de_CH"` → `["de_CH", "de", "en"]`)
//!
//! The repository-backed resolution over a whole preference list lives in
//! `matcher`; this module knows nothing about annotation sources.

/// Last-resort locale appended to every fallback chain.
pub const ROOT_LOCALE: &str = "en";

/// Canonicalize a locale tag.
///
/// Accepts the common spellings seen in environment variables and BCP-47
/// tags: `-` or `_` separators, optional `.ENCODING` and `@variant`
/// suffixes. The language subtag is lowercased, the region subtag
/// uppercased. Subtags beyond language and region are dropped.
pub fn normalize_tag(tag: &str) -> String {
    let tag = tag.trim();
    let tag = tag.split(['.', '@']).next().unwrap_or("");
    let mut parts = tag.split(['-', '_']).filter(|p| !p.is_empty());
    let lang = match parts.next() {
        Some(l) => l.to_lowercase(),
        None => return String::new(),
    };
    match parts.next() {
        Some(region) => format!("{}_{}", lang, region.to_uppercase()),
        None => lang,
    }
}

/// Ordered candidate locales for one requested language: the exact tag,
/// then the bare language, then the root locale.
///
/// The returned chain never contains duplicates, so a request for the
/// root language itself yields a single-element chain.
pub fn fallback_chain(tag: &str) -> Vec<String> {
    let normalized = normalize_tag(tag);
    if normalized.is_empty() {
        return vec![ROOT_LOCALE.to_string()];
    }
    let mut chain = vec![normalized.clone()];
    if let Some((lang, _)) = normalized.split_once('_') {
        if lang != normalized {
            chain.push(lang.to_string());
        }
    }
    if !chain.iter().any(|c| c == ROOT_LOCALE) {
        chain.push(ROOT_LOCALE.to_string());
    }
    chain
}

/// The bare language subtag of a (possibly unnormalized) locale tag.
/// Used to route transliteration by language family.
pub fn language_of(tag: &str) -> String {
    let normalized = normalize_tag(tag);
    match normalized.split_once('_') {
        Some((lang, _)) => lang.to_string(),
        None => normalized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_plain_language() {
        assert_eq!(normalize_tag("en"), "en");
        assert_eq!(normalize_tag("EN"), "en");
    }

    #[test]
    fn normalize_region_variants() {
        assert_eq!(normalize_tag("de_CH"), "de_CH");
        assert_eq!(normalize_tag("de-ch"), "de_CH");
        assert_eq!(normalize_tag("DE-ch"), "de_CH");
    }

    #[test]
    fn normalize_strips_encoding_and_variant() {
        assert_eq!(normalize_tag("de_CH.UTF-8"), "de_CH");
        assert_eq!(normalize_tag("sr_RS@latin"), "sr_RS");
        assert_eq!(normalize_tag("ja_JP.eucJP"), "ja_JP");
    }

    #[test]
    fn chain_region_then_language_then_root() {
        assert_eq!(fallback_chain("de_CH"), vec!["de_CH", "de", "en"]);
        assert_eq!(fallback_chain("zh-cn"), vec!["zh_CN", "zh", "en"]);
    }

    #[test]
    fn chain_for_root_language_has_no_duplicates() {
        assert_eq!(fallback_chain("en"), vec!["en"]);
        assert_eq!(fallback_chain("en_US"), vec!["en_US", "en"]);
    }

    #[test]
    fn chain_for_empty_tag_is_root_only() {
        assert_eq!(fallback_chain(""), vec!["en"]);
        assert_eq!(fallback_chain("  "), vec!["en"]);
    }

    #[test]
    fn language_of_drops_region() {
        assert_eq!(language_of("zh_TW"), "zh");
        assert_eq!(language_of("ja"), "ja");
        assert_eq!(language_of("ja_JP.utf8"), "ja");
    }
}
