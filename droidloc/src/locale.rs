//! Locale tag handling: Android `values-*` directory names and the language
//! codes expected by the translation backend.

use unic_langid::LanguageIdentifier;

/// Locale tags whose backend language code differs from the tag itself.
/// Keys are lowercase with `-` separators.
const BACKEND_CODES: &[(&str, &str)] = &[
    // Legacy ISO 639 codes still used by Android resource qualifiers.
    ("in", "id"),
    ("iw", "he"),
    ("ji", "yi"),
    // Regional English collapses to plain English.
    ("en-au", "en"),
    ("en-ca", "en"),
    ("en-gb", "en"),
    ("en-ie", "en"),
    ("en-in", "en"),
    ("en-nz", "en"),
    ("en-us", "en"),
    ("en-za", "en"),
];

fn subtags(tag: &str) -> Vec<&str> {
    tag.trim()
        .split(['-', '_'])
        .filter(|part| !part.is_empty())
        .collect()
}

/// Whether the tag has any subtag. Tags without one (`""`, `"-"`) map to
/// the unqualified `values` directory of the source strings.
pub fn is_qualified(locale_tag: &str) -> bool {
    !subtags(locale_tag).is_empty()
}

/// Output directory name for a locale tag, following Android's resource
/// qualifier rules.
///
/// ```rust
/// use droidloc::locale::directory_for;
/// assert_eq!(directory_for("fr"), "values-fr");
/// assert_eq!(directory_for("pt-BR"), "values-pt-rBR");
/// assert_eq!(directory_for("zh-Hant-TW"), "values-b+zh+Hant+TW");
/// ```
pub fn directory_for(locale_tag: &str) -> String {
    match subtags(locale_tag).as_slice() {
        [] => "values".to_string(),
        [language] => format!("values-{}", language),
        [language, region] => format!("values-{}-r{}", language, region.to_uppercase()),
        parts => format!("values-b+{}", parts.join("+")),
    }
}

/// Language code to send to the backend for a locale tag. Tags without an
/// entry in the lookup table pass through unchanged.
pub fn backend_language_code(locale_tag: &str) -> String {
    let normalized = subtags(locale_tag).join("-").to_ascii_lowercase();
    BACKEND_CODES
        .iter()
        .find(|(tag, _)| *tag == normalized)
        .map(|(_, code)| code.to_string())
        .unwrap_or_else(|| locale_tag.trim().to_string())
}

/// Base language subtag of a locale tag, lowercase.
pub fn base_language(locale_tag: &str) -> String {
    let normalized = subtags(locale_tag).join("-");
    match normalized.parse::<LanguageIdentifier>() {
        Ok(lang_id) => lang_id.language.to_string(),
        Err(_) => subtags(locale_tag)
            .first()
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_default(),
    }
}

/// Whether translating between the two tags would be a no-op, comparing
/// base languages after backend code mapping (`in` and `id` are the same
/// language).
pub fn same_language(source: &str, target: &str) -> bool {
    base_language(&backend_language_code(source)) == base_language(&backend_language_code(target))
}
