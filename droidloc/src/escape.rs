//! Escaping of translated text for Android resource content.
//!
//! Already escaped apostrophes (`\'`) and inline markup tags are shielded
//! behind placeholder tokens while the remaining text is escaped, then put
//! back verbatim.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref ESCAPED_QUOTE_REGEX: Regex = Regex::new(r"\\'").unwrap();
    static ref HTML_TAG_REGEX: Regex = Regex::new(r"</?[a-zA-Z]+[^>]*>").unwrap();
    static ref TAG_AMPERSAND_REGEX: Regex =
        Regex::new(r"&(#[0-9]+;|#x[0-9a-fA-F]+;|[A-Za-z][A-Za-z0-9]*;)?").unwrap();
}

/// Opening mark of placeholder tokens. A private-use code point, so none of
/// the escaping steps ever touch it.
const TOKEN_MARK: char = '\u{E000}';
const TOKEN_END: char = '\u{E001}';

/// Protected substrings of one [`escape`] call, in protection order.
///
/// A token is `<prefix><kind><index><TOKEN_END>`, where the prefix is a run of
/// [`TOKEN_MARK`] one longer than any run present in the input, so tokens
/// cannot occur in the text they protect.
struct PlaceholderTable {
    prefix: String,
    kind: char,
    originals: Vec<String>,
}

impl PlaceholderTable {
    fn new(input: &str, kind: char) -> Self {
        let mut prefix = String::from(TOKEN_MARK);
        while input.contains(&prefix) {
            prefix.push(TOKEN_MARK);
        }
        PlaceholderTable {
            prefix,
            kind,
            originals: Vec::new(),
        }
    }

    fn token(&self, index: usize) -> String {
        format!("{}{}{}{}", self.prefix, self.kind, index, TOKEN_END)
    }

    /// Replaces every match of `pattern` with a fresh token.
    fn protect(&mut self, text: &str, pattern: &Regex) -> String {
        pattern
            .replace_all(text, |caps: &Captures| {
                let token = self.token(self.originals.len());
                self.originals.push(caps[0].to_string());
                token
            })
            .into_owned()
    }

    fn restore(&self, mut text: String) -> String {
        for (index, original) in self.originals.iter().enumerate() {
            text = text.replace(&self.token(index), original);
        }
        text
    }
}

/// Escapes text so it can be embedded as `strings.xml` element content.
///
/// `&`, `<` and `>` become entities and bare `'` becomes `\'`. Existing `\'`
/// sequences and HTML-like tags (`<b>`, `</i>`, `<a href="..">`) pass through
/// unchanged, except that a `&` inside a tag which does not start an entity
/// reference is written as `&amp;`.
///
/// ```rust
/// use droidloc::escape::escape;
/// assert_eq!(escape("Tom & Jerry's"), r"Tom &amp; Jerry\'s");
/// assert_eq!(escape("Click <b>here</b>"), "Click <b>here</b>");
/// ```
pub fn escape(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut quotes = PlaceholderTable::new(text, 'Q');
    let safe = quotes.protect(text, &ESCAPED_QUOTE_REGEX);

    let mut tags = PlaceholderTable::new(&safe, 'T');
    let safe = tags.protect(&safe, &HTML_TAG_REGEX);
    for tag in &mut tags.originals {
        *tag = escape_bare_ampersands(tag).into_owned();
    }

    let safe = safe
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', r"\'");

    quotes.restore(tags.restore(safe))
}

/// [`escape`] for optional text; `None` yields an empty string.
pub fn escape_opt(text: Option<&str>) -> String {
    text.map(escape).unwrap_or_default()
}

fn escape_bare_ampersands(tag: &str) -> Cow<'_, str> {
    TAG_AMPERSAND_REGEX.replace_all(tag, |caps: &Captures| {
        if caps.get(1).is_some() {
            caps[0].to_string()
        } else {
            "&amp;".to_string()
        }
    })
}

/// Resolves XML entities in the text of element markup.
///
/// Inline tags are kept exactly as written, attribute values included, so
/// `<a href="?a=1&amp;b=2">` keeps its `&amp;`. A text run with an entity
/// quick-xml cannot resolve is left unchanged.
pub fn decode_markup(markup: &str) -> Cow<'_, str> {
    if !markup.contains('&') {
        return Cow::Borrowed(markup);
    }

    let mut decoded = String::with_capacity(markup.len());
    let mut last = 0;
    for tag in HTML_TAG_REGEX.find_iter(markup) {
        decoded.push_str(&decode_text(&markup[last..tag.start()]));
        decoded.push_str(tag.as_str());
        last = tag.end();
    }
    decoded.push_str(&decode_text(&markup[last..]));
    Cow::Owned(decoded)
}

fn decode_text(text: &str) -> Cow<'_, str> {
    quick_xml::escape::unescape(text).unwrap_or(Cow::Borrowed(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(escape(""), "");
        assert_eq!(escape_opt(None), "");
        assert_eq!(escape_opt(Some("a&b")), "a&amp;b");
    }

    #[test]
    fn test_markup_significant_characters() {
        assert_eq!(escape("a & b"), "a &amp; b");
        assert_eq!(escape("1 < 2 > 0"), "1 &lt; 2 &gt; 0");
        assert_eq!(escape("it's"), r"it\'s");
    }

    #[test]
    fn test_tag_preservation() {
        let escaped = escape("Click <b>here</b> now & 5 > 3");
        assert!(escaped.contains("<b>here</b>"));
        assert_eq!(escaped, "Click <b>here</b> now &amp; 5 &gt; 3");
    }

    #[test]
    fn test_tag_with_attributes() {
        assert_eq!(
            escape(r#"See <a href="https://example.com?a=1">docs</a>"#),
            r#"See <a href="https://example.com?a=1">docs</a>"#
        );
    }

    #[test]
    fn test_quote_protection() {
        let escaped = escape(r"It\'s <i>ok</i>");
        assert_eq!(escaped, r"It\'s <i>ok</i>");
        assert!(!escaped.contains(r"\\'"));
    }

    #[test]
    fn test_mixed_quotes() {
        assert_eq!(escape(r"It\'s Bob's"), r"It\'s Bob\'s");
    }

    #[test]
    fn test_quote_next_to_tag_is_escaped_once() {
        assert_eq!(escape("<b>'</b>"), r"<b>\'</b>");
        assert_eq!(escape(r"<b>\'</b>"), r"<b>\'</b>");
    }

    #[test]
    fn test_non_tag_angle_brackets() {
        assert_eq!(escape("a <3 b"), "a &lt;3 b");
        assert_eq!(escape("x < y"), "x &lt; y");
    }

    #[test]
    fn test_idempotent_on_escaped_fixtures() {
        let fixtures = [
            r"It\'s fine",
            "Click <b>here</b> now",
            r"<i>Don\'t</i> panic",
            "Plain text with %1$s placeholder",
            "",
        ];
        for fixture in fixtures {
            let once = escape(fixture);
            assert_eq!(once, fixture);
            assert_eq!(escape(&once), once);
        }
    }

    #[test]
    fn test_input_containing_token_characters() {
        let text = "\u{E000}Q0\u{E001} and \\' and '";
        assert_eq!(escape(text), "\u{E000}Q0\u{E001} and \\' and \\'");
    }

    #[test]
    fn test_many_placeholders() {
        let text = (0..12).map(|i| format!("<b>{}</b>\\'", i)).collect::<String>();
        assert_eq!(escape(&text), text);
    }

    #[test]
    fn test_decode_markup() {
        assert_eq!(decode_markup("Tom &amp; <b>Jerry</b>"), "Tom & <b>Jerry</b>");
        assert_eq!(decode_markup("&#8230;"), "\u{2026}");
        assert_eq!(decode_markup("&nbsp; stays"), "&nbsp; stays");
        assert_eq!(decode_markup("no entities <b>here</b>"), "no entities <b>here</b>");
    }

    #[test]
    fn test_decode_markup_leaves_attribute_values_encoded() {
        let markup = r#"See &amp; <a href="https://x.com/?a=1&amp;b=2" title="&quot;x&quot;">docs</a>"#;
        assert_eq!(
            decode_markup(markup),
            r#"See & <a href="https://x.com/?a=1&amp;b=2" title="&quot;x&quot;">docs</a>"#
        );
        assert_eq!(escape(&decode_markup(markup)), markup);
    }

    #[test]
    fn test_bare_ampersand_inside_tag_is_escaped() {
        assert_eq!(
            escape(r#"<a href="?a=1&b=2">go</a> & back"#),
            r#"<a href="?a=1&amp;b=2">go</a> &amp; back"#
        );
        assert_eq!(
            escape(r#"<a href="?a=1&amp;b=2&#38;c">go</a>"#),
            r#"<a href="?a=1&amp;b=2&#38;c">go</a>"#
        );
    }
}
