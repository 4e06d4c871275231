//! Extraction of translatable text units from a resource document.

use crate::{
    escape::decode_markup,
    types::{Document, ResourceElement, TextUnit, UnitKey, UnitMap},
};

/// Collects every translatable unit of the document's top-level elements.
///
/// Elements marked `translatable="false"` are skipped as a whole, whatever
/// their kind. Empty texts are omitted. When a name repeats within one kind,
/// the first occurrence keeps the key.
pub fn collect(document: &Document) -> UnitMap {
    let mut units = UnitMap::new();

    for element in &document.elements {
        if !element.is_translatable() {
            continue;
        }
        match element {
            ResourceElement::String(s) => {
                insert_unit(&mut units, UnitKey::string(s.name()), &s.content);
            }
            ResourceElement::Plurals(p) => {
                for item in &p.items {
                    insert_unit(
                        &mut units,
                        UnitKey::plural(p.name(), item.quantity),
                        &item.content,
                    );
                }
            }
            ResourceElement::Array(a) => {
                for (index, item) in a.items.iter().enumerate() {
                    insert_unit(&mut units, UnitKey::array(a.name(), index), &item.content);
                }
            }
            ResourceElement::Opaque(_) => {}
        }
    }

    tracing::debug!(units = units.len(), "collected translatable units");
    units
}

fn insert_unit(units: &mut UnitMap, key: UnitKey, markup: &str) {
    let text = decode_markup(markup).trim().to_string();
    if text.is_empty() {
        return;
    }
    if units.contains_key(&key) {
        tracing::warn!(%key, "duplicate resource name, keeping the first occurrence");
        return;
    }
    units.insert(key.clone(), TextUnit { key, text });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{traits::ResourceCodec, types::PluralQuantity};
    use indoc::indoc;

    fn parse(xml: &str) -> Document {
        Document::parse_str(xml).unwrap()
    }

    #[test]
    fn test_collects_all_kinds() {
        let document = parse(indoc! {r#"
            <resources>
                <string name="title">  My App  </string>
                <plurals name="apples">
                    <item quantity="one">One apple</item>
                    <item quantity="other">%d apples</item>
                </plurals>
                <string-array name="days">
                    <item>Mon</item>
                    <item>Tue</item>
                </string-array>
                <dimen name="margin">16dp</dimen>
            </resources>
        "#});
        let units = collect(&document);

        let keys: Vec<String> = units.keys().map(|k| k.to_string()).collect();
        assert_eq!(
            keys,
            vec![
                "string::title",
                "plural::apples::one",
                "plural::apples::other",
                "array::days::0",
                "array::days::1",
            ]
        );
        assert_eq!(units[&UnitKey::string("title")].text, "My App");
        assert_eq!(
            units[&UnitKey::plural("apples", PluralQuantity::Other)].text,
            "%d apples"
        );
        assert_eq!(units[&UnitKey::array("days", 1)].text, "Tue");
    }

    #[test]
    fn test_skips_non_translatable_of_every_kind() {
        let document = parse(indoc! {r#"
            <resources>
                <string name="internal" translatable="false">DEBUG</string>
                <string name="shout" translatable="FALSE">LOUD</string>
                <plurals name="apples" translatable="false">
                    <item quantity="one">One apple</item>
                </plurals>
                <string-array name="days" translatable="False">
                    <item>Mon</item>
                </string-array>
                <string name="greeting" translatable="true">Hello</string>
            </resources>
        "#});
        let units = collect(&document);
        assert_eq!(units.len(), 1);
        assert!(units.contains_key(&UnitKey::string("greeting")));
    }

    #[test]
    fn test_empty_items_are_omitted_but_keep_positions() {
        let document = parse(indoc! {r#"
            <resources>
                <string name="blank"></string>
                <plurals name="apples">
                    <item quantity="zero"></item>
                    <item quantity="other">Apples</item>
                </plurals>
                <string-array name="days">
                    <item></item>
                    <item>   </item>
                    <item>Wed</item>
                </string-array>
            </resources>
        "#});
        let units = collect(&document);
        let keys: Vec<String> = units.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["plural::apples::other", "array::days::2"]);
    }

    #[test]
    fn test_text_is_decoded() {
        let document = parse(r#"<resources><string name="a">Tom &amp; <b>Jerry</b></string></resources>"#);
        let units = collect(&document);
        assert_eq!(units[&UnitKey::string("a")].text, "Tom & <b>Jerry</b>");
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let document = parse(indoc! {r#"
            <resources>
                <string name="a">First</string>
                <string name="a">Second</string>
                <string-array name="a"><item>Array</item></string-array>
            </resources>
        "#});
        let units = collect(&document);
        assert_eq!(units.len(), 2);
        assert_eq!(units[&UnitKey::string("a")].text, "First");
        assert_eq!(units[&UnitKey::array("a", 0)].text, "Array");
    }

    #[test]
    fn test_unit_keys_match_map_keys() {
        let document = parse(r#"<resources><string name="x">X</string></resources>"#);
        for (key, unit) in collect(&document) {
            assert_eq!(key, unit.key);
        }
    }
}
