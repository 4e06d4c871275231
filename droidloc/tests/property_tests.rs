use droidloc::escape::{decode_markup, escape};
use droidloc::traits::ResourceCodec;
use droidloc::types::{
    ArrayElement, ArrayItem, Document, ElementHeader, PluralItem, PluralQuantity, PluralsElement,
    ResourceElement, StringElement,
};
use droidloc::{Translations, UnitKey, collect, rebuild};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn name_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,12}").expect("valid name regex")
}

fn plain_text_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 ,\\.!\\?%]{1,30}").expect("valid text regex")
}

/// Text with characters that need escaping and balanced inline tags.
fn markup_text_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("([A-Za-z]{1,6}| & | < | > | ' |<b>[a-z]{1,4}</b>|<i>[a-z]{1,4}</i>){1,10}")
        .expect("valid markup regex")
}

fn document_from(entries: &BTreeMap<String, String>) -> Document {
    let mut document = Document::new();
    for (name, text) in entries {
        document
            .elements
            .push(ResourceElement::String(StringElement::new(name, escape(text))));
    }
    document
}

const QUANTITIES: [PluralQuantity; 6] = [
    PluralQuantity::Zero,
    PluralQuantity::One,
    PluralQuantity::Two,
    PluralQuantity::Few,
    PluralQuantity::Many,
    PluralQuantity::Other,
];

/// One name shared by a string, a plurals and a string-array element.
#[derive(Debug, Clone)]
struct NamedTexts {
    string: String,
    quantities: Vec<PluralQuantity>,
    array: Vec<String>,
}

fn named_texts_strategy() -> impl Strategy<Value = NamedTexts> {
    (
        plain_text_strategy(),
        prop::sample::subsequence(QUANTITIES.to_vec(), 1..=QUANTITIES.len()),
        prop::collection::vec(plain_text_strategy(), 1..4),
    )
        .prop_map(|(string, quantities, array)| NamedTexts {
            string,
            quantities,
            array,
        })
}

fn plural_text(quantity: PluralQuantity) -> String {
    format!("{} items", quantity.as_str())
}

fn mixed_document_from(entries: &BTreeMap<String, NamedTexts>) -> Document {
    let mut document = Document::new();
    for (name, texts) in entries {
        document
            .elements
            .push(ResourceElement::String(StringElement::new(name, escape(&texts.string))));
        document.elements.push(ResourceElement::Plurals(PluralsElement {
            header: ElementHeader::new("plurals").with_attribute("name", name.as_str()),
            items: texts
                .quantities
                .iter()
                .map(|&quantity| PluralItem::new(quantity, plural_text(quantity)))
                .collect(),
            trailing_comments: Vec::new(),
        }));
        document.elements.push(ResourceElement::Array(ArrayElement {
            header: ElementHeader::new("string-array").with_attribute("name", name.as_str()),
            items: texts.array.iter().map(|text| ArrayItem::new(escape(text))).collect(),
            trailing_comments: Vec::new(),
        }));
    }
    document
}

proptest! {
    #[test]
    fn prop_escape_keeps_plain_text(text in plain_text_strategy()) {
        let escaped = escape(&text);
        prop_assert!(!escaped.contains('<'));
        prop_assert!(!escaped.contains('>'));
        prop_assert_eq!(escaped, text);
    }

    #[test]
    fn prop_escape_keeps_tags_and_escapes_the_rest(text in markup_text_strategy()) {
        let escaped = escape(&text);
        let sentinel = '\u{E000}';
        prop_assert!(!escaped.contains(sentinel));
        prop_assert!(!escaped.contains(" < "));
        prop_assert!(!escaped.contains(" > "));
        prop_assert!(!escaped.contains(" & "));
        prop_assert_eq!(escaped.matches("<b>").count(), text.matches("<b>").count());
        prop_assert_eq!(escaped.matches("</i>").count(), text.matches("</i>").count());
        for (index, _) in escaped.match_indices('\'') {
            prop_assert!(index > 0 && escaped.as_bytes()[index - 1] == b'\\');
        }
    }

    #[test]
    fn prop_collect_yields_one_unit_per_text_across_kinds(entries in prop::collection::btree_map(name_strategy(), named_texts_strategy(), 1..8)) {
        let units = collect(&mixed_document_from(&entries));

        let mut expected = 0;
        for (name, texts) in &entries {
            if !texts.string.trim().is_empty() {
                expected += 1;
                let unit = &units[&UnitKey::string(name)];
                prop_assert_eq!(unit.text.as_str(), texts.string.trim());
            }
            for &quantity in &texts.quantities {
                expected += 1;
                let unit = &units[&UnitKey::plural(name, quantity)];
                prop_assert_eq!(&unit.text, &plural_text(quantity));
            }
            for (index, text) in texts.array.iter().enumerate() {
                let key = UnitKey::array(name, index);
                if text.trim().is_empty() {
                    prop_assert!(!units.contains_key(&key));
                } else {
                    expected += 1;
                    prop_assert_eq!(units[&key].text.as_str(), text.trim());
                }
            }
        }
        prop_assert_eq!(units.len(), expected);
        for (key, unit) in &units {
            prop_assert_eq!(key, &unit.key);
        }
    }

    #[test]
    fn prop_rebuild_without_translations_survives_round_trip(entries in prop::collection::btree_map(name_strategy(), markup_text_strategy(), 1..8)) {
        let document = document_from(&entries);
        let rebuilt = rebuild(&document, &Translations::new());

        let mut serialized = Vec::new();
        rebuilt.encode(&mut serialized).expect("serialize");
        let reparsed = Document::parse_bytes(&serialized).expect("reparse");
        prop_assert_eq!(reparsed.elements.len(), entries.len());

        for (name, text) in &entries {
            let element = reparsed.find_string(name).expect("string present");
            let expected = text.trim().replace('\'', "\\'");
            let decoded = decode_markup(&element.content);
            prop_assert_eq!(decoded.trim(), expected.as_str());
        }
    }
}
