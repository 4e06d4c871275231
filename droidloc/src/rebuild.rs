//! Reassembly of a resource document from translated units.

use crate::{
    escape::{decode_markup, escape},
    types::{
        ArrayElement, ArrayItem, Document, PluralItem, PluralsElement, ResourceElement,
        StringElement, Translations, UnitKey,
    },
};

/// Builds a fresh document with the structure of `document` and the texts of
/// `translated`.
///
/// Translatable texts are looked up by unit key and fall back to the source
/// text when missing. Non-translatable texts are the source text. Either way
/// the text goes through [`escape`]. Opaque elements are copied untouched.
pub fn rebuild(document: &Document, translated: &Translations) -> Document {
    let elements = document
        .elements
        .iter()
        .map(|element| rebuild_element(element, translated))
        .collect();

    Document {
        root: document.root.clone(),
        elements,
    }
}

fn rebuild_element(element: &ResourceElement, translated: &Translations) -> ResourceElement {
    let lookup = |key: UnitKey, source: &str| -> String {
        let text = if element.is_translatable() {
            translated.get(&key).map(String::as_str)
        } else {
            None
        };
        match text {
            Some(text) => escape(text),
            None => escape(decode_markup(source).trim()),
        }
    };

    match element {
        ResourceElement::String(s) => ResourceElement::String(StringElement {
            header: s.header.clone(),
            content: lookup(UnitKey::string(s.name()), &s.content),
        }),
        ResourceElement::Plurals(p) => ResourceElement::Plurals(PluralsElement {
            header: p.header.clone(),
            items: p
                .items
                .iter()
                .map(|item| PluralItem {
                    content: lookup(UnitKey::plural(p.name(), item.quantity), &item.content),
                    ..item.clone()
                })
                .collect(),
            trailing_comments: p.trailing_comments.clone(),
        }),
        ResourceElement::Array(a) => ResourceElement::Array(ArrayElement {
            header: a.header.clone(),
            items: a
                .items
                .iter()
                .enumerate()
                .map(|(index, item)| ArrayItem {
                    content: lookup(UnitKey::array(a.name(), index), &item.content),
                    ..item.clone()
                })
                .collect(),
            trailing_comments: a.trailing_comments.clone(),
        }),
        ResourceElement::Opaque(o) => ResourceElement::Opaque(o.clone()),
    }
}
