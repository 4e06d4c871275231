//! Core types for droidloc.
//! The XML codec decodes into a [`Document`]; the collector derives [`TextUnit`]s
//! from it and the rebuilder produces a fresh [`Document`] per locale.

use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use quick_xml::events::Event;

use crate::error::Error;

/// Every translatable unit of a document, keyed by its composite identity.
pub type UnitMap = BTreeMap<UnitKey, TextUnit>;

/// Translated text per unit, keyed exactly like the [`UnitMap`] it came from.
pub type Translations = BTreeMap<UnitKey, String>;

/// A parsed `strings.xml` resource document.
///
/// Element order is significant and is preserved by parsing, rebuilding and
/// writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// The root element (normally `<resources>`) with its attributes.
    pub root: ElementHeader,

    /// Ordered top-level children of the root.
    pub elements: Vec<ResourceElement>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty `<resources>` document.
    pub fn new() -> Self {
        Document {
            root: ElementHeader::new("resources"),
            elements: Vec::new(),
        }
    }

    /// Finds a `<string>` element by name.
    pub fn find_string(&self, name: &str) -> Option<&StringElement> {
        self.elements.iter().find_map(|e| match e {
            ResourceElement::String(s) if s.name() == name => Some(s),
            _ => None,
        })
    }

    /// Finds a `<plurals>` element by name.
    pub fn find_plurals(&self, name: &str) -> Option<&PluralsElement> {
        self.elements.iter().find_map(|e| match e {
            ResourceElement::Plurals(p) if p.name() == name => Some(p),
            _ => None,
        })
    }

    /// Finds a `<string-array>` element by name.
    pub fn find_array(&self, name: &str) -> Option<&ArrayElement> {
        self.elements.iter().find_map(|e| match e {
            ResourceElement::Array(a) if a.name() == name => Some(a),
            _ => None,
        })
    }
}

/// Tag name plus attributes of an element, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHeader {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
}

impl ElementHeader {
    pub fn new(tag: impl Into<String>) -> Self {
        ElementHeader {
            tag: tag.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The `name` attribute, or an empty string when absent.
    pub fn name(&self) -> &str {
        self.attribute("name").unwrap_or_default()
    }

    /// `false` only when a `translatable` attribute is present and equals
    /// `false`, ignoring case.
    pub fn is_translatable(&self) -> bool {
        self.attribute("translatable")
            .is_none_or(|v| !v.trim().eq_ignore_ascii_case("false"))
    }
}

/// A top-level node of a resource document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceElement {
    /// `<string name="..">text</string>`
    String(StringElement),

    /// `<plurals name="..">` with `<item quantity="..">` children.
    Plurals(PluralsElement),

    /// `<string-array name="..">` with `<item>` children.
    Array(ArrayElement),

    /// Anything else: other element kinds and comments, replayed verbatim.
    Opaque(OpaqueElement),
}

impl ResourceElement {
    /// Name of the element, for the three kinds that carry one.
    pub fn name(&self) -> Option<&str> {
        match self {
            ResourceElement::String(s) => Some(s.name()),
            ResourceElement::Plurals(p) => Some(p.name()),
            ResourceElement::Array(a) => Some(a.name()),
            ResourceElement::Opaque(_) => None,
        }
    }

    pub fn is_translatable(&self) -> bool {
        match self {
            ResourceElement::String(s) => s.header.is_translatable(),
            ResourceElement::Plurals(p) => p.header.is_translatable(),
            ResourceElement::Array(a) => a.header.is_translatable(),
            ResourceElement::Opaque(_) => false,
        }
    }
}

/// `content` fields throughout the model hold markup as it appears in the
/// file: entities still escaped, inline tags kept literally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringElement {
    pub header: ElementHeader,
    pub content: String,
}

impl StringElement {
    pub fn new(name: &str, content: impl Into<String>) -> Self {
        StringElement {
            header: ElementHeader::new("string").with_attribute("name", name),
            content: content.into(),
        }
    }

    pub fn name(&self) -> &str {
        self.header.name()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralsElement {
    pub header: ElementHeader,
    pub items: Vec<PluralItem>,
    /// Comments after the last item.
    pub trailing_comments: Vec<String>,
}

impl PluralsElement {
    pub fn name(&self) -> &str {
        self.header.name()
    }
}

/// An `<item>` of a `<plurals>` element.
///
/// `header` carries every attribute of the item, `quantity` included, and is
/// what gets written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralItem {
    pub header: ElementHeader,
    pub quantity: PluralQuantity,
    pub content: String,
    /// Raw text of the comments between the previous item and this one.
    pub comments: Vec<String>,
}

impl PluralItem {
    pub fn new(quantity: PluralQuantity, content: impl Into<String>) -> Self {
        PluralItem {
            header: ElementHeader::new("item").with_attribute("quantity", quantity.as_str()),
            quantity,
            content: content.into(),
            comments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayElement {
    pub header: ElementHeader,
    pub items: Vec<ArrayItem>,
    /// Comments after the last item.
    pub trailing_comments: Vec<String>,
}

impl ArrayElement {
    pub fn name(&self) -> &str {
        self.header.name()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayItem {
    pub header: ElementHeader,
    pub content: String,
    /// Raw text of the comments between the previous item and this one.
    pub comments: Vec<String>,
}

impl ArrayItem {
    pub fn new(content: impl Into<String>) -> Self {
        ArrayItem {
            header: ElementHeader::new("item"),
            content: content.into(),
            comments: Vec::new(),
        }
    }
}

/// Owned XML events of a node the pipeline does not understand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueElement {
    pub events: Vec<Event<'static>>,
}

/// Android plural quantity tags.
#[derive(Ord, PartialOrd, Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum PluralQuantity {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralQuantity {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluralQuantity::Zero => "zero",
            PluralQuantity::One => "one",
            PluralQuantity::Two => "two",
            PluralQuantity::Few => "few",
            PluralQuantity::Many => "many",
            PluralQuantity::Other => "other",
        }
    }
}

impl Display for PluralQuantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PluralQuantity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero" => Ok(PluralQuantity::Zero),
            "one" => Ok(PluralQuantity::One),
            "two" => Ok(PluralQuantity::Two),
            "few" => Ok(PluralQuantity::Few),
            "many" => Ok(PluralQuantity::Many),
            "other" => Ok(PluralQuantity::Other),
            _ => Err(Error::InvalidResource(format!(
                "unknown plural quantity: {}",
                s
            ))),
        }
    }
}

/// Composite identity of a text unit, unique within one document.
///
/// Displays as `string::<name>`, `plural::<name>::<quantity>` or
/// `array::<name>::<index>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UnitKey {
    String { name: String },
    Plural { name: String, quantity: PluralQuantity },
    Array { name: String, index: usize },
}

impl UnitKey {
    pub fn string(name: &str) -> Self {
        UnitKey::String {
            name: name.to_string(),
        }
    }

    pub fn plural(name: &str, quantity: PluralQuantity) -> Self {
        UnitKey::Plural {
            name: name.to_string(),
            quantity,
        }
    }

    pub fn array(name: &str, index: usize) -> Self {
        UnitKey::Array {
            name: name.to_string(),
            index,
        }
    }
}

impl Display for UnitKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitKey::String { name } => write!(f, "string::{}", name),
            UnitKey::Plural { name, quantity } => write!(f, "plural::{}::{}", name, quantity),
            UnitKey::Array { name, index } => write!(f, "array::{}::{}", name, index),
        }
    }
}

impl FromStr for UnitKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::DataMismatch(format!("invalid unit key: {}", s));
        let parts: Vec<&str> = s.split("::").collect();
        match parts.as_slice() {
            ["string", name] if !name.is_empty() => Ok(UnitKey::string(name)),
            ["plural", name, quantity] if !name.is_empty() => {
                Ok(UnitKey::plural(name, quantity.parse()?))
            }
            ["array", name, index] if !name.is_empty() => {
                let index = index.parse().map_err(|_| invalid())?;
                Ok(UnitKey::array(name, index))
            }
            _ => Err(invalid()),
        }
    }
}

/// One translatable piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextUnit {
    pub key: UnitKey,

    /// Decoded source text (entities resolved, inline tags literal), trimmed.
    pub text: String,
}

impl Display for TextUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TextUnit {{ key: {}, text: {} }}", self.key, self.text)
    }
}
