//! Support for the Android `strings.xml` resource format.
//!
//! `<string>`, `<plurals>` and `<string-array>` are decoded into their typed
//! elements. Every other top-level node is kept as a sequence of owned XML
//! events and written back unchanged. Element content is captured as markup,
//! so inline tags such as `<b>` survive a read/write cycle untouched.

use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use std::io::{BufRead, Write};

use crate::{
    error::Error,
    traits::ResourceCodec,
    types::{
        ArrayElement, ArrayItem, Document, ElementHeader, OpaqueElement, PluralItem,
        PluralsElement, ResourceElement, StringElement,
    },
};

const INDENT_SIZE: usize = 4;

impl ResourceCodec for Document {
    fn decode<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);

        let mut buf = Vec::new();
        let mut root = None;
        let mut elements = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) if root.is_none() => {
                    root = Some(parse_header(e)?);
                }
                Ok(Event::Empty(ref e)) if root.is_none() => {
                    root = Some(parse_header(e)?);
                    break;
                }
                Ok(Event::Start(ref e)) => {
                    elements.push(parse_element(e, &mut xml_reader)?);
                }
                Ok(Event::Empty(ref e)) => {
                    elements.push(parse_empty_element(e)?);
                }
                Ok(Event::Comment(e)) if root.is_some() => {
                    elements.push(ResourceElement::Opaque(OpaqueElement {
                        events: vec![Event::Comment(e.into_owned())],
                    }));
                }
                // The only End seen at this level closes the root.
                Ok(Event::End(_)) => break,
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(Error::XmlParse(e)),
            }
            buf.clear();
        }

        let root =
            root.ok_or_else(|| Error::InvalidResource("document has no root element".to_string()))?;
        Ok(Document { root, elements })
    }

    /// Pretty-prints with a 4-space indent and a trailing newline.
    fn encode<W: Write>(&self, writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new_with_indent(writer, b' ', INDENT_SIZE);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml_writer.write_event(Event::Start(header_start(&self.root)))?;

        for element in &self.elements {
            write_element(&mut xml_writer, element)?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new(self.root.tag.as_str())))?;
        xml_writer.get_mut().write_all(b"\n")?;
        Ok(())
    }
}

fn utf8_str(bytes: &[u8]) -> Result<&str, Error> {
    std::str::from_utf8(bytes).map_err(|e| Error::DataMismatch(e.to_string()))
}

fn parse_header(e: &BytesStart) -> Result<ElementHeader, Error> {
    let mut header = ElementHeader::new(utf8_str(e.name().as_ref())?);

    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|e| Error::DataMismatch(e.to_string()))?;
        let key = utf8_str(attr.key.as_ref())?.to_string();
        let value = attr.unescape_value()?.to_string();
        header.attributes.push((key, value));
    }
    Ok(header)
}

fn parse_named_header(e: &BytesStart) -> Result<ElementHeader, Error> {
    let header = parse_header(e)?;
    if header.attribute("name").is_none() {
        return Err(Error::InvalidResource(format!(
            "{} tag missing 'name'",
            header.tag
        )));
    }
    Ok(header)
}

fn parse_element<R: BufRead>(
    e: &BytesStart,
    xml_reader: &mut Reader<R>,
) -> Result<ResourceElement, Error> {
    match e.name().as_ref() {
        b"string" => {
            let header = parse_named_header(e)?;
            let content = read_inner_markup(xml_reader, "string")?;
            Ok(ResourceElement::String(StringElement { header, content }))
        }
        b"plurals" => {
            let header = parse_named_header(e)?;
            let (raw_items, trailing_comments) = read_items(xml_reader, "plurals")?;
            let mut items = Vec::with_capacity(raw_items.len());
            for item in raw_items {
                let quantity = item.header.attribute("quantity").ok_or_else(|| {
                    Error::InvalidResource(format!(
                        "plurals '{}' has an item without 'quantity'",
                        header.name()
                    ))
                })?;
                items.push(PluralItem {
                    quantity: quantity.parse()?,
                    header: item.header,
                    content: item.content,
                    comments: item.comments,
                });
            }
            Ok(ResourceElement::Plurals(PluralsElement {
                header,
                items,
                trailing_comments,
            }))
        }
        b"string-array" => {
            let header = parse_named_header(e)?;
            let (raw_items, trailing_comments) = read_items(xml_reader, "string-array")?;
            let items = raw_items
                .into_iter()
                .map(|item| ArrayItem {
                    header: item.header,
                    content: item.content,
                    comments: item.comments,
                })
                .collect();
            Ok(ResourceElement::Array(ArrayElement {
                header,
                items,
                trailing_comments,
            }))
        }
        _ => Ok(ResourceElement::Opaque(OpaqueElement {
            events: read_opaque_events(e, xml_reader)?,
        })),
    }
}

/// Self-closing top-level elements: empty typed elements or opaque nodes.
fn parse_empty_element(e: &BytesStart) -> Result<ResourceElement, Error> {
    match e.name().as_ref() {
        b"string" => Ok(ResourceElement::String(StringElement {
            header: parse_named_header(e)?,
            content: String::new(),
        })),
        b"plurals" => Ok(ResourceElement::Plurals(PluralsElement {
            header: parse_named_header(e)?,
            items: Vec::new(),
            trailing_comments: Vec::new(),
        })),
        b"string-array" => Ok(ResourceElement::Array(ArrayElement {
            header: parse_named_header(e)?,
            items: Vec::new(),
            trailing_comments: Vec::new(),
        })),
        _ => Ok(ResourceElement::Opaque(OpaqueElement {
            events: vec![Event::Empty(e.to_owned())],
        })),
    }
}

/// An `<item>` child as read, before its container gives it a type.
struct RawItem {
    header: ElementHeader,
    content: String,
    comments: Vec<String>,
}

/// Reads the `<item>` children of a container until its closing tag.
///
/// Comments are attached to the item that follows them; the ones after the
/// last item are returned separately.
fn read_items<R: BufRead>(
    xml_reader: &mut Reader<R>,
    container: &str,
) -> Result<(Vec<RawItem>, Vec<String>), Error> {
    let mut buf = Vec::new();
    let mut items = Vec::new();
    let mut comments = Vec::new();

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"item" => {
                let header = parse_header(e)?;
                let content = read_inner_markup(xml_reader, "item")?;
                items.push(RawItem {
                    header,
                    content,
                    comments: std::mem::take(&mut comments),
                });
            }
            Ok(Event::Empty(ref e)) if e.name().as_ref() == b"item" => {
                items.push(RawItem {
                    header: parse_header(e)?,
                    content: String::new(),
                    comments: std::mem::take(&mut comments),
                });
            }
            Ok(Event::Comment(ref e)) => comments.push(utf8_str(e)?.to_string()),
            Ok(Event::Start(ref e)) => {
                return Err(Error::InvalidResource(format!(
                    "unexpected <{}> inside <{}>",
                    String::from_utf8_lossy(e.name().as_ref()),
                    container
                )));
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => {
                return Err(Error::InvalidResource(format!(
                    "unexpected EOF inside <{}>",
                    container
                )));
            }
            Ok(_) => {}
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }
    Ok((items, comments))
}

/// Reads everything up to the matching end tag and returns it as markup.
///
/// Text keeps its entity escapes, nested tags are re-emitted literally and
/// CDATA sections are folded into escaped text. The result is trimmed.
fn read_inner_markup<R: BufRead>(xml_reader: &mut Reader<R>, tag: &str) -> Result<String, Error> {
    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut markup = String::new();

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Text(e)) => markup.push_str(utf8_str(&e)?),
            Ok(Event::CData(e)) => {
                markup.push_str(&quick_xml::escape::escape(utf8_str(&e)?));
            }
            Ok(Event::Start(e)) => {
                depth += 1;
                markup.push('<');
                markup.push_str(utf8_str(&e)?);
                markup.push('>');
            }
            Ok(Event::Empty(e)) => {
                markup.push('<');
                markup.push_str(utf8_str(&e)?);
                markup.push_str("/>");
            }
            Ok(Event::End(e)) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                markup.push_str("</");
                markup.push_str(utf8_str(e.name().as_ref())?);
                markup.push('>');
            }
            Ok(Event::Eof) => {
                return Err(Error::InvalidResource(format!(
                    "unexpected EOF inside <{}>",
                    tag
                )));
            }
            Ok(_) => (),
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }
    Ok(markup.trim().to_string())
}

/// Captures an unknown element subtree. Whitespace-only text between child
/// elements is dropped so the indenting writer can lay the subtree out again.
fn read_opaque_events<R: BufRead>(
    start: &BytesStart,
    xml_reader: &mut Reader<R>,
) -> Result<Vec<Event<'static>>, Error> {
    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut events = vec![Event::Start(start.to_owned())];

    loop {
        let event = xml_reader.read_event_into(&mut buf)?.into_owned();
        buf.clear();

        let mut closes = false;
        match &event {
            Event::Start(_) => depth += 1,
            Event::End(_) if depth == 0 => closes = true,
            Event::End(_) => depth -= 1,
            Event::Text(e) if e.iter().all(u8::is_ascii_whitespace) => continue,
            Event::Eof => {
                return Err(Error::InvalidResource(format!(
                    "unexpected EOF inside <{}>",
                    String::from_utf8_lossy(start.name().as_ref())
                )));
            }
            _ => {}
        }
        events.push(event);
        if closes {
            break;
        }
    }
    Ok(events)
}

fn header_start(header: &ElementHeader) -> BytesStart<'_> {
    let mut start = BytesStart::new(header.tag.as_str());
    for (key, value) in &header.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }
    start
}

fn write_comments<W: Write>(xml_writer: &mut Writer<W>, comments: &[String]) -> Result<(), Error> {
    for comment in comments {
        xml_writer.write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))?;
    }
    Ok(())
}

/// Writes `<tag ...>content</tag>`, or `<tag .../>` when the content is empty.
fn write_text_element<W: Write>(
    xml_writer: &mut Writer<W>,
    start: BytesStart,
    content: &str,
) -> Result<(), Error> {
    if content.is_empty() {
        xml_writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    let end = start.to_end().into_owned();
    xml_writer.write_event(Event::Start(start))?;
    xml_writer.write_event(Event::Text(BytesText::from_escaped(content)))?;
    xml_writer.write_event(Event::End(end))?;
    Ok(())
}

fn write_element<W: Write>(
    xml_writer: &mut Writer<W>,
    element: &ResourceElement,
) -> Result<(), Error> {
    match element {
        ResourceElement::String(s) => {
            write_text_element(xml_writer, header_start(&s.header), &s.content)?;
        }
        ResourceElement::Plurals(p) => {
            xml_writer.write_event(Event::Start(header_start(&p.header)))?;
            for item in &p.items {
                write_comments(xml_writer, &item.comments)?;
                write_text_element(xml_writer, header_start(&item.header), &item.content)?;
            }
            write_comments(xml_writer, &p.trailing_comments)?;
            xml_writer.write_event(Event::End(BytesEnd::new(p.header.tag.as_str())))?;
        }
        ResourceElement::Array(a) => {
            xml_writer.write_event(Event::Start(header_start(&a.header)))?;
            for item in &a.items {
                write_comments(xml_writer, &item.comments)?;
                write_text_element(xml_writer, header_start(&item.header), &item.content)?;
            }
            write_comments(xml_writer, &a.trailing_comments)?;
            xml_writer.write_event(Event::End(BytesEnd::new(a.header.tag.as_str())))?;
        }
        ResourceElement::Opaque(o) => {
            for event in &o.events {
                xml_writer.write_event(event.clone())?;
            }
        }
    }
    Ok(())
}
