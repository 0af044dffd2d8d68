//! Minimal XML element tree for GMP documents
//!
//! GMP responses are small, attribute-heavy documents with one exception: a
//! report download carries its payload as text that follows the
//! `report_format` element. The tree therefore keeps ElementTree-style
//! `text` (before the first child) and `tail` (after the element's end tag).

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::errors::SyntaxError;
use quick_xml::events::{BytesStart, Event};

use crate::error::{ApiError, Result};

/// An XML element with its attributes, children and surrounding text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    /// Text between the start tag and the first child
    pub text: String,
    /// Text between this element's end tag and the next sibling
    pub tail: String,
}

impl Element {
    /// Value of an attribute
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First direct child with the given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Follow a path of child names, e.g. `["report_count", "finished"]`
    pub fn find(&self, path: &[&str]) -> Option<&Element> {
        path.iter()
            .try_fold(self, |element, name| element.child(name))
    }

    /// Trimmed text of the child at `path`
    pub fn text_at(&self, path: &[&str]) -> Option<&str> {
        self.find(path).map(|e| e.text.trim())
    }
}

/// Parse a complete document.
///
/// Returns `Ok(None)` while the root element is still open or the input
/// stops inside markup, which is how the socket reader detects that more
/// bytes are needed. Anything else that fails to parse is an error.
pub fn parse(input: &str) -> Result<Option<Element>> {
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<Element> = Vec::new();

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(err) if is_truncation(&err) => return Ok(None),
            Err(err) => return Err(malformed(err)),
        };
        match event {
            Event::Start(start) => stack.push(element_from_start(&start)?),
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => return Ok(Some(element)),
                }
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ApiError::InvalidResponse("Unbalanced end tag".to_string()))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => return Ok(Some(element)),
                }
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(malformed)?;
                append_text(&mut stack, &text);
            }
            Event::CData(data) => {
                let data = data.into_inner();
                append_text(&mut stack, &String::from_utf8_lossy(&data));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Escape a value for use inside element text or a double-quoted attribute
pub fn escape(value: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(value)
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(malformed)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(malformed)?.into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        name,
        attributes,
        ..Element::default()
    })
}

fn append_text(stack: &mut [Element], text: &str) {
    // Whitespace before the root element is dropped
    let Some(current) = stack.last_mut() else {
        return;
    };
    match current.children.last_mut() {
        Some(previous) => previous.tail.push_str(text),
        None => current.text.push_str(text),
    }
}

/// Errors that only mean the input ended early
fn is_truncation(err: &quick_xml::Error) -> bool {
    matches!(
        err,
        quick_xml::Error::Syntax(
            SyntaxError::UnclosedTag
                | SyntaxError::UnclosedComment
                | SyntaxError::UnclosedCData
                | SyntaxError::UnclosedDoctype
                | SyntaxError::UnclosedPIOrXmlDecl
        )
    )
}

fn malformed(err: impl std::fmt::Display) -> crate::error::Error {
    ApiError::InvalidResponse(format!("Malformed XML: {}", err)).into()
}
