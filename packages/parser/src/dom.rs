//! Minimal owned XML tree
//!
//! The loader needs random access to an element's children (the mixed
//! content rule looks at the first child before deciding how to load the
//! rest), so events are collected into a small DOM first.

use crate::error::{LoadError, LoadResult};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

impl XmlNode {
    /// Whether this is a text node holding only whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            XmlNode::Text(text) => text.trim().is_empty(),
            XmlNode::Element(_) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    /// Local name, namespace prefix removed
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Element children, text skipped
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// First element child named `name`
    pub fn element(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|element| element.name == name)
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        // CDATA next to character data ends up in one node
        if let Some(XmlNode::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(XmlNode::Text(text.to_string()));
        }
    }
}

/// Parse `source` and return its root element
pub fn parse(source: &str) -> LoadResult<XmlElement> {
    let mut reader = Reader::from_str(source);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root = None;

    loop {
        let pos = reader.buffer_position() as u64;
        let event = reader.read_event().map_err(|err| LoadError::xml(pos, err))?;

        match event {
            Event::Start(start) => {
                stack.push(open(&start, pos)?);
            }
            Event::Empty(start) => {
                let element = open(&start, pos)?;
                close(element, &mut stack, &mut root);
            }
            Event::End(_) => {
                // quick-xml has already checked that the names match
                if let Some(element) = stack.pop() {
                    close(element, &mut stack, &mut root);
                }
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|err| LoadError::xml(pos, err))?;
                if let Some(parent) = stack.last_mut() {
                    parent.push_text(&text);
                }
            }
            Event::CData(data) => {
                let bytes = data.into_inner();
                if let Some(parent) = stack.last_mut() {
                    parent.push_text(&String::from_utf8_lossy(&bytes));
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(LoadError::unexpected_eof(open.name));
    }
    root.ok_or(LoadError::Empty)
}

fn open(start: &BytesStart<'_>, pos: u64) -> LoadResult<XmlElement> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.local_name().as_ref()));

    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| LoadError::attribute(pos, err))?;
        let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
        // Namespace declarations are not content
        if attribute.key.as_ref().starts_with(b"xmlns") {
            continue;
        }
        let value = attribute
            .unescape_value()
            .map_err(|err| LoadError::xml(pos, err))?;
        element.attributes.push((key, value.into_owned()));
    }

    Ok(element)
}

fn close(element: XmlElement, stack: &mut [XmlElement], root: &mut Option<XmlElement>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        // Only the first top-level element counts
        None if root.is_none() => *root = Some(element),
        None => {}
    }
}
