// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Minimal element tree for SVG markup.
//!
//! The tree keeps elements, their attributes in source order and non-blank
//! text. XML declarations, doctypes, processing instructions and comments
//! are dropped while parsing because none of them survive embedding into a
//! component.

use std::borrow::Cow;

use quick_xml::{
    Reader,
    events::{BytesStart, Event}
};

use crate::error::Error;

/// Single attribute of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Qualified attribute name, including any namespace prefix.
    pub name:  String,
    /// Unescaped attribute value.
    pub value: String
}

/// Child node of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Nested element.
    Element(Element),
    /// Unescaped, non-blank text content.
    Text(String)
}

/// Element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Qualified element name.
    pub name:       String,
    /// Attributes in source order.
    pub attributes: Vec<Attribute>,
    /// Children in source order.
    pub children:   Vec<Node>
}

impl Element {
    /// Creates an element without attributes or children.
    pub fn new<N>(name: N) -> Self
    where
        N: Into<String>
    {
        Self {
            name:       name.into(),
            attributes: Vec::new(),
            children:   Vec::new()
        }
    }

    /// Returns the value of the attribute named `name`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
            .map(|attribute| attribute.value.as_str())
    }

    /// Sets `name` to `value`, replacing an existing value in place or
    /// appending a new attribute.
    pub fn set_attribute<N, V>(&mut self, name: N, value: V)
    where
        N: Into<String>,
        V: Into<String>
    {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|attribute| attribute.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute {
                name,
                value
            })
        }
    }

    /// Removes the attribute named `name`, returning its value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let index = self.attributes.iter().position(|attribute| attribute.name == name)?;
        Some(self.attributes.remove(index).value)
    }

    /// Iterates over direct element children.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            Node::Text(_) => None
        })
    }

    /// Visits this element and every descendant element in pre-order.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error produced by `visit`.
    pub fn try_for_each_mut<F>(&mut self, visit: &mut F) -> Result<(), Error>
    where
        F: FnMut(&mut Element) -> Result<(), Error>
    {
        visit(self)?;
        for child in &mut self.children {
            if let Node::Element(element) = child {
                element.try_for_each_mut(visit)?;
            }
        }
        Ok(())
    }

    /// Visits this element and every descendant element in pre-order.
    pub fn for_each(&self, visit: &mut impl FnMut(&Element)) {
        visit(self);
        for element in self.elements() {
            element.for_each(visit);
        }
    }
}

/// Parses markup into its root element.
///
/// # Errors
///
/// Returns [`Error::Markup`] for malformed XML, unclosed or mismatched tags,
/// text outside the root, multiple roots, or markup without any element.
pub fn parse(source: &str) -> Result<Element, Error> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(true);

    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|error| Error::markup(format!("malformed markup: {error}")))?;

        match event {
            Event::Start(start) => open.push(element_from(&start)?),
            Event::Empty(start) => {
                let element = element_from(&start)?;
                attach(&mut open, &mut root, element)?;
            }
            Event::End(_) => {
                let element = open
                    .pop()
                    .ok_or_else(|| Error::markup("closing tag without matching opening tag"))?;
                attach(&mut open, &mut root, element)?;
            }
            Event::Text(text) => {
                let content = text
                    .unescape()
                    .map_err(|error| Error::markup(format!("invalid text content: {error}")))?;
                push_text(&mut open, content)?;
            }
            Event::CData(data) => {
                let content = String::from_utf8(data.into_inner().into_owned())
                    .map_err(|error| Error::markup(format!("invalid CDATA section: {error}")))?;
                push_text(&mut open, Cow::Owned(content))?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(Error::markup(format!(
            "unexpected end of markup inside <{}>",
            unclosed.name
        )));
    }

    root.ok_or_else(|| Error::markup("markup does not contain any element"))
}

/// Serializes an element tree with double-quoted attributes.
///
/// Childless elements are self-closed. Text and attribute values are
/// escaped.
pub fn serialize(root: &Element) -> String {
    let mut buffer = String::with_capacity(512);
    write_element(&mut buffer, root);
    buffer
}

fn element_from(start: &BytesStart<'_>) -> Result<Element, Error> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|error| Error::markup(format!("element name is not UTF-8: {error}")))?
        .to_owned();

    let mut element = Element::new(name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|error| {
            Error::markup(format!("invalid attribute on <{}>: {error}", element.name))
        })?;
        let key = std::str::from_utf8(attribute.key.as_ref())
            .map_err(|error| Error::markup(format!("attribute name is not UTF-8: {error}")))?
            .to_owned();
        let value = attribute.unescape_value().map_err(|error| {
            Error::markup(format!("invalid value for attribute '{key}': {error}"))
        })?;
        element.attributes.push(Attribute {
            name:  key,
            value: value.into_owned()
        });
    }

    Ok(element)
}

fn attach(open: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<(), Error> {
    match open.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Element(element));
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(Error::markup("markup contains more than one root element"))
    }
}

fn push_text(open: &mut [Element], content: Cow<'_, str>) -> Result<(), Error> {
    if content.trim().is_empty() {
        return Ok(());
    }

    match open.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Text(content.into_owned()));
            Ok(())
        }
        None => Err(Error::markup("text found outside the root element"))
    }
}

fn write_element(buffer: &mut String, element: &Element) {
    buffer.push('<');
    buffer.push_str(&element.name);
    for attribute in &element.attributes {
        buffer.push(' ');
        buffer.push_str(&attribute.name);
        buffer.push_str("=\"");
        buffer.push_str(&escape(&attribute.value, true));
        buffer.push('"');
    }

    if element.children.is_empty() {
        buffer.push_str("/>");
        return;
    }

    buffer.push('>');
    for child in &element.children {
        match child {
            Node::Element(nested) => write_element(buffer, nested),
            Node::Text(text) => buffer.push_str(&escape(text, false))
        }
    }
    buffer.push_str("</");
    buffer.push_str(&element.name);
    buffer.push('>');
}

fn escape(value: &str, attribute: bool) -> Cow<'_, str> {
    let needs_escape = |character: char| {
        matches!(character, '&' | '<' | '>') || (attribute && character == '"')
    };

    if !value.chars().any(needs_escape) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for character in value.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' if attribute => escaped.push_str("&quot;"),
            other => escaped.push(other)
        }
    }
    Cow::Owned(escaped)
}
