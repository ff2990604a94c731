// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Rewrites raw SVG into markup that can be embedded in a component.
//!
//! The rewrite runs its steps in a fixed order: optimization, attribute
//! normalization, color genericization, embedding of text content as JSX,
//! and injection of the props placeholder on the root element. Optimization
//! must come first because its passes match the original hyphenated
//! attribute names.

use std::collections::HashSet;

use regex::Regex;

use crate::{
    config::OptimizerConfig,
    error::Error,
    optimize::optimize,
    svg::{self, Element, Node}
};

/// Attribute injected on the root element and replaced by the props spread.
pub const PROPS_PLACEHOLDER_ATTRIBUTE: &str = "props";
/// Value of the placeholder attribute.
pub const PROPS_PLACEHOLDER_VALUE: &str = "...";
/// Serialized form of the placeholder as it appears in rewritten markup.
pub const PROPS_PLACEHOLDER: &str = "props=\"...\"";
/// Replacement for color literals in `fill` and `stroke`.
pub const CURRENT_COLOR: &str = "currentcolor";

const COLOR_LITERAL_PATTERN: &str =
    r"^(?:#[0-9A-Fa-f]{6}|#[0-9A-Fa-f]{3}|rgba?\([0-9., %]+\)|hsl\([0-9., %]+\))$";
const NAMESPACE_XLINK: &str = "xmlns:xlink";

/// Pure markup rewriter configured with optimizer passes.
#[derive(Debug, Clone)]
pub struct MarkupRewriter {
    optimizer:     OptimizerConfig,
    color_literal: Regex
}

impl MarkupRewriter {
    /// Creates a rewriter applying the given optimizer passes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Markup`] if the color literal pattern fails to
    /// compile.
    pub fn new(optimizer: OptimizerConfig) -> Result<Self, Error> {
        let color_literal = Regex::new(COLOR_LITERAL_PATTERN)
            .map_err(|error| Error::markup(format!("invalid color pattern: {error}")))?;
        Ok(Self {
            optimizer,
            color_literal
        })
    }

    /// Rewrites raw SVG markup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Markup`] for unparsable markup or a root element other
    /// than `<svg>`. Returns [`Error::AttributeCollision`] when renaming would
    /// leave two attributes with the same name on one element.
    ///
    /// # Examples
    ///
    /// ```
    /// use figma_icons::{MarkupRewriter, OptimizerConfig};
    ///
    /// let rewriter = MarkupRewriter::new(OptimizerConfig::default(),).unwrap();
    /// let output = rewriter
    ///     .rewrite(r##"<svg viewBox="0 0 2 2"><circle cx="1" cy="1" r="1" fill="#FF0000" stroke-width="2"/></svg>"##,)
    ///     .unwrap();
    /// assert_eq!(
    ///     output,
    ///     r#"<svg viewBox="0 0 2 2" props="..."><circle cx="1" cy="1" r="1" fill="currentcolor" strokeWidth="2"/></svg>"#
    /// );
    /// ```
    pub fn rewrite(&self, raw: &str) -> Result<String, Error> {
        let mut root = svg::parse(raw)?;
        if root.name != "svg" {
            return Err(Error::markup(format!(
                "expected an <svg> root element, found <{}>",
                root.name
            )));
        }

        optimize(&mut root, &self.optimizer);
        root.try_for_each_mut(&mut normalize_attributes)?;
        root.try_for_each_mut(&mut |element: &mut Element| {
            self.genericize_colors(element);
            Ok(())
        })?;
        root.try_for_each_mut(&mut |element: &mut Element| {
            embed_text(element);
            Ok(())
        })?;
        root.set_attribute(PROPS_PLACEHOLDER_ATTRIBUTE, PROPS_PLACEHOLDER_VALUE);

        Ok(svg::serialize(&root))
    }

    /// Returns `true` when `value` is a color literal replaced by
    /// [`CURRENT_COLOR`].
    pub fn is_color_literal(&self, value: &str) -> bool {
        self.color_literal.is_match(value.trim())
    }

    fn genericize_colors(&self, element: &mut Element) {
        for attribute in &mut element.attributes {
            if matches!(attribute.name.as_str(), "fill" | "stroke")
                && self.is_color_literal(&attribute.value)
            {
                attribute.value = CURRENT_COLOR.to_owned();
            }
        }
    }
}

/// Converts a hyphenated attribute name to camelCase.
///
/// Each hyphen followed by a character is replaced by that character in
/// uppercase. A trailing hyphen is kept.
pub fn camelize(name: &str) -> String {
    let mut camel = String::with_capacity(name.len());
    let mut characters = name.chars();
    while let Some(character) = characters.next() {
        if character != '-' {
            camel.push(character);
            continue;
        }
        match characters.next() {
            Some(next) => camel.extend(next.to_uppercase()),
            None => camel.push('-')
        }
    }
    camel
}

/// Rewrites text children containing braces into JSX string expressions.
///
/// JSX reads `{` in element content as the start of an expression, so text
/// such as CSS rules is emitted as `{"..."}`. The literal escapes the
/// characters markup would otherwise have to escape, which keeps the result
/// valid XML. Text already in that form is left alone.
fn embed_text(element: &mut Element) {
    for child in &mut element.children {
        if let Node::Text(text) = child
            && text.contains(['{', '}'])
            && !is_string_expression(text)
        {
            *text = string_expression(text);
        }
    }
}

fn is_string_expression(text: &str) -> bool {
    text.len() >= 4 && text.starts_with("{\"") && text.ends_with("\"}")
}

/// Formats `text` as a JSX `{"..."}` expression.
pub fn string_expression(text: &str) -> String {
    let mut literal = String::with_capacity(text.len() + 8);
    literal.push_str("{\"");
    for character in text.chars() {
        match character {
            '\\' => literal.push_str("\\\\"),
            '"' => literal.push_str("\\\""),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            '<' => literal.push_str("\\u003C"),
            '>' => literal.push_str("\\u003E"),
            '&' => literal.push_str("\\u0026"),
            other => literal.push(other)
        }
    }
    literal.push_str("\"}");
    literal
}

fn normalize_attributes(element: &mut Element) -> Result<(), Error> {
    let mut seen = HashSet::with_capacity(element.attributes.len());
    let mut normalized = Vec::with_capacity(element.attributes.len());

    for mut attribute in std::mem::take(&mut element.attributes) {
        if attribute.name == NAMESPACE_XLINK {
            continue;
        }
        if attribute.name == "class" {
            attribute.name = "className".to_owned();
        } else if attribute.name.contains('-') {
            attribute.name = camelize(&attribute.name);
        }

        if !seen.insert(attribute.name.clone()) {
            return Err(Error::AttributeCollision {
                element:   element.name.clone(),
                attribute: attribute.name
            });
        }
        normalized.push(attribute);
    }

    element.attributes = normalized;
    Ok(())
}
