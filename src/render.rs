// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Component source rendering.

use crate::markup::PROPS_PLACEHOLDER;

/// Spread expression substituted for the props placeholder.
pub const PROPS_SPREAD: &str = "{...props}";

/// Renders the TSX source of a component wrapping `markup`.
///
/// The first occurrence of the props placeholder is replaced with the props
/// spread. Markup without a placeholder is embedded unchanged.
///
/// # Examples
///
/// ```
/// use figma_icons::render_component;
///
/// let source = render_component(r#"<svg props="..."/>"#, "IconLeft");
/// assert_eq!(
///     source,
///     "import React from 'react';\n\
///      export const IconLeft = (props: React.SVGProps<SVGSVGElement>) => (<svg {...props}/>);\n"
/// );
/// ```
pub fn render_component(markup: &str, component_name: &str) -> String {
    let content = markup.replacen(PROPS_PLACEHOLDER, PROPS_SPREAD, 1);
    format!(
        "import React from 'react';\nexport const {component_name} = (props: \
         React.SVGProps<SVGSVGElement>) => ({content});\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_only_first_placeholder() {
        let source = render_component(r#"<svg props="..."><text>props="..."</text></svg>"#, "IconA");
        assert_eq!(source.matches(PROPS_SPREAD).count(), 1);
        assert!(source.contains(r#"<text>props="..."</text>"#));
    }

    #[test]
    fn template_has_two_lines_and_trailing_newline() {
        let source = render_component(r#"<svg props="..."><path d="M0 0"/></svg>"#, "IconArrowLeft");
        let lines: Vec<&str> = source.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "import React from 'react';");
        assert_eq!(
            lines[1],
            "export const IconArrowLeft = (props: React.SVGProps<SVGSVGElement>) => (<svg \
             {...props}><path d=\"M0 0\"/></svg>);"
        );
        assert!(source.ends_with('\n'));
    }

    #[test]
    fn markup_without_placeholder_is_embedded_unchanged() {
        let source = render_component("<svg/>", "IconPlain");
        assert!(source.contains("=> (<svg/>);"));
    }
}
