// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Size and structure optimization passes over an SVG tree.
//!
//! Every pass preserves the rendered result. Passes run in a fixed order and
//! each can be disabled through [`OptimizerConfig`]. They operate on the
//! hyphenated attribute names produced by design tools, so they must run
//! before attribute normalization.

use std::collections::HashSet;

use tracing::debug;

use crate::{
    config::OptimizerConfig,
    svg::{Element, Node}
};

const METADATA_ELEMENTS: &[&str] = &["metadata", "title", "desc"];
const EDITOR_PREFIXES: &[&str] = &["inkscape", "sodipodi", "sketch", "serif", "figma"];
const EMPTY_CONTAINERS: &[&str] = &["g", "defs", "symbol"];

/// Group attributes that can move onto a single child without changing the
/// rendered result.
const MOVABLE_GROUP_ATTRIBUTES: &[&str] = &[
    "color",
    "fill",
    "fill-opacity",
    "fill-rule",
    "opacity",
    "stroke",
    "stroke-dasharray",
    "stroke-dashoffset",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-miterlimit",
    "stroke-opacity",
    "stroke-width",
    "transform",
    "visibility"
];

/// Applies the enabled passes to `root` in place.
pub fn optimize(root: &mut Element, config: &OptimizerConfig) {
    if config.remove_metadata {
        retain_elements(root, &|element| !METADATA_ELEMENTS.contains(&element.name.as_str()));
    }
    if config.remove_editor_data {
        remove_editor_data(root);
    }
    if config.remove_empty_attributes {
        remove_empty_attributes(root);
    }
    if config.cleanup_ids {
        cleanup_ids(root);
    }
    if config.collapse_groups {
        collapse_groups(root);
    }
    if config.merge_paths {
        merge_paths(root);
    }
    if config.remove_empty_containers {
        remove_empty_containers(root);
    }
    if config.remove_dimensions {
        remove_dimensions(root);
    }
}

fn retain_elements(element: &mut Element, keep: &dyn Fn(&Element) -> bool) {
    element.children.retain(|child| match child {
        Node::Element(nested) => keep(nested),
        Node::Text(_) => true
    });
    for child in &mut element.children {
        if let Node::Element(nested) = child {
            retain_elements(nested, keep);
        }
    }
}

fn has_editor_prefix(name: &str) -> bool {
    let prefix = match name.split_once(':') {
        Some(("xmlns", namespace)) => namespace,
        Some((prefix, _)) => prefix,
        None => return false
    };
    EDITOR_PREFIXES.contains(&prefix)
}

fn remove_editor_data(root: &mut Element) {
    retain_elements(root, &|element| !has_editor_prefix(&element.name));
    visit_mut(root, &mut |element: &mut Element| {
        element.attributes.retain(|attribute| !has_editor_prefix(&attribute.name));
    });
}

fn remove_empty_attributes(root: &mut Element) {
    visit_mut(root, &mut |element: &mut Element| {
        element.attributes.retain(|attribute| !attribute.value.trim().is_empty());
    });
}

fn cleanup_ids(root: &mut Element) {
    let mut referenced = HashSet::new();
    root.for_each(&mut |element: &Element| {
        for attribute in &element.attributes {
            collect_references(&attribute.name, &attribute.value, &mut referenced);
        }
        for child in &element.children {
            if let Node::Text(text) = child {
                collect_references("", text, &mut referenced);
            }
        }
    });

    visit_mut(root, &mut |element: &mut Element| {
        let unused = element
            .attribute("id")
            .is_some_and(|id| !referenced.contains(id));
        if unused {
            element.remove_attribute("id");
        }
    });
}

fn collect_references(name: &str, value: &str, referenced: &mut HashSet<String>) {
    if (name == "href" || name.ends_with(":href"))
        && let Some(target) = value.strip_prefix('#')
    {
        referenced.insert(target.to_owned());
    }

    let mut rest = value;
    while let Some(start) = rest.find("url(") {
        let after = &rest[start + 4..];
        let Some(end) = after.find(')') else {
            break;
        };
        let target = after[..end].trim().trim_matches(['\'', '"']);
        if let Some(id) = target.strip_prefix('#') {
            referenced.insert(id.to_owned());
        }
        rest = &after[end..];
    }
}

fn collapse_groups(element: &mut Element) {
    for child in &mut element.children {
        if let Node::Element(nested) = child {
            collapse_groups(nested);
        }
    }

    let mut collapsed = Vec::with_capacity(element.children.len());
    for child in std::mem::take(&mut element.children) {
        match child {
            Node::Element(mut group) if group.name == "g" => {
                hoist_group_attributes(&mut group);
                if group.attributes.is_empty() {
                    debug!("Collapsing attribute-free group");
                    collapsed.extend(group.children);
                } else {
                    collapsed.push(Node::Element(group));
                }
            }
            other => collapsed.push(other)
        }
    }
    element.children = collapsed;
}

/// Moves every attribute of a single-child group onto that child when all of
/// them are movable and the child does not already carry them.
fn hoist_group_attributes(group: &mut Element) {
    if group.attributes.is_empty() {
        return;
    }
    let [Node::Element(child)] = group.children.as_mut_slice() else {
        return;
    };

    let movable = group.attributes.iter().all(|attribute| {
        MOVABLE_GROUP_ATTRIBUTES.contains(&attribute.name.as_str())
            && (attribute.name == "transform" || child.attribute(&attribute.name).is_none())
    });
    if !movable {
        return;
    }

    for attribute in std::mem::take(&mut group.attributes) {
        if attribute.name == "transform"
            && let Some(existing) = child.attribute("transform")
        {
            let combined = format!("{} {existing}", attribute.value);
            child.set_attribute("transform", combined);
        } else {
            child.set_attribute(attribute.name, attribute.value);
        }
    }
}

fn is_mergeable_path(element: &Element) -> bool {
    element.name == "path"
        && element.children.is_empty()
        && element.attribute("d").is_some()
        && element.attribute("fill") == Some("none")
        && element.attributes.iter().all(|attribute| {
            let name = attribute.name.as_str();
            name != "id"
                && !name.contains("opacity")
                && !name.starts_with("marker")
                && !matches!(name, "clip-path" | "mask" | "filter")
        })
}

/// A path can only be appended to another when its first command is an
/// absolute moveto; a relative one would be resolved against the end point of
/// the preceding path.
fn starts_with_absolute_moveto(element: &Element) -> bool {
    element
        .attribute("d")
        .is_some_and(|d| d.trim_start().starts_with('M'))
}

fn same_attributes_except_d(left: &Element, right: &Element) -> bool {
    let filtered = |element: &Element| {
        element
            .attributes
            .iter()
            .filter(|attribute| attribute.name != "d")
            .map(|attribute| (attribute.name.clone(), attribute.value.clone()))
            .collect::<Vec<_>>()
    };
    let mut left = filtered(left);
    let mut right = filtered(right);
    left.sort();
    right.sort();
    left == right
}

fn merge_paths(element: &mut Element) {
    for child in &mut element.children {
        if let Node::Element(nested) = child {
            merge_paths(nested);
        }
    }

    let mut merged: Vec<Node> = Vec::with_capacity(element.children.len());
    for child in std::mem::take(&mut element.children) {
        if let (Some(Node::Element(previous)), Node::Element(current)) = (merged.last_mut(), &child)
            && is_mergeable_path(previous)
            && is_mergeable_path(current)
            && starts_with_absolute_moveto(current)
            && same_attributes_except_d(previous, current)
        {
            let combined = format!(
                "{} {}",
                previous.attribute("d").unwrap_or_default(),
                current.attribute("d").unwrap_or_default()
            );
            previous.set_attribute("d", combined);
            continue;
        }
        merged.push(child);
    }
    element.children = merged;
}

fn remove_empty_containers(element: &mut Element) {
    for child in &mut element.children {
        if let Node::Element(nested) = child {
            remove_empty_containers(nested);
        }
    }

    element.children.retain(|child| match child {
        Node::Element(nested) => {
            !(EMPTY_CONTAINERS.contains(&nested.name.as_str())
                && nested.children.is_empty()
                && nested.attribute("id").is_none())
        }
        Node::Text(_) => true
    });
}

fn remove_dimensions(root: &mut Element) {
    if root.attribute("viewBox").is_some() {
        root.remove_attribute("width");
        root.remove_attribute("height");
    }
}

fn visit_mut(element: &mut Element, visit: &mut impl FnMut(&mut Element)) {
    visit(element);
    for child in &mut element.children {
        if let Node::Element(nested) = child {
            visit_mut(nested, visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::{parse, serialize};

    fn run(source: &str, config: &OptimizerConfig) -> String {
        let mut root = parse(source).expect("valid markup");
        optimize(&mut root, config);
        serialize(&root)
    }

    fn defaults(source: &str) -> String {
        run(source, &OptimizerConfig::default())
    }

    #[test]
    fn strips_metadata_and_editor_data() {
        let output = defaults(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" inkscape:version="1.0"><title>Arrow</title><desc>Left</desc><metadata><rdf/></metadata><sodipodi:namedview/><path d="M0 0" inkscape:label="shape"/></svg>"#
        );
        assert_eq!(output, r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M0 0"/></svg>"#);
    }

    #[test]
    fn removes_only_unreferenced_ids() {
        let output = defaults(
            r##"<svg><g id="shape" clip-path="url(#clip0)"><path id="p1" d="M0 0"/><path d="M1 1"/></g><use href="#p1"/><defs><clipPath id="clip0"><rect width="24" height="24"/></clipPath></defs></svg>"##
        );
        assert_eq!(
            output,
            r##"<svg><g clip-path="url(#clip0)"><path id="p1" d="M0 0"/><path d="M1 1"/></g><use href="#p1"/><defs><clipPath id="clip0"><rect width="24" height="24"/></clipPath></defs></svg>"##
        );
    }

    #[test]
    fn collapses_attribute_free_and_single_child_groups() {
        let output = defaults(
            r##"<svg><g><g fill="#000" transform="translate(1 1)"><path d="M0 0" transform="scale(2)"/></g></g></svg>"##
        );
        assert_eq!(
            output,
            r##"<svg><path d="M0 0" transform="translate(1 1) scale(2)" fill="#000"/></svg>"##
        );
    }

    #[test]
    fn keeps_groups_with_non_movable_or_conflicting_attributes() {
        let clipped = r##"<svg><g clip-path="url(#c)"><path d="M0 0"/></g><clipPath id="c"><rect width="1" height="1"/></clipPath></svg>"##;
        assert_eq!(defaults(clipped), clipped);

        let conflicting = r##"<svg><g opacity="0.5"><path d="M0 0" opacity="0.5"/></g></svg>"##;
        assert_eq!(defaults(conflicting), conflicting);

        let several = r##"<svg><g fill="#000"><path d="M0 0"/><path d="M1 1"/></g></svg>"##;
        assert_eq!(defaults(several), several);
    }

    #[test]
    fn merges_adjacent_stroke_only_paths() {
        let output = defaults(
            r##"<svg><path d="M0 0L1 1" fill="none" stroke="#000"/><path stroke="#000" fill="none" d="M2 2L3 3"/><path d="M4 4" fill="#000"/></svg>"##
        );
        assert_eq!(
            output,
            r##"<svg><path d="M0 0L1 1 M2 2L3 3" fill="none" stroke="#000"/><path d="M4 4" fill="#000"/></svg>"##
        );
    }

    #[test]
    fn does_not_merge_path_starting_with_relative_moveto() {
        let source = r##"<svg><path d="M2 2L4 4" fill="none" stroke="#000"/><path d="m10 10l2 2" fill="none" stroke="#000"/></svg>"##;
        assert_eq!(defaults(source), source);

        let output = defaults(
            r##"<svg><path d="M2 2L4 4" fill="none" stroke="#000"/><path d="  M10 10l2 2" fill="none" stroke="#000"/></svg>"##
        );
        assert_eq!(
            output,
            r##"<svg><path d="M2 2L4 4   M10 10l2 2" fill="none" stroke="#000"/></svg>"##
        );
    }

    #[test]
    fn keeps_ids_referenced_from_style_text() {
        let output = defaults(
            r##"<svg><style>.a{fill:url(#g)}</style><linearGradient id="g"/><linearGradient id="unused"/><path class="a" d="M0 0"/></svg>"##
        );
        assert_eq!(
            output,
            r##"<svg><style>.a{fill:url(#g)}</style><linearGradient id="g"/><linearGradient/><path class="a" d="M0 0"/></svg>"##
        );
    }

    #[test]
    fn does_not_merge_filled_paths() {
        let source = r##"<svg><path d="M0 0h1" fill="#000"/><path d="M0 0h1" fill="#000"/></svg>"##;
        assert_eq!(defaults(source), source);
    }

    #[test]
    fn removes_empty_containers_and_blank_attributes() {
        let output = defaults(
            r##"<svg class=""><defs/><g fill="red"><g/></g><symbol id="kept"/><symbol id="unused"/><use href="#kept"/></svg>"##
        );
        assert_eq!(output, r##"<svg><symbol id="kept"/><use href="#kept"/></svg>"##);
    }

    #[test]
    fn passes_can_be_disabled() {
        let config = OptimizerConfig {
            remove_metadata: false,
            collapse_groups: false,
            remove_empty_containers: false,
            ..OptimizerConfig::default()
        };
        let source = r#"<svg><title>Kept</title><g><path d="M0 0"/></g><defs/></svg>"#;
        assert_eq!(run(source, &config), source);
    }

    #[test]
    fn remove_dimensions_requires_view_box() {
        let config = OptimizerConfig {
            remove_dimensions: true,
            ..OptimizerConfig::default()
        };
        assert_eq!(
            run(r#"<svg width="24" height="24" viewBox="0 0 24 24"/>"#, &config),
            r#"<svg viewBox="0 0 24 24"/>"#
        );
        assert_eq!(
            run(r#"<svg width="24" height="24"/>"#, &config),
            r#"<svg width="24" height="24"/>"#
        );
    }
}
