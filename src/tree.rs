// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Icon node selection over the document tree.
//!
//! Selection happens in two steps. [`locate_icon_root`] applies the calling
//! context's policy: it picks the marker section and descends into that
//! section's last container. [`extract_icon_nodes`] then walks the chosen
//! subtree and collects every icon component in document order.

use serde::Serialize;
use tracing::debug;

use crate::{document::DocumentNode, error::Error};

/// Icon component discovered during traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconRecord {
    /// Node identifier assigned by the document.
    pub id:   String,
    /// Raw node label.
    pub name: String
}

/// Builds the default section predicate matching labels that contain
/// `marker` (case-sensitive).
pub fn label_contains(marker: &str) -> impl Fn(&DocumentNode) -> bool + '_ {
    move |section| section.name.contains(marker)
}

/// Selects the container holding icon definitions.
///
/// Among the top-level sections accepted by `select`, the last one wins. Its
/// last child is returned.
///
/// # Errors
///
/// Returns [`Error::DocumentStructure`] when no section matches or the
/// matched section has no children.
pub fn locate_icon_root<'doc, P>(
    document: &'doc DocumentNode,
    select: P
) -> Result<&'doc DocumentNode, Error>
where
    P: Fn(&DocumentNode) -> bool
{
    let section = document
        .children
        .iter()
        .rev()
        .find(|candidate| select(candidate))
        .ok_or_else(|| {
            Error::document_structure(format!(
                "none of the {} top-level sections matches the icon marker",
                document.children.len()
            ))
        })?;

    debug!("Using section '{}' ({})", section.name, section.id);

    section.children.last().ok_or_else(|| {
        Error::document_structure(format!("section '{}' has no children", section.name))
    })
}

/// Collects icon components below `root` in document order.
///
/// An icon component contributes itself and is not descended into. Any other
/// node contributes the flattened results of its children.
pub fn extract_icon_nodes(root: &DocumentNode) -> Vec<IconRecord> {
    let mut records = Vec::new();
    collect(root, &mut records);
    records
}

fn collect(node: &DocumentNode, records: &mut Vec<IconRecord>) {
    if node.is_icon_component() {
        records.push(IconRecord {
            id:   node.id.clone(),
            name: node.name.clone()
        });
        return;
    }

    for child in &node.children {
        collect(child, records);
    }
}
