// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Typed view of the Figma file document.
//!
//! Only the fields the pipeline reads are modelled. Node kinds form a closed
//! set; values the pipeline does not know about deserialize to
//! [`NodeKind::Other`] and behave as plain containers.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Kind tag carried in the `type` field of every document node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    /// Root of the document.
    Document,
    /// Page.
    Canvas,
    /// Frame or auto-layout container.
    Frame,
    /// Plain group.
    Group,
    /// Canvas section.
    Section,
    /// Reusable component; the only kind eligible for icon extraction.
    Component,
    /// Variant container grouping related components.
    ComponentSet,
    /// Placed instance of a component.
    Instance,
    /// Vector network.
    Vector,
    /// Boolean combination of shapes.
    BooleanOperation,
    /// Rectangle primitive.
    Rectangle,
    /// Ellipse primitive.
    Ellipse,
    /// Line primitive.
    Line,
    /// Text layer.
    Text,
    /// Export slice.
    Slice,
    /// Any kind not listed above.
    #[default]
    #[serde(other)]
    Other
}

/// Node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct DocumentNode {
    /// Opaque identifier assigned by the source document.
    #[serde(default)]
    pub id:       String,
    /// Human label, possibly slash-nested.
    #[serde(default)]
    pub name:     String,
    /// Kind tag.
    #[serde(rename = "type", default)]
    pub kind:     NodeKind,
    /// Ordered children; absent for leaves.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DocumentNode>
}

impl DocumentNode {
    /// Returns `true` when the node is a reusable icon component.
    pub fn is_icon_component(&self) -> bool {
        self.kind == NodeKind::Component
    }
}

/// Response of the file endpoint.
///
/// [`FigmaFile::default`] stands for a document that could not be retrieved.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct FigmaFile {
    /// File name as shown in the editor.
    #[serde(default)]
    pub name:     String,
    /// Document root; its children are the top-level sections.
    #[serde(default)]
    pub document: Option<DocumentNode>
}

impl FigmaFile {
    /// Returns the document root when it has at least one section.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DocumentStructure`] for an absent or empty document.
    pub fn document(&self) -> Result<&DocumentNode, Error> {
        match self.document.as_ref() {
            Some(root) if !root.children.is_empty() => Ok(root),
            Some(_) => Err(Error::document_structure("document has no sections")),
            None => Err(Error::document_structure(
                "document is empty; the file could not be retrieved or has no content"
            ))
        }
    }
}
