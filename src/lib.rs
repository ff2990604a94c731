// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Generation of importable React icon components from a Figma file.
//!
//! The library locates the icon section of a Figma document, downloads every
//! icon component rendered as SVG, rewrites the markup for JSX embedding and
//! writes one component file per icon together with an index re-exporting
//! them. The pure stages ([`NameNormalizer`], [`MarkupRewriter`],
//! [`render_component`], [`index_content`]) are usable on their own.

mod client;
mod config;
mod document;
mod error;
mod fetch;
mod markup;
mod names;
mod optimize;
mod output;
mod pipeline;
mod progress;
mod render;
mod svg;
mod tree;

pub use client::FigmaClient;
pub use config::{
    DEFAULT_API_BASE, DEFAULT_CONCURRENCY, DEFAULT_EXTENSION, DEFAULT_INDEX_FILE, DEFAULT_MARKER,
    DEFAULT_OPTIMIZER_CONFIG, DEFAULT_OUTPUT_DIR, OptimizerConfig, RawSettings, Secret, Settings,
    load_optimizer_config, parse_optimizer_config
};
pub use document::{DocumentNode, FigmaFile, NodeKind};
pub use error::{
    Error, index_error, optimizer_config_io_error, output_directory_error, write_error
};
pub use fetch::{FetchOutcome, IconFailure, IconFetcher, RenderedIcon};
pub use markup::{CURRENT_COLOR, MarkupRewriter, PROPS_PLACEHOLDER, camelize};
pub use names::{DEFAULT_PREFIX, NameNormalizer, NamePolicy};
pub use optimize::optimize;
pub use output::{EmittedIcon, OutputDirectory, WriteFailure, WriteOutcome, index_content};
pub use pipeline::{RunSummary, generate_icons, run};
pub use progress::Progress;
pub use render::{PROPS_SPREAD, render_component};
pub use svg::{Attribute, Element, Node, parse as parse_svg, serialize as serialize_svg};
pub use tree::{IconRecord, extract_icon_nodes, label_contains, locate_icon_root};
