// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! End-to-end generation run.
//!
//! Everything that talks to the network happens before the output directory
//! is prepared, so a fatal error leaves the previous output in place.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::{
    client::FigmaClient,
    config::{RawSettings, Settings},
    error::Error,
    fetch::{IconFailure, IconFetcher},
    markup::MarkupRewriter,
    output::{EmittedIcon, OutputDirectory, WriteFailure},
    progress::Progress,
    tree::{extract_icon_nodes, label_contains, locate_icon_root}
};

/// Result of a completed run.
#[derive(Debug)]
pub struct RunSummary {
    /// Icons written and listed in the index, in document order.
    pub emitted:        Vec<EmittedIcon>,
    /// Icons dropped while fetching or rewriting.
    pub fetch_failures: Vec<IconFailure>,
    /// Icons dropped while writing.
    pub write_failures: Vec<WriteFailure>,
    /// Location of the written index.
    pub index_path:     PathBuf
}

/// Validates `raw` and runs the generator.
///
/// # Errors
///
/// Returns [`Error::Configuration`] before any network request when the
/// settings are incomplete. Other fatal errors are propagated from
/// [`generate_icons`].
pub async fn run(raw: RawSettings, progress: &Progress) -> Result<RunSummary, Error> {
    let settings = Settings::resolve(raw)?;
    generate_icons(&settings, progress).await
}

/// Runs the generator with validated settings.
///
/// # Errors
///
/// Returns [`Error::DocumentStructure`] when the icon container cannot be
/// located, [`Error::RenderResolution`] when image URLs cannot be resolved,
/// and [`Error::OutputDirectory`] or [`Error::Index`] when the output cannot
/// be written. Per-icon failures are reported in the summary instead.
pub async fn generate_icons(settings: &Settings, progress: &Progress) -> Result<RunSummary, Error> {
    let client = FigmaClient::new(&settings.api_base, &settings.token)?;
    let rewriter = MarkupRewriter::new(settings.optimizer)?;

    let spinner = progress.spinner("Fetching document...");
    let file = client.fetch_file_or_empty(&settings.file_key).await;
    spinner.finish_and_clear();

    let document = file.document()?;
    let root = locate_icon_root(document, label_contains(&settings.marker))?;
    let records = extract_icon_nodes(root);
    if records.is_empty() {
        warn!("No icon components found under '{}'", root.name);
    } else {
        info!("Found {} icon components under '{}'", records.len(), root.name);
    }

    let fetcher = IconFetcher::new(
        client,
        settings.file_key.clone(),
        settings.names.clone(),
        rewriter,
        settings.concurrency
    );
    let bar = progress.bar(records.len() as u64, "Downloading icons");
    let fetched = fetcher.fetch_icons(&records, &bar).await;
    bar.finish_and_clear();
    let fetched = fetched?;

    let directory = OutputDirectory::prepare(&settings.output_dir)?;

    let bar = progress.bar(fetched.icons.len() as u64, "Writing components");
    let written = directory.write_components(fetched.icons, &settings.extension, &bar);
    bar.finish_and_clear();

    let index_path = directory.write_index(&written.emitted, &settings.index_file)?;

    info!(
        "Generated {} components ({} failed to fetch, {} failed to write, {} duplicates skipped)",
        written.emitted.len(),
        fetched.failures.len(),
        written.failures.len(),
        written.duplicates.len()
    );

    Ok(RunSummary {
        emitted: written.emitted,
        fetch_failures: fetched.failures,
        write_failures: written.failures,
        index_path
    })
}
