// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Concurrent retrieval and rewriting of icon payloads.

use futures::{StreamExt, stream};
use indicatif::ProgressBar;
use tracing::{debug, info, warn};

use crate::{
    client::FigmaClient, error::Error, markup::MarkupRewriter, names::NameNormalizer,
    tree::IconRecord
};

/// Icon whose markup is ready to be rendered into a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedIcon {
    /// Node identifier of the icon.
    pub id:             String,
    /// Component identifier derived from the name.
    pub component_name: String,
    /// File stem derived from the name.
    pub file_stem:      String,
    /// Rewritten markup carrying the props placeholder.
    pub markup:         String
}

/// Icon dropped while fetching or rewriting.
#[derive(Debug)]
pub struct IconFailure {
    /// Node identifier of the icon.
    pub id:    String,
    /// Raw node name.
    pub name:  String,
    /// Reason the icon was dropped.
    pub error: Error
}

/// Result of fetching a batch of icons.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    /// Successfully rewritten icons in input order.
    pub icons:    Vec<RenderedIcon>,
    /// Icons that were dropped, in input order.
    pub failures: Vec<IconFailure>
}

/// Downloads and rewrites icons with bounded concurrency.
#[derive(Debug, Clone)]
pub struct IconFetcher {
    client:      FigmaClient,
    file_key:    String,
    names:       NameNormalizer,
    rewriter:    MarkupRewriter,
    concurrency: usize
}

impl IconFetcher {
    /// Creates a fetcher for the file identified by `file_key`.
    ///
    /// A `concurrency` of zero is treated as one.
    pub fn new<K>(
        client: FigmaClient,
        file_key: K,
        names: NameNormalizer,
        rewriter: MarkupRewriter,
        concurrency: usize
    ) -> Self
    where
        K: Into<String>
    {
        Self {
            client,
            file_key: file_key.into(),
            names,
            rewriter,
            concurrency: concurrency.max(1)
        }
    }

    /// Fetches every record, isolating per-icon failures.
    ///
    /// The image URLs are resolved in one batched call. `progress` advances
    /// once per record regardless of the outcome. Results keep the order of
    /// `records`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RenderResolution`] when the batched resolution fails.
    /// No download is attempted in that case.
    pub async fn fetch_icons(
        &self,
        records: &[IconRecord],
        progress: &ProgressBar
    ) -> Result<FetchOutcome, Error> {
        if records.is_empty() {
            debug!("No icons to fetch");
            return Ok(FetchOutcome::default());
        }

        let ids: Vec<&str> = records.iter().map(|record| record.id.as_str()).collect();
        let urls = self.client.resolve_images(&self.file_key, &ids).await?;
        info!("Resolved {} of {} image URLs", urls.values().flatten().count(), records.len());

        let mut results: Vec<(usize, Result<RenderedIcon, Error>)> =
            stream::iter(records.iter().enumerate())
                .map(|(index, record)| {
                    let url = urls.get(&record.id).cloned().flatten();
                    async move {
                        let result = self.fetch_one(record, url.as_deref()).await;
                        progress.inc(1);
                        (index, result)
                    }
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;
        results.sort_by_key(|(index, _)| *index);

        let mut outcome = FetchOutcome::default();
        for ((_, result), record) in results.into_iter().zip(records) {
            match result {
                Ok(icon) => outcome.icons.push(icon),
                Err(error) => {
                    warn!("Skipping icon '{}' ({}): {}", record.name, record.id, error);
                    outcome.failures.push(IconFailure {
                        id: record.id.clone(),
                        name: record.name.clone(),
                        error
                    });
                }
            }
        }

        Ok(outcome)
    }

    async fn fetch_one(&self, record: &IconRecord, url: Option<&str>) -> Result<RenderedIcon, Error> {
        let file_stem = self.names.normalize_stem(&record.name)?;
        let component_name = self.names.to_component_identifier(&file_stem)?;
        let url = url.ok_or_else(|| {
            Error::icon_download(&record.id, "no rendered image URL was returned")
        })?;

        let raw = self.client.download(&record.id, url).await?;
        let markup = self.rewriter.rewrite(&raw)?;
        debug!("Fetched icon {} as {component_name}", record.id);

        Ok(RenderedIcon {
            id: record.id.clone(),
            component_name,
            file_stem,
            markup
        })
    }
}
