// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Component and index files on disk.
//!
//! The output directory is owned by the generator: preparing it removes
//! every previous entry so stale components never linger next to fresh ones.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    fs,
    path::{Path, PathBuf}
};

use indicatif::ProgressBar;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    error::{self, Error},
    fetch::RenderedIcon,
    render::render_component
};

/// Icon whose component file was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedIcon {
    /// The rendered icon.
    pub icon:        RenderedIcon,
    /// Relative module path used by the index, e.g. `./arrow_left`.
    pub output_path: String
}

/// Icon dropped because its component file could not be written.
#[derive(Debug)]
pub struct WriteFailure {
    /// Node identifier of the icon.
    pub id:        String,
    /// File stem that was being written.
    pub file_stem: String,
    /// Underlying [`Error::Write`].
    pub error:     Error
}

/// Result of writing a batch of components.
#[derive(Debug, Default)]
pub struct WriteOutcome {
    /// Written icons in input order.
    pub emitted:    Vec<EmittedIcon>,
    /// Failed writes in input order.
    pub failures:   Vec<WriteFailure>,
    /// Icons skipped because another icon with their stem was written.
    pub duplicates: Vec<RenderedIcon>
}

/// Prepared output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDirectory {
    path: PathBuf
}

impl OutputDirectory {
    /// Creates `path` with its parents, or empties it when it already exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutputDirectory`] naming the directory or the entry
    /// that could not be created or removed.
    pub fn prepare<P>(path: P) -> Result<Self, Error>
    where
        P: Into<PathBuf>
    {
        let path = path.into();

        if path.exists() {
            let entries =
                fs::read_dir(&path).map_err(|source| error::output_directory_error(&path, source))?;
            let mut removed = 0usize;
            for entry in entries {
                let entry = entry.map_err(|source| error::output_directory_error(&path, source))?;
                let entry_path = entry.path();
                let file_type = entry
                    .file_type()
                    .map_err(|source| error::output_directory_error(&entry_path, source))?;
                let result = if file_type.is_dir() {
                    fs::remove_dir_all(&entry_path)
                } else {
                    fs::remove_file(&entry_path)
                };
                result.map_err(|source| error::output_directory_error(&entry_path, source))?;
                removed += 1;
            }
            debug!("Cleared {removed} entries from {}", path.display());
        } else {
            fs::create_dir_all(&path)
                .map_err(|source| error::output_directory_error(&path, source))?;
            debug!("Created output directory {}", path.display());
        }

        Ok(Self {
            path
        })
    }

    /// Location of the directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes one component file per icon in parallel.
    ///
    /// The first icon claiming a stem wins. When its write fails, the next
    /// icon with the same stem takes its place, so a stem is only lost when
    /// every candidate fails. Remaining icons with a written stem are
    /// skipped. Results keep input order and `progress` advances once per
    /// icon.
    pub fn write_components(
        &self,
        icons: Vec<RenderedIcon>,
        extension: &str,
        progress: &ProgressBar
    ) -> WriteOutcome {
        let mut slots: HashMap<String, usize> = HashMap::with_capacity(icons.len());
        let mut candidates: Vec<VecDeque<(usize, RenderedIcon)>> = Vec::new();
        for (position, icon) in icons.into_iter().enumerate() {
            let slot = *slots.entry(icon.file_stem.clone()).or_insert_with(|| {
                candidates.push(VecDeque::new());
                candidates.len() - 1
            });
            candidates[slot].push_back((position, icon));
        }

        let mut emitted = Vec::new();
        let mut failures = Vec::new();
        let mut written = vec![false; candidates.len()];
        loop {
            let batch: Vec<(usize, usize, RenderedIcon)> = candidates
                .iter_mut()
                .enumerate()
                .filter(|(slot, _)| !written[*slot])
                .filter_map(|(slot, queue)| {
                    queue.pop_front().map(|(position, icon)| (slot, position, icon))
                })
                .collect();
            if batch.is_empty() {
                break;
            }

            let results: Vec<(usize, usize, Result<EmittedIcon, WriteFailure>)> = batch
                .into_par_iter()
                .map(|(slot, position, icon)| {
                    let result = self.write_component(icon, extension);
                    progress.inc(1);
                    (slot, position, result)
                })
                .collect();

            for (slot, position, result) in results {
                match result {
                    Ok(entry) => {
                        written[slot] = true;
                        emitted.push((position, entry));
                    }
                    Err(failure) => {
                        warn!("{}", failure.error.to_display_string());
                        failures.push((position, failure));
                    }
                }
            }
        }

        let mut duplicates = Vec::new();
        for queue in candidates {
            for (position, icon) in queue {
                warn!(
                    "Skipping icon {} because stem '{}' is already taken",
                    icon.id, icon.file_stem
                );
                progress.inc(1);
                duplicates.push((position, icon));
            }
        }

        WriteOutcome {
            emitted:    in_input_order(emitted),
            failures:   in_input_order(failures),
            duplicates: in_input_order(duplicates)
        }
    }

    /// Writes the index re-exporting every emitted icon.
    ///
    /// An existing file is overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Index`] when the file cannot be written.
    pub fn write_index(&self, emitted: &[EmittedIcon], file_name: &str) -> Result<PathBuf, Error> {
        let path = self.path.join(file_name);
        fs::write(&path, index_content(emitted))
            .map_err(|source| error::index_error(&path, source))?;
        info!("Wrote index {} with {} exports", path.display(), emitted.len());
        Ok(path)
    }

    fn write_component(&self, icon: RenderedIcon, extension: &str) -> Result<EmittedIcon, WriteFailure> {
        let path = self.path.join(format!("{}.{extension}", icon.file_stem));
        let contents = render_component(&icon.markup, &icon.component_name);

        if let Err(source) = fs::write(&path, contents) {
            return Err(WriteFailure {
                id:        icon.id,
                file_stem: icon.file_stem,
                error:     error::write_error(&path, source)
            });
        }

        debug!("Wrote {}", path.display());
        Ok(EmittedIcon {
            output_path: format!("./{}", icon.file_stem),
            icon
        })
    }
}

fn in_input_order<T>(mut entries: Vec<(usize, T)>) -> Vec<T> {
    entries.sort_by_key(|(position, _)| *position);
    entries.into_iter().map(|(_, entry)| entry).collect()
}

/// Builds the index source for `emitted`.
///
/// Icons are deduplicated by stem keeping the first occurrence. Every line
/// ends with a newline.
///
/// # Examples
///
/// ```
/// use figma_icons::{EmittedIcon, RenderedIcon, index_content};
///
/// let icon = RenderedIcon {
///     id:             "1:1".to_owned(),
///     component_name: "IconLeft".to_owned(),
///     file_stem:      "left".to_owned(),
///     markup:         "<svg/>".to_owned()
/// };
/// let emitted = EmittedIcon {
///     icon,
///     output_path: "./left".to_owned()
/// };
/// assert_eq!(index_content(&[emitted]), "export {IconLeft} from './left';\n");
/// ```
pub fn index_content(emitted: &[EmittedIcon]) -> String {
    let mut seen = HashSet::with_capacity(emitted.len());
    emitted
        .iter()
        .filter(|entry| seen.insert(entry.icon.file_stem.as_str()))
        .map(|entry| {
            format!(
                "export {{{}}} from '{}';\n",
                entry.icon.component_name, entry.output_path
            )
        })
        .collect()
}
