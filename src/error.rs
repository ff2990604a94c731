#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the icon pipeline."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free.
//!
//! Variants fall into two groups. Run-level failures (configuration, document
//! structure, render resolution, output directory) abort the pipeline.
//! Item-level failures (name, download, markup, write) are recorded against a
//! single icon and the run continues without it.

use std::path::{Path, PathBuf};

/// Unified error type returned by the pipeline stages and the CLI.
///
/// Variants never embed the API token.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// Required settings are absent or invalid.
    #[error("configuration error: {message}")]
    Configuration {
        /// Human readable description of the missing or invalid setting.
        message: String
    },
    /// The document could not be retrieved from the file endpoint.
    #[error("failed to fetch document: {message}")]
    DocumentFetch {
        /// Transport, status or decoding failure description.
        message: String
    },
    /// The document does not contain the expected icon section layout.
    #[error("unexpected document structure: {message}")]
    DocumentStructure {
        /// Description of the missing section or container.
        message: String
    },
    /// The batched image URL resolution call failed as a whole.
    #[error("failed to resolve rendered images: {message}")]
    RenderResolution {
        /// Transport, status or service-reported failure description.
        message: String
    },
    /// A single icon could not be downloaded.
    #[error("failed to download icon {id}: {message}")]
    IconDownload {
        /// Node identifier of the icon.
        id:      String,
        /// Description of the failure.
        message: String
    },
    /// Markup could not be parsed or has an unexpected shape.
    #[error("invalid markup: {message}")]
    Markup {
        /// Description of the parse failure.
        message: String
    },
    /// Renaming an attribute would produce a duplicate on the same element.
    #[error("attribute '{attribute}' appears twice on <{element}> after renaming")]
    AttributeCollision {
        /// Element carrying the colliding attributes.
        element:   String,
        /// Attribute name produced by the rename.
        attribute: String
    },
    /// A node name normalizes to an empty stem or identifier.
    #[error("node name {name:?} does not produce a usable icon name")]
    InvalidName {
        /// Raw name as found in the document.
        name: String
    },
    /// Writing a single component file failed.
    #[error("failed to write component at {path:?}: {source}")]
    Write {
        /// Location of the component file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// The output directory could not be created or cleared.
    #[error("failed to prepare output directory {path:?}: {source}")]
    OutputDirectory {
        /// Location of the output directory or the entry being removed.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Writing the index file failed.
    #[error("failed to write index at {path:?}: {source}")]
    Index {
        /// Location of the index file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// The optimizer configuration file could not be read.
    #[error("failed to read optimizer configuration from {path:?}: {source}")]
    OptimizerConfigIo {
        /// Location of the configuration file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// The optimizer configuration is not valid YAML for the expected shape.
    #[error("failed to parse optimizer configuration: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    }
}

impl Error {
    /// Constructs a configuration error.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the configuration problem.
    pub fn configuration<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Configuration {
            message: message.into()
        }
    }

    /// Constructs a document fetch error.
    pub fn document_fetch<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::DocumentFetch {
            message: message.into()
        }
    }

    /// Constructs a document structure error.
    pub fn document_structure<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::DocumentStructure {
            message: message.into()
        }
    }

    /// Constructs a render resolution error.
    pub fn render_resolution<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::RenderResolution {
            message: message.into()
        }
    }

    /// Constructs a download error for the icon identified by `id`.
    pub fn icon_download<I, M>(id: I, message: M) -> Self
    where
        I: Into<String>,
        M: Into<String>
    {
        Self::IconDownload {
            id:      id.into(),
            message: message.into()
        }
    }

    /// Constructs a markup error.
    pub fn markup<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Markup {
            message: message.into()
        }
    }

    /// Constructs an invalid name error for the raw node name.
    pub fn invalid_name<N>(name: N) -> Self
    where
        N: Into<String>
    {
        Self::InvalidName {
            name: name.into()
        }
    }

    /// Returns `true` when the error only affects a single icon.
    pub fn is_item_level(&self) -> bool {
        matches!(
            self,
            Self::IconDownload { .. }
                | Self::Markup { .. }
                | Self::AttributeCollision { .. }
                | Self::InvalidName { .. }
                | Self::Write { .. }
        )
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// The returned string matches the [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

/// Creates an [`Error::Write`] variant capturing the failing path and source.
pub fn write_error(path: &Path, source: std::io::Error) -> Error {
    Error::Write {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::OutputDirectory`] variant for the failing path.
pub fn output_directory_error(path: &Path, source: std::io::Error) -> Error {
    Error::OutputDirectory {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::Index`] variant for the failing path.
pub fn index_error(path: &Path, source: std::io::Error) -> Error {
    Error::Index {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::OptimizerConfigIo`] variant for the failing path.
pub fn optimizer_config_io_error(path: &Path, source: std::io::Error) -> Error {
    Error::OptimizerConfigIo {
        path: path.to_path_buf(),
        source
    }
}
