// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Run settings and optimizer configuration.
//!
//! [`RawSettings`] mirrors what the CLI collects from flags, environment
//! variables and `.env` files. [`Settings::resolve`] validates it into the
//! value threaded through the pipeline. The validation happens before any
//! network call is made. The optimizer configuration is a YAML document
//! whose fields toggle individual passes.

use std::{
    fmt,
    fs,
    path::{Path, PathBuf}
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{self, Error},
    names::{DEFAULT_PREFIX, NameNormalizer, NamePolicy}
};

/// Base URL of the Figma REST API.
pub const DEFAULT_API_BASE: &str = "https://api.figma.com/v1";
/// Directory receiving generated components by default.
pub const DEFAULT_OUTPUT_DIR: &str = "src";
/// File extension applied to generated components.
pub const DEFAULT_EXTENSION: &str = "tsx";
/// File name of the generated barrel module.
pub const DEFAULT_INDEX_FILE: &str = "index.ts";
/// Substring identifying the section that holds icon definitions.
pub const DEFAULT_MARKER: &str = "Icons";
/// Number of downloads allowed in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 8;
/// Optimizer configuration picked up from the working directory.
pub const DEFAULT_OPTIMIZER_CONFIG: &str = "optimizer.yaml";

/// Secret string whose `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wraps the provided secret.
    pub fn new<S>(value: S) -> Self
    where
        S: Into<String>
    {
        Self(value.into())
    }

    /// Exposes the secret for use in a request header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Unvalidated settings as collected by the CLI.
#[derive(Debug, Clone)]
pub struct RawSettings {
    /// Figma API token (`TOKEN`).
    pub token:            Option<Secret>,
    /// Figma file key (`FILE`).
    pub file_key:         Option<String>,
    /// Base URL of the REST API.
    pub api_base:         String,
    /// Directory receiving generated files.
    pub output_dir:       PathBuf,
    /// Extension of generated component files, with or without a dot.
    pub extension:        String,
    /// File name of the generated index.
    pub index_file:       String,
    /// Marker substring selecting the icon section.
    pub marker:           String,
    /// Prefix of generated component identifiers.
    pub prefix:           String,
    /// Which name segments contribute to stems.
    pub name_policy:      NamePolicy,
    /// Maximum number of concurrent downloads.
    pub concurrency:      usize,
    /// Optional optimizer configuration file.
    pub optimizer_config: Option<PathBuf>
}

impl Default for RawSettings {
    fn default() -> Self {
        Self {
            token:            None,
            file_key:         None,
            api_base:         DEFAULT_API_BASE.to_owned(),
            output_dir:       PathBuf::from(DEFAULT_OUTPUT_DIR),
            extension:        DEFAULT_EXTENSION.to_owned(),
            index_file:       DEFAULT_INDEX_FILE.to_owned(),
            marker:           DEFAULT_MARKER.to_owned(),
            prefix:           DEFAULT_PREFIX.to_owned(),
            name_policy:      NamePolicy::Leaf,
            concurrency:      DEFAULT_CONCURRENCY,
            optimizer_config: None
        }
    }
}

/// Validated settings threaded through the pipeline.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Figma API token.
    pub token:       Secret,
    /// Figma file key.
    pub file_key:    String,
    /// Base URL of the REST API without a trailing slash.
    pub api_base:    String,
    /// Directory receiving generated files.
    pub output_dir:  PathBuf,
    /// Extension of component files without the leading dot.
    pub extension:   String,
    /// File name of the generated index.
    pub index_file:  String,
    /// Marker substring selecting the icon section.
    pub marker:      String,
    /// Name normalizer derived from the prefix and policy.
    pub names:       NameNormalizer,
    /// Maximum number of concurrent downloads, at least one.
    pub concurrency: usize,
    /// Optimizer passes applied to every icon.
    pub optimizer:   OptimizerConfig
}

impl Settings {
    /// Validates raw settings and loads the optimizer configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the token or file key is absent
    /// or blank, or when another setting is unusable. Optimizer configuration
    /// failures surface as [`Error::OptimizerConfigIo`] or [`Error::Parse`].
    pub fn resolve(raw: RawSettings) -> Result<Self, Error> {
        let token = raw
            .token
            .filter(|token| !token.expose().trim().is_empty())
            .ok_or_else(|| {
                Error::configuration(
                    "the Figma API token is not defined; set the TOKEN environment variable"
                )
            })?;

        let file_key = raw
            .file_key
            .map(|key| key.trim().to_owned())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                Error::configuration(
                    "the Figma file key is not defined; set the FILE environment variable"
                )
            })?;

        let extension = raw.extension.trim().trim_start_matches('.').to_owned();
        if extension.is_empty() {
            return Err(Error::configuration("component file extension must not be empty"));
        }

        let index_file = raw.index_file.trim().to_owned();
        if index_file.is_empty() || index_file.contains(['/', '\\']) {
            return Err(Error::configuration(format!(
                "index file name '{index_file}' must be a plain file name"
            )));
        }

        if raw.marker.is_empty() {
            return Err(Error::configuration("section marker must not be empty"));
        }

        validate_prefix(&raw.prefix)?;

        if raw.concurrency == 0 {
            return Err(Error::configuration("concurrency must be at least 1"));
        }

        let api_base = raw.api_base.trim().trim_end_matches('/').to_owned();
        if api_base.is_empty() {
            return Err(Error::configuration("API base URL must not be empty"));
        }

        let optimizer = match raw.optimizer_config.as_deref() {
            Some(path) => load_optimizer_config(path)?,
            None => OptimizerConfig::default()
        };

        Ok(Self {
            token,
            file_key,
            api_base,
            output_dir: raw.output_dir,
            extension,
            index_file,
            marker: raw.marker,
            names: NameNormalizer::new(raw.name_policy, raw.prefix),
            concurrency: raw.concurrency,
            optimizer
        })
    }
}

fn validate_prefix(prefix: &str) -> Result<(), Error> {
    let mut characters = prefix.chars();
    let valid = characters
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && characters.all(|rest| rest.is_ascii_alphanumeric() || rest == '_');

    if valid {
        Ok(())
    } else {
        Err(Error::configuration(format!(
            "identifier prefix '{prefix}' must start with a letter and contain only ASCII \
             letters, digits or underscores"
        )))
    }
}

/// Passes applied by the markup optimizer.
///
/// Every field is optional in YAML and defaults to the value documented on
/// the field. Unknown fields are rejected.
///
/// # Examples
///
/// ```
/// use figma_icons::parse_optimizer_config;
///
/// let config = parse_optimizer_config("merge_paths: false\nremove_dimensions: true\n",).unwrap();
/// assert!(!config.merge_paths);
/// assert!(config.remove_dimensions);
/// assert!(config.collapse_groups);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizerConfig {
    /// Drop `<metadata>`, `<title>` and `<desc>` (default `true`).
    pub remove_metadata:         bool,
    /// Drop editor-specific namespaces, elements and attributes (default
    /// `true`).
    pub remove_editor_data:      bool,
    /// Drop attributes with empty values (default `true`).
    pub remove_empty_attributes: bool,
    /// Drop `id` attributes nothing references (default `true`).
    pub cleanup_ids:             bool,
    /// Fold redundant `<g>` wrappers into their children (default `true`).
    pub collapse_groups:         bool,
    /// Merge adjacent stroke-only paths with identical attributes (default
    /// `true`).
    pub merge_paths:             bool,
    /// Drop childless containers without an `id` (default `true`).
    pub remove_empty_containers: bool,
    /// Drop root `width`/`height` when a `viewBox` is present (default
    /// `false`).
    pub remove_dimensions:       bool
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            remove_metadata:         true,
            remove_editor_data:      true,
            remove_empty_attributes: true,
            cleanup_ids:             true,
            collapse_groups:         true,
            merge_paths:             true,
            remove_empty_containers: true,
            remove_dimensions:       false
        }
    }
}

/// Loads the optimizer configuration from a YAML file.
///
/// # Errors
///
/// Returns [`Error::OptimizerConfigIo`] when the file cannot be read and
/// [`Error::Parse`] when it is not a valid configuration.
pub fn load_optimizer_config(path: &Path) -> Result<OptimizerConfig, Error> {
    let contents = fs::read_to_string(path)
        .map_err(|source| error::optimizer_config_io_error(path, source))?;
    parse_optimizer_config(&contents)
}

/// Parses the optimizer configuration from a YAML document.
///
/// An empty document yields the defaults.
///
/// # Errors
///
/// Propagates [`Error::Parse`] when the YAML cannot be decoded.
pub fn parse_optimizer_config(contents: &str) -> Result<OptimizerConfig, Error> {
    if contents.trim().is_empty() {
        return Ok(OptimizerConfig::default());
    }
    Ok(serde_yaml::from_str(contents)?)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    fn raw() -> RawSettings {
        RawSettings {
            token: Some(Secret::new("figd_secret")),
            file_key: Some("AbCdEf".to_owned()),
            ..RawSettings::default()
        }
    }

    #[test]
    fn resolve_applies_defaults() {
        let settings = Settings::resolve(raw()).expect("valid settings");
        assert_eq!(settings.file_key, "AbCdEf");
        assert_eq!(settings.api_base, DEFAULT_API_BASE);
        assert_eq!(settings.extension, "tsx");
        assert_eq!(settings.index_file, "index.ts");
        assert_eq!(settings.marker, "Icons");
        assert_eq!(settings.concurrency, 8);
        assert_eq!(settings.names.policy(), NamePolicy::Leaf);
        assert_eq!(settings.optimizer, OptimizerConfig::default());
    }

    #[test]
    fn resolve_requires_token() {
        for token in [None, Some(Secret::new("   "))] {
            let error = Settings::resolve(RawSettings {
                token,
                ..raw()
            })
            .expect_err("missing token must fail");
            match error {
                Error::Configuration {
                    message
                } => assert!(message.contains("TOKEN")),
                other => panic!("unexpected error variant: {other:?}")
            }
        }
    }

    #[test]
    fn resolve_requires_file_key() {
        let error = Settings::resolve(RawSettings {
            file_key: Some(String::new()),
            ..raw()
        })
        .expect_err("missing file must fail");
        assert!(error.to_string().contains("FILE"));
    }

    #[test]
    fn resolve_normalizes_extension_and_api_base() {
        let settings = Settings::resolve(RawSettings {
            extension: ".jsx".to_owned(),
            api_base: "http://127.0.0.1:9000/v1/".to_owned(),
            ..raw()
        })
        .expect("valid settings");
        assert_eq!(settings.extension, "jsx");
        assert_eq!(settings.api_base, "http://127.0.0.1:9000/v1");
    }

    #[test]
    fn resolve_rejects_invalid_values() {
        let cases = [
            RawSettings {
                concurrency: 0,
                ..raw()
            },
            RawSettings {
                prefix: "1Icon".to_owned(),
                ..raw()
            },
            RawSettings {
                prefix: "Ic-on".to_owned(),
                ..raw()
            },
            RawSettings {
                index_file: "nested/index.ts".to_owned(),
                ..raw()
            },
            RawSettings {
                extension: ".".to_owned(),
                ..raw()
            },
            RawSettings {
                marker: String::new(),
                ..raw()
            },
        ];

        for case in cases {
            let error = Settings::resolve(case).expect_err("expected configuration error");
            assert!(matches!(error, Error::Configuration { .. }), "{error:?}");
        }
    }

    #[test]
    fn debug_output_redacts_token() {
        let settings = Settings::resolve(raw()).expect("valid settings");
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("figd_secret"));
        assert!(rendered.contains("Secret(***)"));
    }

    #[test]
    fn resolve_loads_optimizer_config_file() {
        let directory = tempdir().expect("failed to create tempdir");
        let path = directory.path().join("optimizer.yaml");
        fs::write(&path, "collapse_groups: false\n").expect("failed to write config");

        let settings = Settings::resolve(RawSettings {
            optimizer_config: Some(path),
            ..raw()
        })
        .expect("valid settings");
        assert!(!settings.optimizer.collapse_groups);
        assert!(settings.optimizer.merge_paths);
    }

    #[test]
    fn missing_optimizer_config_reports_io_error() {
        let error = load_optimizer_config(Path::new("/nonexistent/optimizer.yaml"))
            .expect_err("expected io error");
        assert!(matches!(error, Error::OptimizerConfigIo { .. }));
    }

    #[test]
    fn optimizer_config_rejects_unknown_fields() {
        let error = parse_optimizer_config("inline_styles: true\n").expect_err("unknown field");
        assert!(matches!(error, Error::Parse { .. }));
    }

    #[test]
    fn empty_optimizer_config_uses_defaults() {
        assert_eq!(parse_optimizer_config("").unwrap(), OptimizerConfig::default());
        assert_eq!(parse_optimizer_config("{}").unwrap(), OptimizerConfig::default());
    }
}
