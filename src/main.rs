// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Command-line interface for the figma-icons binary.
//!
//! Settings come from flags, from the environment, or from a `.env` file in
//! the working directory. Fatal errors are printed to stderr and terminate
//! the process with status 1.

use std::{
    io,
    path::{Path, PathBuf},
    process,
};

use clap::{ArgAction, Parser};
use figma_icons::{
    DEFAULT_API_BASE, DEFAULT_CONCURRENCY, DEFAULT_EXTENSION, DEFAULT_INDEX_FILE, DEFAULT_MARKER,
    DEFAULT_OPTIMIZER_CONFIG, DEFAULT_OUTPUT_DIR, DEFAULT_PREFIX, Error, NamePolicy, Progress,
    RawSettings, Secret, run,
};
use tracing_subscriber::EnvFilter;

/// Command line interface for generating React icon components.
#[derive(Debug, Parser,)]
#[command(
    name = "figma-icons",
    version,
    about = "Generate React icon components from a Figma file"
)]
struct Cli
{
    /// Figma personal access token.
    #[arg(long = "token", env = "TOKEN", hide_env_values = true, value_name = "TOKEN")]
    token: Option<String,>,

    /// Key of the Figma file holding the icons.
    #[arg(long = "file", env = "FILE", value_name = "KEY")]
    file: Option<String,>,

    /// Directory receiving the generated components.
    #[arg(long = "output", value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Extension of generated component files.
    #[arg(long = "extension", value_name = "EXT", default_value = DEFAULT_EXTENSION)]
    extension: String,

    /// File name of the generated index.
    #[arg(long = "index-file", value_name = "NAME", default_value = DEFAULT_INDEX_FILE)]
    index_file: String,

    /// Substring identifying the section holding the icons.
    #[arg(long = "marker", value_name = "TEXT", default_value = DEFAULT_MARKER)]
    marker: String,

    /// Prefix of generated component identifiers.
    #[arg(long = "prefix", value_name = "PREFIX", default_value = DEFAULT_PREFIX)]
    prefix: String,

    /// Keep every `/` segment of node names in file stems.
    #[arg(long = "keep-path", action = ArgAction::SetTrue)]
    keep_path: bool,

    /// Maximum number of concurrent icon downloads.
    #[arg(long = "concurrency", value_name = "N", default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Base URL of the Figma REST API.
    #[arg(
        long = "api-base",
        env = "FIGMA_API_BASE",
        value_name = "URL",
        default_value = DEFAULT_API_BASE
    )]
    api_base: String,

    /// YAML file configuring the markup optimizer.
    #[arg(long = "optimizer-config", value_name = "PATH")]
    optimizer_config: Option<PathBuf,>,

    /// Hide progress indicators.
    #[arg(long = "quiet", action = ArgAction::SetTrue)]
    quiet: bool,
}

impl Cli
{
    /// Converts parsed arguments into raw settings.
    ///
    /// Without `--optimizer-config`, `optimizer.yaml` inside `working_dir` is
    /// used when it exists.
    fn into_raw_settings(self, working_dir: &Path,) -> RawSettings
    {
        let optimizer_config =
            self.optimizer_config.or_else(|| default_optimizer_config(working_dir,),);
        let name_policy = if self.keep_path { NamePolicy::Path } else { NamePolicy::Leaf };

        RawSettings {
            token: self.token.map(Secret::new,),
            file_key: self.file,
            api_base: self.api_base,
            output_dir: self.output,
            extension: self.extension,
            index_file: self.index_file,
            marker: self.marker,
            prefix: self.prefix,
            name_policy,
            concurrency: self.concurrency,
            optimizer_config,
        }
    }
}

fn default_optimizer_config(working_dir: &Path,) -> Option<PathBuf,>
{
    let candidate = working_dir.join(DEFAULT_OPTIMIZER_CONFIG,);
    candidate.is_file().then_some(candidate,)
}

fn init_tracing()
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info",),);
    tracing_subscriber::fmt().with_env_filter(filter,).with_writer(io::stderr,).init();
}

/// Entry point that reports errors and sets the appropriate exit status.
#[tokio::main]
async fn main()
{
    dotenvy::dotenv().ok();
    init_tracing();

    if let Err(error,) = execute().await {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

/// Executes the CLI using parsed arguments.
///
/// # Errors
///
/// Propagates fatal errors from configuration and generation.
async fn execute() -> Result<(), Error,>
{
    let cli = Cli::parse();
    let progress = Progress::new(!cli.quiet,);
    let raw = cli.into_raw_settings(Path::new(".",),);

    let summary = run(raw, &progress,).await?;
    tracing::debug!("Index written to {}", summary.index_path.display());

    Ok((),)
}
