//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Tag fetched when neither `--version` nor the config file names one.
pub const DEFAULT_TAG: &str = "v4.0.0.3";

/// Fetch a release's archives and collect the shared libraries they ship.
///
/// Looks up the release tagged TAG, downloads its .tar.xz and .zip assets
/// into the downloads directory, extracts them there, and copies the
/// matching libraries into the artifacts directory.
#[derive(Parser, Debug, Clone)]
#[command(name = "fetch-artifacts")]
#[command(author, about, disable_version_flag = true)]
pub struct Args {
    /// Release tag to fetch [default: v4.0.0.3]
    #[arg(short = 'v', long = "version", value_name = "TAG")]
    pub tag: Option<String>,

    /// Repository owner [default: openslide]
    #[arg(long)]
    pub owner: Option<String>,

    /// Repository name [default: openslide-bin]
    #[arg(long)]
    pub repo: Option<String>,

    /// Directory archives are downloaded and extracted into [default: downloads]
    #[arg(long, value_name = "DIR")]
    pub downloads_dir: Option<PathBuf>,

    /// Directory collected libraries are copied into [default: artifacts]
    #[arg(long, value_name = "DIR")]
    pub artifacts_dir: Option<PathBuf>,

    /// Library file name pattern to collect; `*` and `?` are wildcards (repeatable, replaces the defaults)
    #[arg(long = "library", value_name = "PATTERN")]
    pub libraries: Vec<String>,

    /// Only download archives whose name contains SUBSTRING (repeatable)
    #[arg(long = "asset-filter", value_name = "SUBSTRING")]
    pub asset_filters: Vec<String>,

    /// Release API base URL [default: https://api.github.com]
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Fail when a library pattern matches no file
    #[arg(long)]
    pub strict: bool,

    /// Increase log verbosity (--verbose for debug, twice for trace)
    #[arg(long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored log output
    #[arg(long)]
    pub no_color: bool,

    /// Config file to load instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
