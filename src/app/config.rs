//! Config file loading and merging with command-line arguments.
//!
//! Precedence for every setting: command line, then config file, then the
//! built-in default.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use release_artifacts::{DEFAULT_API_URL, DEFAULT_LIBRARY_PATTERNS, HttpTimeouts};
use serde::Deserialize;

use crate::cli::{Args, DEFAULT_TAG};

const APP_DIR: &str = "release-artifacts";
const CONFIG_FILE: &str = "config.toml";

pub(crate) const DEFAULT_OWNER: &str = "openslide";
pub(crate) const DEFAULT_REPO: &str = "openslide-bin";
pub(crate) const DEFAULT_DOWNLOADS_DIR: &str = "downloads";
pub(crate) const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// TOML-backed defaults. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) owner: Option<String>,
    pub(crate) repo: Option<String>,
    pub(crate) version: Option<String>,
    pub(crate) downloads_dir: Option<PathBuf>,
    pub(crate) artifacts_dir: Option<PathBuf>,
    pub(crate) api_url: Option<String>,
    pub(crate) libraries: Option<Vec<String>>,
    pub(crate) asset_filters: Option<Vec<String>>,
    pub(crate) strict: Option<bool>,
    pub(crate) verbosity: Option<VerbositySetting>,
    pub(crate) connect_timeout_secs: Option<u64>,
    pub(crate) read_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Validates values that parse but make no sense.
    pub(crate) fn validate(&self) -> Result<()> {
        validate_non_empty("owner", self.owner.as_deref())?;
        validate_non_empty("repo", self.repo.as_deref())?;
        validate_non_empty("version", self.version.as_deref())?;
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        if let Some(libraries) = &self.libraries
            && libraries.is_empty()
        {
            bail!("Invalid config value for `libraries`: list is empty");
        }
        Ok(())
    }
}

fn validate_non_empty(field: &str, value: Option<&str>) -> Result<()> {
    if value.is_some_and(|v| v.trim().is_empty()) {
        bail!("Invalid config value for `{field}`: value is empty");
    }
    Ok(())
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    fn log_level(self) -> &'static str {
        match self {
            Self::Default => "info",
            Self::Verbose => "debug",
            Self::Quiet => "error",
            Self::Debug => "trace",
        }
    }
}

/// A config file that was found and parsed.
#[derive(Debug, Clone)]
pub(crate) struct LoadedConfig {
    pub(crate) path: PathBuf,
    pub(crate) config: FileConfig,
}

/// Resolves the default config path from the given environment values.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/release-artifacts/config.toml`
/// 2. `$HOME/.config/release-artifacts/config.toml`
pub(crate) fn default_config_path(
    xdg_config_home: Option<OsString>,
    home: Option<OsString>,
) -> Option<PathBuf> {
    if let Some(xdg) = xdg_config_home.filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(xdg).join(APP_DIR).join(CONFIG_FILE));
    }
    let home = home.filter(|v| !v.is_empty())?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILE),
    )
}

/// Loads the config file.
///
/// An explicit path must exist. The default location is optional and
/// yields `None` when absent.
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<Option<LoadedConfig>> {
    if let Some(path) = explicit {
        let config = load_file_config(path)?;
        return Ok(Some(LoadedConfig {
            path: path.to_path_buf(),
            config,
        }));
    }

    let Some(path) = default_config_path(env::var_os("XDG_CONFIG_HOME"), env::var_os("HOME"))
    else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }
    let config = load_file_config(&path)?;
    Ok(Some(LoadedConfig { path, config }))
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config_str(&raw).with_context(|| format!("Invalid config file: {}", path.display()))
}

pub(crate) fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let config: FileConfig = toml::from_str(raw)?;
    config.validate()?;
    Ok(config)
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) owner: String,
    pub(crate) repo: String,
    pub(crate) tag: String,
    pub(crate) downloads_dir: PathBuf,
    pub(crate) artifacts_dir: PathBuf,
    pub(crate) api_url: String,
    pub(crate) libraries: Vec<String>,
    pub(crate) asset_filters: Vec<String>,
    pub(crate) strict: bool,
    pub(crate) timeouts: HttpTimeouts,
    pub(crate) log_level: &'static str,
    /// True when the level came from a command-line flag and overrides `RUST_LOG`.
    pub(crate) force_log_level: bool,
    pub(crate) quiet: bool,
}

/// Merges command-line arguments over the config file over defaults.
pub(crate) fn resolve_settings(args: &Args, file: Option<&FileConfig>) -> Settings {
    let file = file.cloned().unwrap_or_default();

    let (log_level, force_log_level, quiet) = if args.quiet {
        ("error", true, true)
    } else if args.verbose > 0 {
        (if args.verbose == 1 { "debug" } else { "trace" }, true, false)
    } else {
        let setting = file.verbosity.unwrap_or(VerbositySetting::Default);
        (setting.log_level(), false, setting == VerbositySetting::Quiet)
    };

    let defaults = HttpTimeouts::default();
    let timeouts = HttpTimeouts {
        connect_secs: file.connect_timeout_secs.unwrap_or(defaults.connect_secs),
        read_secs: file.read_timeout_secs.unwrap_or(defaults.read_secs),
    };

    Settings {
        owner: pick(args.owner.clone(), file.owner, DEFAULT_OWNER),
        repo: pick(args.repo.clone(), file.repo, DEFAULT_REPO),
        tag: pick(args.tag.clone(), file.version, DEFAULT_TAG),
        downloads_dir: args
            .downloads_dir
            .clone()
            .or(file.downloads_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DOWNLOADS_DIR)),
        artifacts_dir: args
            .artifacts_dir
            .clone()
            .or(file.artifacts_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACTS_DIR)),
        api_url: pick(args.api_url.clone(), file.api_url, DEFAULT_API_URL),
        libraries: pick_list(&args.libraries, file.libraries).unwrap_or_else(|| {
            DEFAULT_LIBRARY_PATTERNS
                .iter()
                .map(ToString::to_string)
                .collect()
        }),
        asset_filters: pick_list(&args.asset_filters, file.asset_filters).unwrap_or_default(),
        strict: args.strict || file.strict.unwrap_or(false),
        timeouts,
        log_level,
        force_log_level,
        quiet,
    }
}

fn pick(cli: Option<String>, file: Option<String>, default: &str) -> String {
    cli.or(file).unwrap_or_else(|| default.to_string())
}

fn pick_list(cli: &[String], file: Option<Vec<String>>) -> Option<Vec<String>> {
    if cli.is_empty() {
        file
    } else {
        Some(cli.to_vec())
    }
}
