//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{path::PathBuf, str::FromStr};

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::domain::tags::TagCasing;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "foglio";
const DEFAULT_CONTENT_DIR: &str = "content";
const DEFAULT_SUMMARY_MAX_CHARS: usize = 240;

/// Command-line arguments for the Foglio binary.
#[derive(Debug, Parser)]
#[command(name = "foglio", version, about = "Foglio content index and search")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "FOGLIO_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// List all indexed articles in publication order.
    List(ListArgs),
    /// Search articles by free text and/or tag filter.
    Search(SearchArgs),
    /// Show per-tag article counts.
    Tags(TagsArgs),
}

impl Command {
    pub fn overrides(&self) -> &CommonOverrides {
        match self {
            Command::List(args) => &args.overrides,
            Command::Search(args) => &args.overrides,
            Command::Tags(args) => &args.overrides,
        }
    }
}

#[derive(Debug, Args, Default, Clone)]
pub struct CommonOverrides {
    /// Override the content directory.
    #[arg(long = "content-dir", value_name = "PATH")]
    pub content_dir: Option<PathBuf>,

    /// Override the summary character budget for derived summaries.
    #[arg(long = "summary-max-chars", value_name = "COUNT")]
    pub summary_max_chars: Option<usize>,

    /// Override the tag display casing policy (first-seen|lowercase).
    #[arg(long = "tag-casing", value_name = "POLICY")]
    pub tag_casing: Option<String>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub overrides: CommonOverrides,

    /// Emit JSON instead of the human-readable listing.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub overrides: CommonOverrides,

    /// Free-text query; empty matches every candidate.
    #[arg(value_name = "TEXT", default_value = "")]
    pub text: String,

    /// Restrict results to one tag; `all` means no restriction.
    #[arg(long, value_name = "TAG")]
    pub tag: Option<String>,

    /// Emit JSON instead of the human-readable listing.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub json: bool,
}

#[derive(Debug, Args, Default, Clone)]
pub struct TagsArgs {
    #[command(flatten)]
    pub overrides: CommonOverrides,

    /// Emit JSON instead of the human-readable listing.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub json: bool,
}

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub content: ContentSettings,
    pub index: IndexSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct ContentSettings {
    pub directory: PathBuf,
    pub summary_max_chars: usize,
}

#[derive(Debug, Clone)]
pub struct IndexSettings {
    pub tag_casing: TagCasing,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("FOGLIO").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    if let Some(command) = cli.command.as_ref() {
        raw.apply_overrides(command.overrides());
    }

    Settings::from_raw(raw)
}

pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    content: RawContentSettings,
    index: RawIndexSettings,
    logging: RawLoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawContentSettings {
    directory: Option<PathBuf>,
    summary_max_chars: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawIndexSettings {
    tag_casing: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &CommonOverrides) {
        if let Some(directory) = overrides.content_dir.as_ref() {
            self.content.directory = Some(directory.clone());
        }
        if let Some(budget) = overrides.summary_max_chars {
            self.content.summary_max_chars = Some(budget);
        }
        if let Some(casing) = overrides.tag_casing.as_ref() {
            self.index.tag_casing = Some(casing.clone());
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            content,
            index,
            logging,
        } = raw;

        let content = build_content_settings(content)?;
        let index = build_index_settings(index)?;
        let logging = build_logging_settings(logging)?;

        Ok(Self {
            content,
            index,
            logging,
        })
    }
}

fn build_content_settings(content: RawContentSettings) -> Result<ContentSettings, LoadError> {
    let directory = content
        .directory
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTENT_DIR));

    let summary_max_chars = content
        .summary_max_chars
        .unwrap_or(DEFAULT_SUMMARY_MAX_CHARS);
    if summary_max_chars == 0 {
        return Err(LoadError::invalid(
            "content.summary_max_chars",
            "must be greater than zero",
        ));
    }

    Ok(ContentSettings {
        directory,
        summary_max_chars,
    })
}

fn build_index_settings(index: RawIndexSettings) -> Result<IndexSettings, LoadError> {
    let tag_casing = match index.tag_casing {
        Some(value) => TagCasing::try_from(value.as_str()).map_err(|_| {
            LoadError::invalid(
                "index.tag_casing",
                format!("`{value}` is not one of first-seen|lowercase"),
            )
        })?,
        None => TagCasing::default(),
    };

    Ok(IndexSettings { tag_casing })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}
