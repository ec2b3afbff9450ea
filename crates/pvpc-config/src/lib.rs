//! Configuration for the pvpc collector.
//!
//! TOML file + `PVPC_*` environment variables, validation, and translation
//! to `pvpc_core::CollectorConfig`. Core never reads files; the binary loads
//! a [`Config`] here and hands the translated config to the collector.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use url::Url;

use pvpc_core::{CollectorConfig, WindowEnd};

/// Aggregations the REE API documents for this widget. Other labels are
/// passed through with a warning.
pub const KNOWN_TIME_TRUNCS: [&str; 4] = ["hour", "day", "month", "year"];

/// Annotated configuration written by `pvpc config init`.
pub const SAMPLE_CONFIG: &str = r#"## Aggregation of the requested data: "hour", "day", "month" or "year".
time_trunc = "hour"

## Time range, RFC 3339. If either date is omitted, today's prices are requested.
# start_date = "2021-12-26T00:00:00+01:00"
# end_date = "2021-12-26T23:59:00+01:00"

## Where the default range ends when no dates are set: "today" or "tomorrow".
window_end = "today"

## Id of the autonomous community / electrical system. 0 means no filter.
geo_id = 8741

## HTTP request timeout.
http_timeout = "10s"
"#;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── TOML config struct ──────────────────────────────────────────────

/// Collector settings as they appear in `config.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Aggregation bucket (`time_trunc` query parameter).
    #[serde(default = "default_time_trunc")]
    pub time_trunc: String,

    /// Electrical-system id; 0 = no filter.
    #[serde(default)]
    pub geo_id: u32,

    /// Explicit range start (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    /// Explicit range end (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,

    /// Request timeout, humantime syntax (`"10s"`, `"1m 30s"`).
    #[serde(default = "default_http_timeout")]
    pub http_timeout: String,

    #[serde(default)]
    pub window_end: WindowEnd,

    /// Alternative API root (mirrors, tests).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_trunc: default_time_trunc(),
            geo_id: 0,
            start_date: None,
            end_date: None,
            http_timeout: default_http_timeout(),
            window_end: WindowEnd::default(),
            api_url: None,
        }
    }
}

fn default_time_trunc() -> String {
    "hour".into()
}
fn default_http_timeout() -> String {
    "10s".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("es", "pvpc", "pvpc").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("pvpc");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load defaults, then the TOML file, then `PVPC_*` environment variables.
///
/// With `path == None` the platform config path is used and a missing file
/// just means defaults. An explicit path must exist.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(p) if !p.exists() => {
            return Err(ConfigError::NotFound { path: p.to_path_buf() });
        }
        Some(p) => p.to_path_buf(),
        None => config_path(),
    };

    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("PVPC_"))
        .extract()?;
    Ok(config)
}

/// Serialize config to TOML and write it to `path`.
pub fn save_config(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

impl Config {
    /// Parse a TOML document on top of the defaults (no file, no env).
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::string(toml))
            .extract()?;
        Ok(config)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    // ── Translation ─────────────────────────────────────────────────

    /// Validate and build the runtime collector config.
    pub fn to_collector_config(&self) -> Result<CollectorConfig, ConfigError> {
        let time_trunc = self.time_trunc.as_str();
        if time_trunc.trim().is_empty() {
            return Err(invalid("time_trunc", "must not be empty"));
        }
        if !KNOWN_TIME_TRUNCS.contains(&time_trunc) {
            warn!(time_trunc, "unrecognised time_trunc; passing it through unchanged");
        }

        let start_date = parse_date("start_date", self.start_date.as_deref())?;
        let end_date = parse_date("end_date", self.end_date.as_deref())?;
        match (start_date, end_date) {
            (Some(start), Some(end)) if start > end => {
                return Err(invalid(
                    "start_date",
                    format!("{start} is after end_date {end}"),
                ));
            }
            (Some(_), None) | (None, Some(_)) => {
                warn!("only one of start_date/end_date is set; today's window will be used");
            }
            _ => {}
        }

        let http_timeout = parse_timeout(&self.http_timeout)?;

        let api_url = self.api_url.as_deref().map(parse_api_url).transpose()?;

        Ok(CollectorConfig {
            time_trunc: self.time_trunc.clone(),
            geo_id: self.geo_id,
            start_date,
            end_date,
            http_timeout,
            window_end: self.window_end,
            api_url,
        })
    }
}

fn parse_date(
    field: &str,
    raw: Option<&str>,
) -> Result<Option<DateTime<FixedOffset>>, ConfigError> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            DateTime::parse_from_rfc3339(s)
                .map_err(|e| invalid(field, format!("'{s}' is not an RFC 3339 timestamp: {e}")))
        })
        .transpose()
}

/// The price path is absolute, so only an origin (`scheme://host[:port]`)
/// is accepted as an API root.
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| invalid("api_url", format!("{raw}: {e}")))?;
    if url.cannot_be_a_base() || url.path() != "/" {
        return Err(invalid(
            "api_url",
            format!("{raw}: must be an origin without a path"),
        ));
    }
    Ok(url)
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    let timeout = humantime::parse_duration(raw.trim())
        .map_err(|e| invalid("http_timeout", format!("'{raw}': {e}")))?;
    if timeout.is_zero() {
        return Err(invalid("http_timeout", "must be greater than zero"));
    }
    Ok(timeout)
}
