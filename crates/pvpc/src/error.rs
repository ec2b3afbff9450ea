//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use pvpc_config::ConfigError;
use pvpc_core::{CollectorConfig, CoreError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const DECODE: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Transport ────────────────────────────────────────────────────

    #[error("Could not reach the price API at {url}")]
    #[diagnostic(
        code(pvpc::connection_failed),
        help("Check network access to {url}, or run with -vv to see the request.")
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Price request timed out after {timeout}")]
    #[diagnostic(
        code(pvpc::timeout),
        help("Increase the timeout with --timeout or http_timeout in the config file.")
    )]
    Timeout { timeout: String },

    #[error("Price API returned HTTP {status}: {message}")]
    #[diagnostic(
        code(pvpc::api_error),
        help("The REE API rejected the request. Check time_trunc, geo_id, and the date range.")
    )]
    Api { status: u16, message: String },

    // ── Data ─────────────────────────────────────────────────────────

    #[error("Price response could not be decoded: {message}")]
    #[diagnostic(
        code(pvpc::decode),
        help("The API answered with an unexpected payload. Nothing was emitted.")
    )]
    Decode { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(pvpc::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(pvpc::no_config),
        help("Create one with: pvpc config init\nOr drop --config to use defaults.")
    )]
    ConfigNotFound { path: String },

    #[error("Configuration file already exists: {path}")]
    #[diagnostic(
        code(pvpc::config_exists),
        help("Use --force (-f) to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(pvpc::config))]
    Config(Box<ConfigError>),

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(pvpc::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Api { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Decode { .. } => exit_code::DECODE,
            Self::Validation { .. } | Self::ConfigNotFound { .. } | Self::ConfigExists { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }

    /// Translate a failed collection, using `config` for the help text.
    pub fn from_core(err: CoreError, config: &CollectorConfig) -> Self {
        if err.is_timeout() {
            return CliError::Timeout {
                timeout: humantime::format_duration(config.http_timeout).to_string(),
            };
        }

        match err {
            CoreError::Transport(pvpc_api::Error::Api { status, message }) => {
                CliError::Api { status, message }
            }
            CoreError::Transport(source) => CliError::ConnectionFailed {
                url: config.api_url.as_ref().map_or_else(
                    || pvpc_api::DEFAULT_BASE_URL.to_owned(),
                    ToString::to_string,
                ),
                source: Box::new(source),
            },
            CoreError::Decode(source) => CliError::Decode {
                message: source.to_string(),
            },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NotFound { path } => CliError::ConfigNotFound {
                path: path.display().to_string(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(Box::new(other)),
        }
    }
}
