//! Clap derive structures for the `pvpc` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Kept free
//! of workspace crates so `build.rs` can include it for man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// pvpc -- Spanish electricity hourly prices from the REE API
#[derive(Debug, Parser)]
#[command(
    name = "pvpc",
    version,
    about = "Collect Spanish electricity hourly prices (PVPC)",
    long_about = "Requests hourly PVPC prices from the public REE apidatos API and\n\
        prints one metric sample per hour, as a table, JSON, or line protocol.\n\n\
        Without explicit dates, today's prices are requested.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, short = 'c', env = "PVPC_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PVPC_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout, e.g. "10s" (overrides http_timeout)
    #[arg(long, short = 't', global = true)]
    pub timeout: Option<String>,

    /// Alternative API root
    #[arg(long, env = "PVPC_API_URL", global = true, hide = true)]
    pub api_url: Option<String>,
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// InfluxDB line protocol, one sample per line
    Line,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum WindowEndArg {
    /// Default window ends today at 23:00
    Today,
    /// Default window ends tomorrow at 23:00
    Tomorrow,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch prices once and print one sample per hour
    #[command(alias = "c")]
    Collect(CollectArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct CollectArgs {
    /// Aggregation bucket: hour, day, month, year
    #[arg(long)]
    pub time_trunc: Option<String>,

    /// Electrical-system id (0 = no filter)
    #[arg(long, short = 'g')]
    pub geo_id: Option<u32>,

    /// Range start, RFC 3339 (requires --end)
    #[arg(long, requires = "end")]
    pub start: Option<String>,

    /// Range end, RFC 3339 (requires --start)
    #[arg(long, requires = "start")]
    pub end: Option<String>,

    /// Where the default window ends when no dates are given
    #[arg(long)]
    pub window_end: Option<WindowEndArg>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (defaults + file + environment)
    Show,
    /// Print the config file path
    Path,
    /// Write the annotated sample configuration to the config path
    Init {
        /// Overwrite an existing file
        #[arg(long, short = 'f')]
        force: bool,
    },
    /// Print the annotated sample configuration
    Sample,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
