//! Output formatting: table, JSON, line protocol.
//!
//! Renders collected samples in the format selected by `--output`. Table uses
//! `tabled`, JSON uses serde, line emits one InfluxDB line-protocol record
//! per sample.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use pvpc_core::{GEO_ID_TAG, PRICE_FIELD, Sample};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Render dispatcher ────────────────────────────────────────────────

/// Render samples in the chosen format.
pub fn render_samples(
    format: &OutputFormat,
    samples: &[Sample],
    color: bool,
) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Table => render_table(samples, color),
        OutputFormat::Json => serde_json::to_string_pretty(samples)?,
        OutputFormat::JsonCompact => serde_json::to_string(samples)?,
        OutputFormat::Line => samples
            .iter()
            .map(line_protocol)
            .collect::<Vec<_>>()
            .join("\n"),
    })
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Table ────────────────────────────────────────────────────────────

#[derive(Tabled)]
struct PriceRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Price (EUR/MWh)")]
    price: String,
    #[tabled(rename = "Geo")]
    geo: String,
}

fn render_table(samples: &[Sample], color: bool) -> String {
    if samples.is_empty() {
        return String::new();
    }

    let prices = samples.iter().filter_map(|s| s.field(PRICE_FIELD));
    let (min, max) = prices.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p), hi.max(p))
    });

    let rows: Vec<PriceRow> = samples
        .iter()
        .map(|s| {
            let price = s.field(PRICE_FIELD).unwrap_or_default();
            let text = format!("{price:.2}");
            let text = match (color, price) {
                (true, p) if p <= min => text.green().to_string(),
                (true, p) if p >= max => text.red().to_string(),
                _ => text,
            };
            PriceRow {
                time: s.timestamp.format("%Y-%m-%d %H:%M %:z").to_string(),
                price: text,
                geo: s.tag(GEO_ID_TAG).unwrap_or("-").to_owned(),
            }
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

// ── Line protocol ────────────────────────────────────────────────────

/// `measurement[,tag=value...] field=value[,...] [timestamp_ns]`
pub(crate) fn line_protocol(sample: &Sample) -> String {
    let mut line = escape(&sample.measurement, &[',', ' ']);
    for (key, value) in &sample.tags {
        line.push(',');
        line.push_str(&escape(key, &[',', '=', ' ']));
        line.push('=');
        line.push_str(&escape(value, &[',', '=', ' ']));
    }

    let fields = sample
        .fields
        .iter()
        .map(|(key, value)| format!("{}={value}", escape(key, &[',', '=', ' '])))
        .collect::<Vec<_>>()
        .join(",");
    line.push(' ');
    line.push_str(&fields);

    if let Some(nanos) = sample.timestamp.timestamp_nanos_opt() {
        line.push(' ');
        line.push_str(&nanos.to_string());
    }
    line
}

fn escape(raw: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == '\\' || special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
