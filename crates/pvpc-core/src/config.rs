// ── Runtime collector configuration ──
//
// These types describe *what* to request and how long to wait for it.
// They never touch disk: `pvpc-config` (or any other host) builds a
// `CollectorConfig` and hands it in.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use url::Url;

/// Where the default window ends when no explicit dates are configured.
///
/// The window always starts at local midnight of the current day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowEnd {
    /// 23:00 of the current day.
    #[default]
    Today,
    /// 23:00 of the following day (day-ahead prices are published around 20:30).
    Tomorrow,
}

impl WindowEnd {
    /// Calendar day the window ends on, given the current local day.
    pub fn end_day(self, today: NaiveDate) -> NaiveDate {
        match self {
            Self::Today => today,
            Self::Tomorrow => today.succ_opt().unwrap_or(today),
        }
    }
}

impl fmt::Display for WindowEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Today => "today",
            Self::Tomorrow => "tomorrow",
        })
    }
}

impl FromStr for WindowEnd {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(Self::Today),
            "tomorrow" => Ok(Self::Tomorrow),
            other => Err(format!("expected 'today' or 'tomorrow', got '{other}'")),
        }
    }
}

/// Configuration for a single price collector.
///
/// Immutable once handed to `PriceCollector`.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectorConfig {
    /// Aggregation bucket passed through as `time_trunc` (e.g. `hour`).
    pub time_trunc: String,
    /// Electrical-system filter. `0` = unset, never sent.
    pub geo_id: u32,
    /// Explicit window start. Ignored unless `end_date` is also set.
    pub start_date: Option<DateTime<FixedOffset>>,
    /// Explicit window end. Ignored unless `start_date` is also set.
    pub end_date: Option<DateTime<FixedOffset>>,
    /// Whole-request timeout for the single GET.
    pub http_timeout: Duration,
    /// Default window end policy when dates are not configured.
    pub window_end: WindowEnd,
    /// API root override. `None` targets the public REE host; the request
    /// path is fixed either way.
    pub api_url: Option<Url>,
}

impl CollectorConfig {
    /// Both explicit dates, if both are configured.
    pub fn explicit_range(&self) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        self.start_date.zip(self.end_date)
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            time_trunc: "hour".into(),
            geo_id: 0,
            start_date: None,
            end_date: None,
            http_timeout: Duration::from_secs(10),
            window_end: WindowEnd::default(),
            api_url: None,
        }
    }
}
