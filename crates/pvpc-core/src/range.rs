// ── Effective date window ──
//
// Resolves the `start_date` / `end_date` pair sent with each request.
// Resolution is pure over the supplied "now" so the same calendar day always
// produces the same window, whatever second the collection runs at.

use chrono::{DateTime, NaiveDateTime, NaiveTime, TimeZone};

use crate::config::{CollectorConfig, WindowEnd};

/// Hour the default window ends at.
const DEFAULT_END_HOUR: u32 = 23;

/// Wall-clock window for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    /// Window for a collection running at `now`.
    ///
    /// Explicit dates win only when both are configured; they are taken as
    /// wall-clock values in their own offset. Otherwise the window is today's
    /// (in `now`'s time zone): midnight to 23:00 on the day `window_end` picks.
    pub fn resolve<Tz: TimeZone>(config: &CollectorConfig, now: &DateTime<Tz>) -> Self {
        match config.explicit_range() {
            Some((start, end)) => Self {
                start: start.naive_local(),
                end: end.naive_local(),
            },
            None => Self::default_window(now, config.window_end),
        }
    }

    /// Midnight of `now`'s local day through 23:00 of the `window_end` day.
    pub fn default_window<Tz: TimeZone>(now: &DateTime<Tz>, window_end: WindowEnd) -> Self {
        let today = now.date_naive();
        let end_time =
            NaiveTime::from_hms_opt(DEFAULT_END_HOUR, 0, 0).unwrap_or(NaiveTime::MIN);
        Self {
            start: today.and_time(NaiveTime::MIN),
            end: window_end.end_day(today).and_time(end_time),
        }
    }
}
