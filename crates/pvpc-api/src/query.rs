// Price request query construction
//
// The endpoint takes its whole request in the query string: the aggregation
// bucket, a wall-clock date window, and an optional electrical-system filter.

use chrono::NaiveDateTime;
use url::Url;

/// Public REE API host.
pub const DEFAULT_BASE_URL: &str = "https://apidatos.ree.es";

/// Real-time market prices widget.
pub const PRICES_PATH: &str = "/es/datos/mercados/precios-mercados-tiempo-real";

/// `start_date` / `end_date` use minute precision.
const QUERY_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Parameters of one price request.
///
/// `start` and `end` are wall-clock values; the API interprets them in the
/// Spanish peninsular time zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceQuery {
    /// Aggregation bucket (`hour`, `day`, ...). Passed through untouched.
    pub time_trunc: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Electrical-system filter. `0` means no filter.
    pub geo_id: u32,
}

impl PriceQuery {
    /// Query-string pairs in request order. `geo_id` is omitted when zero.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("time_trunc", self.time_trunc.clone()),
            ("start_date", format_query_date(&self.start)),
            ("end_date", format_query_date(&self.end)),
        ];
        if self.geo_id != 0 {
            pairs.push(("geo_id", self.geo_id.to_string()));
        }
        pairs
    }

    /// Append this query to `url`, replacing any query it already had.
    pub fn apply_to(&self, url: &mut Url) {
        url.query_pairs_mut().clear().extend_pairs(self.pairs());
    }
}

/// Format a wall-clock instant the way the endpoint expects it.
pub fn format_query_date(date: &NaiveDateTime) -> String {
    date.format(QUERY_DATE_FORMAT).to_string()
}
