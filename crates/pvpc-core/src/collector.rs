// ── Price collector ──
//
// One `collect` call = resolve the window, one GET, decode fully, then emit
// one sample per entry of the first entity. Decoding finishes before the
// first sample is emitted, so a failed collection never leaves partial
// output in the sink.

use std::collections::BTreeMap;

use chrono::{DateTime, Local, TimeZone};
use tracing::{debug, info};

use pvpc_api::{Entry, PriceQuery, ReeClient, TransportConfig};

use crate::config::CollectorConfig;
use crate::error::CoreError;
use crate::range::DateRange;
use crate::sample::{Accumulator, GEO_ID_TAG, Sample};

/// Gathers hourly Spanish electricity prices into a host sink.
///
/// The HTTP client is built once, at construction, and reused by every
/// collection. The collector holds no other state between calls.
#[derive(Debug, Clone)]
pub struct PriceCollector {
    config: CollectorConfig,
    client: ReeClient,
}

impl PriceCollector {
    /// Build a collector and its HTTP client from `config`.
    pub fn new(config: CollectorConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::with_timeout(config.http_timeout);
        let client = match &config.api_url {
            Some(url) => ReeClient::new(url.clone(), &transport)?,
            None => ReeClient::public(&transport)?,
        };
        Ok(Self { config, client })
    }

    /// Build a collector around an existing client (its timeout wins over
    /// `config.http_timeout`).
    pub fn with_client(config: CollectorConfig, client: ReeClient) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// One-line description for plugin listings.
    pub fn description() -> &'static str {
        "Gather Spanish electricity hourly prices."
    }

    /// Request parameters for a collection running at `now`.
    pub fn query_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> PriceQuery {
        let range = DateRange::resolve(&self.config, now);
        PriceQuery {
            time_trunc: self.config.time_trunc.clone(),
            start: range.start,
            end: range.end,
            geo_id: self.config.geo_id,
        }
    }

    /// Collect once, using the local wall clock for the default window.
    ///
    /// Returns the number of samples emitted.
    pub async fn collect<A: Accumulator + ?Sized>(&self, acc: &mut A) -> Result<usize, CoreError> {
        self.collect_at(Local::now(), acc).await
    }

    /// Collect once as if running at `now`.
    pub async fn collect_at<A: Accumulator + ?Sized>(
        &self,
        now: DateTime<Local>,
        acc: &mut A,
    ) -> Result<usize, CoreError> {
        let query = self.query_at(&now);
        debug!(
            time_trunc = %query.time_trunc,
            geo_id = query.geo_id,
            start = %query.start,
            end = %query.end,
            "collecting prices"
        );

        let envelope = self.client.fetch_prices(&query).await?;

        let Some(entity) = envelope.entities.first() else {
            info!("price response contained no entities; nothing to emit");
            return Ok(0);
        };
        let values = &entity.attributes.values;
        if values.is_empty() {
            info!(entity = %entity.id, "price response contained no values; nothing to emit");
            return Ok(0);
        }

        let tags = self.tags();
        for entry in values {
            acc.add_sample(Self::sample_for(entry, &tags));
        }

        debug!(count = values.len(), title = %entity.attributes.title, "emitted price samples");
        Ok(values.len())
    }

    fn tags(&self) -> BTreeMap<String, String> {
        let mut tags = BTreeMap::new();
        if self.config.geo_id != 0 {
            tags.insert(GEO_ID_TAG.to_owned(), self.config.geo_id.to_string());
        }
        tags
    }

    /// An entry without a `datetime` key carries the epoch, never the
    /// collection time.
    fn sample_for(entry: &Entry, tags: &BTreeMap<String, String>) -> Sample {
        Sample::price(entry.value, tags.clone(), entry.datetime.with_timezone(&Local))
    }
}
