// ── Emitted samples and the host sink ──

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::Serialize;

/// Measurement name of every emitted sample.
pub const MEASUREMENT: &str = "pvpc";

/// The single numeric field: price in EUR/MWh.
pub const PRICE_FIELD: &str = "price";

/// Region tag, present only when a non-zero `geo_id` is configured.
pub const GEO_ID_TAG: &str = "geo_id";

/// One metric point handed to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub measurement: String,
    pub fields: BTreeMap<String, f64>,
    pub tags: BTreeMap<String, String>,
    pub timestamp: DateTime<Local>,
}

impl Sample {
    /// A `pvpc` price sample.
    pub fn price(value: f64, tags: BTreeMap<String, String>, timestamp: DateTime<Local>) -> Self {
        Self {
            measurement: MEASUREMENT.to_owned(),
            fields: BTreeMap::from([(PRICE_FIELD.to_owned(), value)]),
            tags,
            timestamp,
        }
    }

    pub fn field(&self, name: &str) -> Option<f64> {
        self.fields.get(name).copied()
    }

    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags.get(name).map(String::as_str)
    }
}

/// Metric sink owned by the host.
///
/// Samples are handed over one at a time, in entry order. Ownership moves to
/// the sink; nothing is returned to the collector.
pub trait Accumulator {
    fn add_sample(&mut self, sample: Sample);
}

impl Accumulator for Vec<Sample> {
    fn add_sample(&mut self, sample: Sample) {
        self.push(sample);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn price_sample_shape() {
        let ts = Local.timestamp_opt(1_640_476_800, 0).unwrap();
        let tags = BTreeMap::from([(GEO_ID_TAG.to_owned(), "8741".to_owned())]);
        let sample = Sample::price(0.15, tags, ts);

        assert_eq!(sample.measurement, "pvpc");
        assert_eq!(sample.fields.len(), 1);
        assert_eq!(sample.field(PRICE_FIELD), Some(0.15));
        assert_eq!(sample.tag(GEO_ID_TAG), Some("8741"));
        assert_eq!(sample.timestamp.timestamp(), 1_640_476_800);
    }

    #[test]
    fn vec_accumulator_keeps_order() {
        let ts = Local.timestamp_opt(0, 0).unwrap();
        let mut acc: Vec<Sample> = Vec::new();
        acc.add_sample(Sample::price(1.0, BTreeMap::new(), ts));
        acc.add_sample(Sample::price(2.0, BTreeMap::new(), ts));

        let values: Vec<f64> = acc.iter().filter_map(|s| s.field(PRICE_FIELD)).collect();
        assert_eq!(values, vec![1.0, 2.0]);
    }
}
