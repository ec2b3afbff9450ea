// Price API response types
//
// Models for the REE apidatos JSON:API-style payload. Every field uses
// `#[serde(default)]`: a missing field decodes to its zero value instead of
// failing the whole response. `Entry::datetime` is strict when present: only
// an RFC 3339 string is accepted, `null` included in what is rejected.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Decoded price response.
///
/// ```json
/// { "included": [ { "type": "...", "id": "...", "attributes": { ... } } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceEnvelope {
    #[serde(default, rename = "included")]
    pub entities: Vec<Entity>,
}

impl PriceEnvelope {
    /// Price entries of the first entity, or an empty slice when the
    /// response carried no entities.
    pub fn first_values(&self) -> &[Entry] {
        self.entities
            .first()
            .map_or(&[], |entity| entity.attributes.values.as_slice())
    }
}

/// One `included` object (e.g. the PVPC series, the spot-market series).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub attributes: Attributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(default)]
    pub title: String,
    /// Price points in the order the API returned them.
    #[serde(default)]
    pub values: Vec<Entry>,
}

/// One hourly price point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Price in EUR/MWh.
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub percentage: f64,
    /// The Unix epoch when the key is absent.
    #[serde(default, with = "rfc3339")]
    pub datetime: DateTime<FixedOffset>,
}

// ── Error body ───────────────────────────────────────────────────────

/// Error payload returned with non-2xx statuses:
/// `{ "errors": [ { "code": 502, "status": "502", "title": "...", "detail": "..." } ] }`
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub errors: Vec<ApiErrorItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ApiErrorBody {
    /// First human-readable message, preferring `detail` over `title`.
    pub(crate) fn message(&self) -> Option<String> {
        let item = self.errors.first()?;
        item.detail
            .clone()
            .or_else(|| item.title.clone())
            .filter(|m| !m.is_empty())
    }
}

// ── Strict RFC 3339 timestamps ───────────────────────────────────────

mod rfc3339 {
    use chrono::{DateTime, FixedOffset};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(
        value: &DateTime<FixedOffset>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    /// Only a JSON string in RFC 3339 form is accepted. `null`, numbers,
    /// objects, and looser ISO 8601 variants are rejected.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<FixedOffset>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map_err(|e| D::Error::custom(format!("invalid RFC 3339 datetime {raw:?}: {e}")))
    }
}
