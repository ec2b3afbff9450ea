// pvpc-core: Price collection between pvpc-api and the host's metric sink.

pub mod collector;
pub mod config;
pub mod error;
pub mod range;
pub mod sample;

// ── Primary re-exports ──────────────────────────────────────────────
pub use collector::PriceCollector;
pub use config::{CollectorConfig, WindowEnd};
pub use error::CoreError;
pub use range::DateRange;
pub use sample::{Accumulator, GEO_ID_TAG, MEASUREMENT, PRICE_FIELD, Sample};
