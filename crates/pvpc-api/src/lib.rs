// pvpc-api: Async Rust client for the REE apidatos price endpoint

pub mod client;
pub mod error;
pub mod models;
pub mod query;
pub mod transport;

pub use client::ReeClient;
pub use error::Error;
pub use models::{Attributes, Entity, Entry, PriceEnvelope};
pub use query::{DEFAULT_BASE_URL, PRICES_PATH, PriceQuery};
pub use transport::TransportConfig;
