// REE price API HTTP client
//
// Wraps `reqwest::Client` with endpoint URL construction and response
// decoding. One call to `fetch_prices` is one GET; there is no retry layer.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{ApiErrorBody, PriceEnvelope};
use crate::query::{DEFAULT_BASE_URL, PRICES_PATH, PriceQuery};
use crate::transport::TransportConfig;

/// HTTP client for the REE apidatos price endpoint.
///
/// The response body is read in full and decoded only once it has been
/// received; a decode failure never yields a partial envelope.
#[derive(Debug, Clone)]
pub struct ReeClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ReeClient {
    /// Create a client for `base_url` from a `TransportConfig`.
    ///
    /// `base_url` is an origin; any path on it is replaced by the absolute
    /// price path.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client against the public REE host.
    pub fn public(transport: &TransportConfig) -> Result<Self, Error> {
        Self::new(Self::default_base_url()?, transport)
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Parse a base URL from a string and wrap a pre-built client.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self::with_client(http, Url::parse(base_url)?))
    }

    pub fn default_base_url() -> Result<Url, Error> {
        Ok(Url::parse(DEFAULT_BASE_URL)?)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Full request URL: `{base}/es/datos/mercados/precios-mercados-tiempo-real?...`
    pub fn prices_url(&self, query: &PriceQuery) -> Result<Url, Error> {
        let mut url = self.base_url.join(PRICES_PATH)?;
        query.apply_to(&mut url);
        Ok(url)
    }

    // ── Requests ─────────────────────────────────────────────────────

    /// Fetch and decode one price window.
    pub async fn fetch_prices(&self, query: &PriceQuery) -> Result<PriceEnvelope, Error> {
        let url = self.prices_url(query)?;
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::parse_response(resp).await
    }

    /// Read the whole body, map non-2xx statuses to `Error::Api`, and
    /// decode the rest.
    async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.message())
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unexpected status")
                        .to_owned()
                });
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!(status = status.as_u16(), bytes = body.len(), "decoding price response");

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn prices_url_keeps_base_host() {
        let client =
            ReeClient::from_reqwest("http://127.0.0.1:9999", reqwest::Client::new()).unwrap();
        let day = NaiveDate::from_ymd_opt(2022, 1, 5).unwrap();
        let query = PriceQuery {
            time_trunc: "day".into(),
            start: day.and_hms_opt(0, 0, 0).unwrap(),
            end: day.and_hms_opt(23, 0, 0).unwrap(),
            geo_id: 0,
        };

        let url = client.prices_url(&query).unwrap();
        assert_eq!(url.host_str(), Some("127.0.0.1"));
        assert_eq!(url.port(), Some(9999));
        assert_eq!(url.path(), PRICES_PATH);
        assert_eq!(
            url.query(),
            Some("time_trunc=day&start_date=2022-01-05T00%3A00&end_date=2022-01-05T23%3A00")
        );
    }

    #[test]
    fn public_client_targets_ree() {
        let client = ReeClient::public(&TransportConfig::default()).unwrap();
        assert_eq!(client.base_url().host_str(), Some("apidatos.ree.es"));
    }
}
