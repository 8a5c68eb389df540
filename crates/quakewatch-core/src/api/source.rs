//! Transport seam between the feed client and the network.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::models::FeatureCollection;

use super::{FeedError, FeedQuery};

/// USGS FDSN event query endpoint
pub const USGS_QUERY_URL: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query";

/// HTTP request timeout in seconds.
/// Well under the refresh cadence so a hung request never spans two ticks.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Something that can answer a `FeedQuery` with raw GeoJSON features.
pub trait FeedSource: Send + Sync + 'static {
    fn fetch_features(
        &self,
        query: &FeedQuery,
    ) -> impl Future<Output = Result<FeatureCollection, FeedError>> + Send;
}

/// The live USGS service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct UsgsSource {
    client: Client,
    base_url: String,
}

impl UsgsSource {
    /// Point at a mirror or proxy of the FDSN query endpoint.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, FeedError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(FeedError::from_status(status, &body))
        }
    }
}

impl FeedSource for UsgsSource {
    async fn fetch_features(&self, query: &FeedQuery) -> Result<FeatureCollection, FeedError> {
        let params = query.to_params();
        debug!(url = %self.base_url, ?params, "Fetching USGS feed");

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let text = response.text().await?;

        serde_json::from_str(&text).map_err(|e| {
            FeedError::InvalidResponse(format!(
                "{} (response starts with: {})",
                e,
                text.chars().take(200).collect::<String>()
            ))
        })
    }
}
