//! Outbound HTTP shared by the badge resolver and the service adapters.
//!
//! Each request carries its own timeout. A `404 Not Found` is reported as `Ok(None)`
//! so callers can treat "the provider has no record" as absence rather than failure;
//! every other non-success status, transport error or timeout is an error.

use crate::Result;
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::de::DeserializeOwned;
use url::Url;

const LOG_TARGET: &str = "  http";

const USER_AGENT: &str = concat!("fetch-coverage/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct Transport {
    client: reqwest::Client,
}

impl Transport {
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("unable to create HTTP client");

        Self { client }
    }

    /// Fetch `url` and decode its body as JSON.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url, timeout: Duration) -> Result<Option<T>> {
        let Some(response) = self.get(url, timeout).await? else {
            return Ok(None);
        };

        let body = response
            .json::<T>()
            .await
            .into_app_err_with(|| format!("decoding JSON response from {url}"))?;

        Ok(Some(body))
    }

    /// Fetch `url` and return its body as text.
    pub async fn get_text(&self, url: &Url, timeout: Duration) -> Result<Option<String>> {
        let Some(response) = self.get(url, timeout).await? else {
            return Ok(None);
        };

        let body = response
            .text()
            .await
            .into_app_err_with(|| format!("reading response body from {url}"))?;

        Ok(Some(body))
    }

    async fn get(&self, url: &Url, timeout: Duration) -> Result<Option<reqwest::Response>> {
        log::debug!(target: LOG_TARGET, "GET {url} (timeout {}ms)", timeout.as_millis());

        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .into_app_err_with(|| format!("sending HTTP request to {url}"))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            log::debug!(target: LOG_TARGET, "{url} returned 404");
            return Ok(None);
        }

        if !status.is_success() {
            return Err(app_err!("unexpected HTTP status {status} from {url}"));
        }

        Ok(Some(response))
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}
