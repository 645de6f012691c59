//! HTTP size probe.
//!
//! HEAD-requests a package URL and reads its `Content-Length`. Strictly
//! best-effort: timeouts, transport errors, non-success statuses, and
//! missing or zero headers all collapse to `None`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_LENGTH;

use themesync_core::ports::SizeProbe;

/// Probe request timeout. The event loop blocks on the probe, so it must
/// stay bounded.
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("themesync/", env!("CARGO_PKG_VERSION"));

/// [`SizeProbe`] backed by HTTP HEAD requests.
pub struct HttpSizeProbe {
    client: reqwest::Client,
}

impl HttpSizeProbe {
    /// Probe with a bounded-timeout client.
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(PROBE_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl Default for HttpSizeProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SizeProbe for HttpSizeProbe {
    async fn content_length(&self, url: &str) -> Option<u64> {
        let response = self.client.head(url).send().await.ok()?;
        if !response.status().is_success() {
            tracing::debug!(url, status = %response.status(), "size probe rejected");
            return None;
        }
        response
            .headers()
            .get(CONTENT_LENGTH)?
            .to_str()
            .ok()?
            .parse::<u64>()
            .ok()
            .filter(|size| *size > 0)
    }
}
