//! Acquisition of CDN range lists from the providers that publish them.
//!
//! [`Fetcher`] implements [`RangeSource`]: it queries every provider
//! concurrently and fails as a whole if any one of them fails, so a partial
//! list never reaches the cache.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};

use cdnstrip_common::error::StripError;
use cdnstrip_common::network::range::AddressRange;
use cdnstrip_common::source::RangeSource;
use cdnstrip_common::{debug, info};

pub mod cloudflare;
pub mod cloudfront;
pub mod fastly;
pub mod incapsula;

const TIMEOUT_SECS: u64 = 30;
const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY_MS: u64 = 2000;

/// Largest accepted response body (10 MiB).
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Provider URLs. [`Endpoints::default`] points at the public endpoints.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub cloudflare_v4: String,
    pub cloudflare_v6: String,
    pub cloudfront: String,
    pub fastly: String,
    pub incapsula: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            cloudflare_v4: cloudflare::IPV4_URL.to_string(),
            cloudflare_v6: cloudflare::IPV6_URL.to_string(),
            cloudfront: cloudfront::URL.to_string(),
            fastly: fastly::URL.to_string(),
            incapsula: incapsula::URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Every endpoint under one base URL, keeping the public paths.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            cloudflare_v4: format!("{base}/ips-v4"),
            cloudflare_v6: format!("{base}/ips-v6"),
            cloudfront: format!("{base}/ip-ranges.json"),
            fastly: format!("{base}/public-ip-list"),
            incapsula: format!("{base}/api/integration/v1/ips"),
        }
    }
}

pub struct Fetcher {
    client: Client,
    endpoints: Endpoints,
    retry_delay: Duration,
}

impl Fetcher {
    pub fn new() -> Result<Self, StripError> {
        Self::with_endpoints(Endpoints::default())
    }

    pub fn with_endpoints(endpoints: Endpoints) -> Result<Self, StripError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .user_agent(format!("cdnstrip/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StripError::Fetch {
                provider: "http client",
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            endpoints,
            retry_delay: Duration::from_millis(RETRY_DELAY_MS),
        })
    }

    /// Base delay between attempts; doubles after each failure.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub async fn fetch_all(&self) -> Result<Vec<AddressRange>, StripError> {
        let (cloudflare, cloudfront, fastly, incapsula) = futures::join!(
            self.fetch_cloudflare(),
            self.fetch_cloudfront(),
            self.fetch_fastly(),
            self.fetch_incapsula(),
        );

        let mut ranges = Vec::new();
        for (provider, result) in [
            (cloudflare::NAME, cloudflare),
            (cloudfront::NAME, cloudfront),
            (fastly::NAME, fastly),
            (incapsula::NAME, incapsula),
        ] {
            let fetched = result?;
            info!("Fetched {} ranges from {provider}", fetched.len());
            ranges.extend(fetched);
        }
        Ok(ranges)
    }

    pub async fn fetch_cloudflare(&self) -> Result<Vec<AddressRange>, StripError> {
        let (v4, v6) = futures::join!(
            self.fetch(cloudflare::NAME, || self.client.get(&self.endpoints.cloudflare_v4)),
            self.fetch(cloudflare::NAME, || self.client.get(&self.endpoints.cloudflare_v6)),
        );
        let mut ranges = cloudflare::parse(&v4?)?;
        ranges.extend(cloudflare::parse(&v6?)?);
        Ok(ranges)
    }

    pub async fn fetch_cloudfront(&self) -> Result<Vec<AddressRange>, StripError> {
        let body = self
            .fetch(cloudfront::NAME, || self.client.get(&self.endpoints.cloudfront))
            .await?;
        cloudfront::parse(&body)
    }

    pub async fn fetch_fastly(&self) -> Result<Vec<AddressRange>, StripError> {
        let body = self
            .fetch(fastly::NAME, || self.client.get(&self.endpoints.fastly))
            .await?;
        fastly::parse(&body)
    }

    pub async fn fetch_incapsula(&self) -> Result<Vec<AddressRange>, StripError> {
        let body = self
            .fetch(incapsula::NAME, || {
                self.client
                    .post(&self.endpoints.incapsula)
                    .form(&[("resp_format", "json")])
            })
            .await?;
        incapsula::parse(&body)
    }

    /// Sends the request built by `request`, retrying with exponential backoff.
    async fn fetch<F>(&self, provider: &'static str, request: F) -> Result<String, StripError>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut last_error = String::from("no attempt made");

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                let delay = self.retry_delay * (1 << (attempt - 1));
                debug!("retry {attempt} for {provider} after {delay:?}");
                tokio::time::sleep(delay).await;
            }

            match request().send().await {
                Ok(response) if response.status().is_success() => {
                    if let Some(len) = response.content_length() {
                        if len as usize > MAX_BODY_SIZE {
                            return Err(too_large(provider, len as usize));
                        }
                    }

                    let body = response.text().await.map_err(|e| StripError::Fetch {
                        provider,
                        reason: e.to_string(),
                    })?;
                    if body.len() > MAX_BODY_SIZE {
                        return Err(too_large(provider, body.len()));
                    }
                    return Ok(body);
                }
                Ok(response) => last_error = format!("HTTP {}", response.status()),
                Err(e) => last_error = e.to_string(),
            }
        }

        Err(StripError::Fetch {
            provider,
            reason: last_error,
        })
    }
}

#[async_trait]
impl RangeSource for Fetcher {
    async fn acquire(&self) -> Result<Vec<AddressRange>, StripError> {
        self.fetch_all().await
    }
}

fn too_large(provider: &'static str, size: usize) -> StripError {
    StripError::Fetch {
        provider,
        reason: format!("response too large: {size} bytes (max: {MAX_BODY_SIZE} bytes)"),
    }
}

/// Parses literals published by `provider`, failing on the first bad one.
pub(crate) fn parse_literals<'a, I>(
    provider: &'static str,
    literals: I,
) -> Result<Vec<AddressRange>, StripError>
where
    I: IntoIterator<Item = &'a str>,
{
    literals
        .into_iter()
        .map(|literal| {
            literal.trim().parse::<AddressRange>().map_err(|e| StripError::Payload {
                provider,
                reason: e.to_string(),
            })
        })
        .collect()
}

pub(crate) fn payload_error(provider: &'static str, e: serde_json::Error) -> StripError {
    StripError::Payload {
        provider,
        reason: e.to_string(),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
