use crate::core::commands::handlers::{LatencyProbe, ProbeError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use std::time::{Duration, Instant};

const GATEWAY_URL: &str = "https://discord.com/api/v10/gateway";

/// Times a GET against Discord's public gateway endpoint.
pub struct GatewayProbe {
    client: Client,
    url: String,
}

impl GatewayProbe {
    pub fn new() -> Result<Self, ProbeError> {
        Self::with_url(GATEWAY_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Result<Self, ProbeError> {
        let mut headers = HeaderMap::new();
        headers.insert("User-Agent", HeaderValue::from_static("RustXpBot/0.1"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ProbeError(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl LatencyProbe for GatewayProbe {
    async fn round_trip(&self) -> Result<Duration, ProbeError> {
        let start = Instant::now();
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ProbeError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProbeError(format!("gateway returned {}", response.status())));
        }

        Ok(start.elapsed())
    }
}
