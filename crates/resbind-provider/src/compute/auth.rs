//! Bearer token resolution for compute requests.
//!
//! Order: a static token from config, otherwise the instance metadata server.
//! Metadata tokens are cached until shortly before they expire.

use std::time::Duration;

use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use url::Url;

use resbind_core::error::{ResBindError, Result};

use crate::config::schema::{parse_http_url, CredentialsSection};

/// Refresh this long before the reported expiry.
const EXPIRY_SLACK: Duration = Duration::from_secs(60);

pub enum TokenSource {
    Static(String),
    Metadata(MetadataTokenSource),
}

impl TokenSource {
    pub fn from_config(creds: &CredentialsSection, http: reqwest::Client) -> Result<Self> {
        match &creds.access_token {
            Some(t) => Ok(TokenSource::Static(t.clone())),
            None => {
                let endpoint =
                    parse_http_url("credentials.metadata_endpoint", &creds.metadata_endpoint)
                        .map_err(|e| ResBindError::ClientBuild(e.to_string()))?;
                Ok(TokenSource::Metadata(MetadataTokenSource::new(http, endpoint)))
            }
        }
    }

    pub async fn token(&self) -> Result<String> {
        match self {
            TokenSource::Static(t) => Ok(t.clone()),
            TokenSource::Metadata(m) => m.token().await,
        }
    }
}

struct CachedToken {
    value: String,
    refresh_at: Instant,
}

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

pub struct MetadataTokenSource {
    http: reqwest::Client,
    endpoint: Url,
    cached: Mutex<Option<CachedToken>>,
}

impl MetadataTokenSource {
    pub fn new(http: reqwest::Client, endpoint: Url) -> Self {
        Self {
            http,
            endpoint,
            cached: Mutex::new(None),
        }
    }

    pub async fn token(&self) -> Result<String> {
        let mut guard = self.cached.lock().await;
        if let Some(c) = guard.as_ref() {
            if Instant::now() < c.refresh_at {
                return Ok(c.value.clone());
            }
        }

        let fetched = self.fetch().await?;
        let lifetime = Duration::from_secs(fetched.expires_in).saturating_sub(EXPIRY_SLACK);
        tracing::debug!(expires_in = fetched.expires_in, "metadata token refreshed");

        let value = fetched.access_token;
        *guard = Some(CachedToken {
            value: value.clone(),
            refresh_at: Instant::now() + lifetime,
        });
        Ok(value)
    }

    async fn fetch(&self) -> Result<MetadataToken> {
        let resp = self
            .http
            .get(self.endpoint.clone())
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| ResBindError::ClientBuild(format!("credentials: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ResBindError::ClientBuild(format!(
                "credentials: metadata server returned {status}"
            )));
        }

        resp.json::<MetadataToken>()
            .await
            .map_err(|e| {
                ResBindError::ClientBuild(format!("credentials: invalid token response: {e}"))
            })
    }
}
