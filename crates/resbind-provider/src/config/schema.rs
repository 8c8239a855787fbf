use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use resbind_core::error::{ResBindError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    pub version: u32,

    #[serde(default)]
    pub provider: ProviderSection,

    #[serde(default)]
    pub compute: ComputeSection,

    #[serde(default)]
    pub credentials: CredentialsSection,

    #[serde(default)]
    pub lifecycle: LifecycleSection,
}

impl ProviderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ResBindError::UnsupportedVersion);
        }

        self.provider.validate()?;
        self.compute.validate()?;
        self.credentials.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ProviderSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ProviderSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            ResBindError::BadRequest(format!(
                "provider.listen must be a valid socket address ({}): {e}",
                self.listen
            ))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComputeSection {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per HTTP request. The operation wait call can hold for about two minutes.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl Default for ComputeSection {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_ms: default_request_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

impl ComputeSection {
    pub fn validate(&self) -> Result<()> {
        parse_http_url("compute.endpoint", &self.endpoint)?;
        if !(1000..=600000).contains(&self.request_timeout_ms) {
            return Err(ResBindError::BadRequest(
                "compute.request_timeout_ms must be between 1000 and 600000".into(),
            ));
        }
        if !(100..=60000).contains(&self.connect_timeout_ms) {
            return Err(ResBindError::BadRequest(
                "compute.connect_timeout_ms must be between 100 and 60000".into(),
            ));
        }
        if self.connect_timeout_ms > self.request_timeout_ms {
            return Err(ResBindError::BadRequest(
                "compute.connect_timeout_ms must not exceed request_timeout_ms".into(),
            ));
        }
        Ok(())
    }

    pub fn endpoint_url(&self) -> Result<Url> {
        parse_http_url("compute.endpoint", &self.endpoint)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialsSection {
    /// Static bearer token. When unset, tokens come from the metadata server.
    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default = "default_metadata_endpoint")]
    pub metadata_endpoint: String,
}

impl Default for CredentialsSection {
    fn default() -> Self {
        Self {
            access_token: None,
            metadata_endpoint: default_metadata_endpoint(),
        }
    }
}

impl CredentialsSection {
    pub fn validate(&self) -> Result<()> {
        if let Some(t) = &self.access_token {
            if t.trim().is_empty() {
                return Err(ResBindError::BadRequest(
                    "credentials.access_token must not be empty when set".into(),
                ));
            }
        }
        parse_http_url("credentials.metadata_endpoint", &self.metadata_endpoint)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LifecycleSection {
    /// Detach the policy (ignoring failures) before attaching it on create.
    #[serde(default)]
    pub detach_before_attach: bool,
}

pub(crate) fn parse_http_url(field: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| ResBindError::BadRequest(format!("{field} is not a valid url: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ResBindError::BadRequest(format!(
            "{field} must use http or https, got {other}"
        ))),
    }
}

fn default_listen() -> String {
    "127.0.0.1:0".into()
}
fn default_endpoint() -> String {
    "https://compute.googleapis.com/compute/v1".into()
}
fn default_request_timeout_ms() -> u64 {
    150000
}
fn default_connect_timeout_ms() -> u64 {
    10000
}
fn default_metadata_endpoint() -> String {
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token"
        .into()
}
