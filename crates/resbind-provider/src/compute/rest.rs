//! Compute REST implementation of `PolicyClient`.
//!
//! Each call submits one instance custom method carrying a fresh `requestId`,
//! then blocks on `zoneOperations.wait` until the operation is `DONE`. There is
//! no overall deadline and no retry: a failure at any step is returned as is.

use async_trait::async_trait;
use url::Url;

use resbind_core::error::{ResBindError, Result};
use resbind_core::protocol::compute::{ApiErrorEnvelope, Operation, ResourcePoliciesRequest};
use resbind_core::{PolicyBinding, RequestId};

use super::auth::TokenSource;
use super::client::{PolicyAction, PolicyClient};
use crate::config::{ComputeSection, CredentialsSection};

pub struct RestPolicyClient {
    http: reqwest::Client,
    endpoint: Url,
    tokens: TokenSource,
}

impl RestPolicyClient {
    /// Build the HTTP client and token source. Failures here are
    /// `ResBindError::ClientBuild`.
    pub fn new(compute: &ComputeSection, creds: &CredentialsSection) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(compute.request_timeout())
            .connect_timeout(compute.connect_timeout())
            .build()
            .map_err(|e| ResBindError::ClientBuild(e.to_string()))?;

        let endpoint = compute
            .endpoint_url()
            .map_err(|e| ResBindError::ClientBuild(e.to_string()))?;
        let tokens = TokenSource::from_config(creds, http.clone())?;

        Ok(Self { http, endpoint, tokens })
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ResBindError::ClientBuild(format!("endpoint cannot be a base: {}", self.endpoint))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn method_url(
        &self,
        b: &PolicyBinding,
        action: PolicyAction,
        request_id: RequestId,
    ) -> Result<Url> {
        let mut url = self.url(&[
            "projects",
            b.project.as_str(),
            "zones",
            b.zone.as_str(),
            "instances",
            b.instance.as_str(),
            action.method(),
        ])?;
        url.query_pairs_mut()
            .append_pair("requestId", &request_id.to_string());
        Ok(url)
    }

    fn wait_url(&self, b: &PolicyBinding, op: &Operation) -> Result<Url> {
        self.url(&[
            "projects",
            b.project.as_str(),
            "zones",
            b.zone.as_str(),
            "operations",
            op.name.as_str(),
            "wait",
        ])
    }

    async fn apply(&self, action: PolicyAction, b: &PolicyBinding) -> Result<()> {
        let request_id = RequestId::generate();
        let url = self.method_url(b, action, request_id)?;
        let token = self.tokens.token().await?;

        tracing::info!(
            method = action.method(),
            project = %b.project,
            zone = %b.zone,
            instance = %b.instance,
            policy = %b.policy,
            %request_id,
            "submitting compute request"
        );

        let resp = self
            .http
            .post(url)
            .bearer_auth(&token)
            .json(&ResourcePoliciesRequest::single(&b.policy))
            .send()
            .await
            .map_err(|e| ResBindError::Submit(e.to_string()))?;

        let op = decode_operation(resp).await.map_err(ResBindError::Submit)?;
        self.wait(b, op).await?;

        tracing::info!(
            method = action.method(),
            instance = %b.instance,
            policy = %b.policy,
            "compute request done"
        );
        Ok(())
    }

    async fn wait(&self, b: &PolicyBinding, mut op: Operation) -> Result<()> {
        while !op.is_done() {
            tracing::debug!(operation = %op.name, status = ?op.status, "waiting on operation");

            let url = self.wait_url(b, &op)?;
            let token = self.tokens.token().await?;
            let resp = self
                .http
                .post(url)
                .bearer_auth(&token)
                .header(reqwest::header::CONTENT_LENGTH, "0")
                .send()
                .await
                .map_err(|e| ResBindError::Operation(e.to_string()))?;

            op = decode_operation(resp).await.map_err(ResBindError::Operation)?;
        }

        match op.failure() {
            Some(msg) => {
                tracing::warn!(operation = %op.name, error = %msg, "operation failed");
                Err(ResBindError::Operation(msg))
            }
            None => Ok(()),
        }
    }
}

async fn decode_operation(resp: reqwest::Response) -> std::result::Result<Operation, String> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(match serde_json::from_str::<ApiErrorEnvelope>(&body) {
            Ok(env) => env.describe(),
            Err(_) if body.is_empty() => format!("HTTP {status}"),
            Err(_) => format!("HTTP {status}: {body}"),
        });
    }

    resp.json::<Operation>()
        .await
        .map_err(|e| format!("invalid operation response: {e}"))
}

#[async_trait]
impl PolicyClient for RestPolicyClient {
    async fn add(&self, binding: &PolicyBinding) -> Result<()> {
        self.apply(PolicyAction::Add, binding).await
    }

    async fn remove(&self, binding: &PolicyBinding) -> Result<()> {
        self.apply(PolicyAction::Remove, binding).await
    }
}
