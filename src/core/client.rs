/// HTTP client for the SPR admin API
///
/// Thin wrapper over reqwest for the four read-only status endpoints.
/// The poller and the one-shot CLI both talk to the `StatusApi` trait so
/// tests can substitute a mock.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::core::alert::AlertSink;
use crate::core::status::{unwrap_scalar, ContainerSummary, UptimeInfo};
use crate::utils::{
    DOCKER_ENDPOINT, HOSTNAME_ENDPOINT, HTTP_TIMEOUT_SECS, UPTIME_ENDPOINT, VERSION_ENDPOINT,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },

    #[error("invalid response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },
}

/// Read access to the SPR status endpoints
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatusApi: Send + Sync {
    async fn uptime(&self) -> Result<UptimeInfo, ClientError>;
    async fn containers(&self) -> Result<Vec<ContainerSummary>, ClientError>;
    async fn hostname(&self) -> Result<String, ClientError>;
    async fn version(&self) -> Result<String, ClientError>;
}

pub struct StatusClient {
    client: Client,
    base_url: String,
}

impl StatusClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json(&self, path: &str) -> Result<Value, ClientError> {
        let url = self.url(path);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| ClientError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status { url, status });
        }

        response
            .json()
            .await
            .map_err(|source| ClientError::Request { url, source })
    }
}

#[async_trait]
impl StatusApi for StatusClient {
    async fn uptime(&self) -> Result<UptimeInfo, ClientError> {
        let value = self.get_json(UPTIME_ENDPOINT).await?;
        serde_json::from_value(value).map_err(|source| ClientError::Decode {
            url: self.url(UPTIME_ENDPOINT),
            source,
        })
    }

    async fn containers(&self) -> Result<Vec<ContainerSummary>, ClientError> {
        let value = self.get_json(DOCKER_ENDPOINT).await?;
        serde_json::from_value(value).map_err(|source| ClientError::Decode {
            url: self.url(DOCKER_ENDPOINT),
            source,
        })
    }

    async fn hostname(&self) -> Result<String, ClientError> {
        let value = self.get_json(HOSTNAME_ENDPOINT).await?;
        Ok(unwrap_scalar(&value, "hostname"))
    }

    async fn version(&self) -> Result<String, ClientError> {
        let value = self.get_json(VERSION_ENDPOINT).await?;
        Ok(unwrap_scalar(&value, "version"))
    }
}

/// One-shot snapshot of all four status resources (CLI mode). A failed
/// resource is reported to the sink and left as `None`; the others are
/// unaffected.
#[derive(Debug, Default)]
pub struct StatusSnapshot {
    pub uptime: Option<UptimeInfo>,
    pub containers: Option<Vec<ContainerSummary>>,
    pub hostname: Option<String>,
    pub version: Option<String>,
}

pub async fn fetch_snapshot(api: &dyn StatusApi, alerts: &dyn AlertSink) -> StatusSnapshot {
    let (uptime, containers, hostname, version) = tokio::join!(
        api.uptime(),
        api.containers(),
        api.hostname(),
        api.version()
    );

    let mut snapshot = StatusSnapshot::default();

    match uptime {
        Ok(info) => snapshot.uptime = Some(info),
        Err(err) => alerts.error(err.into()),
    }
    match containers {
        Ok(list) => snapshot.containers = Some(list),
        Err(err) => alerts.error(err.into()),
    }
    match hostname {
        Ok(name) => snapshot.hostname = Some(name),
        Err(err) => alerts.error(err.into()),
    }
    match version {
        Ok(ver) => snapshot.version = Some(ver),
        Err(err) => alerts.error(err.into()),
    }

    snapshot
}
