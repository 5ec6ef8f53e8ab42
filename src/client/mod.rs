//! Client for the remote line-counting server
//!
//! One JSON POST per page load. Every failure past "no server configured"
//! collapses into [`LineCountOutcome::Unavailable`] after being logged; there
//! is no retry and no timeout beyond the HTTP stack's defaults.

pub mod error;

pub use error::ClientError;

use crate::models::{Configuration, Repository};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, error, warn};
use url::Url;

const USER_AGENT: &str = concat!("repo-lines/", env!("CARGO_PKG_VERSION"));

/// Body of the counting request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineCountRequest<'a> {
    pub repo_url: &'a str,
    pub clone_url: &'a str,
    pub owner: &'a str,
    pub repo: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stars: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<&'a str>,
}

impl<'a> From<&'a Repository> for LineCountRequest<'a> {
    fn from(repo: &'a Repository) -> Self {
        Self {
            repo_url: &repo.url,
            clone_url: &repo.clone_url,
            owner: &repo.owner,
            repo: &repo.repo,
            stars: repo.stars.as_deref(),
            language: repo.language.as_deref(),
        }
    }
}

/// Per-extension breakdown reported by the counting server
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileStat {
    pub language: String,
    pub files: u64,
    pub lines: u64,
}

/// Response body of the counting server. Only `lines` is required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineCountReport {
    pub lines: u64,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub repo_url: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default)]
    pub file_stats: BTreeMap<String, FileStat>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// What a page load ends up showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineCountOutcome {
    Counted(LineCountReport),
    /// No server URL saved; no request was made
    Unconfigured,
    /// Network, status or parse failure
    Unavailable,
}

impl LineCountOutcome {
    pub fn lines(&self) -> Option<u64> {
        match self {
            LineCountOutcome::Counted(report) => Some(report.lines),
            _ => None,
        }
    }
}

/// Answer of the server's `/health` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

#[derive(Debug, Clone)]
pub struct LineCountClient {
    http: Client,
}

impl LineCountClient {
    pub fn new() -> Result<Self, ClientError> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { http })
    }

    /// Ask the configured server for the repository's line count
    pub async fn count_lines(&self, config: &Configuration, repo: &Repository) -> LineCountOutcome {
        let Some(endpoint) = config.endpoint() else {
            debug!("no server URL configured, skipping request");
            return LineCountOutcome::Unconfigured;
        };

        match self.request_report(&endpoint, repo).await {
            Ok(report) => LineCountOutcome::Counted(report),
            Err(e) => {
                error!(endpoint = %endpoint, repo = %repo, error = %e, "failed to fetch line count");
                LineCountOutcome::Unavailable
            }
        }
    }

    /// Send the counting request to `endpoint` as-is
    pub async fn request_report(&self, endpoint: &str, repo: &Repository) -> Result<LineCountReport, ClientError> {
        debug!(endpoint, repo = %repo, "requesting line count");

        let response = self
            .http
            .post(endpoint)
            .json(&LineCountRequest::from(repo))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }

        let report: LineCountReport = response.json().await?;
        if report.success == Some(false) {
            return Err(ClientError::Rejected(
                report.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        Ok(report)
    }

    /// Probe `<origin>/health` of the configured server
    pub async fn health(&self, config: &Configuration) -> Result<HealthStatus, ClientError> {
        let endpoint = config.endpoint().ok_or(ClientError::Unconfigured)?;
        let url = health_url(&endpoint)?;

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, "health check failed");
            return Err(ClientError::Status(status));
        }

        Ok(response.json().await?)
    }
}

/// The `/health` URL on the same origin as `endpoint`
pub fn health_url(endpoint: &str) -> Result<Url, ClientError> {
    let invalid = |source| ClientError::InvalidUrl {
        url: endpoint.to_string(),
        source,
    };
    Url::parse(endpoint)
        .map_err(invalid)?
        .join("/health")
        .map_err(invalid)
}
