pub mod api_structs;

use crate::api::api_structs::{Competition, Placement, Project, Submission};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client, ClientBuilder, StatusCode
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

/// Bound on every collaborator call so a stalled upstream cannot hold a
/// recompute open indefinitely.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{service} request failed: {source}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error
    },

    #[error("{service} returned {status}")]
    Status { service: &'static str, status: StatusCode }
}

impl UpstreamError {
    pub fn service(&self) -> &'static str {
        match self {
            UpstreamError::Request { service, .. } | UpstreamError::Status { service, .. } => service
        }
    }
}

/// Source of submissions and their placements.
#[async_trait]
pub trait SubmissionLedger: Send + Sync {
    async fn list_submissions(&self) -> Result<Vec<Submission>, UpstreamError>;
    async fn list_placements(&self) -> Result<Vec<Placement>, UpstreamError>;
}

/// Source of competition metadata (titles, edition years).
#[async_trait]
pub trait CompetitionDirectory: Send + Sync {
    async fn list_competitions(&self) -> Result<Vec<Competition>, UpstreamError>;
}

/// Source of projects, queryable by format and genre for leaderboard filters.
#[async_trait]
pub trait ProjectDirectory: Send + Sync {
    async fn find_projects(
        &self,
        format: Option<&str>,
        genre: Option<&str>
    ) -> Result<Vec<Project>, UpstreamError>;
}

fn client() -> Client {
    let mut headers = HeaderMap::new();
    headers.insert("Accept", HeaderValue::from_static("application/json"));

    ClientBuilder::new()
        .default_headers(headers)
        .timeout(UPSTREAM_TIMEOUT)
        .build()
        .expect("Valid client configuration")
}

async fn get_json<T: DeserializeOwned>(
    client: &Client,
    service: &'static str,
    url: String
) -> Result<T, UpstreamError> {
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|source| UpstreamError::Request { service, source })?;

    let status = response.status();
    if !status.is_success() {
        return Err(UpstreamError::Status { service, status });
    }

    response
        .json()
        .await
        .map_err(|source| UpstreamError::Request { service, source })
}

pub struct HttpSubmissionLedger {
    client: Client,
    base_url: String
}

impl HttpSubmissionLedger {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: client(),
            base_url: base_url.trim_end_matches('/').to_string()
        }
    }
}

#[async_trait]
impl SubmissionLedger for HttpSubmissionLedger {
    async fn list_submissions(&self) -> Result<Vec<Submission>, UpstreamError> {
        get_json(&self.client, "submission ledger", format!("{}/submissions", self.base_url)).await
    }

    async fn list_placements(&self) -> Result<Vec<Placement>, UpstreamError> {
        get_json(&self.client, "submission ledger", format!("{}/placements", self.base_url)).await
    }
}

pub struct HttpCompetitionDirectory {
    client: Client,
    base_url: String
}

impl HttpCompetitionDirectory {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: client(),
            base_url: base_url.trim_end_matches('/').to_string()
        }
    }
}

#[async_trait]
impl CompetitionDirectory for HttpCompetitionDirectory {
    async fn list_competitions(&self) -> Result<Vec<Competition>, UpstreamError> {
        get_json(
            &self.client,
            "competition directory",
            format!("{}/competitions", self.base_url)
        )
        .await
    }
}

pub struct HttpProjectDirectory {
    client: Client,
    base_url: String
}

impl HttpProjectDirectory {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: client(),
            base_url: base_url.trim_end_matches('/').to_string()
        }
    }
}

#[async_trait]
impl ProjectDirectory for HttpProjectDirectory {
    async fn find_projects(
        &self,
        format: Option<&str>,
        genre: Option<&str>
    ) -> Result<Vec<Project>, UpstreamError> {
        let service = "project directory";
        let mut request = self.client.get(format!("{}/projects", self.base_url));

        if let Some(format_filter) = format {
            request = request.query(&[("format", format_filter)]);
        }
        if let Some(genre_filter) = genre {
            request = request.query(&[("genre", genre_filter)]);
        }

        let response = request
            .send()
            .await
            .map_err(|source| UpstreamError::Request { service, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status { service, status });
        }

        response
            .json()
            .await
            .map_err(|source| UpstreamError::Request { service, source })
    }
}
