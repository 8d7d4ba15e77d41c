//! Client for the proposal store's `GET /api/proposals`.

use async_trait::async_trait;
use ballot_types::Proposal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::FeedError;

/// Body of `GET /api/proposals`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProposalsResponse {
    pub success: bool,
    #[serde(default)]
    pub proposals: Vec<Proposal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProposalsResponse {
    pub fn ok(proposals: Vec<Proposal>) -> Self {
        Self {
            success: true,
            proposals,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            proposals: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn into_result(self) -> Result<Vec<Proposal>, FeedError> {
        if self.success {
            Ok(self.proposals)
        } else {
            Err(FeedError::Unsuccessful(
                self.error.unwrap_or_else(|| "success=false".to_string()),
            ))
        }
    }
}

/// Read access to the current proposal list and tallies.
#[async_trait]
pub trait ProposalFeed: Send + Sync {
    async fn fetch_proposals(&self) -> Result<Vec<Proposal>, FeedError>;
}

pub struct HttpProposalFeed {
    http: reqwest::Client,
    url: String,
}

impl HttpProposalFeed {
    /// `url` is the full proposals endpoint, e.g. `http://localhost:3001/api/proposals`.
    pub fn new(url: impl Into<String>) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| FeedError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ProposalFeed for HttpProposalFeed {
    async fn fetch_proposals(&self) -> Result<Vec<Proposal>, FeedError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FeedError::Transport(e.to_string()))?;

        let status = response.status();
        let body: Result<ProposalsResponse, _> = response.json().await;
        match body {
            Ok(body) if status.is_success() || !body.success => body.into_result(),
            Ok(_) => Err(FeedError::Http(status.as_u16())),
            Err(_) if !status.is_success() => Err(FeedError::Http(status.as_u16())),
            Err(e) => Err(FeedError::Malformed(e.to_string())),
        }
    }
}
