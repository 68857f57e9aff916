//! Availability API client

use serde::Deserialize;

use crate::error::LookupError;
use crate::Result;

pub const DEFAULT_ENDPOINT: &str = "https://archive.org/wayback/available";

/// Closest archived copy of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedSnapshot {
    pub url: String,
    /// `YYYYMMDDhhmmss`, when the archive reports it
    pub timestamp: Option<String>,
}

#[derive(Deserialize)]
struct Availability {
    #[serde(default)]
    archived_snapshots: Option<ArchivedSnapshots>,
}

#[derive(Deserialize)]
struct ArchivedSnapshots {
    #[serde(default)]
    closest: Option<Closest>,
}

#[derive(Deserialize)]
struct Closest {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
}

/// Extract the closest snapshot from an availability response body
pub fn parse_availability(body: &str) -> Result<ArchivedSnapshot> {
    let availability: Availability = serde_json::from_str(body)?;

    let closest = availability
        .archived_snapshots
        .and_then(|snapshots| snapshots.closest)
        .ok_or(LookupError::NotFound)?;

    match closest.url {
        Some(url) if !url.trim().is_empty() => Ok(ArchivedSnapshot {
            url,
            timestamp: closest.timestamp,
        }),
        _ => Err(LookupError::NotFound),
    }
}

#[derive(Clone)]
pub struct SnapshotClient {
    client: reqwest::Client,
    endpoint: String,
}

impl SnapshotClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One GET against the availability endpoint for `url`
    pub async fn lookup(&self, url: &str) -> Result<ArchivedSnapshot> {
        tracing::debug!(url = %url, endpoint = %self.endpoint, "Looking up snapshot");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("url", url)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LookupError::LookupFailed(format!("HTTP {}", response.status())));
        }

        let body = response.text().await?;
        parse_availability(&body)
    }
}

impl Default for SnapshotClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}
