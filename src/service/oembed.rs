//! oEmbed metadata client
//!
//! Independent ground truth for a claimed video: the public embed endpoint
//! reports the title and channel for a URL without involving the model.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::model::{MetadataConfig, VerifiedMetadata};

/// Source of independently verified video metadata
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Look up metadata for the exact user-supplied URL
    ///
    /// `None` means verification is unavailable; callers must not proceed.
    async fn verify(&self, url: &str) -> Option<VerifiedMetadata>;
}

// Response model - only the fields we need
#[derive(Debug, Deserialize)]
struct OEmbedResponse {
    title: Option<String>,
    author_name: Option<String>,
}

impl OEmbedResponse {
    fn into_metadata(self) -> Option<VerifiedMetadata> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        Some(VerifiedMetadata {
            title,
            author: self.author_name.filter(|a| !a.trim().is_empty()),
        })
    }
}

/// Client for a public oEmbed endpoint
pub struct OEmbedClient {
    client: Client,
    endpoint: String,
}

impl OEmbedClient {
    pub fn new(config: &MetadataConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent("matchscope/1.0")
                .build()
                .unwrap_or_else(|_| Client::new()),
            endpoint: config.oembed_url.clone(),
        }
    }
}

#[async_trait]
impl MetadataSource for OEmbedClient {
    async fn verify(&self, url: &str) -> Option<VerifiedMetadata> {
        tracing::debug!(url = %url, endpoint = %self.endpoint, "Fetching oEmbed metadata");

        let response = match self
            .client
            .get(&self.endpoint)
            .query(&[("url", url), ("format", "json")])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "oEmbed request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                url = %url,
                status = response.status().as_u16(),
                "oEmbed endpoint rejected the video"
            );
            return None;
        }

        let body: OEmbedResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Malformed oEmbed response");
                return None;
            }
        };

        let metadata = body.into_metadata();
        match &metadata {
            Some(m) => tracing::debug!(
                url = %url,
                title = %m.title,
                author = ?m.author,
                "Verified video metadata"
            ),
            None => tracing::warn!(url = %url, "oEmbed response carried no title"),
        }
        metadata
    }
}
