//! Generation endpoint client
//!
//! Provides a common interface for model calls used by the analysis pipeline.
//! The production binding talks to the Gemini `generateContent` REST API.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::model::{Frame, GenerationConfig, Source};

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Generation endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Generation response carried no text")]
    EmptyResponse,

    #[error("No generation credential configured")]
    MissingCredential,
}

/// A single model call
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system: Option<String>,
    pub prompt: String,
    pub images: Vec<Frame>,
    /// Enable web-search grounding
    pub grounding: bool,
}

/// Raw text plus any web citations the endpoint attached
#[derive(Debug, Clone, Default)]
pub struct GenerationResponse {
    pub text: String,
    pub grounding_sources: Vec<Source>,
}

/// Untrusted text generator
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError>;

    /// Model identifier, for logging
    fn model(&self) -> &str;
}

// Request models

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
    generation_config: WireGenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    Inline { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: &'static str,
    data: String,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: i32,
}

// Response models - only the fields we need

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    uri: Option<String>,
    title: Option<String>,
}

impl GenerateContentResponse {
    fn into_generation_response(self) -> Result<GenerationResponse, GenerationError> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or(GenerationError::EmptyResponse)?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        let grounding_sources = candidate
            .grounding_metadata
            .map(|g| {
                g.grounding_chunks
                    .into_iter()
                    .filter_map(|chunk| chunk.web)
                    .filter_map(|web| {
                        Some(Source {
                            title: web.title,
                            uri: web.uri?,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(GenerationResponse {
            text,
            grounding_sources,
        })
    }
}

/// Gemini REST client
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    thinking_budget: i32,
}

impl GeminiClient {
    /// Create a new client with the provided API key
    pub fn new(api_key: &str, config: &GenerationConfig) -> Result<Self, GenerationError> {
        if api_key.trim().is_empty() {
            return Err(GenerationError::MissingCredential);
        }

        Ok(Self {
            client: Client::new(),
            api_key: api_key.trim().to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            thinking_budget: config.thinking_budget,
        })
    }

    fn build_body(&self, request: GenerationRequest) -> GenerateContentRequest {
        let mut parts = vec![Part::Text {
            text: request.prompt,
        }];
        parts.extend(request.images.into_iter().map(|frame| Part::Inline {
            inline_data: InlineData {
                mime_type: frame.mime_type,
                data: general_purpose::STANDARD.encode(&frame.data),
            },
        }));

        let tools = if request.grounding {
            vec![Tool {
                google_search: serde_json::json!({}),
            }]
        } else {
            vec![]
        };

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user"),
                parts,
            }],
            system_instruction: request.system.map(|text| Content {
                role: None,
                parts: vec![Part::Text { text }],
            }),
            tools,
            generation_config: WireGenerationConfig {
                thinking_config: ThinkingConfig {
                    thinking_budget: self.thinking_budget,
                },
            },
        }
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = self.build_body(request);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status { status, body });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        parsed.into_generation_response()
    }

    fn model(&self) -> &str {
        &self.model
    }
}
