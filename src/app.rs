//! Application state and service initialization
//!
//! This module centralizes all service initialization and dependency injection,
//! making it easier to manage the application lifecycle and test services.

use std::sync::Arc;

use crate::model::{Config, FrameConfig};
use crate::service::llm::GenerationError;
use crate::service::{AnalysisService, GeminiClient, OEmbedClient};

/// Application state containing all services and shared resources
pub struct AppState {
    /// Identity-guarded analysis pipeline
    pub analysis_service: Arc<AnalysisService>,
    /// Frame sampling settings, also used by the readiness probe
    pub frames: FrameConfig,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// Fails before any network or process I/O when no generation credential
    /// is configured.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(AppError::MissingCredential)?;

        if config.frames.max_frames == 0 {
            return Err(AppError::InvalidConfig("frames.max_frames must be positive"));
        }

        let generator = GeminiClient::new(api_key, &config.generation)?;

        let metadata = OEmbedClient::new(&config.metadata);

        let analysis_service = Arc::new(AnalysisService::new(
            Arc::new(generator),
            Arc::new(metadata),
            config.frames.clone(),
        ));

        Ok(Self {
            analysis_service,
            frames: config.frames.clone(),
        })
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// No generation credential in any configured source
    #[error("Missing generation credential: set GEMINI_API_KEY, GOOGLE_API_KEY or API_KEY")]
    MissingCredential,

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// Generation client could not be constructed
    #[error("Generation client setup failed: {0}")]
    Generation(#[from] GenerationError),
}
