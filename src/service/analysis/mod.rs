//! Identity-guarded video analysis
//!
//! Runs the model on a video and only returns the result once every identity
//! guard has passed. Link analyses are checked against the identifier
//! extracted from the URL and the title reported by the metadata service.
//! File analyses have no external ground truth and are stamped with the
//! uploaded file name instead.

use std::sync::Arc;

use crate::model::{
    AnalysisDocument, AnalysisMode, AnalysisRequest, DecodedAnalysis, FrameConfig,
    VideoReference,
};
use crate::service::frames::{FfmpegVideo, VideoResource, sample_frames};
use crate::service::llm::{
    GenerationClient, GenerationError, GenerationRequest, GenerationResponse,
};
use crate::service::oembed::MetadataSource;
use crate::service::video_id::extract_video_id;

pub mod error;
pub mod parser;
pub mod prompts;
pub mod sources;
pub mod validation;

pub use error::AnalysisError;

use parser::parse_analysis;
use prompts::{ANALYSIS_SYSTEM_PROMPT, build_file_prompt, build_link_prompt};
use sources::{dedup_sources, reconcile_sources};
use validation::{check_title, check_video_id};

/// Service producing trusted analysis documents
pub struct AnalysisService {
    generator: Arc<dyn GenerationClient>,
    metadata: Arc<dyn MetadataSource>,
    frames: FrameConfig,
}

impl AnalysisService {
    pub fn new(
        generator: Arc<dyn GenerationClient>,
        metadata: Arc<dyn MetadataSource>,
        frames: FrameConfig,
    ) -> Self {
        tracing::info!(
            model = %generator.model(),
            max_frames = frames.max_frames,
            "Analysis service initialized"
        );
        Self {
            generator,
            metadata,
            frames,
        }
    }

    /// Analyze either request shape
    pub async fn analyze(
        &self,
        request: AnalysisRequest,
    ) -> Result<AnalysisDocument, AnalysisError> {
        match request {
            AnalysisRequest::Link { url, mode } => self.analyze_link(&url, mode).await,
            AnalysisRequest::File { name, data } => {
                let video = FfmpegVideo::open(&name, &data, &self.frames)
                    .await
                    .map_err(|e| AnalysisError::FrameExtractionFailed(e.to_string()))?;
                // Staged on disk from here on
                drop(data);
                self.analyze_file(&name, video).await
            }
        }
    }

    /// Analyze a public video link
    ///
    /// Guards run strictly in order and the first failure ends the request.
    pub async fn analyze_link(
        &self,
        url: &str,
        mode: AnalysisMode,
    ) -> Result<AnalysisDocument, AnalysisError> {
        // Extract
        let video_id =
            extract_video_id(url).ok_or_else(|| AnalysisError::InvalidLink(url.to_string()))?;

        // Verify
        let metadata = self.metadata.verify(url).await.ok_or_else(|| {
            tracing::warn!(url = %url, video_id = %video_id, "Video metadata unavailable");
            AnalysisError::UnverifiableVideo
        })?;

        tracing::debug!(
            url = %url,
            video_id = %video_id,
            verified_title = %metadata.title,
            mode = ?mode,
            "Video verified, requesting analysis"
        );

        // Bind & generate
        let response = self
            .generate(
                &video_id,
                GenerationRequest {
                    system: Some(ANALYSIS_SYSTEM_PROMPT.to_string()),
                    prompt: build_link_prompt(url, &video_id, &metadata, mode),
                    images: vec![],
                    grounding: true,
                },
            )
            .await?;

        // Decode and surface declared errors
        let decoded = decode(&response, &video_id)?;

        check_video_id(&decoded, &video_id).inspect_err(|e| {
            tracing::warn!(url = %url, video_id = %video_id, error = %e, "Identifier guard rejected analysis");
        })?;

        let video_title = check_title(&decoded, &metadata.title)
            .inspect_err(|e| {
                tracing::warn!(url = %url, video_id = %video_id, error = %e, "Title guard rejected analysis");
            })?
            .to_string();

        let sources = reconcile_sources(url, response.grounding_sources);

        tracing::info!(
            url = %url,
            video_id = %video_id,
            sources = sources.len(),
            "Analysis passed identity guards"
        );

        // The model's echo of the URL and identifier is discarded
        let reference = VideoReference::Link {
            url: url.to_string(),
            id: video_id,
        };
        let mut document = AnalysisDocument {
            video_title,
            video_url: None,
            video_id: None,
            payload: decoded.into_payload(),
            sources,
        };
        reference.stamp(&mut document);

        Ok(document)
    }

    /// Analyze an uploaded video from sampled frames
    ///
    /// The file name is the only identity anchor, so it replaces whatever
    /// title the model inferred.
    pub async fn analyze_file<R: VideoResource>(
        &self,
        name: &str,
        video: R,
    ) -> Result<AnalysisDocument, AnalysisError> {
        let frames = sample_frames(video, self.frames.max_frames)
            .await
            .map_err(|e| {
                tracing::warn!(name = %name, error = %e, "Frame extraction failed");
                AnalysisError::FrameExtractionFailed(e.to_string())
            })?;

        tracing::debug!(name = %name, frames = frames.len(), "Sampled frames from upload");

        let response = self
            .generate(
                name,
                GenerationRequest {
                    system: Some(ANALYSIS_SYSTEM_PROMPT.to_string()),
                    prompt: build_file_prompt(name, frames.len()),
                    images: frames,
                    grounding: false,
                },
            )
            .await?;

        let decoded = decode(&response, name)?;

        let reference = VideoReference::File {
            name: name.to_string(),
        };
        let mut document = AnalysisDocument {
            video_title: decoded.video_title_str().unwrap_or_default().to_string(),
            video_url: None,
            video_id: None,
            payload: decoded.into_payload(),
            sources: dedup_sources(response.grounding_sources),
        };
        reference.stamp(&mut document);

        tracing::info!(name = %name, "File analysis stamped with upload name");

        Ok(document)
    }

    async fn generate(
        &self,
        subject: &str,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, AnalysisError> {
        let model = self.generator.model().to_string();
        let prompt_length = request.prompt.len();
        let image_count = request.images.len();

        tracing::debug!(
            subject = %subject,
            model = %model,
            prompt_length = prompt_length,
            images = image_count,
            grounding = request.grounding,
            "Initiating generation call"
        );

        let start_time = std::time::Instant::now();

        match self.generator.generate(request).await {
            Ok(response) => {
                tracing::info!(
                    subject = %subject,
                    model = %model,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    response_length = response.text.len(),
                    grounding_sources = response.grounding_sources.len(),
                    "Generation call completed successfully"
                );
                Ok(response)
            }
            Err(e) => {
                tracing::error!(
                    subject = %subject,
                    model = %model,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    prompt_length = prompt_length,
                    error = %e,
                    "Generation call failed"
                );
                Err(match e {
                    GenerationError::MissingCredential => AnalysisError::MissingCredential,
                    other => AnalysisError::Generation(other.to_string()),
                })
            }
        }
    }
}

/// Decode the model output and surface any error the model declared
fn decode(response: &GenerationResponse, subject: &str) -> Result<DecodedAnalysis, AnalysisError> {
    let decoded = parse_analysis(&response.text).ok_or_else(|| {
        tracing::warn!(
            subject = %subject,
            response_length = response.text.len(),
            "Model response contained no decodable analysis"
        );
        AnalysisError::UnparsableResponse
    })?;

    if let Some(message) = decoded.declared_error() {
        tracing::info!(subject = %subject, message = %message, "Model declined identification");
        return Err(AnalysisError::ModelDeclinedIdentification(message));
    }

    Ok(decoded)
}
