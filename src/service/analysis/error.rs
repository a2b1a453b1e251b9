//! Error types for video analysis

use thiserror::Error;

/// Terminal outcome of an analysis request that did not produce a trusted document
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnalysisError {
    #[error("Could not find a video identifier in the link: {0}")]
    InvalidLink(String),

    #[error("Could not verify that this video exists and is public")]
    UnverifiableVideo,

    #[error("The model response did not contain a readable analysis")]
    UnparsableResponse,

    #[error("The model could not safely identify this video: {0}")]
    ModelDeclinedIdentification(String),

    #[error("The analysis did not state which video it describes")]
    MissingVideoId,

    #[error("The analysis describes video {actual}, not the requested video {expected}")]
    VideoIdMismatch { expected: String, actual: String },

    #[error("The analysis title {actual:?} does not match the verified title {expected:?}")]
    TitleMismatch {
        expected: String,
        actual: Option<String>,
    },

    #[error("Could not read frames from the uploaded video: {0}")]
    FrameExtractionFailed(String),

    #[error("No generation service credential is configured")]
    MissingCredential,

    #[error("Generation request failed: {0}")]
    Generation(String),
}
