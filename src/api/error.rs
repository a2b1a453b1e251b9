//! Unified API error handling
//!
//! This module provides a consistent error response format across all API endpoints.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::service::analysis::AnalysisError;

/// Standard error response format
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique request ID for tracing
    pub request_id: String,
}

/// Unified API error type
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Analysis ended without a trusted document
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// Malformed request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Upload larger than the configured cap (413)
    #[error("Upload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },
}

impl ApiError {
    fn error_type(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::PayloadTooLarge { .. } => "payload_too_large",
            ApiError::Analysis(e) => match e {
                AnalysisError::InvalidLink(_) => "invalid_link",
                AnalysisError::UnverifiableVideo => "unverifiable_video",
                AnalysisError::UnparsableResponse => "unparsable_response",
                AnalysisError::ModelDeclinedIdentification(_) => "model_declined_identification",
                AnalysisError::MissingVideoId => "missing_video_id",
                AnalysisError::VideoIdMismatch { .. } => "video_id_mismatch",
                AnalysisError::TitleMismatch { .. } => "title_mismatch",
                AnalysisError::FrameExtractionFailed(_) => "frame_extraction_failed",
                AnalysisError::MissingCredential => "missing_credential",
                AnalysisError::Generation(_) => "generation_failed",
            },
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Analysis(e) => match e {
                AnalysisError::InvalidLink(_) => StatusCode::BAD_REQUEST,
                AnalysisError::UnverifiableVideo | AnalysisError::FrameExtractionFailed(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                AnalysisError::UnparsableResponse
                | AnalysisError::ModelDeclinedIdentification(_)
                | AnalysisError::MissingVideoId
                | AnalysisError::VideoIdMismatch { .. }
                | AnalysisError::TitleMismatch { .. }
                | AnalysisError::Generation(_) => StatusCode::BAD_GATEWAY,
                AnalysisError::MissingCredential => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_type = self.error_type();

        tracing::error!(
            error_type = error_type,
            status = status.as_u16(),
            message = %self,
            "API error"
        );

        HttpResponse::build(status).json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            request_id: Uuid::new_v4().to_string(),
        })
    }
}
