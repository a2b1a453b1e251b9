//! REST API endpoints for video analyses

use actix_web::{HttpRequest, HttpResponse, post, web};
use serde::Deserialize;
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::api::error::{ApiError, ErrorResponse};
use crate::model::{AnalysisDocument, AnalysisMode, AnalysisRequest, Source};
use crate::service::AnalysisService;

/// Link analysis request body
#[derive(Debug, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinkRequest {
    Link {
        /// Public video URL, used exactly as given
        url: String,
        #[serde(default)]
        mode: AnalysisMode,
    },
}

/// Largest accepted upload body, in bytes
#[derive(Debug, Clone, Copy)]
pub struct UploadLimit(pub usize);

/// Query parameters for file uploads
#[derive(Debug, Deserialize, IntoParams)]
pub struct FileParams {
    /// Name of the uploaded file; becomes the analysis title
    pub name: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        analyze_link,
        analyze_file,
        crate::api::health::liveness,
        crate::api::health::readiness
    ),
    components(schemas(
        LinkRequest,
        AnalysisMode,
        AnalysisDocument,
        Source,
        ErrorResponse,
        crate::api::health::HealthStatus,
        crate::api::health::ReadinessStatus,
        crate::api::health::DependencyHealth,
    )),
    tags(
        (name = "analyses", description = "Identity-guarded tactical analyses"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

/// Analyze a public video link
///
/// The analysis is returned only if the model's echoed video identifier and
/// title agree with the link and with independently verified metadata.
#[utoipa::path(
    post,
    path = "/v1/analyses",
    request_body = LinkRequest,
    responses(
        (status = 200, description = "Trusted analysis", body = AnalysisDocument),
        (status = 400, description = "No video identifier in the link", body = ErrorResponse),
        (status = 422, description = "Video could not be verified", body = ErrorResponse),
        (status = 502, description = "Model output rejected or generation failed", body = ErrorResponse)
    ),
    tag = "analyses"
)]
#[post("/v1/analyses")]
pub async fn analyze_link(
    service: web::Data<AnalysisService>,
    body: web::Json<LinkRequest>,
) -> Result<HttpResponse, ApiError> {
    let LinkRequest::Link { url, mode } = body.into_inner();

    tracing::info!(url = %url, mode = ?mode, "Link analysis requested");

    let document = service.analyze(AnalysisRequest::Link { url, mode }).await?;
    Ok(HttpResponse::Ok().json(document))
}

/// Analyze an uploaded video file
///
/// The request body is the raw video. Frames are sampled evenly across the
/// video and the result is titled with the file name.
#[utoipa::path(
    post,
    path = "/v1/analyses/file",
    params(FileParams),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Analysis stamped with the file name", body = AnalysisDocument),
        (status = 400, description = "Missing file name or empty body", body = ErrorResponse),
        (status = 413, description = "Upload exceeds the configured limit", body = ErrorResponse),
        (status = 422, description = "Frames could not be extracted", body = ErrorResponse),
        (status = 502, description = "Model output rejected or generation failed", body = ErrorResponse)
    ),
    tag = "analyses"
)]
#[post("/v1/analyses/file")]
pub async fn analyze_file(
    service: web::Data<AnalysisService>,
    limit: web::Data<UploadLimit>,
    query: web::Query<FileParams>,
    payload: web::Payload,
) -> Result<HttpResponse, ApiError> {
    let name = query.into_inner().name;

    if name.trim().is_empty() {
        return Err(ApiError::BadRequest("file name is required".to_string()));
    }

    let limit = limit.0;
    let body = match payload.to_bytes_limited(limit).await {
        Ok(Ok(body)) => body,
        Ok(Err(e)) => {
            return Err(ApiError::BadRequest(format!("failed to read upload: {e}")));
        }
        Err(_) => return Err(ApiError::PayloadTooLarge { limit }),
    };
    if body.is_empty() {
        return Err(ApiError::BadRequest("video body is empty".to_string()));
    }

    tracing::info!(name = %name, bytes = body.len(), "File analysis requested");

    let document = service
        .analyze(AnalysisRequest::File { name, data: body })
        .await?;
    Ok(HttpResponse::Ok().json(document))
}

fn json_error(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(err.to_string()).into()
}

fn query_error(err: actix_web::error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(err.to_string()).into()
}

/// Configure analysis routes
///
/// Extractor failures are reported in the same JSON shape as analysis errors.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .service(analyze_link)
        .service(analyze_file);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test};
    use async_trait::async_trait;

    use crate::model::{FrameConfig, VerifiedMetadata};
    use crate::service::llm::{
        GenerationClient, GenerationError, GenerationRequest, GenerationResponse,
    };
    use crate::service::oembed::MetadataSource;

    struct UnusedGenerator;

    #[async_trait]
    impl GenerationClient for UnusedGenerator {
        async fn generate(
            &self,
            _request: GenerationRequest,
        ) -> Result<GenerationResponse, GenerationError> {
            panic!("generation must not run");
        }

        fn model(&self) -> &str {
            "unused"
        }
    }

    struct NoMetadata;

    #[async_trait]
    impl MetadataSource for NoMetadata {
        async fn verify(&self, _url: &str) -> Option<VerifiedMetadata> {
            None
        }
    }

    fn service() -> web::Data<AnalysisService> {
        web::Data::new(AnalysisService::new(
            Arc::new(UnusedGenerator),
            Arc::new(NoMetadata),
            FrameConfig::default(),
        ))
    }

    macro_rules! app {
        ($limit:expr) => {
            test::init_service(
                App::new()
                    .app_data(service())
                    .app_data(web::Data::new(UploadLimit($limit)))
                    .configure(configure),
            )
            .await
        };
    }

    async fn assert_error_body(
        resp: actix_web::dev::ServiceResponse,
        status: StatusCode,
        error: &str,
    ) {
        assert_eq!(resp.status(), status);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], error);
        assert!(body["message"].as_str().is_some());
        assert!(body["request_id"].as_str().is_some());
    }

    #[actix_web::test]
    async fn test_invalid_link_is_bad_request() {
        let app = app!(1024);

        let req = test::TestRequest::post()
            .uri("/v1/analyses")
            .set_json(serde_json::json!({"kind": "link", "url": "https://example.com/video"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid_link");
        assert!(body["request_id"].as_str().is_some());
    }

    #[actix_web::test]
    async fn test_unverifiable_video() {
        let app = app!(1024);

        let req = test::TestRequest::post()
            .uri("/v1/analyses")
            .set_json(serde_json::json!({
                "kind": "link",
                "url": "https://www.youtube.com/watch?v=ABC123",
                "mode": "detailed"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "unverifiable_video");
    }

    #[actix_web::test]
    async fn test_empty_upload_is_rejected() {
        let app = app!(1024);

        let req = test::TestRequest::post()
            .uri("/v1/analyses/file?name=match.mp4")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_error_body(resp, StatusCode::BAD_REQUEST, "bad_request").await;
    }

    #[actix_web::test]
    async fn test_link_body_missing_url_is_json_error() {
        let app = app!(1024);

        let req = test::TestRequest::post()
            .uri("/v1/analyses")
            .set_json(serde_json::json!({"kind": "link"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_error_body(resp, StatusCode::BAD_REQUEST, "bad_request").await;
    }

    #[actix_web::test]
    async fn test_unknown_request_kind_is_json_error() {
        let app = app!(1024);

        let req = test::TestRequest::post()
            .uri("/v1/analyses")
            .set_json(serde_json::json!({"kind": "file", "url": "https://youtu.be/ABC123"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_error_body(resp, StatusCode::BAD_REQUEST, "bad_request").await;
    }

    #[actix_web::test]
    async fn test_upload_without_name_is_json_error() {
        let app = app!(1024);

        let req = test::TestRequest::post()
            .uri("/v1/analyses/file")
            .set_payload(vec![0u8; 16])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_error_body(resp, StatusCode::BAD_REQUEST, "bad_request").await;
    }

    #[actix_web::test]
    async fn test_oversized_upload_is_json_error() {
        let app = app!(8);

        let req = test::TestRequest::post()
            .uri("/v1/analyses/file?name=match.mp4")
            .set_payload(vec![0u8; 64])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_error_body(resp, StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large").await;
    }
}
