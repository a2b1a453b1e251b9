//! Health check endpoints for Kubernetes liveness and readiness probes

use std::process::Stdio;

use actix_web::{HttpResponse, Responder, get, web};
use serde::Serialize;
use tokio::process::Command;
use utoipa::ToSchema;

use crate::model::FrameConfig;

#[derive(Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

#[derive(Serialize, ToSchema)]
pub struct ReadinessStatus {
    pub status: String,
    pub version: String,
    pub dependencies: DependencyHealth,
}

#[derive(Serialize, ToSchema)]
pub struct DependencyHealth {
    pub ffmpeg: String,
    pub ffprobe: String,
}

/// Liveness probe endpoint
///
/// Always returns 200 OK if the service is running.
#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Service is alive", body = HealthStatus)
    ),
    tag = "health"
)]
#[get("/health/live")]
pub async fn liveness() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness probe endpoint
///
/// File uploads need ffmpeg and ffprobe; link analyses do not, but the
/// service is only reported ready when both request shapes can be served.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessStatus),
        (status = 503, description = "Service is not ready", body = ReadinessStatus)
    ),
    tag = "health"
)]
#[get("/health/ready")]
pub async fn readiness(frames: web::Data<FrameConfig>) -> impl Responder {
    let ffmpeg = tool_status(&frames.ffmpeg_path).await;
    let ffprobe = tool_status(&frames.ffprobe_path).await;

    let all_healthy = ffmpeg == "available" && ffprobe == "available";

    let status = ReadinessStatus {
        status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        dependencies: DependencyHealth {
            ffmpeg: ffmpeg.to_string(),
            ffprobe: ffprobe.to_string(),
        },
    };

    if all_healthy {
        HttpResponse::Ok().json(status)
    } else {
        HttpResponse::ServiceUnavailable().json(status)
    }
}

async fn tool_status(path: &str) -> &'static str {
    let result = Command::new(path)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    match result {
        Ok(status) if status.success() => "available",
        Ok(status) => {
            tracing::warn!(tool = %path, status = ?status.code(), "Tool health check failed");
            "unavailable"
        }
        Err(e) => {
            tracing::warn!(tool = %path, error = %e, "Tool not found");
            "missing"
        }
    }
}

/// Configure health check routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(liveness).service(readiness);
}
