//! Frame sampling for uploaded videos
//!
//! Captures a bounded set of evenly spaced stills from a video resource. The
//! resource has a single decode position, so seeks and captures run strictly
//! one after another.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::process::Command;

use crate::model::{Frame, FrameConfig};

pub const FRAME_MIME_TYPE: &str = "image/jpeg";

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FrameError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to probe video: {0}")]
    Probe(String),

    #[error("Video duration unavailable or zero")]
    InvalidDuration,

    #[error("Frame count must be positive")]
    InvalidFrameCount,

    #[error("Failed to capture frame at {timestamp:.3}s: {reason}")]
    Capture { timestamp: f64, reason: String },
}

/// A seekable video with a single decode position
#[async_trait]
pub trait VideoResource: Send {
    /// Total duration in seconds
    async fn duration(&mut self) -> Result<f64, FrameError>;

    /// Move the decode position; resolves once the seek has completed
    async fn seek(&mut self, timestamp: f64) -> Result<(), FrameError>;

    /// Encode the frame at the current position as a JPEG still
    async fn capture(&mut self) -> Result<Vec<u8>, FrameError>;
}

/// Sample `max_frames` evenly spaced frames, starting at zero
///
/// The resource is consumed and dropped on every exit path, including when
/// the returned future is abandoned.
pub async fn sample_frames<R: VideoResource>(
    mut resource: R,
    max_frames: usize,
) -> Result<Vec<Frame>, FrameError> {
    if max_frames == 0 {
        return Err(FrameError::InvalidFrameCount);
    }

    let duration = resource.duration().await?;
    if !duration.is_finite() || duration <= 0.0 {
        return Err(FrameError::InvalidDuration);
    }

    let step = duration / max_frames as f64;
    let mut frames = Vec::with_capacity(max_frames);

    for i in 0..max_frames {
        let timestamp = i as f64 * step;
        resource.seek(timestamp).await?;
        let data = resource.capture().await?;
        tracing::debug!(
            index = i,
            timestamp = timestamp,
            bytes = data.len(),
            "Captured frame"
        );
        frames.push(Frame {
            timestamp,
            mime_type: FRAME_MIME_TYPE,
            data,
        });
    }

    Ok(frames)
}

/// Uploaded video staged on disk and decoded with ffmpeg
///
/// The staged copy is deleted when this value is dropped.
pub struct FfmpegVideo {
    file: NamedTempFile,
    position: f64,
    ffmpeg_path: String,
    ffprobe_path: String,
    jpeg_quality: u8,
    max_width: u32,
}

impl FfmpegVideo {
    /// Stage uploaded bytes in a temporary file
    pub async fn open(name: &str, data: &[u8], config: &FrameConfig) -> Result<Self, FrameError> {
        let suffix = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();

        let file = tempfile::Builder::new()
            .prefix("matchscope-")
            .suffix(&suffix)
            .tempfile()?;
        tokio::fs::write(file.path(), data).await?;

        tracing::debug!(
            name = %name,
            path = %file.path().display(),
            bytes = data.len(),
            "Staged uploaded video"
        );

        Ok(Self {
            file,
            position: 0.0,
            ffmpeg_path: config.ffmpeg_path.clone(),
            ffprobe_path: config.ffprobe_path.clone(),
            jpeg_quality: config.jpeg_quality,
            max_width: config.max_width,
        })
    }
}

#[async_trait]
impl VideoResource for FfmpegVideo {
    async fn duration(&mut self) -> Result<f64, FrameError> {
        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "quiet", "-print_format", "json", "-show_format"])
            .arg(self.file.path())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            return Err(FrameError::Probe(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        parse_probe_duration(&output.stdout)
    }

    async fn seek(&mut self, timestamp: f64) -> Result<(), FrameError> {
        self.position = timestamp;
        Ok(())
    }

    async fn capture(&mut self) -> Result<Vec<u8>, FrameError> {
        let position = format!("{:.3}", self.position);
        let scale = format!("scale='min({},iw)':-2", self.max_width);
        let quality = self.jpeg_quality.to_string();

        let output = Command::new(&self.ffmpeg_path)
            .args(["-v", "error", "-ss", &position, "-i"])
            .arg(self.file.path())
            .args([
                "-frames:v", "1",
                "-vf", &scale,
                "-q:v", &quality,
                "-f", "image2",
                "-c:v", "mjpeg",
                "pipe:1",
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() || output.stdout.is_empty() {
            return Err(FrameError::Capture {
                timestamp: self.position,
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

/// Read `format.duration` from ffprobe JSON output
fn parse_probe_duration(stdout: &[u8]) -> Result<f64, FrameError> {
    let value: serde_json::Value = serde_json::from_slice(stdout)
        .map_err(|e| FrameError::Probe(format!("ffprobe JSON: {}", e)))?;

    value["format"]["duration"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or(FrameError::InvalidDuration)
}
