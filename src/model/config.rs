use serde::Deserialize;
use std::fs;
use std::path::Path;

const ENV_CONFIG_PATH: &str = "MATCHSCOPE_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const ENV_GENERATION_MODEL: &str = "GENERATION_MODEL";
const ENV_OEMBED_URL: &str = "OEMBED_URL";
const ENV_MAX_FRAMES: &str = "MAX_FRAMES";

/// Credential sources, checked in this order
const CREDENTIAL_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "GOOGLE_API_KEY", "API_KEY"];

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_GENERATION_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_THINKING_BUDGET: i32 = 1024;
const DEFAULT_OEMBED_URL: &str = "https://www.youtube.com/oembed";
const DEFAULT_MAX_FRAMES: usize = 8;
const DEFAULT_JPEG_QUALITY: u8 = 5;
const DEFAULT_FRAME_MAX_WIDTH: u32 = 640;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

/// Generation endpoint settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub model: String,
    pub base_url: String,
    /// Cost control passed through as `thinkingBudget`
    pub thinking_budget: i32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_GENERATION_BASE_URL.to_string(),
            thinking_budget: DEFAULT_THINKING_BUDGET,
        }
    }
}

/// Metadata (oEmbed) endpoint settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    pub oembed_url: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            oembed_url: DEFAULT_OEMBED_URL.to_string(),
        }
    }
}

/// Frame sampling settings for the file upload path
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    pub max_frames: usize,
    /// ffmpeg `-q:v` scale (2 = best, 31 = worst)
    pub jpeg_quality: u8,
    pub max_width: u32,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_frames: DEFAULT_MAX_FRAMES,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            max_width: DEFAULT_FRAME_MAX_WIDTH,
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
        }
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
    #[serde(default)]
    pub frames: FrameConfig,
    #[serde(default)]
    pub max_upload_bytes: Option<usize>,
}

/// Application configuration
///
/// Resolved once at process start and handed to the service constructors.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub host: String,
    pub generation: GenerationConfig,
    pub metadata: MetadataConfig,
    pub frames: FrameConfig,
    pub max_upload_bytes: usize,
    /// Generation service credential, if any source provided one
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            generation: GenerationConfig::default(),
            metadata: MetadataConfig::default(),
            frames: FrameConfig::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            api_key: None,
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let config_path = std::env::var(ENV_CONFIG_PATH)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let file = Self::load_config_file(&config_path).unwrap_or_default();

        let mut generation = file.generation;
        if let Ok(model) = std::env::var(ENV_GENERATION_MODEL) {
            generation.model = model;
        }

        let mut metadata = file.metadata;
        if let Ok(url) = std::env::var(ENV_OEMBED_URL) {
            metadata.oembed_url = url;
        }

        let mut frames = file.frames;
        if let Some(max_frames) = std::env::var(ENV_MAX_FRAMES)
            .ok()
            .and_then(|v| v.parse().ok())
        {
            frames.max_frames = max_frames;
        }

        Self {
            port,
            host,
            generation,
            metadata,
            frames,
            max_upload_bytes: file.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            api_key: resolve_credential(|name| std::env::var(name).ok()),
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                let contents = contents.trim();
                if contents.is_empty() {
                    tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
                    return Some(ConfigFile::default());
                }

                match serde_yaml::from_str(contents) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Loaded configuration from file");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Pick the first non-blank credential in priority order
fn resolve_credential(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    CREDENTIAL_ENV_VARS
        .iter()
        .filter_map(|name| lookup(*name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}
