use bytes::Bytes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::AnalysisDocument;

/// The video a request is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoReference {
    /// A public link. `url` is kept exactly as the user supplied it.
    Link { url: String, id: String },
    /// An uploaded file, identified only by its name
    File { name: String },
}

impl VideoReference {
    /// Overwrite the identity fields of `document` with the trusted values
    ///
    /// Links pin the URL and identifier. Files have no URL or identifier and
    /// take the file name as title.
    pub fn stamp(&self, document: &mut AnalysisDocument) {
        match self {
            VideoReference::Link { url, id } => {
                document.video_url = Some(url.clone());
                document.video_id = Some(id.clone());
            }
            VideoReference::File { name } => {
                document.video_title = name.clone();
                document.video_url = None;
                document.video_id = None;
            }
        }
    }
}

/// Title/author as reported by the public metadata service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedMetadata {
    pub title: String,
    pub author: Option<String>,
}

/// Prompt verbosity for link analyses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    #[default]
    Fast,
    Detailed,
}

/// A still image captured from an uploaded video
#[derive(Debug, Clone)]
pub struct Frame {
    /// Seconds from the start of the video
    pub timestamp: f64,
    pub mime_type: &'static str,
    pub data: Vec<u8>,
}

/// Incoming analysis request
#[derive(Debug, Clone)]
pub enum AnalysisRequest {
    Link { url: String, mode: AnalysisMode },
    /// Upload body, shared with the HTTP layer rather than copied
    File { name: String, data: Bytes },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn document() -> AnalysisDocument {
        AnalysisDocument {
            video_title: "Model title".to_string(),
            video_url: Some("https://youtube.com/watch?v=abc".to_string()),
            video_id: Some("abc".to_string()),
            payload: Map::new(),
            sources: vec![],
        }
    }

    #[test]
    fn test_link_stamp_pins_url_and_id() {
        let url = "https://www.youtube.com/watch?v=ABC123&t=1m";
        let reference = VideoReference::Link {
            url: url.to_string(),
            id: "ABC123".to_string(),
        };
        let mut doc = document();
        reference.stamp(&mut doc);

        assert_eq!(doc.video_url.as_deref(), Some(url));
        assert_eq!(doc.video_id.as_deref(), Some("ABC123"));
        assert_eq!(doc.video_title, "Model title");
    }

    #[test]
    fn test_file_stamp_uses_name() {
        let reference = VideoReference::File {
            name: "derby.mp4".to_string(),
        };
        let mut doc = document();
        reference.stamp(&mut doc);

        assert_eq!(doc.video_title, "derby.mp4");
        assert!(doc.video_url.is_none());
        assert!(doc.video_id.is_none());
    }
}
