//! Analysis documents: the untrusted model decode and the trusted result

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// A citation attached to an analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Source {
    pub title: Option<String>,
    pub uri: String,
}

/// Analysis as decoded from model output, before any identity guard ran
///
/// Identity fields stay as raw JSON values so a wrong type is rejected by
/// the guards instead of failing the decode.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedAnalysis {
    #[serde(default)]
    pub video_title: Option<Value>,
    #[serde(default)]
    pub video_url: Option<Value>,
    #[serde(default)]
    pub video_id: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl DecodedAnalysis {
    /// Error the model wrote into its own output, if any
    pub fn declared_error(&self) -> Option<String> {
        match self.error.as_ref()? {
            Value::Null | Value::Bool(false) => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Echoed identifier; absent, `null` and `""` count as missing and any
    /// other non-string value is rendered as JSON text
    pub fn echoed_video_id(&self) -> Option<Cow<'_, str>> {
        match self.video_id.as_ref()? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(Cow::Borrowed(s)),
            other => Some(Cow::Owned(other.to_string())),
        }
    }

    pub fn video_title_str(&self) -> Option<&str> {
        self.video_title.as_ref().and_then(Value::as_str)
    }

    /// Analytical fields only; model-supplied `sources` are discarded since
    /// citations come from grounding metadata
    pub fn into_payload(self) -> Map<String, Value> {
        let mut payload = self.payload;
        payload.remove("sources");
        payload
    }
}

/// Trusted analysis returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDocument {
    pub video_title: String,
    pub video_url: Option<String>,
    pub video_id: Option<String>,
    /// Opaque analytical fields (formations, key moments, ...)
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub payload: Map<String, Value>,
    pub sources: Vec<Source>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_declared_error_truthiness() {
        let decoded: DecodedAnalysis = serde_json::from_value(json!({"error": null})).unwrap();
        assert!(decoded.declared_error().is_none());

        let decoded: DecodedAnalysis = serde_json::from_value(json!({"error": ""})).unwrap();
        assert!(decoded.declared_error().is_none());

        let decoded: DecodedAnalysis =
            serde_json::from_value(json!({"error": "Cannot identify this match"})).unwrap();
        assert_eq!(
            decoded.declared_error().as_deref(),
            Some("Cannot identify this match")
        );
    }

    #[test]
    fn test_identity_fields_keep_wrong_types() {
        let decoded: DecodedAnalysis =
            serde_json::from_value(json!({"videoId": 42, "videoTitle": ["a"], "summary": "x"}))
                .unwrap();
        assert_eq!(decoded.echoed_video_id().as_deref(), Some("42"));
        assert!(decoded.video_title_str().is_none());
        assert_eq!(decoded.payload.get("summary"), Some(&json!("x")));
    }

    #[test]
    fn test_blank_video_id_is_missing() {
        for value in [json!({}), json!({"videoId": null}), json!({"videoId": ""})] {
            let decoded: DecodedAnalysis = serde_json::from_value(value).unwrap();
            assert!(decoded.echoed_video_id().is_none());
        }
    }

    #[test]
    fn test_payload_drops_model_sources() {
        let decoded: DecodedAnalysis = serde_json::from_value(json!({
            "videoId": "abc",
            "summary": "High press",
            "sources": [{"uri": "https://made.up"}]
        }))
        .unwrap();
        let payload = decoded.into_payload();
        assert!(payload.contains_key("summary"));
        assert!(!payload.contains_key("sources"));
        assert!(!payload.contains_key("videoId"));
    }

    #[test]
    fn test_document_serializes_flat() {
        let mut payload = Map::new();
        payload.insert("summary".to_string(), json!("Compact 4-4-2"));
        let doc = AnalysisDocument {
            video_title: "Team A vs Team B".to_string(),
            video_url: None,
            video_id: Some("ABC123".to_string()),
            payload,
            sources: vec![],
        };
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["videoTitle"], json!("Team A vs Team B"));
        assert_eq!(value["videoUrl"], Value::Null);
        assert_eq!(value["summary"], json!("Compact 4-4-2"));
        assert_eq!(value["sources"], json!([]));
    }
}
