//! Recovery of the structured analysis from raw model text

use crate::model::DecodedAnalysis;

/// Decode the span from the first `{` to the last `}` of `text`
///
/// Model output may wrap the JSON object in prose. This does not track
/// nesting or string escapes, so prose containing braces after the object
/// makes the decode fail.
pub fn parse_analysis(text: &str) -> Option<DecodedAnalysis> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }

    match serde_json::from_str::<DecodedAnalysis>(&text[start..=end]) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            tracing::debug!(error = %e, text_length = text.len(), "Failed to decode analysis JSON");
            None
        }
    }
}
