//! Identity guards for model-produced analyses
//!
//! The model is untrusted with respect to which video it analyzed. Each guard
//! compares an identity field of the decoded analysis against a value that
//! was established without the model.

use crate::model::DecodedAnalysis;
use crate::service::analysis::AnalysisError;

/// Zero-width and BOM-class characters removed before comparing titles
const INVISIBLE_CHARS: &[char] = &['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];

/// Normalize a title for comparison (strip invisibles, case-fold, collapse whitespace)
fn normalize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| !INVISIBLE_CHARS.contains(c))
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether two titles refer to the same video
///
/// Both must be non-empty after normalization; then they match when equal or
/// when either contains the other. Symmetric in its arguments.
pub fn titles_match(a: &str, b: &str) -> bool {
    let a = normalize_title(a);
    let b = normalize_title(b);

    if a.is_empty() || b.is_empty() {
        return false;
    }

    a == b || a.contains(&b) || b.contains(&a)
}

/// Require the echoed identifier to equal the extracted one exactly
///
/// A present but non-string identifier is a mismatch, not a missing one.
pub fn check_video_id(decoded: &DecodedAnalysis, expected: &str) -> Result<(), AnalysisError> {
    let actual = decoded
        .echoed_video_id()
        .ok_or(AnalysisError::MissingVideoId)?;

    if actual != expected {
        return Err(AnalysisError::VideoIdMismatch {
            expected: expected.to_string(),
            actual: actual.into_owned(),
        });
    }

    Ok(())
}

/// Require the echoed title to match the verified one; returns the echoed title
pub fn check_title<'a>(
    decoded: &'a DecodedAnalysis,
    verified_title: &str,
) -> Result<&'a str, AnalysisError> {
    match decoded.video_title_str() {
        Some(title) if titles_match(title, verified_title) => Ok(title),
        other => Err(AnalysisError::TitleMismatch {
            expected: verified_title.to_string(),
            actual: other.map(str::to_string),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decoded(value: serde_json::Value) -> DecodedAnalysis {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_whitespace_and_case_insensitive() {
        assert!(titles_match("Team A vs Team B", "team a  vs   team b"));
        assert!(titles_match("  Team A vs Team B\n", "TEAM A VS TEAM B"));
    }

    #[test]
    fn test_unrelated_titles() {
        assert!(!titles_match("Team A vs B", "Team C vs D"));
    }

    #[test]
    fn test_invisible_characters_ignored() {
        assert!(titles_match("\u{FEFF}Team A\u{200B} vs Team B", "Team A vs Team B"));
        assert!(titles_match("Team\u{2060} A vs Team B", "team a vs team b"));
    }

    #[test]
    fn test_containment_both_directions() {
        let verified = "Team A vs Team B | Extended Highlights ⚽";
        assert!(titles_match("Team A vs Team B", verified));
        assert!(titles_match(verified, "Team A vs Team B"));
    }

    #[test]
    fn test_empty_titles_never_match() {
        assert!(!titles_match("", ""));
        assert!(!titles_match("   ", "Team A vs Team B"));
        assert!(!titles_match("Team A vs Team B", "\u{200B}\u{FEFF}"));
    }

    #[test]
    fn test_symmetry() {
        let titles = [
            "",
            " ",
            "Team A vs Team B",
            "team a  vs   team b",
            "Team A vs B",
            "Team C vs D",
            "A",
            "\u{200B}Team A",
            "Team A vs Team B | Highlights",
        ];
        for a in titles {
            for b in titles {
                assert_eq!(titles_match(a, b), titles_match(b, a), "{a:?} / {b:?}");
            }
        }
    }

    #[test]
    fn test_video_id_guard() {
        assert!(check_video_id(&decoded(json!({"videoId": "ABC123"})), "ABC123").is_ok());

        assert!(matches!(
            check_video_id(&decoded(json!({})), "ABC123"),
            Err(AnalysisError::MissingVideoId)
        ));
        assert!(matches!(
            check_video_id(&decoded(json!({"videoId": ""})), "ABC123"),
            Err(AnalysisError::MissingVideoId)
        ));
        assert!(matches!(
            check_video_id(&decoded(json!({"videoId": null})), "ABC123"),
            Err(AnalysisError::MissingVideoId)
        ));

        match check_video_id(&decoded(json!({"videoId": 999})), "ABC123") {
            Err(AnalysisError::VideoIdMismatch { expected, actual }) => {
                assert_eq!(expected, "ABC123");
                assert_eq!(actual, "999");
            }
            other => panic!("expected mismatch, got {other:?}"),
        }

        match check_video_id(&decoded(json!({"videoId": "abc123"})), "ABC123") {
            Err(AnalysisError::VideoIdMismatch { expected, actual }) => {
                assert_eq!(expected, "ABC123");
                assert_eq!(actual, "abc123");
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_title_guard() {
        let ok = decoded(json!({"videoTitle": "Team A vs Team B"}));
        assert_eq!(
            check_title(&ok, "Team A vs Team B (Highlights)").unwrap(),
            "Team A vs Team B"
        );

        assert!(matches!(
            check_title(&decoded(json!({})), "Team A vs Team B"),
            Err(AnalysisError::TitleMismatch { actual: None, .. })
        ));
        assert!(matches!(
            check_title(&decoded(json!({"videoTitle": 7})), "Team A vs Team B"),
            Err(AnalysisError::TitleMismatch { actual: None, .. })
        ));
        assert!(matches!(
            check_title(&decoded(json!({"videoTitle": "Team C vs D"})), "Team A vs B"),
            Err(AnalysisError::TitleMismatch { actual: Some(_), .. })
        ));
    }
}
