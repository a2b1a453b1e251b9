//! Prompts for tactical video analysis

use crate::model::{AnalysisMode, VerifiedMetadata};

/// System prompt shared by link and file analyses
pub const ANALYSIS_SYSTEM_PROMPT: &str = r#"You are a professional football (soccer) tactical analyst. You produce structured, evidence-based match analyses.

## Critical Rules

1. **Identity comes first.** You must only analyze the exact video you are given. Never substitute a different match, a similar fixture, a highlight compilation of another game, or a different upload of a related event.
2. **If you cannot establish which match the video shows with confidence, do not guess.** Return a JSON object with a single `error` field explaining why, and nothing else.
3. **Respond with a single JSON object.** No markdown outside the object, no commentary before or after it.

## Output Fields

- `videoTitle`: title of the video
- `videoId`: identifier of the video
- `videoUrl`: link to the video, if any
- `summary`: short overview of the match
- `teams`: `{ "home": string, "away": string }`
- `score`: final or current score, if known
- `formations`: `{ "home": string, "away": string }`
- `keyMoments`: array of `{ "time": string, "description": string }`
- `tacticalInsights`: array of strings
- `playerPerformances`: array of `{ "player": string, "team": string, "rating": number, "notes": string }`
- `statistics`: object of named match statistics
- `error`: only present when the video cannot be identified
"#;

/// Build the link-analysis prompt, binding the verified identity as ground truth
pub fn build_link_prompt(
    url: &str,
    video_id: &str,
    metadata: &VerifiedMetadata,
    mode: AnalysisMode,
) -> String {
    let author = metadata.author.as_deref().unwrap_or("unknown");

    format!(
        r#"Analyze the football match shown in this video.

## Ground Truth (non-negotiable)
- URL: {url}
- Video ID: {video_id}
- Verified title: {title}
- Channel: {author}

These values were verified independently of you. Use search to find coverage of THIS video only.

## Identity Requirements
- Analyze only the video whose ID is exactly `{video_id}`. Ignore search results about other videos, even of the same fixture.
- Set `videoId` to `{video_id}` verbatim.
- Set `videoTitle` to a title consistent with the verified title above.
- Set `videoUrl` to `{url}`.
- If you cannot confidently confirm that your analysis is about video `{video_id}`, return only `{{"error": "<reason>"}}`.

## Depth
{depth}

Return a single JSON object."#,
        title = metadata.title,
        depth = depth_instructions(mode),
    )
}

/// Build the file-analysis prompt; identification relies on the frames alone
pub fn build_file_prompt(file_name: &str, frame_count: usize) -> String {
    format!(
        r#"Analyze the football match shown in the {frame_count} attached frames, sampled evenly from an uploaded video named "{file_name}".

## Identity Requirements
- Identify the teams and competition from what is visible in the frames only (kits, scoreboards, stadium, broadcast graphics).
- Do not assume a match from the file name or from outside knowledge that the frames do not support.
- If the frames are not enough to identify the match confidently, return only `{{"error": "<reason>"}}`.

## Depth
{depth}

Return a single JSON object."#,
        depth = depth_instructions(AnalysisMode::Detailed),
    )
}

fn depth_instructions(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::Fast => {
            "Keep it brief: a two-sentence summary, formations, at most 3 key moments and 3 tactical insights. Omit player performances and statistics you are unsure of."
        }
        AnalysisMode::Detailed => {
            "Be thorough: a full summary, formations and how they shifted, up to 10 key moments, at least 5 tactical insights, player performances for standout players, and the statistics you can support."
        }
    }
}
