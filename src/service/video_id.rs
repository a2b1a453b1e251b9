//! Video identifier extraction
//!
//! The same video has many equivalent URL spellings (watch page, short link,
//! shorts, embed). Identity is compared on the extracted identifier, never on
//! the URL string.

use url::Url;

/// Hosts that serve short links of the form `https://<host>/<id>`
const SHORT_LINK_HOSTS: &[&str] = &["youtu.be", "www.youtu.be"];

/// Path prefixes followed by the identifier as the next segment
const ID_PATH_PREFIXES: &[&str] = &["shorts", "embed", "live", "v"];

/// Extract the canonical video identifier from a user-supplied URL
///
/// Returns `None` for unparseable URLs and for URLs matching none of the
/// known shapes.
pub fn extract_video_id(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;

    if let Some((_, id)) = url
        .query_pairs()
        .find(|(key, value)| key == "v" && !value.is_empty())
    {
        return Some(id.into_owned());
    }

    let mut segments = url
        .path_segments()?
        .filter(|segment| !segment.is_empty());

    let host = url.host_str().map(str::to_lowercase).unwrap_or_default();
    if SHORT_LINK_HOSTS.contains(&host.as_str()) {
        return segments.next().map(str::to_string);
    }

    let prefix = segments.next()?;
    if ID_PATH_PREFIXES.contains(&prefix) {
        return segments.next().map(str::to_string);
    }

    None
}
