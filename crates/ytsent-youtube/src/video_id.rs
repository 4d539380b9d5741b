//! Video identifier extraction from user-pasted links.

use url::Url;

/// Extract the video identifier from a `YouTube` link.
///
/// Two shapes are recognised:
/// - `https://www.youtube.com/watch?v=ID` (any `youtube.com` subdomain): the
///   first `v` query parameter.
/// - `https://youtu.be/ID`: the first path segment.
///
/// Links pasted without a scheme are read as `https://`. Anything else,
/// including a matching host with an empty id, yields `None`.
#[must_use]
pub fn extract_video_id(url: Option<&str>) -> Option<String> {
    let raw = url.map(str::trim).filter(|s| !s.is_empty())?;
    let parsed = parse_lenient(raw)?;
    let host = parsed.host_str()?.to_ascii_lowercase();

    let id = if is_youtube_host(&host) {
        parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
    } else if host == "youtu.be" {
        parsed
            .path_segments()
            .and_then(|mut segments| segments.next())
            .map(ToOwned::to_owned)
    } else {
        None
    };

    id.filter(|id| !id.is_empty())
}

fn parse_lenient(raw: &str) -> Option<Url> {
    match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("https://{raw}")).ok()
        }
        Err(_) => None,
    }
}

fn is_youtube_host(host: &str) -> bool {
    host == "youtube.com" || host.ends_with(".youtube.com")
}
