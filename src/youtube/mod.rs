use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

pub mod captions;

pub use captions::{TranscriptSource, YtDlpTranscriptSource};

use crate::{Result, SentimentToolError};

const VIDEO_ID_LEN: usize = 11;

/// A validated YouTube video identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Wrap a raw identifier, validating its shape
    pub fn new(raw: &str) -> Result<Self> {
        if is_valid_id(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(SentimentToolError::InvalidVideoId(raw.to_string()).into())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch page URL for this video
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_valid_id(candidate: &str) -> bool {
    candidate.len() == VIDEO_ID_LEN
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Parse a video identifier from either a raw ID or any of the common YouTube URL shapes
pub fn parse_video_id(input: &str) -> Result<VideoId> {
    let input = input.trim();
    if input.is_empty() {
        return Err(SentimentToolError::InvalidVideoId("empty input".to_string()).into());
    }

    if is_valid_id(input) {
        return VideoId::new(input);
    }

    let with_scheme = if input.starts_with("http://") || input.starts_with("https://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    };

    let invalid = || SentimentToolError::InvalidVideoId(input.to_string());

    let url = Url::parse(&with_scheme).map_err(|_| invalid())?;
    let host = url.host_str().ok_or_else(invalid)?.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    let candidate = match host {
        "youtu.be" => url
            .path_segments()
            .and_then(|mut segments| segments.next())
            .map(str::to_string),
        "youtube.com" | "m.youtube.com" | "music.youtube.com" | "youtube-nocookie.com" => {
            let segments: Vec<&str> = url
                .path_segments()
                .map(|s| s.filter(|p| !p.is_empty()).collect())
                .unwrap_or_default();

            match segments.as_slice() {
                ["watch"] => url
                    .query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned()),
                ["embed" | "v" | "shorts" | "live", id, ..] => Some(id.to_string()),
                _ => None,
            }
        }
        _ => None,
    };

    let id = candidate.ok_or_else(invalid)?;
    tracing::debug!("Parsed video ID {} from {}", id, input);
    VideoId::new(&id).map_err(|_| invalid().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_id() {
        assert_eq!(parse_video_id("SCwN0_ZXwec").unwrap().as_str(), "SCwN0_ZXwec");
        assert_eq!(parse_video_id("  dQw4w9WgXcQ \n").unwrap().as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_watch_urls() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "http://youtube.com/watch?v=dQw4w9WgXcQ&t=30s",
            "https://m.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "www.youtube.com/watch?v=dQw4w9WgXcQ&list=PLrAXtmRdnEQy",
            "https://music.youtube.com/watch?v=dQw4w9WgXcQ",
        ] {
            assert_eq!(parse_video_id(url).unwrap().as_str(), "dQw4w9WgXcQ", "{}", url);
        }
    }

    #[test]
    fn test_short_and_path_urls() {
        for url in [
            "https://youtu.be/dQw4w9WgXcQ",
            "youtu.be/dQw4w9WgXcQ?t=30",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/v/dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube.com/live/dQw4w9WgXcQ?si=abc",
            "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ",
        ] {
            assert_eq!(parse_video_id(url).unwrap().as_str(), "dQw4w9WgXcQ", "{}", url);
        }
    }

    #[test]
    fn test_rejects_invalid_input() {
        for input in [
            "",
            "   ",
            "short",
            "https://vimeo.com/123456789",
            "https://www.youtube.com/playlist?list=PLrAXtmRdnEQy",
            "https://www.youtube.com/watch?v=tooShort",
            "https://youtu.be/",
            "not a url at all!",
        ] {
            let err = parse_video_id(input).unwrap_err();
            assert!(
                matches!(
                    err.downcast_ref::<SentimentToolError>(),
                    Some(SentimentToolError::InvalidVideoId(_))
                ),
                "{}",
                input
            );
        }
    }

    #[test]
    fn test_watch_url() {
        let id = VideoId::new("SCwN0_ZXwec").unwrap();
        assert_eq!(id.watch_url(), "https://www.youtube.com/watch?v=SCwN0_ZXwec");
        assert_eq!(id.to_string(), "SCwN0_ZXwec");
    }
}
