use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::process::Stdio;
use tokio::process::Command;

use super::VideoId;
use crate::config::TranscriptConfig;
use crate::transcript::{Transcript, TranscriptSegment};
use crate::{Result, SentimentToolError};

/// Caption format requested from YouTube's timedtext endpoint
const CAPTION_FORMAT: &str = "json3";

/// Trait for retrieving a transcript for a video
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch the full transcript for a video
    async fn fetch(&self, video: &VideoId) -> Result<Transcript>;

    /// Get the name of this source
    fn source_name(&self) -> &'static str;
}

/// Caption track chosen from the video metadata
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionTrack {
    pub language: String,
    pub url: String,
    pub is_generated: bool,
}

/// Transcript source backed by yt-dlp metadata and the captions it points to
pub struct YtDlpTranscriptSource {
    yt_dlp_path: String,
    languages: Vec<String>,
    allow_auto_captions: bool,
    client: reqwest::Client,
}

impl YtDlpTranscriptSource {
    pub fn new(config: &TranscriptConfig) -> Self {
        Self {
            yt_dlp_path: config.yt_dlp_path.clone(),
            languages: config.languages.clone(),
            allow_auto_captions: config.allow_auto_captions,
            client: reqwest::Client::new(),
        }
    }

    /// Check if yt-dlp is available
    pub async fn check_availability(&self) -> bool {
        crate::utils::check_command_available(&self.yt_dlp_path).await
    }

    /// Get video metadata, including caption track listings, using yt-dlp
    async fn get_video_info(&self, video: &VideoId) -> Result<Value> {
        tracing::debug!("Fetching video metadata for: {}", video);

        let output = Command::new(&self.yt_dlp_path)
            .args([
                "--dump-json",
                "--skip-download",
                "--no-playlist",
                &video.watch_url(),
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .with_context(|| format!("Failed to run {}", self.yt_dlp_path))?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("yt-dlp failed: {}", error.trim());
        }

        let json_str = String::from_utf8(output.stdout)?;
        let info: Value =
            serde_json::from_str(&json_str).context("Failed to parse yt-dlp metadata")?;

        Ok(info)
    }

    async fn download_captions(&self, track: &CaptionTrack) -> Result<String> {
        tracing::info!(
            "Downloading {} captions ({})",
            track.language,
            if track.is_generated { "generated" } else { "manual" }
        );

        let response = self
            .client
            .get(&track.url)
            .send()
            .await
            .context("Failed to request captions")?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to download captions: HTTP {}", response.status());
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl TranscriptSource for YtDlpTranscriptSource {
    async fn fetch(&self, video: &VideoId) -> Result<Transcript> {
        if !self.check_availability().await {
            anyhow::bail!(
                "yt-dlp is not available. Please install it: https://github.com/yt-dlp/yt-dlp"
            );
        }

        let info = self.get_video_info(video).await?;
        let track = select_track(&info, &self.languages, self.allow_auto_captions)?;
        let body = self.download_captions(&track).await?;
        let segments = parse_json3(&body)?;

        tracing::info!("Fetched {} transcript segments", segments.len());

        Ok(Transcript {
            video_id: video.clone(),
            title: info["title"].as_str().map(|s| s.to_string()),
            language: track.language,
            is_generated: track.is_generated,
            segments,
        })
    }

    fn source_name(&self) -> &'static str {
        "yt-dlp"
    }
}

/// Pick the best caption track from yt-dlp metadata.
///
/// Languages are tried in preference order; for each one a manually created track wins
/// over a generated one. Only tracks offering the json3 format qualify.
pub fn select_track(
    info: &Value,
    languages: &[String],
    allow_auto_captions: bool,
) -> Result<CaptionTrack> {
    let manual = info["subtitles"].as_object();
    let generated = if allow_auto_captions {
        info["automatic_captions"].as_object()
    } else {
        None
    };

    for wanted in languages {
        for (tracks, is_generated) in [(manual, false), (generated, true)] {
            let Some(tracks) = tracks else { continue };

            let mut keys: Vec<&String> = tracks
                .keys()
                .filter(|code| language_matches(code, wanted))
                .collect();
            // exact match first, then regional variants in a stable order
            let wanted_lower = wanted.to_lowercase();
            keys.sort_by_cached_key(|code| {
                (code.to_lowercase() != wanted_lower, code.to_string())
            });

            for code in keys {
                if let Some(url) = json3_url(&tracks[code.as_str()]) {
                    return Ok(CaptionTrack {
                        language: code.clone(),
                        url,
                        is_generated,
                    });
                }
            }
        }
    }

    let mut available: Vec<String> = manual
        .into_iter()
        .chain(generated)
        .flat_map(|tracks| tracks.keys().cloned())
        .collect();
    available.sort();
    available.dedup();

    Err(SentimentToolError::TranscriptUnavailable(format!(
        "no captions for languages [{}] (available: [{}])",
        languages.join(", "),
        available.join(", ")
    ))
    .into())
}

fn language_matches(code: &str, wanted: &str) -> bool {
    let code = code.to_lowercase();
    let wanted = wanted.to_lowercase();
    code == wanted || code.split('-').next() == Some(wanted.as_str())
}

fn json3_url(formats: &Value) -> Option<String> {
    formats
        .as_array()?
        .iter()
        .find(|format| format["ext"].as_str() == Some(CAPTION_FORMAT))
        .and_then(|format| format["url"].as_str())
        .map(|url| url.to_string())
}

#[derive(Debug, Deserialize)]
struct Json3Captions {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: Option<u64>,
    #[serde(default)]
    segs: Option<Vec<Json3Seg>>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

/// Parse a json3 caption document into ordered transcript segments
pub fn parse_json3(body: &str) -> Result<Vec<TranscriptSegment>> {
    let captions: Json3Captions =
        serde_json::from_str(body).context("Failed to parse json3 captions")?;

    let segments = captions
        .events
        .into_iter()
        .filter_map(|event| {
            let segs = event.segs?;
            let text: String = segs.iter().map(|seg| seg.utf8.as_str()).collect();
            let text = text.replace('\n', " ").trim().to_string();
            if text.is_empty() {
                return None;
            }

            Some(TranscriptSegment {
                start: event.t_start_ms as f64 / 1000.0,
                duration: event.d_duration_ms.unwrap_or(0) as f64 / 1000.0,
                text,
            })
        })
        .collect();

    Ok(segments)
}
