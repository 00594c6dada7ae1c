//! yt-sentiment - A Rust CLI tool for sentiment analysis of YouTube transcripts
//!
//! This library fetches a video's transcript, splits it into fixed-size word chunks,
//! classifies every chunk with a pretrained sentiment model and aggregates the results
//! into a per-chunk listing, random samples per sentiment class and an overall verdict.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod output;
pub mod sentiment;
pub mod transcript;
pub mod utils;
pub mod youtube;

pub use analysis::{AnalysisOptions, AnalysisReport, Analyzer, Verdict};
pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use sentiment::{Prediction, Sentiment, SentimentClassifier};
pub use transcript::{Transcript, TranscriptSegment};
pub use youtube::{parse_video_id, VideoId};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to the sentiment tool
#[derive(thiserror::Error, Debug)]
pub enum SentimentToolError {
    #[error("Invalid YouTube video ID or URL: {0}")]
    InvalidVideoId(String),

    #[error("Transcript unavailable: {0}")]
    TranscriptUnavailable(String),

    #[error("Failed to load sentiment model: {0}")]
    ModelLoadFailed(String),

    #[error("Unknown sentiment label: {0}")]
    UnknownLabel(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
