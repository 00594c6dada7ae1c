use serde::{Deserialize, Serialize};

use crate::youtube::VideoId;
use crate::{Result, SentimentToolError};

/// Fetched transcript with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Video the transcript belongs to
    pub video_id: VideoId,

    /// Video title if available
    pub title: Option<String>,

    /// Language code of the caption track
    pub language: String,

    /// Whether the captions were generated by speech recognition
    pub is_generated: bool,

    /// Ordered, timestamped text segments
    pub segments: Vec<TranscriptSegment>,
}

/// Individual transcript segment with timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start time in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,

    /// Segment text
    pub text: String,
}

impl Transcript {
    /// All segment texts joined with single spaces
    pub fn full_text(&self) -> String {
        self.segments
            .iter()
            .map(|segment| segment.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn word_count(&self) -> usize {
        self.segments
            .iter()
            .map(|segment| segment.text.split_whitespace().count())
            .sum()
    }
}

/// Split text into consecutive, non-overlapping windows of `max_words` words.
///
/// The final chunk may be shorter. Text without any words yields no chunks.
pub fn chunk_words(text: &str, max_words: usize) -> Result<Vec<String>> {
    if max_words == 0 {
        return Err(
            SentimentToolError::ConfigError("chunk size must be at least 1".to_string()).into(),
        );
    }

    let words: Vec<&str> = text.split_whitespace().collect();

    Ok(words
        .chunks(max_words)
        .map(|window| window.join(" "))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(start: f64, text: &str) -> TranscriptSegment {
        TranscriptSegment {
            start,
            duration: 1.0,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_full_text_and_word_count() {
        let transcript = Transcript {
            video_id: VideoId::new("SCwN0_ZXwec").unwrap(),
            title: None,
            language: "en".to_string(),
            is_generated: false,
            segments: vec![segment(0.0, "hello there"), segment(1.0, "general  kenobi")],
        };

        assert_eq!(transcript.full_text(), "hello there general  kenobi");
        assert_eq!(transcript.word_count(), 4);
    }

    #[test]
    fn test_chunk_words() {
        let text = (1..=23).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ");
        let chunks = chunk_words(&text, 10).unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], "w1 w2 w3 w4 w5 w6 w7 w8 w9 w10");
        assert_eq!(chunks[2], "w21 w22 w23");
    }

    #[test]
    fn test_chunk_words_collapses_whitespace() {
        let chunks = chunk_words("  a\tb\n\nc   d ", 3).unwrap();
        assert_eq!(chunks, vec!["a b c", "d"]);
    }

    #[test]
    fn test_chunk_words_edge_cases() {
        assert!(chunk_words("", 10).unwrap().is_empty());
        assert!(chunk_words("   \n ", 10).unwrap().is_empty());
        assert_eq!(chunk_words("exactly ten words here", 4).unwrap().len(), 1);
        assert!(chunk_words("anything", 0).is_err());
    }
}
