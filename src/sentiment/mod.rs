use serde::{Deserialize, Serialize};
use std::fmt;

pub mod roberta;

pub use roberta::RobertaSentimentModel;

use crate::{Result, SentimentToolError};

/// Sentiment classes reported by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl Sentiment {
    /// Order in which sample groups are presented
    pub const DISPLAY_ORDER: [Sentiment; 3] =
        [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
            Sentiment::Positive => "Positive",
        }
    }

    /// Map a raw model label onto a sentiment class.
    ///
    /// Older checkpoints emit `LABEL_0..LABEL_2`, newer ones the class names.
    pub fn from_label(label: &str) -> Result<Self> {
        match label.to_lowercase().as_str() {
            "label_0" | "negative" => Ok(Sentiment::Negative),
            "label_1" | "neutral" => Ok(Sentiment::Neutral),
            "label_2" | "positive" => Ok(Sentiment::Positive),
            _ => Err(SentimentToolError::UnknownLabel(label.to_string()).into()),
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single classifier decision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub sentiment: Sentiment,

    /// Probability of the winning class (0.0 to 1.0)
    pub score: f32,
}

/// Trait for models that assign a sentiment to a piece of text
#[cfg_attr(test, mockall::automock)]
pub trait SentimentClassifier: Send {
    fn classify(&self, text: &str) -> Result<Prediction>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_lookup() {
        assert_eq!(Sentiment::from_label("LABEL_0").unwrap(), Sentiment::Negative);
        assert_eq!(Sentiment::from_label("LABEL_1").unwrap(), Sentiment::Neutral);
        assert_eq!(Sentiment::from_label("LABEL_2").unwrap(), Sentiment::Positive);
        assert_eq!(Sentiment::from_label("positive").unwrap(), Sentiment::Positive);
        assert_eq!(Sentiment::from_label("Negative").unwrap(), Sentiment::Negative);
    }

    #[test]
    fn test_unknown_label() {
        let err = Sentiment::from_label("LABEL_3").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SentimentToolError>(),
            Some(SentimentToolError::UnknownLabel(label)) if label == "LABEL_3"
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Sentiment::Positive.to_string(), "Positive");
        assert_eq!(
            Sentiment::DISPLAY_ORDER.map(|s| s.as_str()),
            ["Positive", "Negative", "Neutral"]
        );
    }
}
