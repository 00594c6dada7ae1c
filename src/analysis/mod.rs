use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::sentiment::{Sentiment, SentimentClassifier};
use crate::transcript::{chunk_words, Transcript};
use crate::youtube::VideoId;
use crate::Result;

/// Classification of one transcript chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkResult {
    /// 1-based position of the chunk in the transcript
    pub index: usize,
    pub sentiment: Sentiment,
    pub score: f32,
    pub text: String,
}

/// Number of chunks per sentiment class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentCounts {
    pub fn get(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        }
    }

    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Neutral => self.neutral += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// Majority vote between positive and negative chunks; neutral chunks do not vote
    pub fn verdict(&self) -> Verdict {
        match self.positive.cmp(&self.negative) {
            std::cmp::Ordering::Greater => Verdict::Positive,
            std::cmp::Ordering::Less => Verdict::Negative,
            std::cmp::Ordering::Equal => Verdict::Tie,
        }
    }
}

/// Overall sentiment of a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Positive,
    Negative,
    /// Equal numbers of positive and negative chunks
    Tie,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Positive => write!(f, "Positive"),
            Verdict::Negative => write!(f, "Negative"),
            Verdict::Tie => write!(f, "Neutral (equal positive and negative)"),
        }
    }
}

/// A randomly drawn chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkSample {
    pub score: f32,
    pub text: String,
}

/// Random samples for one sentiment class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleGroup {
    pub sentiment: Sentiment,
    pub samples: Vec<ChunkSample>,
}

/// Full result of a transcript analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub video_id: VideoId,
    pub title: Option<String>,
    pub language: String,
    pub model_id: String,
    pub chunk_size: usize,
    pub chunks: Vec<ChunkResult>,
    pub counts: SentimentCounts,
    pub samples: Vec<SampleGroup>,
    pub verdict: Verdict,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub chunk_size: usize,
    pub samples_per_class: usize,
    pub seed: Option<u64>,

    /// Model identifier recorded in the report
    pub model_id: String,

    /// Hide the progress bar
    pub quiet: bool,
}

/// Chunks a transcript and classifies every chunk
pub struct Analyzer {
    classifier: Box<dyn SentimentClassifier>,
    options: AnalysisOptions,
}

impl Analyzer {
    pub fn new(classifier: Box<dyn SentimentClassifier>, options: AnalysisOptions) -> Self {
        Self {
            classifier,
            options,
        }
    }

    pub fn analyze(&self, transcript: &Transcript) -> Result<AnalysisReport> {
        let text = transcript.full_text();
        let chunks = chunk_words(&text, self.options.chunk_size)?;

        tracing::info!(
            "Analyzing {} chunks of up to {} words",
            chunks.len(),
            self.options.chunk_size
        );

        let progress = if self.options.quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(chunks.len() as u64)
        };
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            progress.set_style(style);
        }
        progress.set_message("Analyzing sentiment...");

        let mut counts = SentimentCounts::default();
        let mut results = Vec::with_capacity(chunks.len());

        for (i, chunk) in chunks.into_iter().enumerate() {
            let prediction = match self.classifier.classify(&chunk) {
                Ok(prediction) => prediction,
                Err(e) => {
                    progress.abandon_with_message("Sentiment analysis failed");
                    return Err(e.context(format!("Failed to classify chunk {}", i + 1)));
                }
            };

            counts.record(prediction.sentiment);
            results.push(ChunkResult {
                index: i + 1,
                sentiment: prediction.sentiment,
                score: prediction.score,
                text: chunk,
            });
            progress.inc(1);
        }

        progress.finish_with_message("Analysis complete");

        let mut rng = match self.options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let samples = sample_by_sentiment(&results, self.options.samples_per_class, &mut rng);
        let verdict = counts.verdict();

        tracing::info!(
            "Positive: {}, Negative: {}, Neutral: {} -> {}",
            counts.positive,
            counts.negative,
            counts.neutral,
            verdict
        );

        Ok(AnalysisReport {
            video_id: transcript.video_id.clone(),
            title: transcript.title.clone(),
            language: transcript.language.clone(),
            model_id: self.options.model_id.clone(),
            chunk_size: self.options.chunk_size,
            chunks: results,
            counts,
            samples,
            verdict,
            generated_at: Utc::now(),
        })
    }
}

/// Group chunks by sentiment and draw up to `per_class` distinct chunks from each group.
///
/// Groups are returned in display order (Positive, Negative, Neutral), empty groups included.
pub fn sample_by_sentiment(
    results: &[ChunkResult],
    per_class: usize,
    rng: &mut StdRng,
) -> Vec<SampleGroup> {
    let mut grouped: BTreeMap<Sentiment, Vec<&ChunkResult>> = BTreeMap::new();
    for result in results {
        grouped.entry(result.sentiment).or_default().push(result);
    }

    Sentiment::DISPLAY_ORDER
        .iter()
        .map(|&sentiment| {
            let group = grouped.remove(&sentiment).unwrap_or_default();
            let mut picked: Vec<&ChunkResult> =
                group.choose_multiple(rng, per_class).copied().collect();
            picked.shuffle(rng);

            SampleGroup {
                sentiment,
                samples: picked
                    .into_iter()
                    .map(|result| ChunkSample {
                        score: result.score,
                        text: result.text.clone(),
                    })
                    .collect(),
            }
        })
        .collect()
}
