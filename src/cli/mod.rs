use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[command(
    name = "ytsentiment",
    about = "yt-sentiment - Chunk-level sentiment analysis of YouTube transcripts",
    version,
    long_about = "Fetches a YouTube video's transcript, splits it into fixed-size word chunks, classifies each chunk with a pretrained sentiment model and reports per-chunk labels, random samples per class and an overall verdict."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (defaults to ./config.yaml or the user config directory)
    #[arg(long, global = true, value_name = "FILE", env = "YT_SENTIMENT_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze the sentiment of a video's transcript
    Analyze {
        /// YouTube video ID or URL (watch, youtu.be, shorts, embed, live)
        #[arg(value_name = "VIDEO_ID_OR_URL")]
        input: String,

        /// Words per classified chunk (default from config: 10)
        #[arg(long, value_name = "WORDS")]
        chunk_size: Option<usize>,

        /// Maximum random samples shown per sentiment class (default from config: 5)
        #[arg(long, value_name = "COUNT")]
        samples: Option<usize>,

        /// Seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,

        /// Preferred caption language; repeat for fallbacks (default from config: en)
        #[arg(short, long = "language", value_name = "LANG")]
        languages: Vec<String>,

        /// Only use manually created captions
        #[arg(long)]
        no_auto_captions: bool,

        /// Output format (default from config: text)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Skip the chunk-by-chunk listing
        #[arg(long)]
        hide_chunks: bool,
    },

    /// Fetch and print a video's transcript
    Transcript {
        /// YouTube video ID or URL
        #[arg(value_name = "VIDEO_ID_OR_URL")]
        input: String,

        /// Preferred caption language; repeat for fallbacks
        #[arg(short, long = "language", value_name = "LANG")]
        languages: Vec<String>,

        /// Prefix each segment with its start time
        #[arg(long)]
        timestamps: bool,
    },

    /// Show configuration or where to edit it
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}

#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum OutputFormat {
    /// Console report
    Text,
    /// Markdown document
    Markdown,
    /// JSON with every chunk result
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            other => anyhow::bail!("Unknown output format: {}", other),
        }
    }
}
