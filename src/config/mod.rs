use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;
use crate::SentimentToolError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sentiment model settings
    pub model: ModelConfig,

    /// Transcript retrieval settings
    pub transcript: TranscriptConfig,

    /// Chunking and sampling settings
    pub analysis: AnalysisConfig,

    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Hugging Face Hub model repository
    pub model_id: String,

    /// Repository revision (branch, tag or commit)
    pub revision: String,

    /// Run inference on CUDA when available
    pub use_gpu: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    /// Path to the yt-dlp executable
    pub yt_dlp_path: String,

    /// Caption languages in order of preference
    pub languages: Vec<String>,

    /// Fall back to automatically generated captions
    pub allow_auto_captions: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Words per classified chunk
    pub chunk_size: usize,

    /// Maximum random samples shown per sentiment class
    pub samples_per_class: usize,

    /// Seed for reproducible sampling
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default output format
    pub default_output_format: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_id: "cardiffnlp/twitter-roberta-base-sentiment".to_string(),
            revision: "main".to_string(),
            use_gpu: false,
        }
    }
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            yt_dlp_path: "yt-dlp".to_string(),
            languages: vec!["en".to_string()],
            allow_auto_captions: true,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            chunk_size: 10,
            samples_per_class: 5,
            seed: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_output_format: "text".to_string(),
        }
    }
}

/// Command-line values that take precedence over the configuration file
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOverrides {
    pub chunk_size: Option<usize>,
    pub samples_per_class: Option<usize>,
    pub seed: Option<u64>,
    pub languages: Vec<String>,
    pub no_auto_captions: bool,
    pub format: Option<OutputFormat>,
}

impl Config {
    /// Load configuration from a specific file, creating it with defaults if missing
    pub async fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = fs_err::read_to_string(config_path)
                .context("Failed to read config file")?;

            let config: Config = serde_yaml::from_str(&content)
                .context("Failed to parse config file")?;

            config.validate()?;
            Ok(config)
        } else {
            tracing::debug!("Writing default config to {}", config_path.display());
            let config = Self::default();
            config.save_to(config_path).await?;
            Ok(config)
        }
    }

    /// Save configuration to a specific file
    pub async fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(config_path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("yt-sentiment").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.model_id.trim().is_empty() {
            return Err(SentimentToolError::ConfigError("model.model_id must be set".to_string()).into());
        }

        if self.analysis.chunk_size == 0 {
            return Err(SentimentToolError::ConfigError(
                "analysis.chunk_size must be at least 1".to_string(),
            )
            .into());
        }

        if self.transcript.languages.is_empty() {
            return Err(SentimentToolError::ConfigError(
                "transcript.languages must list at least one language".to_string(),
            )
            .into());
        }

        Ok(())
    }

    /// Merge command-line values into this configuration, validate the result and
    /// resolve the output format (falling back to `app.default_output_format`)
    pub fn apply_analyze_overrides(&mut self, overrides: AnalyzeOverrides) -> Result<OutputFormat> {
        if let Some(chunk_size) = overrides.chunk_size {
            self.analysis.chunk_size = chunk_size;
        }
        if let Some(samples) = overrides.samples_per_class {
            self.analysis.samples_per_class = samples;
        }
        if overrides.seed.is_some() {
            self.analysis.seed = overrides.seed;
        }
        if !overrides.languages.is_empty() {
            self.transcript.languages = overrides.languages;
        }
        if overrides.no_auto_captions {
            self.transcript.allow_auto_captions = false;
        }
        self.validate()?;

        match overrides.format {
            Some(format) => Ok(format),
            None => self
                .app
                .default_output_format
                .parse::<OutputFormat>()
                .context("Invalid app.default_output_format in config"),
        }
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Model: {} ({})", self.model.model_id, self.model.revision);
        println!("  Use GPU: {}", self.model.use_gpu);
        println!("  yt-dlp: {}", self.transcript.yt_dlp_path);
        println!("  Languages: {}", self.transcript.languages.join(", "));
        println!("  Auto Captions: {}", self.transcript.allow_auto_captions);
        println!("  Chunk Size: {} words", self.analysis.chunk_size);
        println!("  Samples Per Class: {}", self.analysis.samples_per_class);
        if let Some(seed) = self.analysis.seed {
            println!("  Seed: {}", seed);
        }
        println!("  Default Format: {}", self.app.default_output_format);
    }

    /// Point the user at the file to edit
    pub fn print_location(config_path: &Path) {
        println!("Edit the configuration file at:");
        println!("  {}", config_path.display());
    }
}
