use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yt_sentiment::analysis::{AnalysisOptions, Analyzer};
use yt_sentiment::cli::{Cli, Commands};
use yt_sentiment::config::{AnalyzeOverrides, Config};
use yt_sentiment::output::{self, RenderOptions};
use yt_sentiment::sentiment::RobertaSentimentModel;
use yt_sentiment::utils;
use yt_sentiment::youtube::{parse_video_id, TranscriptSource, YtDlpTranscriptSource};

fn spinner(message: &'static str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        progress.set_style(style);
    }
    progress.set_message(message);
    progress.enable_steady_tick(Duration::from_millis(120));
    progress
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "yt_sentiment=debug"
    } else {
        "yt_sentiment=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::config_path()?,
    };
    let mut config = Config::load_from(&config_path).await?;

    match cli.command {
        Commands::Analyze {
            input,
            chunk_size,
            samples,
            seed,
            languages,
            no_auto_captions,
            format,
            output: output_path,
            hide_chunks,
        } => {
            let video_id = parse_video_id(&input)?;

            let format = config.apply_analyze_overrides(AnalyzeOverrides {
                chunk_size,
                samples_per_class: samples,
                seed,
                languages,
                no_auto_captions,
                format,
            })?;

            // Check for required external dependencies (non-fatal)
            let missing_deps = utils::check_dependencies(&config.transcript.yt_dlp_path).await;
            if !missing_deps.is_empty() {
                eprintln!("⚠️  Dependency check warnings:");
                for dep in missing_deps {
                    eprintln!("   • {}", dep);
                }
            }

            tracing::info!("Starting sentiment analysis for video: {}", video_id);

            let source = YtDlpTranscriptSource::new(&config.transcript);
            let progress = spinner("Fetching transcript...", cli.quiet);
            let transcript = source.fetch(&video_id).await;
            progress.finish_and_clear();
            let transcript = transcript?;

            if let Some(last) = transcript.segments.last() {
                tracing::info!(
                    "Transcript via {}: {} segments, {} words, {}",
                    source.source_name(),
                    transcript.segments.len(),
                    transcript.word_count(),
                    utils::format_duration(last.start + last.duration)
                );
            }

            let model_config = config.model.clone();
            let progress = spinner("Loading sentiment model...", cli.quiet);
            let model =
                tokio::task::spawn_blocking(move || RobertaSentimentModel::load(&model_config))
                    .await?;
            progress.finish_and_clear();
            let model = model?;
            tracing::debug!("Model {} running on {:?}", model.model_id(), model.device());

            let options = AnalysisOptions {
                chunk_size: config.analysis.chunk_size,
                samples_per_class: config.analysis.samples_per_class,
                seed: config.analysis.seed,
                model_id: config.model.model_id.clone(),
                quiet: cli.quiet,
            };
            let analyzer = Analyzer::new(Box::new(model), options);
            let report =
                tokio::task::spawn_blocking(move || analyzer.analyze(&transcript)).await??;

            let render_options = RenderOptions { hide_chunks };
            match output_path {
                Some(path) => {
                    output::save_to_file(&report, &path, &format, render_options).await?;
                    println!("Report saved to: {}", path.display());
                    println!("{}", output::verdict_banner(report.verdict));
                }
                None => {
                    output::print_to_console(&report, &format, render_options)?;
                }
            }
        }
        Commands::Transcript {
            input,
            languages,
            timestamps,
        } => {
            let video_id = parse_video_id(&input)?;
            if !languages.is_empty() {
                config.transcript.languages = languages;
            }

            let source = YtDlpTranscriptSource::new(&config.transcript);
            let progress = spinner("Fetching transcript...", cli.quiet);
            let transcript = source.fetch(&video_id).await;
            progress.finish_and_clear();
            let transcript = transcript?;

            println!("{}", output::format_transcript(&transcript, timestamps));
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                Config::print_location(&config_path);
            }
        }
    }

    Ok(())
}
