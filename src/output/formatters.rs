use anyhow::Result;
use std::fmt::Write;

use crate::analysis::{AnalysisReport, Verdict};
use crate::sentiment::Sentiment;
use crate::transcript::Transcript;
use crate::utils::format_timestamp;

/// Options controlling which report sections are rendered
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Omit the chunk-by-chunk listing
    pub hide_chunks: bool,
}

fn sentiment_marker(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "✅",
        Sentiment::Negative => "❌",
        Sentiment::Neutral => "⚪",
    }
}

fn video_line(report: &AnalysisReport) -> String {
    match &report.title {
        Some(title) => format!("{} ({})", title, report.video_id),
        None => report.video_id.to_string(),
    }
}

/// Format the report as a console page
pub fn format_as_text(report: &AnalysisReport, options: RenderOptions) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "📺 YouTube Transcript Sentiment Analysis")?;
    writeln!(out, "Video: {}", video_line(report))?;
    writeln!(
        out,
        "Model: {} | Language: {} | Chunk size: {} words",
        report.model_id, report.language, report.chunk_size
    )?;

    if !options.hide_chunks {
        writeln!(out, "\n📘 Chunk-by-Chunk Sentiment")?;
        for chunk in &report.chunks {
            writeln!(
                out,
                "Chunk {} — {} (score: {:.3})",
                chunk.index, chunk.sentiment, chunk.score
            )?;
            writeln!(out, "➡️ {}", chunk.text)?;
        }
    }

    writeln!(out, "\n🎯 Sampled Sentiment Examples (Random)")?;
    for group in &report.samples {
        writeln!(out, "{} Samples:", group.sentiment)?;
        for (idx, sample) in group.samples.iter().enumerate() {
            writeln!(out, "{}. Score: {:.3}", idx + 1, sample.score)?;
            writeln!(out, "   `{}`", sample.text)?;
        }
    }

    writeln!(out, "\n📊 Overall Sentiment Analysis")?;
    write_counts(&mut out, report)?;
    write!(
        out,
        "🧠 Final Overall Sentiment (excluding neutral): {}",
        report.verdict
    )?;

    Ok(out)
}

fn write_counts(out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
    for sentiment in Sentiment::DISPLAY_ORDER {
        let suffix = if sentiment == Sentiment::Neutral {
            " (excluded from overall)"
        } else {
            ""
        };
        writeln!(
            out,
            "{} {}: {} chunks{}",
            sentiment_marker(sentiment),
            sentiment,
            report.counts.get(sentiment),
            suffix
        )?;
    }

    Ok(())
}

/// Format the report as a Markdown document
pub fn format_as_markdown(report: &AnalysisReport, options: RenderOptions) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "# 📺 YouTube Transcript Sentiment Analysis\n")?;
    writeln!(
        out,
        "Video: [{}]({})  ",
        video_line(report),
        report.video_id.watch_url()
    )?;
    writeln!(
        out,
        "Model: `{}` · Language: `{}` · Chunk size: {} words",
        report.model_id, report.language, report.chunk_size
    )?;

    if !options.hide_chunks {
        writeln!(out, "\n## 📘 Chunk-by-Chunk Sentiment\n")?;
        for chunk in &report.chunks {
            writeln!(
                out,
                "**Chunk {}** — *{}* (score: {:.3})  ",
                chunk.index, chunk.sentiment, chunk.score
            )?;
            writeln!(out, "➡️ {}\n", chunk.text)?;
        }
    }

    writeln!(out, "\n## 🎯 Sampled Sentiment Examples (Random)")?;
    for group in &report.samples {
        writeln!(out, "\n**{} Samples:**\n", group.sentiment)?;
        for (idx, sample) in group.samples.iter().enumerate() {
            writeln!(out, "{}. Score: {:.3} `{}`", idx + 1, sample.score, sample.text)?;
        }
    }

    writeln!(out, "\n## 📊 Overall Sentiment Analysis\n")?;
    let mut counts = String::new();
    write_counts(&mut counts, report)?;
    for line in counts.lines() {
        writeln!(out, "- {}", line)?;
    }
    write!(
        out,
        "\n> 🧠 Final Overall Sentiment (excluding neutral): **{}**",
        report.verdict
    )?;

    Ok(out)
}

/// Format the report as pretty-printed JSON
pub fn format_as_json(report: &AnalysisReport, options: RenderOptions) -> Result<String> {
    let mut value = serde_json::to_value(report)?;
    if options.hide_chunks {
        if let Some(object) = value.as_object_mut() {
            object.remove("chunks");
        }
    }

    Ok(serde_json::to_string_pretty(&value)?)
}

/// Format a transcript, optionally prefixing each segment with its start time
pub fn format_transcript(transcript: &Transcript, timestamps: bool) -> String {
    if !timestamps {
        return transcript.full_text();
    }

    transcript
        .segments
        .iter()
        .map(|segment| format!("[{}] {}", format_timestamp(segment.start), segment.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Short, styled verdict line for terminals
pub fn verdict_banner(verdict: Verdict) -> String {
    let text = format!("Overall sentiment: {}", verdict);
    match verdict {
        Verdict::Positive => console::style(text).green().bold().to_string(),
        Verdict::Negative => console::style(text).red().bold().to_string(),
        Verdict::Tie => console::style(text).yellow().bold().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ChunkResult, ChunkSample, SampleGroup, SentimentCounts};
    use crate::transcript::TranscriptSegment;
    use crate::youtube::VideoId;

    fn report() -> AnalysisReport {
        AnalysisReport {
            video_id: VideoId::new("SCwN0_ZXwec").unwrap(),
            title: Some("Demo".to_string()),
            language: "en".to_string(),
            model_id: "cardiffnlp/twitter-roberta-base-sentiment".to_string(),
            chunk_size: 10,
            chunks: vec![
                ChunkResult {
                    index: 1,
                    sentiment: Sentiment::Positive,
                    score: 0.91234,
                    text: "what a great day".to_string(),
                },
                ChunkResult {
                    index: 2,
                    sentiment: Sentiment::Neutral,
                    score: 0.6,
                    text: "the meeting is at noon".to_string(),
                },
            ],
            counts: SentimentCounts {
                positive: 1,
                negative: 0,
                neutral: 1,
            },
            samples: vec![
                SampleGroup {
                    sentiment: Sentiment::Positive,
                    samples: vec![ChunkSample {
                        score: 0.91234,
                        text: "what a great day".to_string(),
                    }],
                },
                SampleGroup {
                    sentiment: Sentiment::Negative,
                    samples: vec![],
                },
                SampleGroup {
                    sentiment: Sentiment::Neutral,
                    samples: vec![ChunkSample {
                        score: 0.6,
                        text: "the meeting is at noon".to_string(),
                    }],
                },
            ],
            verdict: Verdict::Positive,
            generated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_text_report_sections() {
        let text = format_as_text(&report(), RenderOptions::default()).unwrap();

        assert!(text.contains("Video: Demo (SCwN0_ZXwec)"));
        assert!(text.contains("Chunk 1 — Positive (score: 0.912)"));
        assert!(text.contains("➡️ what a great day"));
        assert!(text.contains("Positive Samples:\n1. Score: 0.912\n   `what a great day`"));
        assert!(text.contains("Negative Samples:\nNeutral Samples:"));
        assert!(text.contains("✅ Positive: 1 chunks"));
        assert!(text.contains("❌ Negative: 0 chunks"));
        assert!(text.contains("⚪ Neutral: 1 chunks (excluded from overall)"));
        assert!(text.ends_with("🧠 Final Overall Sentiment (excluding neutral): Positive"));
    }

    #[test]
    fn test_hide_chunks() {
        let text = format_as_text(&report(), RenderOptions { hide_chunks: true }).unwrap();
        assert!(!text.contains("Chunk-by-Chunk"));
        assert!(text.contains("Sampled Sentiment Examples"));
    }

    #[test]
    fn test_markdown_report() {
        let md = format_as_markdown(&report(), RenderOptions::default()).unwrap();
        assert!(md.starts_with("# 📺 YouTube Transcript Sentiment Analysis"));
        assert!(md.contains("https://www.youtube.com/watch?v=SCwN0_ZXwec"));
        assert!(md.contains("**Chunk 2** — *Neutral* (score: 0.600)"));
        assert!(md.contains("- ⚪ Neutral: 1 chunks (excluded from overall)"));
        assert!(md.contains("**Positive**"));
    }

    #[test]
    fn test_json_report() {
        let json = format_as_json(&report(), RenderOptions::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["video_id"], "SCwN0_ZXwec");
        assert_eq!(value["verdict"], "Positive");
        assert_eq!(value["counts"]["neutral"], 1);
        assert_eq!(value["chunks"][1]["sentiment"], "Neutral");
    }

    #[test]
    fn test_json_report_hide_chunks() {
        let json = format_as_json(&report(), RenderOptions { hide_chunks: true }).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("chunks").is_none());
        assert_eq!(value["counts"]["positive"], 1);
        assert_eq!(value["samples"][0]["samples"][0]["text"], "what a great day");
    }

    #[test]
    fn test_format_transcript() {
        let transcript = Transcript {
            video_id: VideoId::new("SCwN0_ZXwec").unwrap(),
            title: None,
            language: "en".to_string(),
            is_generated: true,
            segments: vec![
                TranscriptSegment {
                    start: 0.0,
                    duration: 2.0,
                    text: "hello".to_string(),
                },
                TranscriptSegment {
                    start: 65.5,
                    duration: 2.0,
                    text: "world".to_string(),
                },
            ],
        };

        assert_eq!(format_transcript(&transcript, false), "hello world");
        assert_eq!(
            format_transcript(&transcript, true),
            "[00:00] hello\n[01:05] world"
        );
    }
}
