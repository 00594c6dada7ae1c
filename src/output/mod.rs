use anyhow::Result;
use std::path::Path;

use crate::analysis::AnalysisReport;
use crate::cli::OutputFormat;

pub mod formatters;

pub use formatters::*;

fn render(report: &AnalysisReport, format: &OutputFormat, options: RenderOptions) -> Result<String> {
    let content = match format {
        OutputFormat::Text => format_as_text(report, options)?,
        OutputFormat::Markdown => format_as_markdown(report, options)?,
        OutputFormat::Json => format_as_json(report, options)?,
    };

    Ok(content)
}

/// Save analysis report to file
pub async fn save_to_file(
    report: &AnalysisReport,
    path: &Path,
    format: &OutputFormat,
    options: RenderOptions,
) -> Result<()> {
    let content = render(report, format, options)?;
    fs_err::write(path, content)?;
    Ok(())
}

/// Print analysis report to console
pub fn print_to_console(
    report: &AnalysisReport,
    format: &OutputFormat,
    options: RenderOptions,
) -> Result<()> {
    let content = render(report, format, options)?;
    println!("{}", content);
    Ok(())
}
