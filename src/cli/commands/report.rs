//! Report command handler
//!
//! Renders the stored transcript as Markdown or HTML.

use super::open_store;
use qpi_tracker::config::Config;
use qpi_tracker::core::report::{
    HtmlReporter, MarkdownReporter, ReportFormat, ReportGenerator, TranscriptContext,
};
use qpi_tracker::{error, info};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Base file name used when no output path is given
const DEFAULT_REPORT_NAME: &str = "transcript";

/// Run the report command.
///
/// # Arguments
/// * `format_str` - Report format (markdown, md, html)
/// * `output_file` - Optional output path; defaults to `reports_dir/transcript.<ext>`
/// * `config` - Configuration with the data and reports directories
pub fn run(format_str: &str, output_file: Option<&Path>, config: &Config) {
    match generate_report(format_str, output_file, config) {
        Ok(path) => println!("✓ Report generated: {}", path.display()),
        Err(err) => {
            error!("Report generation failed: {err}");
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

fn generate_report(
    format_str: &str,
    output_file: Option<&Path>,
    config: &Config,
) -> Result<PathBuf, String> {
    let format = ReportFormat::from_str(format_str).map_err(|e| format!("✗ {e}"))?;
    let output_path = output_file.map_or_else(
        || default_output_path(&config.paths.reports_dir, format),
        Path::to_path_buf,
    );

    let store = open_store(config)?;
    let ctx = TranscriptContext::from_store(&store);
    info!(
        "Rendering {format} transcript: {} semester(s), {} grade(s)",
        ctx.semesters.len(),
        ctx.grade_count()
    );

    let generator: Box<dyn ReportGenerator> = match format {
        ReportFormat::Markdown => Box::new(MarkdownReporter::new()),
        ReportFormat::Html => Box::new(HtmlReporter::new()),
    };
    generator
        .generate(&ctx, &output_path)
        .map_err(|e| format!("✗ Failed to write {}: {e}", output_path.display()))?;

    Ok(output_path)
}

fn default_output_path(reports_dir: &str, format: ReportFormat) -> PathBuf {
    PathBuf::from(reports_dir).join(format!("{DEFAULT_REPORT_NAME}.{}", format.extension()))
}
