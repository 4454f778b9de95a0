//! Markdown transcript generator
//!
//! Renders well in GitHub, GitLab, and VS Code previews.

use crate::core::models::SemesterRecord;
use crate::core::report::{ReportGenerator, TranscriptContext};
use std::error::Error;
use std::fmt::Write;

/// Embedded Markdown transcript template
const MARKDOWN_TEMPLATE: &str = include_str!("../templates/transcript.md");

/// Markdown transcript generator
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn render_template(ctx: &TranscriptContext) -> String {
        let mut output = MARKDOWN_TEMPLATE.to_string();

        output = output.replace("{{generated_at}}", &ctx.generated_label());
        output = output.replace("{{total_years}}", &ctx.config.total_years.to_string());
        output = output.replace(
            "{{include_summer}}",
            if ctx.config.include_summer { "yes" } else { "no" },
        );
        output = output.replace("{{semester_count}}", &ctx.semesters.len().to_string());
        output = output.replace(
            "{{total_units}}",
            &format!("{:.1}", ctx.cumulative.total_units),
        );
        output = output.replace(
            "{{total_quality_points}}",
            &format!("{:.2}", ctx.cumulative.total_quality_points),
        );
        output = output.replace("{{cumulative_qpi}}", &ctx.cumulative.display_qpi());
        output = output.replace("{{year_summary}}", &Self::year_table(ctx));
        output = output.replace("{{semesters}}", &Self::semester_sections(ctx));

        output
    }

    fn year_table(ctx: &TranscriptContext) -> String {
        if ctx.years.len() < 2 {
            return String::new();
        }
        let mut md = String::from("## By Year\n\n| Year | Units | QPI |\n|---|---:|---:|\n");
        for (year, summary) in &ctx.years {
            let _ = writeln!(
                md,
                "| {year} | {:.1} | {} |",
                summary.total_units,
                summary.display_qpi()
            );
        }
        md.push('\n');
        md
    }

    fn semester_sections(ctx: &TranscriptContext) -> String {
        if ctx.semesters.is_empty() {
            return "_No semesters recorded._\n".to_string();
        }
        let mut md = String::new();
        for semester in &ctx.semesters {
            Self::semester_section(&mut md, semester);
        }
        md
    }

    fn semester_section(md: &mut String, semester: &SemesterRecord) {
        let status = if semester.is_completed { " (completed)" } else { "" };
        let _ = writeln!(md, "### {}{status}\n", semester.label());

        if semester.grades.is_empty() {
            let _ = writeln!(md, "_No grades recorded._\n");
            return;
        }

        let _ = writeln!(md, "| Code | Title | Units | Grade | Letter | Points |");
        let _ = writeln!(md, "|---|---|---:|---:|:---:|---:|");
        for grade in &semester.grades {
            let _ = writeln!(
                md,
                "| {} | {} | {:.1} | {:.1} | {} | {:.1} |",
                escape_cell(&grade.course_code),
                escape_cell(&grade.course_title),
                grade.units,
                grade.numerical_grade,
                grade.letter_grade,
                grade.grade_point
            );
        }
        let _ = writeln!(
            md,
            "\n**Units:** {:.1} · **Quality points:** {:.2} · **QPI:** {:.2}\n",
            semester.total_units, semester.total_quality_points, semester.qpi
        );
    }
}

impl ReportGenerator for MarkdownReporter {
    fn render(&self, ctx: &TranscriptContext) -> Result<String, Box<dyn Error>> {
        Ok(Self::render_template(ctx))
    }
}

/// Keep pipes inside table cells from splitting columns
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}
