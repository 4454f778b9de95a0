//! HTML transcript generator
//!
//! The generated page is self-contained with embedded CSS.

use crate::core::models::SemesterRecord;
use crate::core::report::{ReportGenerator, TranscriptContext};
use std::error::Error;
use std::fmt::Write;

/// Embedded HTML transcript template
const HTML_TEMPLATE: &str = include_str!("../templates/transcript.html");

/// HTML transcript generator
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlReporter;

impl HtmlReporter {
    /// Create a new HTML reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn render_template(ctx: &TranscriptContext) -> String {
        let mut output = HTML_TEMPLATE.to_string();

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
        let mut html = String::from(
            "<h2>By Year</h2>\n<table>\n  <tr><th>Year</th><th>Units</th><th>QPI</th></tr>\n",
        );
        for (year, summary) in &ctx.years {
            let _ = writeln!(
                html,
                "  <tr><td>{year}</td><td class=\"num\">{:.1}</td><td class=\"num\">{}</td></tr>",
                summary.total_units,
                summary.display_qpi()
            );
        }
        html.push_str("</table>\n");
        html
    }

    fn semester_sections(ctx: &TranscriptContext) -> String {
        if ctx.semesters.is_empty() {
            return "<p class=\"muted\">No semesters recorded.</p>\n".to_string();
        }
        let mut html = String::new();
        for semester in &ctx.semesters {
            Self::semester_section(&mut html, semester);
        }
        html
    }

    fn semester_section(html: &mut String, semester: &SemesterRecord) {
        let status = if semester.is_completed {
            " <span class=\"completed\">completed</span>"
        } else {
            ""
        };
        let _ = writeln!(
            html,
            "<h3>{}{status}</h3>",
            escape_html(&semester.label())
        );

        if semester.grades.is_empty() {
            let _ = writeln!(html, "<p class=\"muted\">No grades recorded.</p>");
            return;
        }

        let _ = writeln!(html, "<table>");
        let _ = writeln!(
            html,
            "  <tr><th>Code</th><th>Title</th><th>Units</th><th>Grade</th><th>Letter</th><th>Points</th></tr>"
        );
        for grade in &semester.grades {
            let _ = writeln!(
                html,
                "  <tr><td>{}</td><td>{}</td><td class=\"num\">{:.1}</td><td class=\"num\">{:.1}</td><td>{}</td><td class=\"num\">{:.1}</td></tr>",
                escape_html(&grade.course_code),
                escape_html(&grade.course_title),
                grade.units,
                grade.numerical_grade,
                grade.letter_grade,
                grade.grade_point
            );
        }
        let _ = writeln!(
            html,
            "  <tr><th colspan=\"2\">Semester total</th><td class=\"num\">{:.1}</td><td></td><th>QPI</th><td class=\"num\">{:.2}</td></tr>",
            semester.total_units, semester.qpi
        );
        let _ = writeln!(html, "</table>");
    }
}

impl ReportGenerator for HtmlReporter {
    fn render(&self, ctx: &TranscriptContext) -> Result<String, Box<dyn Error>> {
        Ok(Self::render_template(ctx))
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
