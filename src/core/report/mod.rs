//! Transcript report generation
//!
//! Renders the store's semesters and QPI standing as Markdown or HTML.

pub mod formats;

use crate::core::models::{RecordConfig, SemesterRecord};
use crate::core::qpi::{self, QpiSummary};
use crate::core::storage::GradeStorage;
use crate::core::GradeStore;
use chrono::{DateTime, Utc};
use std::error::Error;
use std::path::Path;

pub use formats::{HtmlReporter, MarkdownReporter, ReportFormat};

/// Data context for transcript generation
///
/// Semesters are ordered by year level, then term.
#[derive(Debug, Clone)]
pub struct TranscriptContext<'a> {
    /// Record configuration (defaults when no record exists)
    pub config: RecordConfig,
    /// Semesters shown on the transcript
    pub semesters: Vec<&'a SemesterRecord>,
    /// Cumulative standing
    pub cumulative: QpiSummary,
    /// Per-year standing, `(year level, summary)` in ascending year order
    pub years: Vec<(u8, QpiSummary)>,
    /// Generation time
    pub generated_at: DateTime<Utc>,
}

impl<'a> TranscriptContext<'a> {
    /// Build a context from the store.
    ///
    /// With an academic record the transcript covers its member semesters
    /// and its cumulative totals; without one it covers every semester.
    #[must_use]
    pub fn from_store<S: GradeStorage>(store: &'a GradeStore<S>) -> Self {
        let (config, mut semesters, cumulative) = store.academic_record().map_or_else(
            || {
                let all: Vec<&SemesterRecord> = store.semesters().iter().collect();
                let summary = QpiSummary::from_grades(store.grades());
                (RecordConfig::default(), all, summary)
            },
            |record| {
                let summary = qpi::cumulative_summary(record, store.semesters());
                (record.config, store.record_semesters(), summary)
            },
        );
        semesters.sort_by_key(|s| (s.year_level, s.semester_type.ordinal()));

        let mut year_levels: Vec<u8> = semesters.iter().map(|s| s.year_level).collect();
        year_levels.dedup();
        let years = year_levels
            .into_iter()
            .map(|year| {
                let summary = QpiSummary::from_grades(
                    semesters
                        .iter()
                        .filter(|s| s.year_level == year)
                        .filter(|s| config.include_summer || !s.is_summer())
                        .flat_map(|s| s.grades.iter()),
                );
                (year, summary)
            })
            .collect();

        Self {
            config,
            semesters,
            cumulative,
            years,
            generated_at: Utc::now(),
        }
    }

    /// Number of grades across all shown semesters
    #[must_use]
    pub fn grade_count(&self) -> usize {
        self.semesters.iter().map(|s| s.grades.len()).sum()
    }

    /// Generation time formatted for display
    #[must_use]
    pub fn generated_label(&self) -> String {
        self.generated_at.format("%Y-%m-%d %H:%M UTC").to_string()
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report to a file
    ///
    /// # Errors
    /// Returns an error if report generation or file writing fails
    fn generate(&self, ctx: &TranscriptContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let content = self.render(ctx)?;
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(output_path, content)?;
        Ok(())
    }

    /// Generate report content as a string
    ///
    /// # Errors
    /// Returns an error if report generation fails
    fn render(&self, ctx: &TranscriptContext) -> Result<String, Box<dyn Error>>;
}
