//! QPI aggregation
//!
//! Pure functions over grade records. The store calls these after every
//! mutation to rebuild semester and academic-record totals, so derived
//! fields are never updated incrementally.

use crate::core::models::{AcademicRecord, GradeRecord, SemesterRecord};
use serde::{Deserialize, Serialize};

/// Units, quality points, and the resulting QPI for a set of grades
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QpiSummary {
    /// Σ(units × grade point) / Σ(units)
    pub qpi: f64,
    /// Σ(units)
    pub total_units: f64,
    /// Σ(units × grade point)
    pub total_quality_points: f64,
}

impl QpiSummary {
    /// Summarize a set of grades
    pub fn from_grades<'a, I>(grades: I) -> Self
    where
        I: IntoIterator<Item = &'a GradeRecord>,
    {
        let (total_units, total_quality_points) = grades
            .into_iter()
            .fold((0.0, 0.0), |(units, points), grade| {
                (units + grade.units, points + grade.quality_points())
            });
        Self::from_totals(total_units, total_quality_points)
    }

    /// Build a summary from precomputed totals; zero units yield a QPI of 0.0
    #[must_use]
    pub fn from_totals(total_units: f64, total_quality_points: f64) -> Self {
        let qpi = if total_units > 0.0 {
            total_quality_points / total_units
        } else {
            0.0
        };
        Self {
            qpi,
            total_units,
            total_quality_points,
        }
    }

    /// `None` when no units were counted
    #[must_use]
    pub fn non_empty(self) -> Option<Self> {
        (self.total_units > 0.0).then_some(self)
    }

    /// QPI rounded to two decimals for display
    #[must_use]
    pub fn display_qpi(&self) -> String {
        format!("{:.2}", self.qpi)
    }
}

/// Rebuild a semester's owned grades and totals from the flat grade list
pub fn recalculate_semester(semester: &mut SemesterRecord, grades: &[GradeRecord]) {
    semester.grades = grades
        .iter()
        .filter(|grade| grade.semester_id == semester.id)
        .cloned()
        .collect();
    let summary = QpiSummary::from_grades(&semester.grades);
    semester.total_units = summary.total_units;
    semester.total_quality_points = summary.total_quality_points;
    semester.qpi = summary.qpi;
}

/// Semesters of the record that count toward its cumulative totals
pub fn counted_semesters<'a>(
    record: &'a AcademicRecord,
    semesters: &'a [SemesterRecord],
) -> impl Iterator<Item = &'a SemesterRecord> + 'a {
    record
        .semesters
        .iter()
        .filter_map(move |id| semesters.iter().find(|s| s.id == *id))
        .filter(move |s| record.config.include_summer || !s.is_summer())
}

/// Cumulative summary over the counted semesters of a record
#[must_use]
pub fn cumulative_summary(record: &AcademicRecord, semesters: &[SemesterRecord]) -> QpiSummary {
    QpiSummary::from_grades(counted_semesters(record, semesters).flat_map(|s| s.grades.iter()))
}

/// Rebuild a record's cumulative totals from already-recalculated semesters
pub fn recalculate_record(record: &mut AcademicRecord, semesters: &[SemesterRecord]) {
    let summary = cumulative_summary(record, semesters);
    record.total_units = summary.total_units;
    record.total_quality_points = summary.total_quality_points;
    record.cumulative_qpi = summary.qpi;
}
