//! Grade model

use crate::core::grading::{self, LetterGrade};
use crate::core::models::SemesterId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a grade record
pub type GradeId = Uuid;

/// A graded course taken in one semester
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRecord {
    /// Unique identifier
    pub id: GradeId,

    /// Catalog identifier of the course (e.g., "cs-2510-2024")
    pub course_id: String,

    /// Course code (e.g., "CS 21")
    pub course_code: String,

    /// Course title (e.g., "Data Structures")
    pub course_title: String,

    /// Credit units (can be fractional)
    pub units: f64,

    /// Numerical score on the 0-100 scale
    pub numerical_grade: f64,

    /// Owning semester
    pub semester_id: SemesterId,

    /// Derived from `numerical_grade`
    pub letter_grade: LetterGrade,

    /// Derived from `numerical_grade`
    pub grade_point: f64,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Input for adding a grade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGrade {
    /// Catalog identifier of the course
    pub course_id: String,
    /// Course code
    pub course_code: String,
    /// Course title
    pub course_title: String,
    /// Credit units
    pub units: f64,
    /// Numerical score on the 0-100 scale
    pub numerical_grade: f64,
    /// Owning semester
    pub semester_id: SemesterId,
}

impl NewGrade {
    /// Create grade input; the course id defaults to the course code
    #[must_use]
    pub fn new(
        semester_id: SemesterId,
        course_code: impl Into<String>,
        course_title: impl Into<String>,
        units: f64,
        numerical_grade: f64,
    ) -> Self {
        let course_code = course_code.into();
        Self {
            course_id: course_code.clone(),
            course_code,
            course_title: course_title.into(),
            units,
            numerical_grade,
            semester_id,
        }
    }

    /// Set the catalog course id
    #[must_use]
    pub fn with_course_id(mut self, course_id: impl Into<String>) -> Self {
        self.course_id = course_id.into();
        self
    }
}

/// Partial update for a grade; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeUpdate {
    /// New catalog course id
    pub course_id: Option<String>,
    /// New course code
    pub course_code: Option<String>,
    /// New course title
    pub course_title: Option<String>,
    /// New unit count
    pub units: Option<f64>,
    /// New numerical grade
    pub numerical_grade: Option<f64>,
    /// Move the grade to another semester
    pub semester_id: Option<SemesterId>,
}

impl GradeUpdate {
    /// Whether the patch changes nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.course_id.is_none()
            && self.course_code.is_none()
            && self.course_title.is_none()
            && self.units.is_none()
            && self.numerical_grade.is_none()
            && self.semester_id.is_none()
    }
}

impl GradeRecord {
    /// Build a record from validated input, deriving letter grade and grade point
    #[must_use]
    pub fn from_new(data: NewGrade, now: DateTime<Utc>) -> Self {
        let (letter_grade, grade_point) = grading::grade_for(data.numerical_grade);
        Self {
            id: Uuid::new_v4(),
            course_id: data.course_id,
            course_code: data.course_code,
            course_title: data.course_title,
            units: data.units,
            numerical_grade: data.numerical_grade,
            semester_id: data.semester_id,
            letter_grade,
            grade_point,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a patch into this record.
    ///
    /// Letter grade and grade point are re-derived whenever the numerical
    /// grade is part of the patch.
    pub fn apply(&mut self, patch: GradeUpdate, now: DateTime<Utc>) {
        if let Some(course_id) = patch.course_id {
            self.course_id = course_id;
        }
        if let Some(course_code) = patch.course_code {
            self.course_code = course_code;
        }
        if let Some(course_title) = patch.course_title {
            self.course_title = course_title;
        }
        if let Some(units) = patch.units {
            self.units = units;
        }
        if let Some(semester_id) = patch.semester_id {
            self.semester_id = semester_id;
        }
        if let Some(numerical_grade) = patch.numerical_grade {
            self.numerical_grade = numerical_grade;
            self.rederive();
        }
        self.updated_at = now;
    }

    /// Recompute letter grade and grade point from the numerical grade.
    ///
    /// Returns `true` when the stored values disagreed with the scale.
    pub fn rederive(&mut self) -> bool {
        let (letter_grade, grade_point) = grading::grade_for(self.numerical_grade);
        let stale = self.letter_grade != letter_grade
            || (self.grade_point - grade_point).abs() > f64::EPSILON;
        self.letter_grade = letter_grade;
        self.grade_point = grade_point;
        stale
    }

    /// Units × grade point
    #[must_use]
    pub fn quality_points(&self) -> f64 {
        self.units * self.grade_point
    }
}
