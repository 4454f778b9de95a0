//! Semester model

use crate::core::models::GradeRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of a semester record
pub type SemesterId = Uuid;

/// Term within an academic year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemesterType {
    /// First semester
    First,
    /// Second semester
    Second,
    /// Summer term (inter-session)
    Summer,
}

impl SemesterType {
    /// Sort position within a year
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Summer => 3,
        }
    }
}

impl fmt::Display for SemesterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => write!(f, "First Semester"),
            Self::Second => write!(f, "Second Semester"),
            Self::Summer => write!(f, "Summer"),
        }
    }
}

impl FromStr for SemesterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first" | "1st" | "1" => Ok(Self::First),
            "second" | "2nd" | "2" => Ok(Self::Second),
            "summer" | "intersession" => Ok(Self::Summer),
            _ => Err(format!("Unknown semester type: {s}")),
        }
    }
}

/// A term's container of grades with its own derived QPI
///
/// `grades`, `total_units`, `total_quality_points` and `qpi` are derived;
/// the store rebuilds them after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterRecord {
    /// Unique identifier
    pub id: SemesterId,

    /// Year level (1 for freshman year)
    pub year_level: u8,

    /// Term within the year
    pub semester_type: SemesterType,

    /// Academic year label (e.g., "2024-2025")
    pub academic_year: String,

    /// Whether the term is finished
    pub is_completed: bool,

    /// Owned grades, in insertion order
    #[serde(default)]
    pub grades: Vec<GradeRecord>,

    /// Sum of units over owned grades
    #[serde(default)]
    pub total_units: f64,

    /// Sum of units × grade point over owned grades
    #[serde(default)]
    pub total_quality_points: f64,

    /// Semester QPI (0.0 when there are no units)
    #[serde(default)]
    pub qpi: f64,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Input for adding a semester
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSemester {
    /// Year level
    pub year_level: u8,
    /// Term within the year
    pub semester_type: SemesterType,
    /// Academic year label
    pub academic_year: String,
    /// Whether the term is finished
    #[serde(default)]
    pub is_completed: bool,
}

impl NewSemester {
    /// Create semester input for an ongoing term
    #[must_use]
    pub fn new(year_level: u8, semester_type: SemesterType, academic_year: impl Into<String>) -> Self {
        Self {
            year_level,
            semester_type,
            academic_year: academic_year.into(),
            is_completed: false,
        }
    }
}

/// Partial update for a semester
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterUpdate {
    /// New year level
    pub year_level: Option<u8>,
    /// New term
    pub semester_type: Option<SemesterType>,
    /// New academic year label
    pub academic_year: Option<String>,
    /// New completion flag
    pub is_completed: Option<bool>,
}

impl SemesterRecord {
    /// Create an empty semester with zeroed aggregates
    #[must_use]
    pub fn from_new(data: NewSemester, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            year_level: data.year_level,
            semester_type: data.semester_type,
            academic_year: data.academic_year,
            is_completed: data.is_completed,
            grades: Vec::new(),
            total_units: 0.0,
            total_quality_points: 0.0,
            qpi: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a patch into this record
    pub fn apply(&mut self, patch: SemesterUpdate, now: DateTime<Utc>) {
        if let Some(year_level) = patch.year_level {
            self.year_level = year_level;
        }
        if let Some(semester_type) = patch.semester_type {
            self.semester_type = semester_type;
        }
        if let Some(academic_year) = patch.academic_year {
            self.academic_year = academic_year;
        }
        if let Some(is_completed) = patch.is_completed {
            self.is_completed = is_completed;
        }
        self.updated_at = now;
    }

    /// Human-readable label (e.g., "Year 2, Second Semester (2024-2025)")
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "Year {}, {} ({})",
            self.year_level, self.semester_type, self.academic_year
        )
    }

    /// Whether this is a summer term
    #[must_use]
    pub fn is_summer(&self) -> bool {
        self.semester_type == SemesterType::Summer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semester_creation() {
        let semester = SemesterRecord::from_new(
            NewSemester::new(1, SemesterType::First, "2024-2025"),
            Utc::now(),
        );
        assert_eq!(semester.year_level, 1);
        assert_eq!(semester.semester_type, SemesterType::First);
        assert!(semester.grades.is_empty());
        assert!(semester.total_units.abs() < f64::EPSILON);
        assert!(semester.qpi.abs() < f64::EPSILON);
        assert!(!semester.is_completed);
    }

    #[test]
    fn test_semester_type_parse() {
        assert_eq!("First".parse::<SemesterType>(), Ok(SemesterType::First));
        assert_eq!("2nd".parse::<SemesterType>(), Ok(SemesterType::Second));
        assert_eq!("summer".parse::<SemesterType>(), Ok(SemesterType::Summer));
        assert!("winter".parse::<SemesterType>().is_err());
    }

    #[test]
    fn test_apply_patch() {
        let mut semester = SemesterRecord::from_new(
            NewSemester::new(2, SemesterType::Second, "2025-2026"),
            Utc::now(),
        );
        semester.apply(
            SemesterUpdate {
                is_completed: Some(true),
                ..Default::default()
            },
            Utc::now(),
        );
        assert!(semester.is_completed);
        assert_eq!(semester.year_level, 2);
        assert_eq!(semester.label(), "Year 2, Second Semester (2025-2026)");
    }

    #[test]
    fn test_semester_type_wire_name() {
        let json = serde_json::to_string(&SemesterType::Summer).unwrap();
        assert_eq!(json, "\"summer\"");
    }
}
