//! Fixed grading scale
//!
//! Maps a numerical score (0-100) to a letter grade and its grade point.
//! The table is checked top-down and each lower bound is inclusive.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest accepted numerical grade
pub const MIN_NUMERICAL_GRADE: f64 = 0.0;

/// Highest accepted numerical grade
pub const MAX_NUMERICAL_GRADE: f64 = 100.0;

/// Letter grades in descending order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    /// Excellent
    #[serde(rename = "A")]
    A,
    /// Very good
    #[serde(rename = "B+")]
    BPlus,
    /// Good
    #[serde(rename = "B")]
    B,
    /// Satisfactory
    #[serde(rename = "C+")]
    CPlus,
    /// Sufficient
    #[serde(rename = "C")]
    C,
    /// Passing
    #[serde(rename = "D")]
    D,
    /// Failure
    #[serde(rename = "F")]
    F,
}

/// `(lower bound, letter)`, highest band first.
const SCALE: [(f64, LetterGrade); 7] = [
    (97.0, LetterGrade::A),
    (93.0, LetterGrade::BPlus),
    (89.0, LetterGrade::B),
    (85.0, LetterGrade::CPlus),
    (80.0, LetterGrade::C),
    (75.0, LetterGrade::D),
    (MIN_NUMERICAL_GRADE, LetterGrade::F),
];

impl LetterGrade {
    /// Grade point for this letter
    #[must_use]
    pub const fn grade_point(self) -> f64 {
        match self {
            Self::A => 4.0,
            Self::BPlus => 3.5,
            Self::B => 3.0,
            Self::CPlus => 2.5,
            Self::C => 2.0,
            Self::D => 1.0,
            Self::F => 0.0,
        }
    }

    /// Display label (e.g., "B+")
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::CPlus => "C+",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a numerical grade falls inside the accepted range
#[must_use]
pub fn is_valid_numerical_grade(numerical_grade: f64) -> bool {
    numerical_grade.is_finite()
        && (MIN_NUMERICAL_GRADE..=MAX_NUMERICAL_GRADE).contains(&numerical_grade)
}

/// Letter grade and grade point for a numerical score.
///
/// Scores below the lowest band (including non-finite input) map to F.
#[must_use]
pub fn grade_for(numerical_grade: f64) -> (LetterGrade, f64) {
    let letter = SCALE
        .iter()
        .find(|(lower, _)| numerical_grade >= *lower)
        .map_or(LetterGrade::F, |&(_, letter)| letter);
    (letter, letter.grade_point())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter(score: f64) -> LetterGrade {
        grade_for(score).0
    }

    #[test]
    fn test_anchor_points() {
        assert_eq!(grade_for(95.0), (LetterGrade::BPlus, 3.5));
        assert_eq!(grade_for(87.0), (LetterGrade::CPlus, 2.5));
    }

    #[test]
    fn test_band_lower_bounds_are_inclusive() {
        assert_eq!(letter(97.0), LetterGrade::A);
        assert_eq!(letter(96.99), LetterGrade::BPlus);
        assert_eq!(letter(93.0), LetterGrade::BPlus);
        assert_eq!(letter(89.0), LetterGrade::B);
        assert_eq!(letter(85.0), LetterGrade::CPlus);
        assert_eq!(letter(80.0), LetterGrade::C);
        assert_eq!(letter(75.0), LetterGrade::D);
        assert_eq!(letter(74.5), LetterGrade::F);
    }

    #[test]
    fn test_extremes() {
        assert_eq!(grade_for(100.0), (LetterGrade::A, 4.0));
        assert_eq!(grade_for(0.0), (LetterGrade::F, 0.0));
        assert_eq!(grade_for(f64::NAN), (LetterGrade::F, 0.0));
    }

    #[test]
    fn test_scale_is_monotonic() {
        let mut previous = f64::INFINITY;
        for score in (0..=100).rev() {
            let (_, point) = grade_for(f64::from(score));
            assert!(point <= previous, "grade point rose at {score}");
            previous = point;
        }
    }

    #[test]
    fn test_each_band_starts_at_its_bound() {
        for &(lower, expected) in &SCALE {
            assert_eq!(grade_for(lower), (expected, expected.grade_point()));
        }
    }

    #[test]
    fn test_letter_display() {
        assert_eq!(LetterGrade::CPlus.to_string(), "C+");
        assert_eq!(LetterGrade::A.as_str(), "A");
    }

    #[test]
    fn test_valid_numerical_range() {
        assert!(is_valid_numerical_grade(0.0));
        assert!(is_valid_numerical_grade(100.0));
        assert!(!is_valid_numerical_grade(100.5));
        assert!(!is_valid_numerical_grade(-1.0));
        assert!(!is_valid_numerical_grade(f64::INFINITY));
    }
}
