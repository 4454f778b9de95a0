//! Academic record model

use crate::core::models::SemesterId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Configuration of an academic record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordConfig {
    /// Length of the program in years
    pub total_years: u8,
    /// Whether summer terms count toward the cumulative QPI
    pub include_summer: bool,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            total_years: 4,
            include_summer: true,
        }
    }
}

/// Top-level aggregate over member semesters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicRecord {
    /// Record configuration
    pub config: RecordConfig,

    /// Member semesters, in the order they joined the record
    pub semesters: Vec<SemesterId>,

    /// Sum of units over counted semesters
    #[serde(default)]
    pub total_units: f64,

    /// Sum of quality points over counted semesters
    #[serde(default)]
    pub total_quality_points: f64,

    /// Cumulative QPI (0.0 when there are no units)
    #[serde(default)]
    pub cumulative_qpi: f64,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Last recalculation time
    pub updated_at: DateTime<Utc>,
}

impl AcademicRecord {
    /// Create a record with no member semesters
    #[must_use]
    pub const fn new(config: RecordConfig, now: DateTime<Utc>) -> Self {
        Self {
            config,
            semesters: Vec::new(),
            total_units: 0.0,
            total_quality_points: 0.0,
            cumulative_qpi: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether a semester belongs to this record
    #[must_use]
    pub fn contains(&self, semester_id: &SemesterId) -> bool {
        self.semesters.contains(semester_id)
    }

    /// Add a member semester; duplicates are ignored
    ///
    /// # Returns
    /// `true` if the semester was added
    pub fn attach(&mut self, semester_id: SemesterId) -> bool {
        if self.contains(&semester_id) {
            false
        } else {
            self.semesters.push(semester_id);
            true
        }
    }

    /// Remove a member semester
    ///
    /// # Returns
    /// `true` if the semester was a member
    pub fn detach(&mut self, semester_id: &SemesterId) -> bool {
        if let Some(pos) = self.semesters.iter().position(|id| id == semester_id) {
            self.semesters.remove(pos);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_record_creation() {
        let record = AcademicRecord::new(RecordConfig::default(), Utc::now());
        assert_eq!(record.config.total_years, 4);
        assert!(record.config.include_summer);
        assert!(record.semesters.is_empty());
        assert!(record.cumulative_qpi.abs() < f64::EPSILON);
    }

    #[test]
    fn test_attach_and_detach() {
        let mut record = AcademicRecord::new(RecordConfig::default(), Utc::now());
        let id = Uuid::new_v4();

        assert!(record.attach(id));
        assert!(!record.attach(id));
        assert_eq!(record.semesters.len(), 1);

        assert!(record.detach(&id));
        assert!(!record.detach(&id));
        assert!(record.semesters.is_empty());
    }
}
