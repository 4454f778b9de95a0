//! Grade store: the single source of truth for grades, semesters, and the
//! academic record.
//!
//! Every mutation follows the same sequence: validate, apply, rebuild all
//! derived totals through [`crate::core::qpi`], then persist through the
//! injected [`GradeStorage`]. Persistence after a mutation is best-effort:
//! a failing write is logged and the in-memory change stands.

use crate::core::error::{StorageError, StoreError};
use crate::core::grading;
use crate::core::models::{
    AcademicRecord, GradeId, GradeRecord, GradeUpdate, NewGrade, NewSemester, RecordConfig,
    SemesterId, SemesterRecord, SemesterUpdate,
};
use crate::core::qpi::{self, QpiSummary};
use crate::core::storage::GradeStorage;
use crate::{debug, error, warn};
use chrono::Utc;

/// Owned grade-tracking state plus its storage handle
#[derive(Debug)]
pub struct GradeStore<S: GradeStorage> {
    grades: Vec<GradeRecord>,
    semesters: Vec<SemesterRecord>,
    academic_record: Option<AcademicRecord>,
    storage: S,
}

impl<S: GradeStorage> GradeStore<S> {
    /// Create an empty store without reading from storage
    #[must_use]
    pub const fn new(storage: S) -> Self {
        Self {
            grades: Vec::new(),
            semesters: Vec::new(),
            academic_record: None,
            storage,
        }
    }

    /// Create a store hydrated from storage
    ///
    /// # Errors
    /// Returns an error if the storage backend cannot be read
    pub fn open(storage: S) -> Result<Self, StoreError> {
        let mut store = Self::new(storage);
        store.load_data()?;
        Ok(store)
    }

    // --- Queries ---

    /// All grades, in insertion order
    #[must_use]
    pub fn grades(&self) -> &[GradeRecord] {
        &self.grades
    }

    /// All semesters, in insertion order
    #[must_use]
    pub fn semesters(&self) -> &[SemesterRecord] {
        &self.semesters
    }

    /// The academic record, if initialized
    #[must_use]
    pub const fn academic_record(&self) -> Option<&AcademicRecord> {
        self.academic_record.as_ref()
    }

    /// Look up a grade
    #[must_use]
    pub fn grade(&self, id: &GradeId) -> Option<&GradeRecord> {
        self.grades.iter().find(|g| g.id == *id)
    }

    /// Look up a semester
    #[must_use]
    pub fn semester(&self, id: &SemesterId) -> Option<&SemesterRecord> {
        self.semesters.iter().find(|s| s.id == *id)
    }

    /// Grades owned by a semester, in insertion order
    pub fn grades_by_semester<'a>(
        &'a self,
        semester_id: &'a SemesterId,
    ) -> impl Iterator<Item = &'a GradeRecord> + 'a {
        self.grades
            .iter()
            .filter(move |g| g.semester_id == *semester_id)
    }

    /// QPI summary of one semester.
    ///
    /// `None` for an unknown semester or one with no units.
    #[must_use]
    pub fn semester_qpi(&self, semester_id: &SemesterId) -> Option<QpiSummary> {
        self.semester(semester_id)?;
        QpiSummary::from_grades(self.grades_by_semester(semester_id)).non_empty()
    }

    /// Cumulative QPI summary over the academic record.
    ///
    /// `None` when no record exists or it counts no units.
    #[must_use]
    pub fn cumulative_qpi(&self) -> Option<QpiSummary> {
        let record = self.academic_record.as_ref()?;
        qpi::cumulative_summary(record, &self.semesters).non_empty()
    }

    /// QPI summary over the counted record semesters of one year level
    #[must_use]
    pub fn year_qpi(&self, year_level: u8) -> Option<QpiSummary> {
        let record = self.academic_record.as_ref()?;
        QpiSummary::from_grades(
            qpi::counted_semesters(record, &self.semesters)
                .filter(|s| s.year_level == year_level)
                .flat_map(|s| s.grades.iter()),
        )
        .non_empty()
    }

    /// Member semesters of the academic record, in membership order
    #[must_use]
    pub fn record_semesters(&self) -> Vec<&SemesterRecord> {
        self.academic_record
            .as_ref()
            .map(|record| {
                record
                    .semesters
                    .iter()
                    .filter_map(|id| self.semester(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Access the storage backend
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Mutable access to the storage backend
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    // --- Grade mutations ---

    /// Add a grade to an existing semester
    ///
    /// # Errors
    /// - `SemesterNotFound` if the owning semester does not exist
    /// - `InvalidGrade` / `InvalidUnits` for out-of-range input
    pub fn add_grade(&mut self, data: NewGrade) -> Result<GradeRecord, StoreError> {
        validate_grade(data.numerical_grade)?;
        validate_units(data.units)?;
        self.require_semester(&data.semester_id)?;

        let grade = GradeRecord::from_new(data, Utc::now());
        debug!(
            "Adding grade {} ({} {}) to semester {}",
            grade.id, grade.course_code, grade.letter_grade, grade.semester_id
        );
        self.grades.push(grade.clone());
        self.touch_semester(&grade.semester_id);
        self.recalculate();
        self.persist();
        Ok(grade)
    }

    /// Merge a partial update into a grade
    ///
    /// # Errors
    /// - `GradeNotFound` if no grade has this id
    /// - `SemesterNotFound` if the patch moves the grade to an unknown semester
    /// - `InvalidGrade` / `InvalidUnits` for out-of-range input
    pub fn update_grade(
        &mut self,
        id: GradeId,
        patch: GradeUpdate,
    ) -> Result<GradeRecord, StoreError> {
        let pos = self
            .grades
            .iter()
            .position(|g| g.id == id)
            .ok_or(StoreError::GradeNotFound(id))?;
        if let Some(numerical_grade) = patch.numerical_grade {
            validate_grade(numerical_grade)?;
        }
        if let Some(units) = patch.units {
            validate_units(units)?;
        }
        if let Some(semester_id) = &patch.semester_id {
            self.require_semester(semester_id)?;
        }

        let now = Utc::now();
        let grade = &mut self.grades[pos];
        let previous_owner = grade.semester_id;
        grade.apply(patch, now);
        let updated = grade.clone();

        debug!(
            "Updated grade {} ({} {})",
            updated.id, updated.course_code, updated.letter_grade
        );
        self.touch_semester(&previous_owner);
        if updated.semester_id != previous_owner {
            self.touch_semester(&updated.semester_id);
        }
        self.recalculate();
        self.persist();
        Ok(updated)
    }

    /// Delete a grade
    ///
    /// # Errors
    /// Returns `GradeNotFound` if no grade has this id
    pub fn remove_grade(&mut self, id: GradeId) -> Result<GradeRecord, StoreError> {
        let pos = self
            .grades
            .iter()
            .position(|g| g.id == id)
            .ok_or(StoreError::GradeNotFound(id))?;
        let removed = self.grades.remove(pos);

        debug!("Removed grade {} ({})", removed.id, removed.course_code);
        self.touch_semester(&removed.semester_id);
        self.recalculate();
        self.persist();
        Ok(removed)
    }

    // --- Semester mutations ---

    /// Add an empty semester.
    ///
    /// When an academic record exists the semester joins it.
    pub fn add_semester(&mut self, data: NewSemester) -> SemesterRecord {
        let semester = SemesterRecord::from_new(data, Utc::now());
        debug!("Adding semester {} ({})", semester.id, semester.label());
        if let Some(record) = self.academic_record.as_mut() {
            record.attach(semester.id);
        }
        self.semesters.push(semester.clone());
        self.recalculate();
        self.persist();
        semester
    }

    /// Merge a partial update into a semester
    ///
    /// # Errors
    /// Returns `SemesterNotFound` if no semester has this id
    pub fn update_semester(
        &mut self,
        id: SemesterId,
        patch: SemesterUpdate,
    ) -> Result<SemesterRecord, StoreError> {
        let now = Utc::now();
        let semester = self
            .semesters
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::SemesterNotFound(id))?;
        semester.apply(patch, now);
        let updated = semester.clone();

        debug!("Updated semester {} ({})", updated.id, updated.label());
        self.recalculate();
        self.persist();
        Ok(updated)
    }

    /// Delete a semester together with every grade it owns
    ///
    /// # Errors
    /// Returns `SemesterNotFound` if no semester has this id
    pub fn remove_semester(&mut self, id: SemesterId) -> Result<SemesterRecord, StoreError> {
        let pos = self
            .semesters
            .iter()
            .position(|s| s.id == id)
            .ok_or(StoreError::SemesterNotFound(id))?;
        let removed = self.semesters.remove(pos);
        let before = self.grades.len();
        self.grades.retain(|g| g.semester_id != id);
        if let Some(record) = self.academic_record.as_mut() {
            record.detach(&id);
        }

        debug!(
            "Removed semester {} ({}) and {} grade(s)",
            removed.id,
            removed.label(),
            before - self.grades.len()
        );
        self.recalculate();
        self.persist();
        Ok(removed)
    }

    // --- Academic record ---

    /// Create (or replace) the academic record with no member semesters.
    ///
    /// Existing semesters are left untouched; use [`Self::attach_semester`]
    /// to bring them into the record.
    pub fn initialize_academic_record(&mut self, config: RecordConfig) -> AcademicRecord {
        debug!(
            "Initializing academic record ({} years, summer counted: {})",
            config.total_years, config.include_summer
        );
        let mut record = AcademicRecord::new(config, Utc::now());
        qpi::recalculate_record(&mut record, &self.semesters);
        self.academic_record = Some(record.clone());
        self.persist();
        record
    }

    /// Make an existing semester a member of the academic record
    ///
    /// # Errors
    /// - `AcademicRecordMissing` if no record has been initialized
    /// - `SemesterNotFound` if no semester has this id
    pub fn attach_semester(&mut self, id: SemesterId) -> Result<(), StoreError> {
        self.require_semester(&id)?;
        let record = self
            .academic_record
            .as_mut()
            .ok_or(StoreError::AcademicRecordMissing)?;
        if record.attach(id) {
            debug!("Attached semester {id} to academic record");
            self.recalculate();
            self.persist();
        }
        Ok(())
    }

    // --- Persistence ---

    /// Replace in-memory state with what storage holds, then rebuild every
    /// derived total.
    ///
    /// Letter grade and grade point are re-derived from each stored
    /// numerical grade; stored values are never trusted.
    ///
    /// # Errors
    /// Returns an error if any collection cannot be read; state is left
    /// unchanged in that case.
    pub fn load_data(&mut self) -> Result<(), StoreError> {
        let mut grades = self.storage.load_grades()?;
        let semesters = self.storage.load_semesters()?;
        let academic_record = self.storage.load_academic_record()?;

        debug!(
            "Loaded {} grade(s), {} semester(s), record: {}",
            grades.len(),
            semesters.len(),
            academic_record.is_some()
        );
        for grade in &mut grades {
            if !grading::is_valid_numerical_grade(grade.numerical_grade) {
                warn!(
                    "Stored grade {} has out-of-range numerical grade {}",
                    grade.id, grade.numerical_grade
                );
            }
            if grade.rederive() {
                warn!(
                    "Stored grade {} ({}) disagreed with the grading scale; now {}",
                    grade.id, grade.course_code, grade.letter_grade
                );
            }
        }
        self.grades = grades;
        self.semesters = semesters;
        self.academic_record = academic_record;
        self.recalculate();
        Ok(())
    }

    /// Write the current state to storage
    ///
    /// # Errors
    /// Returns the first storage failure
    pub fn save_data(&mut self) -> Result<(), StoreError> {
        self.write_all().map_err(StoreError::from)
    }

    /// Clear grades, semesters, and the academic record, then persist the
    /// empty state
    ///
    /// # Errors
    /// Returns the storage failure; memory is already empty in that case,
    /// but storage still holds the old data.
    pub fn reset_all(&mut self) -> Result<(), StoreError> {
        debug!("Resetting all grade data");
        self.grades.clear();
        self.semesters.clear();
        self.academic_record = None;
        self.storage.clear().map_err(StoreError::from)
    }

    // --- Internals ---

    fn require_semester(&self, id: &SemesterId) -> Result<(), StoreError> {
        self.semester(id)
            .map(|_| ())
            .ok_or(StoreError::SemesterNotFound(*id))
    }

    fn touch_semester(&mut self, id: &SemesterId) {
        let now = Utc::now();
        if let Some(semester) = self.semesters.iter_mut().find(|s| s.id == *id) {
            semester.updated_at = now;
        }
    }

    /// Rebuild every semester's owned grades and totals, then the record's
    fn recalculate(&mut self) {
        for semester in &mut self.semesters {
            qpi::recalculate_semester(semester, &self.grades);
        }
        if let Some(record) = self.academic_record.as_mut() {
            qpi::recalculate_record(record, &self.semesters);
            record.updated_at = Utc::now();
        }
    }

    fn write_all(&mut self) -> Result<(), StorageError> {
        self.storage.save_grades(&self.grades)?;
        self.storage.save_semesters(&self.semesters)?;
        self.storage
            .save_academic_record(self.academic_record.as_ref())
    }

    fn persist(&mut self) {
        if let Err(e) = self.write_all() {
            error!("Failed to persist grade data: {e}");
        }
    }
}

fn validate_grade(numerical_grade: f64) -> Result<(), StoreError> {
    if grading::is_valid_numerical_grade(numerical_grade) {
        Ok(())
    } else {
        Err(StoreError::InvalidGrade(numerical_grade))
    }
}

fn validate_units(units: f64) -> Result<(), StoreError> {
    if units.is_finite() && units >= 0.0 {
        Ok(())
    } else {
        Err(StoreError::InvalidUnits(units))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grading::LetterGrade;
    use crate::core::models::SemesterType;
    use crate::core::storage::{KvStorage, MemoryKv};

    fn store() -> GradeStore<KvStorage<MemoryKv>> {
        GradeStore::new(KvStorage::new(MemoryKv::new()))
    }

    fn first_semester() -> NewSemester {
        NewSemester::new(1, SemesterType::First, "2024-2025")
    }

    #[test]
    fn test_add_grade_derives_fields() {
        let mut store = store();
        let semester = store.add_semester(first_semester());

        let grade = store
            .add_grade(NewGrade::new(semester.id, "CS 11", "Intro", 3.0, 95.0))
            .unwrap();

        assert_eq!(store.grades().len(), 1);
        assert_eq!(grade.letter_grade, LetterGrade::BPlus);
        assert!((grade.grade_point - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_add_grade_to_unknown_semester_is_rejected() {
        let mut store = store();
        let missing = uuid::Uuid::new_v4();
        let result = store.add_grade(NewGrade::new(missing, "CS 11", "Intro", 3.0, 95.0));
        assert!(matches!(result, Err(StoreError::SemesterNotFound(id)) if id == missing));
        assert!(store.grades().is_empty());
    }

    #[test]
    fn test_add_grade_validates_input() {
        let mut store = store();
        let semester = store.add_semester(first_semester());
        assert!(matches!(
            store.add_grade(NewGrade::new(semester.id, "X", "X", 3.0, 101.0)),
            Err(StoreError::InvalidGrade(_))
        ));
        assert!(matches!(
            store.add_grade(NewGrade::new(semester.id, "X", "X", -1.0, 90.0)),
            Err(StoreError::InvalidUnits(_))
        ));
        assert!(store.grades().is_empty());
    }

    #[test]
    fn test_semester_totals_follow_grades() {
        let mut store = store();
        let semester = store.add_semester(first_semester());
        store
            .add_grade(NewGrade::new(semester.id, "A", "A", 3.0, 95.0))
            .unwrap();
        store
            .add_grade(NewGrade::new(semester.id, "B", "B", 4.0, 87.0))
            .unwrap();

        let stored = store.semester(&semester.id).unwrap();
        assert_eq!(stored.grades.len(), 2);
        assert!((stored.total_units - 7.0).abs() < f64::EPSILON);
        assert!((stored.total_quality_points - 20.5).abs() < 1e-9);
        assert!((stored.qpi - 2.93).abs() < 1e-2);
    }

    #[test]
    fn test_update_unknown_grade_reports_not_found() {
        let mut store = store();
        let id = uuid::Uuid::new_v4();
        let writes_before = store.storage().kv().write_count();

        let result = store.update_grade(id, GradeUpdate::default());

        assert!(matches!(result, Err(StoreError::GradeNotFound(found)) if found == id));
        assert_eq!(store.storage().kv().write_count(), writes_before);
    }

    #[test]
    fn test_move_grade_between_semesters() {
        let mut store = store();
        let first = store.add_semester(first_semester());
        let second = store.add_semester(NewSemester::new(1, SemesterType::Second, "2024-2025"));
        let grade = store
            .add_grade(NewGrade::new(first.id, "A", "A", 3.0, 97.0))
            .unwrap();

        store
            .update_grade(
                grade.id,
                GradeUpdate {
                    semester_id: Some(second.id),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(store.semester(&first.id).unwrap().grades.is_empty());
        assert!(store.semester(&first.id).unwrap().total_units.abs() < f64::EPSILON);
        assert_eq!(store.semester(&second.id).unwrap().grades.len(), 1);
        assert!(store.semester_qpi(&first.id).is_none());
    }

    #[test]
    fn test_storage_failure_keeps_mutation() {
        let mut store = store();
        let semester = store.add_semester(first_semester());
        store.storage_mut().kv_mut().toggle_offline();

        let grade = store
            .add_grade(NewGrade::new(semester.id, "A", "A", 3.0, 90.0))
            .unwrap();

        assert_eq!(store.grades().len(), 1);
        assert_eq!(store.grades()[0].id, grade.id);
        assert!(matches!(store.save_data(), Err(StoreError::Storage(_))));
    }

    #[test]
    fn test_remove_semester_cascades() {
        let mut store = store();
        store.initialize_academic_record(RecordConfig::default());
        let keep = store.add_semester(first_semester());
        let dropped = store.add_semester(NewSemester::new(1, SemesterType::Second, "2024-2025"));
        store
            .add_grade(NewGrade::new(keep.id, "A", "A", 3.0, 97.0))
            .unwrap();
        store
            .add_grade(NewGrade::new(dropped.id, "B", "B", 3.0, 70.0))
            .unwrap();

        store.remove_semester(dropped.id).unwrap();

        assert_eq!(store.grades().len(), 1);
        assert_eq!(store.semesters().len(), 1);
        let record = store.academic_record().unwrap();
        assert_eq!(record.semesters, vec![keep.id]);
        assert!((record.cumulative_qpi - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_initialize_does_not_adopt_existing_semesters() {
        let mut store = store();
        let early = store.add_semester(first_semester());
        store
            .add_grade(NewGrade::new(early.id, "A", "A", 3.0, 97.0))
            .unwrap();

        let record = store.initialize_academic_record(RecordConfig::default());
        assert!(record.semesters.is_empty());
        assert!(record.total_units.abs() < f64::EPSILON);
        assert_eq!(store.semesters().len(), 1);
        assert!(store.cumulative_qpi().is_none());

        store.attach_semester(early.id).unwrap();
        let cumulative = store.cumulative_qpi().unwrap();
        assert!((cumulative.qpi - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_attach_requires_record() {
        let mut store = store();
        let semester = store.add_semester(first_semester());
        assert!(matches!(
            store.attach_semester(semester.id),
            Err(StoreError::AcademicRecordMissing)
        ));
    }

    #[test]
    fn test_year_qpi() {
        let mut store = store();
        store.initialize_academic_record(RecordConfig::default());
        let year_one = store.add_semester(first_semester());
        let year_two = store.add_semester(NewSemester::new(2, SemesterType::First, "2025-2026"));
        store
            .add_grade(NewGrade::new(year_one.id, "A", "A", 3.0, 97.0))
            .unwrap();
        store
            .add_grade(NewGrade::new(year_two.id, "B", "B", 3.0, 80.0))
            .unwrap();

        assert!((store.year_qpi(1).unwrap().qpi - 4.0).abs() < 1e-9);
        assert!((store.year_qpi(2).unwrap().qpi - 2.0).abs() < 1e-9);
        assert!(store.year_qpi(3).is_none());
    }

    #[test]
    fn test_semester_qpi_unknown_semester_is_none() {
        let mut store = store();
        let semester = store.add_semester(first_semester());
        store
            .add_grade(NewGrade::new(semester.id, "A", "A", 3.0, 90.0))
            .unwrap();

        assert!(store.semester_qpi(&uuid::Uuid::new_v4()).is_none());
        assert!(store.semester_qpi(&semester.id).is_some());
    }

    #[test]
    fn test_update_grade_rejects_invalid_patch() {
        let mut store = store();
        let semester = store.add_semester(first_semester());
        let grade = store
            .add_grade(NewGrade::new(semester.id, "A", "A", 3.0, 90.0))
            .unwrap();
        let writes = store.storage().kv().write_count();

        assert!(matches!(
            store.update_grade(
                grade.id,
                GradeUpdate {
                    units: Some(-2.0),
                    ..Default::default()
                },
            ),
            Err(StoreError::InvalidUnits(_))
        ));
        assert!(matches!(
            store.update_grade(
                grade.id,
                GradeUpdate {
                    numerical_grade: Some(f64::NAN),
                    ..Default::default()
                },
            ),
            Err(StoreError::InvalidGrade(_))
        ));

        assert_eq!(store.grade(&grade.id), Some(&grade));
        assert_eq!(store.storage().kv().write_count(), writes);
        assert_eq!(store.storage().load_grades().unwrap(), vec![grade]);
    }

    #[test]
    fn test_update_unknown_grade_checked_before_semester() {
        let mut store = store();
        let missing = uuid::Uuid::new_v4();
        let result = store.update_grade(
            missing,
            GradeUpdate {
                semester_id: Some(uuid::Uuid::new_v4()),
                units: Some(-1.0),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(StoreError::GradeNotFound(id)) if id == missing));
    }

    #[test]
    fn test_reset_all_reports_storage_failure() {
        let mut store = store();
        let semester = store.add_semester(first_semester());
        store
            .add_grade(NewGrade::new(semester.id, "A", "A", 3.0, 90.0))
            .unwrap();
        store.storage_mut().kv_mut().toggle_offline();

        assert!(matches!(store.reset_all(), Err(StoreError::Storage(_))));
        assert!(store.grades().is_empty());

        store.storage_mut().kv_mut().toggle_offline();
        assert_eq!(store.storage().load_grades().unwrap().len(), 1);
        store.reset_all().unwrap();
        assert!(store.storage().load_grades().unwrap().is_empty());
    }
}
