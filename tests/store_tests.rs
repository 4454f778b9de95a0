//! Integration tests for the grade store over real storage backends

use qpi_tracker::core::models::{GradeUpdate, NewGrade, NewSemester, RecordConfig, SemesterType};
use qpi_tracker::core::storage::{FileKv, GradeStorage, KvStorage, MemoryKv};
use qpi_tracker::core::StoreError;
use qpi_tracker::GradeStore;
use tempfile::TempDir;
use uuid::Uuid;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_end_to_end_semester_qpi() {
    let mut store = GradeStore::new(KvStorage::new(MemoryKv::new()));
    let semester = store.add_semester(NewSemester::new(1, SemesterType::First, "2024-2025"));
    store
        .add_grade(NewGrade::new(semester.id, "CS 11", "Programming", 3.0, 95.0))
        .unwrap();
    store
        .add_grade(NewGrade::new(semester.id, "MA 18", "Calculus", 4.0, 87.0))
        .unwrap();

    let summary = store.semester_qpi(&semester.id).unwrap();
    assert_close(summary.total_units, 7.0);
    assert_close(summary.total_quality_points, 20.5);
    assert_close(summary.qpi, 20.5 / 7.0);
    assert_eq!(summary.display_qpi(), "2.93");

    // A record made after the fact mirrors the semester once attached
    store.initialize_academic_record(RecordConfig::default());
    assert!(store.cumulative_qpi().is_none());
    store.attach_semester(semester.id).unwrap();

    let record = store.academic_record().unwrap();
    assert_close(record.total_units, 7.0);
    assert_close(record.total_quality_points, 20.5);
    assert_close(record.cumulative_qpi, 20.5 / 7.0);
}

#[test]
fn test_file_storage_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("data");

    let (semester_id, grade_id) = {
        let mut store = GradeStore::new(KvStorage::new(FileKv::new(&data_dir)));
        store.initialize_academic_record(RecordConfig {
            total_years: 5,
            include_summer: false,
        });
        let semester = store.add_semester(NewSemester::new(2, SemesterType::Second, "2025-2026"));
        let grade = store
            .add_grade(NewGrade::new(semester.id, "PH 101", "Physics", 3.0, 89.0))
            .unwrap();
        (semester.id, grade.id)
    };

    assert!(data_dir.join("grades.json").exists());
    assert!(data_dir.join("semesters.json").exists());

    let reopened = GradeStore::open(KvStorage::new(FileKv::new(&data_dir))).unwrap();
    let grade = reopened.grade(&grade_id).unwrap();
    assert_eq!(grade.course_code, "PH 101");
    assert_eq!(grade.letter_grade.as_str(), "B");

    let semester = reopened.semester(&semester_id).unwrap();
    assert_eq!(semester.grades.len(), 1);
    assert_close(semester.qpi, 3.0);

    let record = reopened.academic_record().unwrap();
    assert_eq!(record.config.total_years, 5);
    assert!(!record.config.include_summer);
    assert!(record.contains(&semester_id));
    assert_close(record.cumulative_qpi, 3.0);
}

#[test]
fn test_load_rederives_letter_and_point_from_score() {
    let temp_dir = TempDir::new().unwrap();
    let semester_id = {
        let mut store = GradeStore::new(KvStorage::new(FileKv::new(temp_dir.path())));
        let semester = store.add_semester(NewSemester::new(1, SemesterType::First, "2024-2025"));
        store
            .add_grade(NewGrade::new(semester.id, "CH 11", "Chemistry", 3.0, 60.0))
            .unwrap();
        semester.id
    };

    // Another writer left a letter and point that disagree with the score
    let grades_path = temp_dir.path().join("grades.json");
    let raw = std::fs::read_to_string(&grades_path).unwrap();
    let mut grades: serde_json::Value = serde_json::from_str(&raw).unwrap();
    grades[0]["letterGrade"] = serde_json::json!("A");
    grades[0]["gradePoint"] = serde_json::json!(4.0);
    std::fs::write(&grades_path, grades.to_string()).unwrap();

    let reopened = GradeStore::open(KvStorage::new(FileKv::new(temp_dir.path()))).unwrap();
    let grade = &reopened.grades()[0];
    assert_close(grade.numerical_grade, 60.0);
    assert_eq!(grade.letter_grade.as_str(), "F");
    assert_close(grade.grade_point, 0.0);
    assert_close(reopened.semester_qpi(&semester_id).unwrap().qpi, 0.0);
    assert_close(reopened.semester(&semester_id).unwrap().total_quality_points, 0.0);
}

#[test]
fn test_reset_all_clears_files() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = GradeStore::new(KvStorage::new(FileKv::new(temp_dir.path())));
    store.initialize_academic_record(RecordConfig::default());
    let semester = store.add_semester(NewSemester::new(1, SemesterType::First, "2024-2025"));
    store
        .add_grade(NewGrade::new(semester.id, "X", "X", 1.0, 80.0))
        .unwrap();

    store.reset_all().unwrap();

    assert!(store.grades().is_empty());
    assert!(store.semesters().is_empty());
    assert!(store.academic_record().is_none());

    let reopened = GradeStore::open(KvStorage::new(FileKv::new(temp_dir.path()))).unwrap();
    assert!(reopened.grades().is_empty());
    assert!(reopened.semesters().is_empty());
    assert!(reopened.academic_record().is_none());
}

#[test]
fn test_grades_by_semester_keeps_insertion_order() {
    let mut store = GradeStore::new(KvStorage::new(MemoryKv::new()));
    let first = store.add_semester(NewSemester::new(1, SemesterType::First, "2024-2025"));
    let second = store.add_semester(NewSemester::new(1, SemesterType::Second, "2024-2025"));

    for (semester, code) in [(first.id, "A"), (second.id, "B"), (first.id, "C"), (first.id, "D")] {
        store
            .add_grade(NewGrade::new(semester, code, code, 3.0, 90.0))
            .unwrap();
    }

    let codes: Vec<&str> = store
        .grades_by_semester(&first.id)
        .map(|g| g.course_code.as_str())
        .collect();
    assert_eq!(codes, ["A", "C", "D"]);
    assert!(store.grades_by_semester(&Uuid::new_v4()).next().is_none());
}

#[test]
fn test_update_and_remove_recalculate() {
    let mut store = GradeStore::new(KvStorage::new(MemoryKv::new()));
    store.initialize_academic_record(RecordConfig::default());
    let first = store.add_semester(NewSemester::new(1, SemesterType::First, "2024-2025"));
    let second = store.add_semester(NewSemester::new(1, SemesterType::Second, "2024-2025"));
    let grade = store
        .add_grade(NewGrade::new(first.id, "EN 11", "English", 3.0, 75.0))
        .unwrap();
    store
        .add_grade(NewGrade::new(second.id, "HI 16", "History", 3.0, 97.0))
        .unwrap();
    assert_close(store.cumulative_qpi().unwrap().qpi, 2.5);

    // Raise the grade and move it to the second semester
    store
        .update_grade(
            grade.id,
            GradeUpdate {
                numerical_grade: Some(93.0),
                semester_id: Some(second.id),
                ..GradeUpdate::default()
            },
        )
        .unwrap();

    assert!(store.semester_qpi(&first.id).is_none());
    assert_close(store.semester(&first.id).unwrap().qpi, 0.0);
    assert_close(store.semester_qpi(&second.id).unwrap().qpi, 3.75);
    assert_close(store.cumulative_qpi().unwrap().qpi, 3.75);

    store.remove_grade(grade.id).unwrap();
    assert_close(store.semester_qpi(&second.id).unwrap().qpi, 4.0);
    assert_eq!(store.semester(&second.id).unwrap().grades.len(), 1);
}

#[test]
fn test_unknown_ids_do_not_persist() {
    let mut store = GradeStore::new(KvStorage::new(MemoryKv::new()));
    let semester = store.add_semester(NewSemester::new(1, SemesterType::First, "2024-2025"));
    let writes = store.storage().kv().write_count();

    let missing = Uuid::new_v4();
    assert!(matches!(
        store.update_grade(missing, GradeUpdate::default()),
        Err(StoreError::GradeNotFound(id)) if id == missing
    ));
    assert!(matches!(
        store.remove_grade(missing),
        Err(StoreError::GradeNotFound(_))
    ));
    assert!(matches!(
        store.add_grade(NewGrade::new(missing, "X", "X", 3.0, 90.0)),
        Err(StoreError::SemesterNotFound(_))
    ));
    assert!(matches!(
        store.add_grade(NewGrade::new(semester.id, "X", "X", 3.0, 101.0)),
        Err(StoreError::InvalidGrade(_))
    ));

    assert_eq!(store.storage().kv().write_count(), writes);
    assert!(store.grades().is_empty());
}

#[test]
fn test_offline_storage_keeps_in_memory_changes() {
    let mut store = GradeStore::new(KvStorage::new(MemoryKv::new()));
    let semester = store.add_semester(NewSemester::new(1, SemesterType::First, "2024-2025"));
    store.storage_mut().kv_mut().toggle_offline();

    let grade = store
        .add_grade(NewGrade::new(semester.id, "CS 21", "Data Structures", 3.0, 97.0))
        .unwrap();

    assert!(store.grade(&grade.id).is_some());
    assert_close(store.semester_qpi(&semester.id).unwrap().qpi, 4.0);
    assert!(store.save_data().is_err());

    store.storage_mut().kv_mut().toggle_offline();
    store.save_data().unwrap();
    assert_eq!(store.storage().load_grades().unwrap().len(), 1);
}

#[test]
fn test_summer_excluded_from_cumulative() {
    let mut store = GradeStore::new(KvStorage::new(MemoryKv::new()));
    store.initialize_academic_record(RecordConfig {
        total_years: 4,
        include_summer: false,
    });
    let regular = store.add_semester(NewSemester::new(1, SemesterType::First, "2024-2025"));
    let summer = store.add_semester(NewSemester::new(1, SemesterType::Summer, "2025"));
    store
        .add_grade(NewGrade::new(regular.id, "A", "A", 3.0, 80.0))
        .unwrap();
    store
        .add_grade(NewGrade::new(summer.id, "B", "B", 3.0, 97.0))
        .unwrap();

    assert_close(store.semester_qpi(&summer.id).unwrap().qpi, 4.0);
    assert_close(store.cumulative_qpi().unwrap().qpi, 2.0);
    assert_close(store.year_qpi(1).unwrap().qpi, 2.0);
    assert_close(store.academic_record().unwrap().total_units, 3.0);
}
