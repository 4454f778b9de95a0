//! Data models for `qpi-tracker`

pub mod academic_record;
pub mod grade;
pub mod semester;

pub use academic_record::{AcademicRecord, RecordConfig};
pub use grade::{GradeId, GradeRecord, GradeUpdate, NewGrade};
pub use semester::{NewSemester, SemesterId, SemesterRecord, SemesterType, SemesterUpdate};
