//! Records module
//!
//! Students, score sheets, the store that persists them, and the ranking
//! of students by aggregated average.

pub mod db;
pub mod models;
pub mod ranking;
pub mod store;

pub use db::SqliteRecordStore;
pub use models::{
    GradeAggregate, NewStudent, RankedStudent, Score, ScoreSummary, Student, StudentChanges,
    StudentDeletion, StudentWithScores, SubjectScores,
};
pub use ranking::rank_students;
pub use store::RecordStore;
