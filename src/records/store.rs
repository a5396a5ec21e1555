//! Record store capability
//!
//! Handlers only see this trait; the concrete store is chosen at startup
//! and injected through the router state.

use crate::error::AppError;
use crate::records::models::{
    GradeAggregate, NewStudent, Score, Student, StudentChanges, StudentDeletion,
    StudentWithScores, SubjectScores,
};
use async_trait::async_trait;

/// Create/read/update/delete operations over students and scores
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a student, stamping the registration time
    async fn create_student(&self, student: NewStudent) -> Result<Student, AppError>;

    /// One aggregate per student over all linked score sheets, in no particular order
    async fn grade_aggregates(&self) -> Result<Vec<GradeAggregate>, AppError>;

    /// Apply changes to the student row with this identifier, returning rows affected
    async fn update_student(&self, id: i64, changes: StudentChanges) -> Result<u64, AppError>;

    /// Remove the student row with this identifier and that student's score sheets
    async fn delete_student(&self, id: i64) -> Result<StudentDeletion, AppError>;

    /// Look up a student and their score sheets by student number
    async fn find_student(
        &self,
        student_number: &str,
    ) -> Result<Option<StudentWithScores>, AppError>;

    /// Insert a score sheet for a student number
    async fn create_score(
        &self,
        student_number: &str,
        scores: SubjectScores,
    ) -> Result<Score, AppError>;

    /// Overwrite every score sheet of a student number, returning rows affected
    async fn update_scores(
        &self,
        student_number: &str,
        scores: SubjectScores,
    ) -> Result<u64, AppError>;

    /// Remove every score sheet of a student number, returning rows removed
    async fn delete_scores(&self, student_number: &str) -> Result<u64, AppError>;
}
