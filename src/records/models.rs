//! Record data models
//!
//! Defines structures for students, their scores, and the per-student
//! grade aggregates used by the ranked listing.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A registered student
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Auto-incrementing row identifier
    pub id: i64,
    /// Externally assigned, unique student number
    pub student_number: String,
    /// Full name
    pub name: String,
    /// Phone or other contact detail
    pub contact: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Postal address
    pub address: Option<String>,
    /// When the student was registered
    pub registered_date: DateTime<Utc>,
    /// When the row was inserted
    pub created_at: DateTime<Utc>,
    /// When the row was last modified
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when registering a student
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    /// Externally assigned student number
    pub student_number: String,
    /// Full name
    pub name: String,
    /// Phone or other contact detail
    pub contact: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Postal address
    pub address: Option<String>,
}

/// Replacement values for a student's editable fields
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentChanges {
    /// New name
    pub name: Option<String>,
    /// New contact detail
    pub contact: Option<String>,
    /// New email address
    pub email: Option<String>,
    /// New postal address
    pub address: Option<String>,
}

impl StudentChanges {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.contact.is_none() && self.email.is_none() && self.address.is_none()
    }
}

/// Rows removed by a student deletion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StudentDeletion {
    /// Student rows removed (0 or 1)
    pub students: u64,
    /// Score rows removed alongside the student
    pub scores: u64,
}

/// The three subject scores of one score sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubjectScores {
    /// Java score
    pub java: i64,
    /// Python score
    pub python: i64,
    /// C score
    pub c: i64,
}

impl SubjectScores {
    /// Sum of the three subject scores
    pub fn total(&self) -> i64 {
        self.java + self.python + self.c
    }

    /// Integer floor of the total divided by three
    pub fn average(&self) -> i64 {
        self.total().div_euclid(3)
    }
}

/// A stored score sheet
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    /// Auto-incrementing row identifier
    pub id: i64,
    /// Java score
    pub java_score: i64,
    /// Python score
    pub python_score: i64,
    /// C score
    pub c_score: i64,
    /// When the scores were registered
    pub registered_date: DateTime<Utc>,
    /// Sum of the three subject scores
    pub total_score: i64,
    /// Floor of the total divided by three
    pub average_score: i64,
    /// Student number this sheet belongs to
    pub student_number: String,
    /// When the row was inserted
    pub created_at: DateTime<Utc>,
    /// When the row was last modified
    pub updated_at: DateTime<Utc>,
}

/// Score columns exposed by the student search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    /// Score row identifier
    pub id: i64,
    /// Java score
    pub java_score: i64,
    /// Python score
    pub python_score: i64,
    /// C score
    pub c_score: i64,
    /// Sum of the three subject scores
    pub total_score: i64,
    /// Floor of the total divided by three
    pub average_score: i64,
}

/// A student together with every score sheet recorded for them
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentWithScores {
    /// Student row identifier
    pub id: i64,
    /// Student number
    pub student_number: String,
    /// Full name
    pub name: String,
    /// Contact detail
    pub contact: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Postal address
    pub address: Option<String>,
    /// All score sheets linked by student number
    pub scores: Vec<ScoreSummary>,
}

/// Per-student aggregate over all linked score sheets
///
/// Both aggregates are `None` for a student with no score sheets.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct GradeAggregate {
    /// Student number
    pub student_number: String,
    /// Full name
    pub name: String,
    /// Contact detail
    pub contact: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Postal address
    pub address: Option<String>,
    /// Mean of the sheets' stored average scores
    pub average_score: Option<f64>,
    /// Sum of the sheets' total scores
    pub total_score: Option<i64>,
}

/// One entry of the ranked grade listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedStudent {
    /// Student number
    pub student_number: String,
    /// Full name
    pub name: String,
    /// Contact detail
    pub contact: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Postal address
    pub address: Option<String>,
    /// Sum of all total scores (0 without scores)
    pub total_score: i64,
    /// Mean of all average scores (0 without scores)
    pub average_score: f64,
    /// 1-based position in the listing
    pub rank: usize,
    /// Number of students in the listing
    pub total_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_total_and_average() {
        let scores = SubjectScores { java: 80, python: 90, c: 100 };
        assert_eq!(scores.total(), 270);
        assert_eq!(scores.average(), 90);
    }

    #[test]
    fn test_average_is_floored() {
        let scores = SubjectScores { java: 80, python: 81, c: 82 };
        assert_eq!(scores.total(), 243);
        assert_eq!(scores.average(), 81);

        let scores = SubjectScores { java: 100, python: 100, c: 99 };
        assert_eq!(scores.total(), 299);
        assert_eq!(scores.average(), 99);
    }

    #[test]
    fn test_student_changes_is_empty() {
        assert!(StudentChanges::default().is_empty());
        let changes = StudentChanges {
            email: Some("kim@example.com".to_string()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
