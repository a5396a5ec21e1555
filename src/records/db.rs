//! SQLite record store
//!
//! Handles all database interactions for students and scores.

use crate::error::AppError;
use crate::records::models::{
    GradeAggregate, NewStudent, Score, ScoreSummary, Student, StudentChanges, StudentDeletion,
    StudentWithScores, SubjectScores,
};
use crate::records::store::RecordStore;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};

const STUDENT_COLUMNS: &str = "id, student_number, name, contact, email, address, \
     registered_date, created_at, updated_at";

const SCORE_COLUMNS: &str = "id, java_score, python_score, c_score, registered_date, \
     total_score, average_score, student_number, created_at, updated_at";

/// One row of the student/score left join; score columns are NULL for a
/// student without score sheets
#[derive(FromRow)]
struct StudentScoreRow {
    id: i64,
    student_number: String,
    name: String,
    contact: Option<String>,
    email: Option<String>,
    address: Option<String>,
    score_id: Option<i64>,
    java_score: Option<i64>,
    python_score: Option<i64>,
    c_score: Option<i64>,
    total_score: Option<i64>,
    average_score: Option<i64>,
}

impl StudentScoreRow {
    fn score(&self) -> Option<ScoreSummary> {
        Some(ScoreSummary {
            id: self.score_id?,
            java_score: self.java_score?,
            python_score: self.python_score?,
            c_score: self.c_score?,
            total_score: self.total_score?,
            average_score: self.average_score?,
        })
    }
}

/// Record store backed by an SQLite connection pool
#[derive(Clone)]
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    /// Open a connection pool
    ///
    /// # Arguments
    /// * `database_url` - sqlx connection string, e.g. `sqlite:student.db`
    /// * `max_connections` - Upper bound on pooled connections
    ///
    /// The database file is created if missing. The schema is not touched;
    /// run [`SqliteRecordStore::migrate`] (or the `migrate` binary) first.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let connection_string = if database_url.starts_with("sqlite:") {
            database_url.to_string()
        } else {
            format!("sqlite:{}", database_url)
        };

        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| AppError::Database(format!("Invalid database url: {}", e)))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to database: {}", e)))?;

        info!("Connected to SQLite database at: {}", database_url);
        Ok(Self { pool })
    }

    /// Open a private, migrated in-memory database
    ///
    /// The pool holds exactly one connection that never expires, since every
    /// SQLite `:memory:` connection is its own database.
    pub async fn in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::Database(format!("Invalid database url: {}", e)))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to open in-memory database: {}", e)))?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Apply pending versioned migrations from `migrations/`
    pub async fn migrate(&self) -> Result<(), AppError> {
        info!("Running database migrations...");

        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {}", e)))?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get the database pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn create_student(&self, student: NewStudent) -> Result<Student, AppError> {
        let now = Utc::now();
        let created = sqlx::query_as::<_, Student>(&format!(
            "INSERT INTO students (student_number, name, contact, email, address, \
             registered_date, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING {}",
            STUDENT_COLUMNS
        ))
        .bind(&student.student_number)
        .bind(&student.name)
        .bind(&student.contact)
        .bind(&student.email)
        .bind(&student.address)
        .bind(now)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to create student: {}", e)))?;

        debug!("Created student {} ({})", created.id, created.student_number);
        Ok(created)
    }

    async fn grade_aggregates(&self) -> Result<Vec<GradeAggregate>, AppError> {
        let aggregates = sqlx::query_as::<_, GradeAggregate>(
            "SELECT s.student_number, s.name, s.contact, s.email, s.address, \
             AVG(sc.average_score) AS average_score, SUM(sc.total_score) AS total_score \
             FROM students s LEFT JOIN scores sc ON sc.student_number = s.student_number \
             GROUP BY s.id, s.student_number",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to aggregate grades: {}", e)))?;

        Ok(aggregates)
    }

    async fn update_student(&self, id: i64, changes: StudentChanges) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE students SET name = COALESCE(?, name), contact = COALESCE(?, contact), \
             email = COALESCE(?, email), address = COALESCE(?, address), updated_at = ? \
             WHERE id = ?",
        )
        .bind(&changes.name)
        .bind(&changes.contact)
        .bind(&changes.email)
        .bind(&changes.address)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to update student: {}", e)))?;

        debug!("Updated student {}: {} row(s)", id, result.rows_affected());
        Ok(result.rows_affected())
    }

    async fn delete_student(&self, id: i64) -> Result<StudentDeletion, AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let student_number: Option<String> =
            sqlx::query_scalar("SELECT student_number FROM students WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| AppError::Database(format!("Failed to fetch student: {}", e)))?;

        let Some(student_number) = student_number else {
            debug!("Delete requested for unknown student {}", id);
            return Ok(StudentDeletion::default());
        };

        let scores = sqlx::query("DELETE FROM scores WHERE student_number = ?")
            .bind(&student_number)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete scores: {}", e)))?
            .rows_affected();

        let students = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete student: {}", e)))?
            .rows_affected();

        tx.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit deletion: {}", e)))?;

        debug!(
            "Deleted student {} ({}) with {} score sheet(s)",
            id, student_number, scores
        );
        Ok(StudentDeletion { students, scores })
    }

    async fn find_student(
        &self,
        student_number: &str,
    ) -> Result<Option<StudentWithScores>, AppError> {
        let rows = sqlx::query_as::<_, StudentScoreRow>(
            "SELECT s.id, s.student_number, s.name, s.contact, s.email, s.address, \
             sc.id AS score_id, sc.java_score, sc.python_score, sc.c_score, \
             sc.total_score, sc.average_score \
             FROM students s LEFT JOIN scores sc ON sc.student_number = s.student_number \
             WHERE s.student_number = ? ORDER BY sc.id ASC",
        )
        .bind(student_number)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to fetch student: {}", e)))?;

        let scores: Vec<ScoreSummary> = rows.iter().filter_map(StudentScoreRow::score).collect();
        let Some(row) = rows.into_iter().next() else {
            return Ok(None);
        };

        Ok(Some(StudentWithScores {
            id: row.id,
            student_number: row.student_number,
            name: row.name,
            contact: row.contact,
            email: row.email,
            address: row.address,
            scores,
        }))
    }

    async fn create_score(
        &self,
        student_number: &str,
        scores: SubjectScores,
    ) -> Result<Score, AppError> {
        let now = Utc::now();
        let created = sqlx::query_as::<_, Score>(&format!(
            "INSERT INTO scores (java_score, python_score, c_score, registered_date, \
             total_score, average_score, student_number, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {}",
            SCORE_COLUMNS
        ))
        .bind(scores.java)
        .bind(scores.python)
        .bind(scores.c)
        .bind(now)
        .bind(scores.total())
        .bind(scores.average())
        .bind(student_number)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to create score: {}", e)))?;

        debug!("Created score {} for student {}", created.id, student_number);
        Ok(created)
    }

    async fn update_scores(
        &self,
        student_number: &str,
        scores: SubjectScores,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE scores SET java_score = ?, python_score = ?, c_score = ?, \
             total_score = ?, average_score = ?, updated_at = ? WHERE student_number = ?",
        )
        .bind(scores.java)
        .bind(scores.python)
        .bind(scores.c)
        .bind(scores.total())
        .bind(scores.average())
        .bind(Utc::now())
        .bind(student_number)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to update scores: {}", e)))?;

        debug!(
            "Updated scores for student {}: {} row(s)",
            student_number,
            result.rows_affected()
        );
        Ok(result.rows_affected())
    }

    async fn delete_scores(&self, student_number: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM scores WHERE student_number = ?")
            .bind(student_number)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete scores: {}", e)))?;

        debug!(
            "Deleted scores for student {}: {} row(s)",
            student_number,
            result.rows_affected()
        );
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> SqliteRecordStore {
        SqliteRecordStore::in_memory()
            .await
            .expect("Failed to open in-memory store")
    }

    fn new_student(student_number: &str, name: &str) -> NewStudent {
        NewStudent {
            student_number: student_number.to_string(),
            name: name.to_string(),
            contact: Some("010-1234-5678".to_string()),
            email: Some(format!("{}@example.com", student_number)),
            address: Some("Seoul".to_string()),
        }
    }

    fn scores(java: i64, python: i64, c: i64) -> SubjectScores {
        SubjectScores { java, python, c }
    }

    #[tokio::test]
    async fn test_create_student_sets_registration_time() {
        let store = test_store().await;
        let before = Utc::now();
        let student = store
            .create_student(new_student("2024001", "Kim"))
            .await
            .expect("Failed to create student");
        let after = Utc::now();

        assert_eq!(student.student_number, "2024001");
        assert_eq!(student.name, "Kim");
        assert!(student.id > 0);
        assert!(student.registered_date >= before && student.registered_date <= after);
    }

    #[tokio::test]
    async fn test_duplicate_student_number_is_database_error() {
        let store = test_store().await;
        store
            .create_student(new_student("2024001", "Kim"))
            .await
            .expect("Failed to create student");

        let result = store.create_student(new_student("2024001", "Lee")).await;
        match result {
            Err(AppError::Database(_)) => {}
            other => panic!("Expected Database error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_score_computes_aggregates() {
        let store = test_store().await;
        let score = store
            .create_score("2024001", scores(80, 90, 100))
            .await
            .expect("Failed to create score");

        assert_eq!(score.total_score, 270);
        assert_eq!(score.average_score, 90);
        assert_eq!(score.student_number, "2024001");
    }

    #[tokio::test]
    async fn test_grade_aggregates_average_of_averages() {
        let store = test_store().await;
        store.create_student(new_student("A", "Ann")).await.unwrap();
        store.create_student(new_student("B", "Ben")).await.unwrap();
        // averages 81 and 90 -> 85.5; totals 243 + 270
        store.create_score("A", scores(80, 81, 82)).await.unwrap();
        store.create_score("A", scores(80, 90, 100)).await.unwrap();

        let mut aggregates = store.grade_aggregates().await.unwrap();
        aggregates.sort_by(|a, b| a.student_number.cmp(&b.student_number));

        assert_eq!(aggregates.len(), 2);
        assert_eq!(aggregates[0].average_score, Some(85.5));
        assert_eq!(aggregates[0].total_score, Some(513));
        assert_eq!(aggregates[1].average_score, None);
        assert_eq!(aggregates[1].total_score, None);
    }

    #[tokio::test]
    async fn test_update_student_keeps_absent_fields() {
        let store = test_store().await;
        let student = store.create_student(new_student("2024001", "Kim")).await.unwrap();

        let affected = store
            .update_student(
                student.id,
                StudentChanges {
                    name: Some("Kim Minji".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(affected, 1);

        let found = store.find_student("2024001").await.unwrap().unwrap();
        assert_eq!(found.name, "Kim Minji");
        assert_eq!(found.email.as_deref(), Some("2024001@example.com"));
    }

    #[tokio::test]
    async fn test_update_unknown_student_affects_nothing() {
        let store = test_store().await;
        let affected = store
            .update_student(
                42,
                StudentChanges {
                    name: Some("Nobody".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(affected, 0);
    }

    #[tokio::test]
    async fn test_update_scores_overwrites_every_sheet() {
        let store = test_store().await;
        store.create_score("2024001", scores(10, 20, 30)).await.unwrap();
        store.create_score("2024001", scores(40, 50, 60)).await.unwrap();
        store.create_score("2024002", scores(1, 2, 3)).await.unwrap();

        let affected = store
            .update_scores("2024001", scores(70, 80, 90))
            .await
            .unwrap();
        assert_eq!(affected, 2);

        store.create_student(new_student("2024001", "Kim")).await.unwrap();
        let found = store.find_student("2024001").await.unwrap().unwrap();
        assert_eq!(found.scores.len(), 2);
        assert!(found
            .scores
            .iter()
            .all(|s| s.total_score == 240 && s.average_score == 80));
    }

    #[tokio::test]
    async fn test_delete_student_removes_own_scores_only() {
        let store = test_store().await;
        // Score id 1 belongs to another student; student id 1 owns score id 2.
        let other = store.create_score("OTHER", scores(50, 50, 50)).await.unwrap();
        let student = store.create_student(new_student("2024001", "Kim")).await.unwrap();
        store.create_score("2024001", scores(90, 90, 90)).await.unwrap();
        assert_eq!(other.id, student.id);

        let deletion = store.delete_student(student.id).await.unwrap();
        assert_eq!(deletion, StudentDeletion { students: 1, scores: 1 });

        assert!(store.find_student("2024001").await.unwrap().is_none());
        assert_eq!(store.delete_scores("OTHER").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_student_is_noop() {
        let store = test_store().await;
        let deletion = store.delete_student(99).await.unwrap();
        assert_eq!(deletion, StudentDeletion::default());
    }

    #[tokio::test]
    async fn test_find_student_joins_scores_in_order() {
        let store = test_store().await;
        store.create_student(new_student("2024001", "Kim")).await.unwrap();
        store.create_student(new_student("2024002", "Lee")).await.unwrap();
        let first = store.create_score("2024001", scores(80, 90, 100)).await.unwrap();
        store.create_score("2024002", scores(1, 1, 1)).await.unwrap();
        let second = store.create_score("2024001", scores(60, 60, 60)).await.unwrap();

        let found = store.find_student("2024001").await.unwrap().unwrap();
        assert_eq!(found.name, "Kim");
        let ids: Vec<i64> = found.scores.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert_eq!(found.scores[0].total_score, 270);
        assert_eq!(found.scores[1].average_score, 60);

        let lee = store.find_student("2024002").await.unwrap().unwrap();
        assert_eq!(lee.scores.len(), 1);
        store.delete_scores("2024002").await.unwrap();
        let without_scores = store.find_student("2024002").await.unwrap().unwrap();
        assert_eq!(without_scores.name, "Lee");
        assert!(without_scores.scores.is_empty());
    }

    #[tokio::test]
    async fn test_find_missing_student_is_none() {
        let store = test_store().await;
        assert!(store.find_student("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let store = test_store().await;
        store.migrate().await.expect("Second migration run should succeed");
    }
}
