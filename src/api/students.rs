//! Student API handlers
//!
//! Contains HTTP request handlers for student registration, lookup, update,
//! deletion, and the ranked grade listing.

use crate::api::extract::JsonOrForm;
use crate::api::utils::{self, TextValue};
use crate::error::AppError;
use crate::records::{
    rank_students, NewStudent, RankedStudent, Student, StudentChanges, StudentWithScores,
};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Register student request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    /// Externally assigned student number (required, string or integer)
    pub student_number: Option<TextValue>,
    /// Full name (required)
    pub name: Option<String>,
    /// Contact detail
    pub contact: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Postal address
    pub address: Option<String>,
}

impl CreateStudentRequest {
    /// Validate the request into store input
    pub fn validate(self) -> Result<NewStudent, AppError> {
        Ok(NewStudent {
            student_number: utils::required_text(
                "studentNumber",
                self.student_number.map(TextValue::into_text),
            )?,
            name: utils::required_text("name", self.name)?,
            contact: utils::optional_text("contact", self.contact)?,
            email: utils::optional_text("email", self.email)?,
            address: utils::optional_text("address", self.address)?,
        })
    }
}

/// Update student request
///
/// Absent fields are left unchanged; at least one field must be present.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateStudentRequest {
    /// New name
    pub name: Option<String>,
    /// New contact detail
    pub contact: Option<String>,
    /// New email address
    pub email: Option<String>,
    /// New postal address
    pub address: Option<String>,
}

impl UpdateStudentRequest {
    /// Validate the request into store input
    pub fn validate(self) -> Result<StudentChanges, AppError> {
        let name = match self.name {
            Some(name) => Some(utils::required_text("name", Some(name))?),
            None => None,
        };
        let changes = StudentChanges {
            name,
            contact: utils::optional_text("contact", self.contact)?,
            email: utils::optional_text("email", self.email)?,
            address: utils::optional_text("address", self.address)?,
        };
        if changes.is_empty() {
            return Err(AppError::InvalidInput(
                "At least one of name, contact, email, address is required".to_string(),
            ));
        }
        Ok(changes)
    }
}

/// Update acknowledgement
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    /// Rows changed by the update
    pub affected_rows: u64,
}

/// Student deletion acknowledgement
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteStudentResponse {
    /// Human-readable message
    pub message: String,
    /// Status indicator
    pub status: String,
    /// Student rows removed
    pub deleted_students: u64,
    /// Score rows removed with the student
    pub deleted_scores: u64,
}

/// POST /students - Register a student
pub async fn register_student(
    State(state): State<AppState>,
    JsonOrForm(request): JsonOrForm<CreateStudentRequest>,
) -> Result<Json<Student>, AppError> {
    let new_student = request.validate()?;
    let student = state.store.create_student(new_student).await?;

    info!(
        student_id = student.id,
        student_number = %student.student_number,
        "Registered student"
    );
    Ok(Json(student))
}

/// GET /students/grades - Every student ranked by aggregated average
pub async fn list_grades(
    State(state): State<AppState>,
) -> Result<Json<Vec<RankedStudent>>, AppError> {
    let aggregates = state.store.grade_aggregates().await?;
    Ok(Json(rank_students(aggregates)))
}

/// PUT /students/:id - Update a student's contact details
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonOrForm(request): JsonOrForm<UpdateStudentRequest>,
) -> Result<Json<UpdateResponse>, AppError> {
    let id = utils::student_id(&id)?;
    let changes = request.validate()?;
    let affected_rows = state.store.update_student(id, changes).await?;

    info!(student_id = id, affected_rows, "Updated student");
    Ok(Json(UpdateResponse { affected_rows }))
}

/// DELETE /students/:id - Delete a student and their score sheets
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteStudentResponse>, AppError> {
    let id = utils::student_id(&id)?;
    let deletion = state.store.delete_student(id).await?;

    info!(
        student_id = id,
        deleted_students = deletion.students,
        deleted_scores = deletion.scores,
        "Deleted student"
    );
    Ok(Json(DeleteStudentResponse {
        message: "Student deleted successfully".to_string(),
        status: "ok".to_string(),
        deleted_students: deletion.students,
        deleted_scores: deletion.scores,
    }))
}

/// GET /students/search/:student_number - Find a student with their score sheets
pub async fn search_student(
    State(state): State<AppState>,
    Path(student_number): Path<String>,
) -> Result<Json<Option<StudentWithScores>>, AppError> {
    let student = state.store.find_student(&student_number).await?;
    Ok(Json(student))
}
