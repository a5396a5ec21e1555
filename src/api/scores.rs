//! Score API handlers
//!
//! Score sheets are always addressed by student number.

use crate::api::extract::JsonOrForm;
use crate::api::students::UpdateResponse;
use crate::api::utils::{self, ScoreValue};
use crate::error::AppError;
use crate::records::{Score, SubjectScores};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Register or update scores request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoresRequest {
    /// Java score
    pub java_score: Option<ScoreValue>,
    /// Python score
    pub python_score: Option<ScoreValue>,
    /// C score
    pub c_score: Option<ScoreValue>,
}

impl ScoresRequest {
    /// Validate the request into subject scores
    pub fn validate(self) -> Result<SubjectScores, AppError> {
        Ok(SubjectScores {
            java: utils::score("javaScore", self.java_score)?,
            python: utils::score("pythonScore", self.python_score)?,
            c: utils::score("cScore", self.c_score)?,
        })
    }
}

/// Score deletion acknowledgement
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteScoresResponse {
    /// Human-readable message
    pub message: String,
    /// Status indicator
    pub status: String,
    /// Score rows removed
    pub deleted_scores: u64,
}

/// POST /students/:student_number/scores - Record a score sheet
///
/// The student number is not checked against registered students.
pub async fn register_scores(
    State(state): State<AppState>,
    Path(student_number): Path<String>,
    JsonOrForm(request): JsonOrForm<ScoresRequest>,
) -> Result<Json<Score>, AppError> {
    let scores = request.validate()?;
    let score = state.store.create_score(&student_number, scores).await?;

    info!(
        score_id = score.id,
        student_number = %student_number,
        total_score = score.total_score,
        "Registered scores"
    );
    Ok(Json(score))
}

/// PUT /students/scores/:student_number - Overwrite every score sheet of a student
pub async fn update_scores(
    State(state): State<AppState>,
    Path(student_number): Path<String>,
    JsonOrForm(request): JsonOrForm<ScoresRequest>,
) -> Result<Json<UpdateResponse>, AppError> {
    let scores = request.validate()?;
    let affected_rows = state.store.update_scores(&student_number, scores).await?;

    info!(student_number = %student_number, affected_rows, "Updated scores");
    Ok(Json(UpdateResponse { affected_rows }))
}

/// DELETE /students/scores/:student_number - Delete every score sheet of a student
pub async fn delete_scores(
    State(state): State<AppState>,
    Path(student_number): Path<String>,
) -> Result<Json<DeleteScoresResponse>, AppError> {
    let deleted_scores = state.store.delete_scores(&student_number).await?;

    info!(student_number = %student_number, deleted_scores, "Deleted scores");
    Ok(Json(DeleteScoresResponse {
        message: "Scores deleted successfully".to_string(),
        status: "ok".to_string(),
        deleted_scores,
    }))
}
