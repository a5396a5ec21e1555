//! API module
//!
//! Contains HTTP request handlers and the router that wires them together.

pub mod extract;
pub mod middleware;
pub mod scores;
pub mod students;
pub mod utils;

use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the application router with all routes and middleware
///
/// Routes sharing the segment after `/students/` must share a parameter
/// name, so `:id` carries a row id on `/students/:id` and a student number
/// on `/students/:id/scores`.
///
/// Static segments win over parameters: a student number of `grades`,
/// `search` or `scores` cannot be used in `/students/:id/scores`. Such a
/// request lands on the static route and gets a JSON 405.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/students", post(students::register_student))
        .route("/students/grades", get(students::list_grades))
        .route(
            "/students/search/:student_number",
            get(students::search_student),
        )
        .route(
            "/students/scores/:student_number",
            put(scores::update_scores).delete(scores::delete_scores),
        )
        .route(
            "/students/:id",
            put(students::update_student).delete(students::delete_student),
        )
        .route("/students/:id/scores", post(scores::register_scores))
        .layer(axum::middleware::from_fn(middleware::method_not_allowed_as_json))
        // Middleware (order matters - request_id should be first)
        .layer(axum::middleware::from_fn(middleware::request_id))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
