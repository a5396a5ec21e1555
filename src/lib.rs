//! Student Records Library
//!
//! A student and course-score record service: registration, lookup, update
//! and deletion of students, per-subject score sheets, and a ranked grade
//! listing. The binaries are in `src/main.rs` and `src/bin/migrate.rs`.

pub mod api;
pub mod config;
pub mod error;
pub mod records;
pub mod state;

pub use api::router;
pub use config::Config;
pub use error::AppError;
pub use state::AppState;
