//! API utility functions
//!
//! Input validation helpers shared by the student and score handlers.

use crate::error::AppError;
use serde::Deserialize;

/// Maximum length of any free-text field, in characters
pub const MAX_TEXT_LENGTH: usize = 255;

/// Lowest accepted subject score
pub const MIN_SCORE: i64 = 0;

/// Highest accepted subject score
pub const MAX_SCORE: i64 = 100;

/// A subject score as submitted: a JSON integer or a numeric string
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ScoreValue {
    /// Integer value
    Number(i64),
    /// Text to be parsed as an integer
    Text(String),
}

/// An identifier as submitted: a JSON string or a JSON integer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TextValue {
    /// Text value
    Text(String),
    /// Integer value, stored as its decimal text
    Number(i64),
}

impl TextValue {
    /// The value as text
    pub fn into_text(self) -> String {
        match self {
            TextValue::Text(text) => text,
            TextValue::Number(n) => n.to_string(),
        }
    }
}

/// Validate a required text field
///
/// # Returns
/// * `Ok(String)` - The trimmed value
/// * `Err(AppError)` - Value is missing, blank, or too long
pub fn required_text(field: &str, value: Option<String>) -> Result<String, AppError> {
    match optional_text(field, value)? {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(AppError::InvalidInput(format!("{} is required", field))),
    }
}

/// Validate an optional text field, trimming it when present
pub fn optional_text(field: &str, value: Option<String>) -> Result<Option<String>, AppError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.chars().count() > MAX_TEXT_LENGTH {
        return Err(AppError::InvalidInput(format!(
            "{} exceeds maximum length of {} characters",
            field, MAX_TEXT_LENGTH
        )));
    }
    Ok(Some(trimmed.to_string()))
}

/// Validate a required subject score
///
/// # Returns
/// * `Ok(i64)` - An integer within `MIN_SCORE..=MAX_SCORE`
/// * `Err(AppError)` - Value is missing, not an integer, or out of range
pub fn score(field: &str, value: Option<ScoreValue>) -> Result<i64, AppError> {
    let number = match value {
        None => return Err(AppError::InvalidInput(format!("{} is required", field))),
        Some(ScoreValue::Number(n)) => n,
        Some(ScoreValue::Text(text)) => text.trim().parse::<i64>().map_err(|_| {
            AppError::InvalidInput(format!("{} must be an integer, got {:?}", field, text))
        })?,
    };

    if !(MIN_SCORE..=MAX_SCORE).contains(&number) {
        return Err(AppError::InvalidInput(format!(
            "{} must be between {} and {}, got {}",
            field, MIN_SCORE, MAX_SCORE, number
        )));
    }
    Ok(number)
}

/// Parse a student row identifier from a path segment
pub fn student_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::InvalidInput(format!("Invalid student id: {:?}", raw)))
}
