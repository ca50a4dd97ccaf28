//! Field-level validation shared by the profile, launch, and review forms.
//!
//! Field labels use the camelCase names clients submit, so adapters can echo
//! them back in error details unchanged.

use std::fmt;

use serde_json::json;
use url::Url;

use crate::domain::Error;

/// What was wrong with a submitted field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldProblem {
    Empty,
    TooShort { min: usize },
    TooLong { max: usize },
    OutOfRange { min: i64, max: i64 },
    UnknownValue(String),
    InvalidUrl,
    TooMany { max: usize },
}

impl FieldProblem {
    /// Stable machine-readable code for error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::TooShort { .. } => "too_short",
            Self::TooLong { .. } => "too_long",
            Self::OutOfRange { .. } => "out_of_range",
            Self::UnknownValue(_) => "unknown_value",
            Self::InvalidUrl => "invalid_url",
            Self::TooMany { .. } => "too_many",
        }
    }
}

/// Validation failure for one named field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub problem: FieldProblem,
}

impl FieldError {
    pub fn new(field: &'static str, problem: FieldProblem) -> Self {
        Self { field, problem }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = self.field;
        match &self.problem {
            FieldProblem::Empty => write!(f, "{field} must not be empty"),
            FieldProblem::TooShort { min } => {
                write!(f, "{field} must be at least {min} characters")
            }
            FieldProblem::TooLong { max } => write!(f, "{field} must be at most {max} characters"),
            FieldProblem::OutOfRange { min, max } => {
                write!(f, "{field} must be between {min} and {max}")
            }
            FieldProblem::UnknownValue(value) => write!(f, "{field} has unknown value {value}"),
            FieldProblem::InvalidUrl => write!(f, "{field} must be an http(s) URL"),
            FieldProblem::TooMany { max } => write!(f, "{field} accepts at most {max} entries"),
        }
    }
}

impl std::error::Error for FieldError {}

impl From<FieldError> for Error {
    fn from(err: FieldError) -> Self {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": err.field,
            "code": err.problem.code(),
        }))
    }
}

/// Trim and bound a required text field.
pub(crate) fn required_text(
    field: &'static str,
    raw: &str,
    min: usize,
    max: usize,
) -> Result<String, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new(field, FieldProblem::Empty));
    }
    let length = trimmed.chars().count();
    if length < min {
        return Err(FieldError::new(field, FieldProblem::TooShort { min }));
    }
    if length > max {
        return Err(FieldError::new(field, FieldProblem::TooLong { max }));
    }
    Ok(trimmed.to_owned())
}

/// Trim an optional text field; blank input becomes `None`.
pub(crate) fn optional_text(
    field: &'static str,
    raw: Option<&str>,
    max: usize,
) -> Result<Option<String>, FieldError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) if value.chars().count() > max => {
            Err(FieldError::new(field, FieldProblem::TooLong { max }))
        }
        Some(value) => Ok(Some(value.to_owned())),
    }
}

/// Parse an optional http(s) URL; blank input becomes `None`.
pub(crate) fn optional_url(field: &'static str, raw: Option<&str>) -> Result<Option<Url>, FieldError> {
    let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    let url = Url::parse(value).map_err(|_| FieldError::new(field, FieldProblem::InvalidUrl))?;
    match url.scheme() {
        "http" | "https" => Ok(Some(url)),
        _ => Err(FieldError::new(field, FieldProblem::InvalidUrl)),
    }
}

/// Trim, drop blanks, and de-duplicate a list while keeping first-seen order.
pub(crate) fn normalise_list(
    field: &'static str,
    values: &[String],
    max_items: usize,
    max_len: usize,
) -> Result<Vec<String>, FieldError> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.chars().count() > max_len {
            return Err(FieldError::new(field, FieldProblem::TooLong { max: max_len }));
        }
        if out.iter().any(|existing| existing.eq_ignore_ascii_case(trimmed)) {
            continue;
        }
        out.push(trimmed.to_owned());
    }
    if out.len() > max_items {
        return Err(FieldError::new(field, FieldProblem::TooMany { max: max_items }));
    }
    Ok(out)
}

/// Bound an integer into `[min, max]`.
pub(crate) fn bounded(field: &'static str, value: i64, min: i64, max: i64) -> Result<i64, FieldError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(FieldError::new(field, FieldProblem::OutOfRange { min, max }))
    }
}
