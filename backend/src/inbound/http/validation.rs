//! Shared validation helpers for inbound HTTP adapters.

use std::str::FromStr;

use serde_json::json;

use crate::domain::{AuthValidationError, Error};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    UnknownValue,
    InvalidAuthField,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::UnknownValue => "unknown_value",
            ErrorCode::InvalidAuthField => "invalid_field",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

pub(crate) fn unknown_value_error(field: FieldName, value: &str, expected: &[&str]) -> Error {
    let field = field.as_str();
    ValidationError::new(
        field,
        format!("{field} must be one of {}", expected.join(", ")),
    )
    .with_value(ErrorCode::UnknownValue, value)
}

/// Parse a UUID-backed identifier from a path segment.
///
/// # Examples
/// ```ignore
/// let id: StartupId = parse_id("not-a-uuid", FieldName::new("startupId"))?;
/// ```
pub(crate) fn parse_id<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr<Err = uuid::Error>,
{
    value
        .parse::<T>()
        .map_err(|_| invalid_uuid_error(field, value))
}

/// Map sign-in and sign-up payload problems onto field-scoped errors.
pub(crate) fn map_auth_validation_error(err: AuthValidationError) -> Error {
    let field = match &err {
        AuthValidationError::Profile(inner) => match inner {
            crate::domain::UserValidationError::EmptyEmail
            | crate::domain::UserValidationError::InvalidEmail => "email",
            crate::domain::UserValidationError::EmptyFullName
            | crate::domain::UserValidationError::FullNameTooLong { .. } => "fullName",
            crate::domain::UserValidationError::UnknownUserType(_) => "userType",
            _ => "body",
        },
        AuthValidationError::EmptyPassword | AuthValidationError::PasswordTooShort { .. } => {
            "password"
        }
        AuthValidationError::AdminSignUpNotAllowed => "userType",
    };
    ValidationError::new(field, err.to_string()).with_code(ErrorCode::InvalidAuthField)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode as DomainCode, StartupId, UserValidationError};
    use rstest::rstest;
    use serde_json::Value;

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a str> {
        error
            .details()
            .and_then(|details| details.get(key))
            .and_then(Value::as_str)
    }

    #[rstest]
    fn parse_id_accepts_uuids() {
        let id = StartupId::random();
        let parsed: StartupId =
            parse_id(&id.to_string(), FieldName::new("startupId")).expect("valid id");
        assert_eq!(parsed, id);
    }

    #[rstest]
    fn parse_id_rejects_garbage_with_field_details() {
        let error = parse_id::<StartupId>("nope", FieldName::new("startupId"))
            .expect_err("invalid id");
        assert_eq!(error.code(), DomainCode::InvalidRequest);
        assert_eq!(detail(&error, "field"), Some("startupId"));
        assert_eq!(detail(&error, "value"), Some("nope"));
        assert_eq!(detail(&error, "code"), Some("invalid_uuid"));
    }

    #[rstest]
    #[case(AuthValidationError::Profile(UserValidationError::InvalidEmail), "email")]
    #[case(AuthValidationError::EmptyPassword, "password")]
    #[case(AuthValidationError::PasswordTooShort { min: 6 }, "password")]
    #[case(AuthValidationError::Profile(UserValidationError::EmptyFullName), "fullName")]
    #[case(AuthValidationError::AdminSignUpNotAllowed, "userType")]
    fn auth_validation_errors_name_their_field(
        #[case] err: AuthValidationError,
        #[case] field: &str,
    ) {
        let message = err.to_string();
        let error = map_auth_validation_error(err);
        assert_eq!(error.message(), message);
        assert_eq!(detail(&error, "field"), Some(field));
    }

    #[rstest]
    fn unknown_values_list_the_alternatives() {
        let error = unknown_value_error(
            FieldName::new("status"),
            "archived",
            &["pending", "declined"],
        );
        assert_eq!(error.message(), "status must be one of pending, declined");
        assert_eq!(detail(&error, "code"), Some("unknown_value"));
    }
}
