//! HTTP adapter mapping for domain errors.
//!
//! The domain error type stays HTTP-agnostic; this module turns it into a
//! JSON body plus status code, redacting internal failures. Identity
//! provider errors are classified here too, keeping their user-facing
//! message.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use tracing::error;

use crate::domain::{AuthError, Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self.code(), ErrorCode::InternalError) {
            error!(error = %self, trace_id = ?self.trace_id(), "internal error");
        }
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

/// Classify an identity provider failure, keeping its user-facing message.
///
/// `details.reason` carries a stable machine-readable tag.
pub fn map_auth_error(err: AuthError) -> Error {
    let message = err.to_string();
    let (error, reason) = match &err {
        AuthError::NetworkUnreachable => (Error::service_unavailable(message), "network_unreachable"),
        AuthError::InvalidCredentials => (Error::unauthorized(message), "invalid_credentials"),
        AuthError::EmailNotConfirmed => (Error::forbidden(message), "email_not_confirmed"),
        AuthError::RateLimited => (Error::rate_limited(message), "rate_limited"),
        AuthError::AlreadyRegistered => (Error::conflict(message), "already_registered"),
        AuthError::UserTypeMismatch { .. } => (Error::forbidden(message), "user_type_mismatch"),
        AuthError::Provider(_) => (Error::invalid_request(message), "provider"),
    };
    error.with_details(json!({ "reason": reason }))
}
