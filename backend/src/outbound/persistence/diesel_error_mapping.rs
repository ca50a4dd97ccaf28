//! Shared Diesel error mapping for the marketplace repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error.
pub(crate) fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map Diesel errors into query/connection constructors.
///
/// Database messages are logged at `debug` and replaced with fixed text so
/// SQL fragments never reach callers.
pub(crate) fn map_diesel_error<E>(
    error: DieselError,
    query: impl FnOnce(&'static str) -> E,
    connection: impl FnOnce(&'static str) -> E,
) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

/// Whether `error` is a unique constraint violation.
pub(crate) fn is_unique_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

/// Clamp a database integer counter into `u32`.
pub(crate) fn counter(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

/// Clamp a stored `0..=100` score into `u8`.
pub(crate) fn score(value: i16) -> u8 {
    u8::try_from(value.clamp(0, 100)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, PartialEq)]
    enum Mapped {
        Query(&'static str),
        Connection(&'static str),
    }

    #[rstest]
    fn not_found_maps_to_query() {
        let mapped = map_diesel_error(DieselError::NotFound, Mapped::Query, Mapped::Connection);
        assert_eq!(mapped, Mapped::Query("record not found"));
    }

    #[rstest]
    fn pool_errors_keep_their_message() {
        let mapped = map_pool_error(PoolError::checkout("timed out"), |m| m);
        assert_eq!(mapped, "timed out");
    }

    #[rstest]
    #[case(-3, 0)]
    #[case(7, 7)]
    fn counters_never_go_negative(#[case] raw: i32, #[case] expected: u32) {
        assert_eq!(counter(raw), expected);
    }

    #[rstest]
    #[case(-1, 0)]
    #[case(55, 55)]
    #[case(300, 100)]
    fn scores_are_clamped(#[case] raw: i16, #[case] expected: u8) {
        assert_eq!(score(raw), expected);
    }
}
