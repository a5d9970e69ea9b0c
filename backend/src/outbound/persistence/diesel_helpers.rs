//! Shared error mapping for the Diesel repositories.
//!
//! Each repository owns its port error type; these helpers only extract the
//! message and decide whether a failure is a connection problem.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Extract a readable message from a pool error.
pub(crate) fn map_pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Extract a readable message from a Diesel error and emit debug context.
pub(crate) fn map_diesel_error_message(error: &DieselError, operation: &str) -> String {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                db_message = info.message(),
                constraint = info.constraint_name(),
                %operation,
                "diesel operation failed"
            );
        }
        _ => debug!(%error, %operation, "diesel operation failed"),
    }
    error.to_string()
}

/// Whether the failure means the connection itself is unusable.
pub(crate) fn is_connection_error(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
            | DieselError::BrokenTransactionManager
    )
}

/// Map a Diesel error into a repository's connection or query constructor.
pub(crate) fn map_diesel_error_with<E>(
    error: DieselError,
    operation: &str,
    connection: impl FnOnce(String) -> E,
    query: impl FnOnce(String) -> E,
) -> E {
    let message = map_diesel_error_message(&error, operation);
    if is_connection_error(&error) {
        connection(message)
    } else {
        query(message)
    }
}
