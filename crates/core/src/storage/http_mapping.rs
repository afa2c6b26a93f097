//! HTTP status codes for storage failures.
//!
//! There is no HTTP layer in this workspace; whatever serves drafts over HTTP
//! should answer with these codes.

use super::RepositoryError;

/// Status code for a [`RepositoryError`].
///
/// Missing rows are 404 and constraint conflicts 409. Rejected data is 400,
/// an unreachable store 503, and anything else 500.
///
/// ```
/// use draftroom_core::storage::{repository_error_to_status_code, RepositoryError};
///
/// assert_eq!(repository_error_to_status_code(&RepositoryError::draft_not_found(7)), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::AlreadyExists { .. } => 409,
        RepositoryError::InvalidData(_) => 400,
        RepositoryError::ConnectionFailed(_) => 503,
        RepositoryError::QueryFailed(_) | RepositoryError::Serialization(_) => 500,
    }
}
