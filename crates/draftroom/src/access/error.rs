use thiserror::Error;

use draftroom_core::draft::{DraftError, DraftId};
use draftroom_core::storage::{repository_error_to_status_code, RepositoryError};

/// Errors returned by [`DraftAccess`](super::DraftAccess).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("Draft not found: {0}")]
    NotFound(DraftId),
    #[error("Not allowed to modify draft {0}")]
    Forbidden(DraftId),
    #[error("Administrator access required")]
    AdminRequired,
    #[error("Persistence error: {0}")]
    Persistence(RepositoryError),
    #[error("Validation error: {0}")]
    Validation(#[from] DraftError),
}

impl AccessError {
    /// HTTP status code an outer layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            AccessError::NotFound(_) => 404,
            AccessError::Forbidden(_) | AccessError::AdminRequired => 403,
            AccessError::Validation(DraftError::DuplicateName(_)) => 409,
            AccessError::Validation(_) => 400,
            AccessError::Persistence(err) => repository_error_to_status_code(err),
        }
    }
}

impl From<RepositoryError> for AccessError {
    fn from(err: RepositoryError) -> Self {
        match &err {
            RepositoryError::NotFound { entity_type: "Draft", id } => match id.parse() {
                Ok(id) => AccessError::NotFound(DraftId(id)),
                Err(_) => AccessError::Persistence(err),
            },
            _ => AccessError::Persistence(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, AccessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_not_found_is_routed() {
        let err: AccessError = RepositoryError::draft_not_found(5).into();
        assert_eq!(err, AccessError::NotFound(DraftId(5)));
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "Draft not found: 5");
    }

    #[test]
    fn test_other_repository_errors_are_persistence() {
        let err: AccessError = RepositoryError::QueryFailed("disk I/O error".to_string()).into();
        assert!(matches!(err, AccessError::Persistence(_)));
        assert_eq!(err.status_code(), 500);

        let err: AccessError = RepositoryError::AlreadyExists {
            entity_type: "Draft",
            id: "Alpha".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn test_authorization_errors_are_forbidden() {
        assert_eq!(AccessError::Forbidden(DraftId(3)).status_code(), 403);
        assert_eq!(AccessError::AdminRequired.status_code(), 403);
        assert_eq!(
            AccessError::Forbidden(DraftId(3)).to_string(),
            "Not allowed to modify draft 3"
        );
    }

    #[test]
    fn test_validation_status_codes() {
        assert_eq!(AccessError::from(DraftError::EmptyName).status_code(), 400);
        assert_eq!(
            AccessError::from(DraftError::DuplicateName("Alpha".to_string())).status_code(),
            409
        );
    }
}
