use thiserror::Error;

use super::operations::MAX_NAME_LEN;

/// Errors that can occur when validating or manipulating drafts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("Draft name cannot be empty")]
    EmptyName,
    #[error("Draft name too long (max {max} characters)", max = MAX_NAME_LEN)]
    NameTooLong,
    #[error("Draft name already in use: {0}")]
    DuplicateName(String),
    #[error("Draft must have at least one round, got {0}")]
    InvalidRounds(i64),
    #[error("Draft sport is required")]
    MissingSport,
    #[error("Draft style is required")]
    MissingStyle,
    #[error("Invalid draft status: {0}")]
    InvalidStatus(String),
}
