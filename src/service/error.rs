use std::fmt;

use crate::domain::Rejection;
use crate::repository::RepositoryError;

/// Failure surfaced by a service operation. Business rejections carry
/// the descriptive message of the refused command; repository errors are
/// infrastructure faults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServiceError {
    Rejected(Rejection),
    Repository(RepositoryError),
}

impl ServiceError {
    /// The business rejection behind this error, if that is what it is.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            ServiceError::Rejected(rejection) => Some(rejection),
            ServiceError::Repository(_) => None,
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Rejected(rejection) => write!(f, "{}", rejection),
            ServiceError::Repository(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Rejected(rejection) => Some(rejection),
            ServiceError::Repository(err) => Some(err),
        }
    }
}

impl From<Rejection> for ServiceError {
    fn from(rejection: Rejection) -> Self {
        ServiceError::Rejected(rejection)
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        ServiceError::Repository(err)
    }
}
