use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompanionError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Upstream service '{service}' failed")]
    Upstream { service: String },

    #[error("{what} not found: {id}")]
    NotFound { what: String, id: String },
}

impl CompanionError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn upstream(service: impl Into<String>) -> Self {
        Self::Upstream {
            service: service.into(),
        }
    }

    pub fn not_found(what: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            what: what.into(),
            id: id.into(),
        }
    }
}

impl From<crate::domain::error::DomainError> for CompanionError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            InvalidArgument { field, message } => Self::validation(format!("{}: {}", field, message)),
            // Upstream detail can carry raw model output; keep it out of the contract.
            Upstream { service, .. } => Self::upstream(service),
            NotFound { what, id } => Self::not_found(what, id),
        }
    }
}
