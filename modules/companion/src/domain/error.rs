use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    /// Caller passed a missing or malformed argument; raised before any external call.
    #[error("Invalid argument: {field}: {message}")]
    InvalidArgument { field: String, message: String },

    /// An external collaborator (model, storage, voice API) failed or answered garbage.
    #[error("Upstream failure in {service}: {message}")]
    Upstream { service: String, message: String },

    #[error("{what} not found: {id}")]
    NotFound { what: String, id: String },
}

impl DomainError {
    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upstream {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn not_found(what: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            what: what.into(),
            id: id.into(),
        }
    }

    /// Shared check for the user identifier every operation is keyed on.
    pub fn require_user_id(user_id: &str) -> Result<(), Self> {
        if user_id.trim().is_empty() {
            return Err(Self::invalid_argument("user_id", "must not be empty"));
        }
        Ok(())
    }
}
