use crate::property::PropertyId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudError {
    NotConfigured,
    ReadOnly(PropertyId),
    TypeMismatch(PropertyId),
    UnknownProperty,
    InvalidPayload,
    CredentialTooLong,
    TableFull,
    Transport,
}

pub type CloudResult<T> = Result<T, CloudError>;

impl std::fmt::Display for CloudError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            CloudError::NotConfigured => write!(f, "Cloud not configured"),
            CloudError::ReadOnly(id) => write!(f, "Property '{}' is read-only", id),
            CloudError::TypeMismatch(id) => write!(f, "Wrong value type for '{}'", id),
            CloudError::UnknownProperty => write!(f, "Unknown property"),
            CloudError::InvalidPayload => write!(f, "Invalid payload"),
            CloudError::CredentialTooLong => write!(f, "Credential too long"),
            CloudError::TableFull => write!(f, "Property table full"),
            CloudError::Transport => write!(f, "Transport error"),
        }
    }
}

impl std::error::Error for CloudError {}
