use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned status {status} for {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("email or password is incorrect")]
    InvalidCredentials,

    #[error("{resource} changed since it was read (version {expected}, now {actual})")]
    VersionConflict {
        resource: String,
        expected: u64,
        actual: u64,
    },

    #[error("not allowed: {action}")]
    Forbidden { action: String },

    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("invalid value for {field}: {value} ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DirectoryError>;

impl DirectoryError {
    /// Fixed, terminal message shown to the end user for this action.
    /// Transport failures, unexpected statuses and missing records each map
    /// to one string; there is no retry path behind any of them.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => {
                "Could not reach the directory service. Check your connection and try again."
                    .to_string()
            }
            Self::UnexpectedStatus { .. } => {
                "The directory service rejected the request.".to_string()
            }
            Self::NotFound { resource } => format!("{} was not found.", resource),
            Self::InvalidCredentials => "Email or password is incorrect.".to_string(),
            Self::VersionConflict { resource, .. } => format!(
                "{} was modified by someone else. Reload and try again.",
                resource
            ),
            Self::Forbidden { action } => format!("You are not allowed to {}.", action),
            Self::Validation { message } => message.clone(),
            Self::InvalidConfigValue { field, reason, .. } => {
                format!("Configuration value {} is invalid: {}", field, reason)
            }
            Self::Serialization(_) | Self::Io(_) => {
                "Something went wrong on this machine. See the log for details.".to_string()
            }
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn forbidden(action: impl Into<String>) -> Self {
        Self::Forbidden {
            action: action.into(),
        }
    }
}
