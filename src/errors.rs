//! Error handling for the fire alert system

/// Result type alias for the fire alert system
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the fire alert system
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// User input rejected before any state changed
    #[error("Validation failed: {field}")]
    Validation { field: String },

    /// Lookup of a camera, incident or property that does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Illegal incident lifecycle transition
    #[error("Alert error: {message}")]
    Alert { message: String },

    /// Mocked sign-in failures
    #[error("Authentication error: {message}")]
    Auth { message: String },

    /// Session store failures
    #[error("Session error: {message}")]
    Session { message: String },

    /// Invalid configuration values
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem errors from the session store
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl Error {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Create a new alert lifecycle error
    pub fn alert(message: impl Into<String>) -> Self {
        Self::Alert {
            message: message.into(),
        }
    }

    /// Create a new authentication error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a new session error
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Convenience macros for creating specific error types
#[macro_export]
macro_rules! alert_error {
    ($msg:expr) => {
        $crate::Error::alert($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::alert(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! auth_error {
    ($msg:expr) => {
        $crate::Error::auth($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::auth(format!($fmt, $($arg)*))
    };
}
