//! Error types and handling for the IcyRoute application

use thiserror::Error;

/// Main error type for the IcyRoute application
#[derive(Error, Debug)]
pub enum IcyRouteError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Errors talking to the mapping platform or weather service
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Logical error reported by the routes backend (`{"error": ...}`)
    #[error("Backend error: {message}")]
    Backend { message: String },
}

impl IcyRouteError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new backend error
    pub fn backend<S: Into<String>>(message: S) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            IcyRouteError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            IcyRouteError::Api { .. } => {
                "Unable to connect to external services. Please check your internet connection \
                 and ensure the addresses are valid."
                    .to_string()
            }
            IcyRouteError::Validation { message } | IcyRouteError::Backend { message } => {
                message.clone()
            }
        }
    }
}
