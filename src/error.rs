//! Error types for content-guard
//!
//! This module defines the error hierarchy used throughout the crate.
//! We use `thiserror` for library-style errors that are part of the API.
//! None of these ever escape the security hook: the hook maps every failure
//! to either "policy does not apply" or "hidden".

use crate::model::ItemId;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Fixture error: {0}")]
    Fixture(#[from] FixtureError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Principal directory errors
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Directory API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Principal not found: {principal}")]
    NotFound { principal: String },

    #[error("Unauthorized: directory rejected the configured credentials")]
    Unauthorized,

    #[error("Invalid response from directory: {0}")]
    InvalidResponse(String),

    #[error("No directory endpoint configured")]
    NotConfigured,
}

impl DirectoryError {
    /// Map a non-success HTTP status to a directory error
    pub fn from_response(status: u16, principal: &str, body: &str) -> Self {
        match status {
            401 | 403 => DirectoryError::Unauthorized,
            404 => DirectoryError::NotFound {
                principal: principal.to_string(),
            },
            _ => DirectoryError::Api {
                status,
                message: if body.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body.to_string()
                },
            },
        }
    }
}

/// Errors while loading an in-memory host fixture
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse fixture: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid fixture: {0}")]
    Invalid(String),
}

/// Failure to answer a principal capability query.
///
/// Always treated as a denial of the predicate that raised it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrincipalError {
    #[error("Principal data unavailable: {0}")]
    Unavailable(String),

    #[error("No security fields for item {0}")]
    ItemSecurityMissing(ItemId),
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for directory operations
pub type DirectoryResult<T> = std::result::Result<T, DirectoryError>;
