//! Principal directory
//!
//! Resolves the scopes, departments and roles of the current principal from
//! an external directory service. An HTTP client is provided for real
//! deployments and a static directory for fixtures and tests.

pub mod fixed;
pub mod http;
pub mod provider;

pub use fixed::StaticDirectory;
pub use http::HttpDirectory;
pub use provider::{BoxedDirectory, DirectoryProvider, ResolvedPrincipal, resolve_principal};

use crate::config::AppConfig;
use crate::error::{DirectoryError, DirectoryResult};
use tracing::info;

/// Create a directory provider from configuration.
///
/// Uses the HTTP directory when an endpoint is configured, otherwise
/// `fallback`.
pub fn create_directory(
    config: &AppConfig,
    fallback: Option<StaticDirectory>,
) -> DirectoryResult<BoxedDirectory> {
    if let Some(endpoint) = config.directory.endpoint(&config.settings) {
        info!(endpoint = %endpoint, "Using HTTP principal directory");
        return Ok(Box::new(HttpDirectory::new(&endpoint, &config.directory)?));
    }

    match fallback {
        Some(directory) => {
            info!(profiles = directory.len(), "Using static principal directory");
            Ok(Box::new(directory))
        }
        None => Err(DirectoryError::NotConfigured),
    }
}
