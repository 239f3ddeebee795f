//! Principal directory provider trait
//!
//! Profiles are resolved asynchronously before request processing starts, so
//! the synchronous security hook never waits on I/O.

use crate::access_control::{
    ItemSecuritySource, PrincipalCapabilities, PrincipalProfile, ProfileCapabilities,
    UnresolvedPrincipal,
};
use crate::error::DirectoryResult;
// async_trait required for dyn-compatibility with Box<dyn DirectoryProvider>
use async_trait::async_trait;
use tracing::{debug, warn};

/// Source of principal profiles (scopes, departments, roles)
#[async_trait]
pub trait DirectoryProvider: Send + Sync {
    /// Fetch the profile of `principal_id`
    async fn fetch_profile(&self, principal_id: &str) -> DirectoryResult<PrincipalProfile>;

    /// Get a description of the provider (for logging)
    fn provider_name(&self) -> &'static str;
}

/// Box type alias for directory providers
pub type BoxedDirectory = Box<dyn DirectoryProvider>;

/// Outcome of resolving the current principal
#[derive(Debug, Clone)]
pub enum ResolvedPrincipal {
    Profile(PrincipalProfile),
    /// Directory lookup failed; every capability query will fail
    Unresolved(UnresolvedPrincipal),
}

impl ResolvedPrincipal {
    /// Capabilities of this principal against host item security fields
    pub fn capabilities<'a, L>(&'a self, items: &'a L) -> Box<dyn PrincipalCapabilities + 'a>
    where
        L: ItemSecuritySource + ?Sized,
    {
        match self {
            ResolvedPrincipal::Profile(profile) => Box::new(ProfileCapabilities::new(profile, items)),
            ResolvedPrincipal::Unresolved(unresolved) => Box::new(unresolved.clone()),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ResolvedPrincipal::Profile(_))
    }
}

/// Resolve a principal, turning directory failures into a fail-closed principal
pub async fn resolve_principal(
    directory: &dyn DirectoryProvider,
    principal_id: &str,
) -> ResolvedPrincipal {
    match directory.fetch_profile(principal_id).await {
        Ok(profile) => {
            debug!(
                principal = principal_id,
                provider = directory.provider_name(),
                roles = profile.roles.len(),
                "Resolved principal profile"
            );
            ResolvedPrincipal::Profile(profile)
        }
        Err(e) => {
            warn!(
                principal = principal_id,
                provider = directory.provider_name(),
                error = %e,
                "Failed to resolve principal, protected items will be hidden"
            );
            ResolvedPrincipal::Unresolved(UnresolvedPrincipal::new(principal_id, e.to_string()))
        }
    }
}
