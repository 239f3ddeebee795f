//! In-memory directory

use crate::access_control::PrincipalProfile;
use crate::directory::provider::DirectoryProvider;
use crate::error::{DirectoryError, DirectoryResult};
use async_trait::async_trait;
use std::collections::HashMap;

/// Directory backed by a fixed set of profiles (fixtures, tests, offline use)
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    profiles: HashMap<String, PrincipalProfile>,
}

impl StaticDirectory {
    pub fn new(profiles: impl IntoIterator<Item = PrincipalProfile>) -> Self {
        Self {
            profiles: profiles
                .into_iter()
                .map(|p| (p.id.clone(), p))
                .collect(),
        }
    }

    pub fn insert(&mut self, profile: PrincipalProfile) {
        self.profiles.insert(profile.id.clone(), profile);
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[async_trait]
impl DirectoryProvider for StaticDirectory {
    async fn fetch_profile(&self, principal_id: &str) -> DirectoryResult<PrincipalProfile> {
        self.profiles
            .get(principal_id)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound {
                principal: principal_id.to_string(),
            })
    }

    fn provider_name(&self) -> &'static str {
        "static"
    }
}
