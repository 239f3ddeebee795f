//! In-memory content host
//!
//! Implements every host-side trait the hook consumes. Used by the CLI with
//! TOML fixtures and by tests.

use crate::access_control::{ItemSecurity, ItemSecuritySource, PrincipalProfile};
use crate::directory::StaticDirectory;
use crate::error::{FixtureError, PrincipalError};
use crate::hook::{DefaultSecurity, ItemStore};
use crate::host::fixture::Fixture;
use crate::model::{Item, ItemId, ItemLookup, ItemState, SecurityCheck, Template, TemplateId};
use crate::templates::TemplateSource;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    templates: HashMap<TemplateId, Template>,
    items: HashMap<ItemId, Item>,
    security: HashMap<ItemId, ItemSecurity>,
    principals: Vec<PrincipalProfile>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a host from a TOML fixture file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let host = Self::from_toml_str(&content)?;
        debug!(
            path = %path.display(),
            templates = host.templates.len(),
            items = host.items.len(),
            "Loaded fixture"
        );
        Ok(host)
    }

    /// Build a host from a TOML fixture string
    pub fn from_toml_str(content: &str) -> Result<Self, FixtureError> {
        let fixture: Fixture = toml::from_str(content)?;
        Self::from_fixture(fixture)
    }

    pub fn from_fixture(fixture: Fixture) -> Result<Self, FixtureError> {
        let mut host = Self::new();

        for template in fixture.templates {
            if host.templates.contains_key(&template.id) {
                return Err(FixtureError::Invalid(format!(
                    "duplicate template id {}",
                    template.id
                )));
            }
            host.add_template(template);
        }

        for entry in fixture.items {
            if host.items.contains_key(&entry.id) {
                return Err(FixtureError::Invalid(format!(
                    "duplicate item id {}",
                    entry.id
                )));
            }
            let (item, security) = entry.into_parts();
            host.add_item(item, security);
        }

        for profile in fixture.principals {
            if profile.id.is_empty() {
                return Err(FixtureError::Invalid("principal with empty id".to_string()));
            }
            if host.principals.iter().any(|p| p.id == profile.id) {
                return Err(FixtureError::Invalid(format!(
                    "duplicate principal id {}",
                    profile.id
                )));
            }
            host.principals.push(profile);
        }

        Ok(host)
    }

    pub fn add_template(&mut self, template: Template) {
        self.templates.insert(template.id, template);
    }

    pub fn add_item(&mut self, item: Item, security: ItemSecurity) {
        self.security.insert(item.id, security);
        self.items.insert(item.id, item);
    }

    pub fn add_principal(&mut self, profile: PrincipalProfile) {
        self.principals.push(profile);
    }

    /// All items, ordered by name then id
    pub fn items(&self) -> Vec<&Item> {
        let mut items: Vec<_> = self.items.values().collect();
        items.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        items
    }

    pub fn templates(&self) -> impl Iterator<Item = &Template> {
        self.templates.values()
    }

    /// A static directory over the fixture's principals
    pub fn directory(&self) -> StaticDirectory {
        StaticDirectory::new(self.principals.iter().cloned())
    }
}

impl TemplateSource for MemoryHost {
    fn get_template(&self, id: &TemplateId) -> Option<Template> {
        self.templates.get(id).cloned()
    }
}

impl ItemStore for MemoryHost {
    fn get_item(&self, id: &ItemId) -> Option<Item> {
        self.items.get(id).cloned()
    }
}

impl ItemSecuritySource for MemoryHost {
    fn item_security(&self, item: &ItemId) -> Result<ItemSecurity, PrincipalError> {
        self.security
            .get(item)
            .cloned()
            .ok_or(PrincipalError::ItemSecurityMissing(*item))
    }
}

/// Soft-deleted items are invisible unless security checks are disabled
impl DefaultSecurity for MemoryHost {
    fn apply(&self, item: Item, mode: SecurityCheck) -> ItemLookup {
        if item.state == ItemState::Deleted && !mode.is_disabled() {
            return ItemLookup::Hidden;
        }
        ItemLookup::Found(item)
    }
}
