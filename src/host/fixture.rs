//! TOML fixture format for the in-memory host
//!
//! ```toml
//! [[templates]]
//! id = "{5C8B2F7E-1D3A-4B6C-9E0F-2A4D6B8C0E1F}"
//! name = "Secured Base"
//!
//! [[templates]]
//! id = "{0F7A4C2E-8B1D-4E6F-A3C5-7D9E1B2F4A60}"
//! name = "Article"
//! base_templates = ["{5C8B2F7E-1D3A-4B6C-9E0F-2A4D6B8C0E1F}"]
//!
//! [[items]]
//! id = "{3E5A7C9B-2D4F-4A6C-8E0B-1C3D5F7A9B2D}"
//! name = "Q3 payroll"
//! template = "{0F7A4C2E-8B1D-4E6F-A3C5-7D9E1B2F4A60}"
//! scope = "/org/emea"
//! departments = ["finance"]
//! required_roles = ["payroll-reader"]
//!
//! [[principals]]
//! id = "jdoe"
//! scopes = ["/org"]
//! departments = ["finance"]
//! roles = ["payroll-reader"]
//! ```

use crate::access_control::{ItemSecurity, PrincipalProfile, ScopePath};
use crate::model::{Item, ItemId, ItemState, Template, TemplateId};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub templates: Vec<Template>,
    pub items: Vec<ItemEntry>,
    pub principals: Vec<PrincipalProfile>,
}

/// An item together with its security fields
#[derive(Debug, Clone, Deserialize)]
pub struct ItemEntry {
    pub id: ItemId,
    pub name: String,
    pub template: TemplateId,
    #[serde(default)]
    pub state: ItemState,
    #[serde(default)]
    pub scope: Option<ScopePath>,
    #[serde(default)]
    pub departments: Vec<String>,
    #[serde(default)]
    pub required_roles: Vec<String>,
}

impl ItemEntry {
    pub fn into_parts(self) -> (Item, ItemSecurity) {
        let item = Item::new(self.id, self.name, self.template).with_state(self.state);
        let security = ItemSecurity {
            scope: self.scope,
            departments: self.departments,
            required_roles: self.required_roles,
        };
        (item, security)
    }
}
