//! Content tree types
//!
//! Items and templates are owned by the host; this crate only reads them.

use crate::model::ids::{ItemId, TemplateId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Host-owned lifecycle state of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    #[default]
    Exists,
    /// Soft-deleted (recycled) but still stored
    Deleted,
}

/// A node in the content tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub template_id: TemplateId,
    #[serde(default)]
    pub state: ItemState,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, template_id: TemplateId) -> Self {
        Self {
            id,
            name: name.into(),
            template_id,
            state: ItemState::Exists,
        }
    }

    pub fn with_state(mut self, state: ItemState) -> Self {
        self.state = state;
        self
    }
}

/// A schema definition items conform to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    /// Declared base templates, in declaration order
    #[serde(default)]
    pub base_templates: Vec<TemplateId>,
}

impl Template {
    pub fn new(id: TemplateId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            base_templates: Vec::new(),
        }
    }

    pub fn with_bases(mut self, bases: impl IntoIterator<Item = TemplateId>) -> Self {
        self.base_templates.extend(bases);
        self
    }
}

/// Whether the caller asked for security enforcement on this read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityCheck {
    #[default]
    Enable,
    /// Internal/system reads that explicitly skip enforcement
    Disable,
}

impl SecurityCheck {
    pub const fn is_disabled(&self) -> bool {
        matches!(self, SecurityCheck::Disable)
    }
}

/// Page mode of the current request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageMode {
    /// Normal end-user page view
    Normal,
    Preview,
    Edit,
    Debug,
}

impl PageMode {
    pub const fn is_normal(&self) -> bool {
        matches!(self, PageMode::Normal)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            PageMode::Normal => "normal",
            PageMode::Preview => "preview",
            PageMode::Edit => "edit",
            PageMode::Debug => "debug",
        }
    }

    /// Try to parse a page mode from a string
    pub fn try_parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Some(PageMode::Normal),
            "preview" => Some(PageMode::Preview),
            "edit" => Some(PageMode::Edit),
            "debug" => Some(PageMode::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for PageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse(s).ok_or_else(|| format!("unknown page mode '{}'", s))
    }
}

/// Result of a security-checked item read.
///
/// `Hidden` must be treated by the host exactly like "item not found".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemLookup {
    Found(Item),
    Hidden,
}

impl ItemLookup {
    pub fn is_found(&self) -> bool {
        matches!(self, ItemLookup::Found(_))
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, ItemLookup::Hidden)
    }

    pub fn item(&self) -> Option<&Item> {
        match self {
            ItemLookup::Found(item) => Some(item),
            ItemLookup::Hidden => None,
        }
    }

    pub fn into_item(self) -> Option<Item> {
        match self {
            ItemLookup::Found(item) => Some(item),
            ItemLookup::Hidden => None,
        }
    }
}

impl From<Option<Item>> for ItemLookup {
    fn from(item: Option<Item>) -> Self {
        item.map_or(ItemLookup::Hidden, ItemLookup::Found)
    }
}
