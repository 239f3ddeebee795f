//! Content model
//!
//! Identifiers, items, templates and the per-read request parameters
//! (security check mode, page mode) the security hook operates on.

pub mod ids;
pub mod types;

pub use ids::{ItemId, STANDARD_TEMPLATE_ID, TemplateId};
pub use types::{Item, ItemLookup, ItemState, PageMode, SecurityCheck, Template};
