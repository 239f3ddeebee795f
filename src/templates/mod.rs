//! Template inheritance
//!
//! Decides whether an item's template belongs to a protected template family.

pub mod cache;
pub mod resolver;

pub use cache::{CacheStats, DerivationCache};
pub use resolver::{DerivationResolver, TemplateSource};
