//! Access control module
//!
//! Decides whether a principal may see a protected content item.
//!
//! ## Policy
//!
//! An item is visible only if all three predicates hold, evaluated in this
//! order with short-circuit AND:
//!
//! 1. **Scope** - the item lies within the principal's span of control
//! 2. **Department** - the principal belongs to a department associated with the item
//! 3. **Roles** - the principal holds every role the item requires
//!
//! A predicate that cannot be evaluated (principal data unavailable, item
//! security fields missing) counts as false.
//!
//! ## Example
//!
//! ```
//! use content_guard::access_control::{AccessPolicy, UnresolvedPrincipal};
//! use content_guard::model::{Item, ItemId, TemplateId};
//!
//! let item = Item::new(ItemId::new_random(), "payroll", TemplateId::new_random());
//! let nobody = UnresolvedPrincipal::new("ghost", "directory offline");
//!
//! assert!(AccessPolicy::new().is_authorized(&nobody, &item).is_denied());
//! ```

pub mod policy;
pub mod profile;
pub mod types;

pub use policy::{AccessPolicy, PrincipalCapabilities};
pub use profile::{
    ItemSecurity, ItemSecuritySource, PrincipalProfile, ProfileCapabilities, ScopePath,
    UnresolvedPrincipal,
};
pub use types::{AccessDecision, DenialCause, DenialReason, Predicate};
