//! Item security hook
//!
//! Wraps the host's default security pass with the protected-template
//! access policy.
//!
//! ## Example
//!
//! ```
//! use content_guard::access_control::UnresolvedPrincipal;
//! use content_guard::hook::{HookSettings, PassThrough, RequestContext, SecurityHook};
//! use content_guard::host::MemoryHost;
//! use content_guard::model::{Item, ItemId, SecurityCheck, Template, TemplateId};
//! use content_guard::templates::DerivationResolver;
//!
//! let secured = TemplateId::new_random();
//! let mut host = MemoryHost::new();
//! host.add_template(Template::new(secured, "Secured"));
//!
//! let hook = SecurityHook::new(
//!     HookSettings::new("website", secured),
//!     DerivationResolver::new(host),
//!     PassThrough,
//! );
//!
//! let nobody = UnresolvedPrincipal::new("ghost", "directory offline");
//! let ctx = RequestContext::page_view("website", &nobody);
//! let item = Item::new(ItemId::new_random(), "payroll", secured);
//!
//! assert!(hook.apply_security(item, SecurityCheck::Enable, &ctx).is_hidden());
//! ```

pub mod context;
pub mod provider;
pub mod security;

pub use context::RequestContext;
pub use provider::{ItemProvider, ItemStore};
pub use security::{Bypass, DefaultSecurity, HookOutcome, HookSettings, PassThrough, SecurityHook};
