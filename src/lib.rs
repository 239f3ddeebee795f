//! Content Guard
//!
//! Item-level access control for content trees. Every security-checked item
//! read passes through a hook that decides whether the caller may see the
//! item at all.
//!
//! ## Features
//!
//! - **Template-family gating** - only items whose template derives from a protected base template are policed
//! - **Three-factor policy** - span of control, department and roles, evaluated with short-circuit AND
//! - **Hide on deny** - a denied item is indistinguishable from a missing one
//! - **Fail closed** - missing templates, cycles and unavailable principal data never expose content
//! - **Cached derivation walks** - thread-safe, time-bounded, invalidatable
//!
//! ## Decision Model
//!
//! ```text
//! structural item ──────────────────────────────────────────► default security
//! protected site ∧ checks on ∧ normal view ∧ derived ─┬─ granted ─► default security
//!                                                     └─ denied ──► hidden
//! otherwise ────────────────────────────────────────────────► default security
//! ```
//!
//! ## Example Configuration
//!
//! ```toml
//! [guard]
//! protected_site = "website"
//! protected_template = "{5C8B2F7E-1D3A-4B6C-9E0F-2A4D6B8C0E1F}"
//!
//! [cache]
//! ttl_secs = 300
//!
//! [directory]
//! url = "https://directory.example.com"
//! # token from CONTENT_GUARD_DIRECTORY_TOKEN env var
//!
//! [settings]
//! api_endpoint = "https://directory.example.com"
//! environment_setting = "production"
//! ```

pub mod access_control;
pub mod config;
pub mod directory;
pub mod error;
pub mod hook;
pub mod host;
pub mod metrics;
pub mod model;
pub mod templates;
pub mod util;

// Re-export main types
pub use config::{AppConfig, load_config};
pub use error::{AppError, Result};
pub use hook::{HookOutcome, HookSettings, ItemProvider, RequestContext, SecurityHook};
pub use metrics::GuardMetrics;
pub use model::{Item, ItemLookup, SecurityCheck};
