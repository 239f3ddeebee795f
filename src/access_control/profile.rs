//! Profile-backed principal capabilities
//!
//! A [`PrincipalProfile`] is resolved once per request (usually from the
//! directory service) and then checked against the security fields the host
//! stores on each item. Name comparisons are ASCII case-insensitive.

use crate::access_control::policy::PrincipalCapabilities;
use crate::error::PrincipalError;
use crate::model::{Item, ItemId};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A node in the organisational hierarchy, e.g. `/org/emea/sales`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ScopePath {
    segments: Vec<String>,
}

impl ScopePath {
    /// Parse a slash-separated path; empty segments are ignored, so `/` is the root
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path
                .split('/')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// True if `other` is this node or lies beneath it
    pub fn contains(&self, other: &ScopePath) -> bool {
        other.segments.len() >= self.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl From<String> for ScopePath {
    fn from(path: String) -> Self {
        Self::parse(&path)
    }
}

impl From<ScopePath> for String {
    fn from(path: ScopePath) -> Self {
        path.to_string()
    }
}

impl fmt::Display for ScopePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}

/// A principal's resolved directory profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrincipalProfile {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Nodes the principal governs
    pub scopes: Vec<ScopePath>,
    pub departments: Vec<String>,
    pub roles: Vec<String>,
}

impl PrincipalProfile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_scope(mut self, scope: &str) -> Self {
        self.scopes.push(ScopePath::parse(scope));
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.departments.push(department.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    pub fn governs(&self, node: &ScopePath) -> bool {
        self.scopes.iter().any(|scope| scope.contains(node))
    }

    pub fn in_department(&self, department: &str) -> bool {
        contains_ignore_case(&self.departments, department)
    }

    pub fn has_role(&self, role: &str) -> bool {
        contains_ignore_case(&self.roles, role)
    }
}

fn contains_ignore_case(values: &[String], needle: &str) -> bool {
    values.iter().any(|v| v.eq_ignore_ascii_case(needle))
}

/// Security fields an item declares
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemSecurity {
    /// Span-of-control node; unset means the item is not scope restricted
    pub scope: Option<ScopePath>,
    /// Departments associated with the item; empty means any department
    pub departments: Vec<String>,
    /// Roles a principal must all hold
    pub required_roles: Vec<String>,
}

/// Host lookup of per-item security fields
pub trait ItemSecuritySource: Send + Sync {
    fn item_security(&self, item: &ItemId) -> Result<ItemSecurity, PrincipalError>;
}

impl<T: ItemSecuritySource + ?Sized> ItemSecuritySource for Arc<T> {
    fn item_security(&self, item: &ItemId) -> Result<ItemSecurity, PrincipalError> {
        (**self).item_security(item)
    }
}

impl<T: ItemSecuritySource + ?Sized> ItemSecuritySource for &T {
    fn item_security(&self, item: &ItemId) -> Result<ItemSecurity, PrincipalError> {
        (**self).item_security(item)
    }
}

type SecurityLookup = Result<Arc<ItemSecurity>, PrincipalError>;

/// Capabilities of a resolved profile against host item security
///
/// The policy asks all three questions about the same item in a row, so the
/// last item's security fields are kept and reused until another item is
/// checked.
pub struct ProfileCapabilities<'a, L: ?Sized> {
    profile: &'a PrincipalProfile,
    items: &'a L,
    last: Mutex<Option<(ItemId, SecurityLookup)>>,
}

impl<'a, L: ItemSecuritySource + ?Sized> ProfileCapabilities<'a, L> {
    pub fn new(profile: &'a PrincipalProfile, items: &'a L) -> Self {
        Self {
            profile,
            items,
            last: Mutex::new(None),
        }
    }

    pub fn profile(&self) -> &PrincipalProfile {
        self.profile
    }

    fn security(&self, item: &ItemId) -> SecurityLookup {
        let mut last = self.last.lock();
        if let Some((id, lookup)) = last.as_ref()
            && id == item
        {
            return lookup.clone();
        }

        let lookup = self.items.item_security(item).map(Arc::new);
        *last = Some((*item, lookup.clone()));
        lookup
    }
}

impl<L: ItemSecuritySource + ?Sized> PrincipalCapabilities for ProfileCapabilities<'_, L> {
    fn has_scope_over(&self, item: &Item) -> Result<bool, PrincipalError> {
        let security = self.security(&item.id)?;
        Ok(security
            .scope
            .as_ref()
            .is_none_or(|node| self.profile.governs(node)))
    }

    fn is_in_department(&self, item: &Item) -> Result<bool, PrincipalError> {
        let security = self.security(&item.id)?;
        Ok(security.departments.is_empty()
            || security
                .departments
                .iter()
                .any(|d| self.profile.in_department(d)))
    }

    fn has_required_roles(&self, item: &Item) -> Result<bool, PrincipalError> {
        let security = self.security(&item.id)?;
        Ok(security
            .required_roles
            .iter()
            .all(|role| self.profile.has_role(role)))
    }

    fn principal_name(&self) -> &str {
        &self.profile.id
    }
}

/// A principal whose profile could not be resolved.
///
/// Every capability query fails, so the policy denies every protected item.
#[derive(Debug, Clone)]
pub struct UnresolvedPrincipal {
    id: String,
    reason: String,
}

impl UnresolvedPrincipal {
    pub fn new(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reason: reason.into(),
        }
    }

    fn error(&self) -> PrincipalError {
        PrincipalError::Unavailable(self.reason.clone())
    }
}

impl PrincipalCapabilities for UnresolvedPrincipal {
    fn has_scope_over(&self, _item: &Item) -> Result<bool, PrincipalError> {
        Err(self.error())
    }

    fn is_in_department(&self, _item: &Item) -> Result<bool, PrincipalError> {
        Err(self.error())
    }

    fn has_required_roles(&self, _item: &Item) -> Result<bool, PrincipalError> {
        Err(self.error())
    }

    fn principal_name(&self) -> &str {
        &self.id
    }
}
