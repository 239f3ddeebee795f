//! The item security hook
//!
//! Runs on every security-checked item read. Decision order:
//!
//! 1. Structural items (built from the standard template) → default security
//! 2. Protected site, checks enabled, normal page view, item derived from the
//!    protected template → access policy; denied items are hidden
//! 3. Anything else → default security
//!
//! A denied item is reported as [`ItemLookup::Hidden`], which the host must
//! treat exactly like a missing item.

use crate::access_control::{AccessDecision, AccessPolicy, DenialReason};
use crate::config::GuardConfig;
use crate::error::ConfigError;
use crate::hook::context::RequestContext;
use crate::metrics::GuardMetrics;
use crate::model::{Item, ItemLookup, STANDARD_TEMPLATE_ID, SecurityCheck, TemplateId};
use crate::templates::{DerivationResolver, TemplateSource};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// The host's pre-existing security pass, which this hook wraps
pub trait DefaultSecurity: Send + Sync {
    fn apply(&self, item: Item, mode: SecurityCheck) -> ItemLookup;
}

impl<T: DefaultSecurity + ?Sized> DefaultSecurity for Arc<T> {
    fn apply(&self, item: Item, mode: SecurityCheck) -> ItemLookup {
        (**self).apply(item, mode)
    }
}

/// Default security that returns every item unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl DefaultSecurity for PassThrough {
    fn apply(&self, item: Item, _mode: SecurityCheck) -> ItemLookup {
        ItemLookup::Found(item)
    }
}

/// Why the custom policy did not apply to a read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bypass {
    SiteUnknown,
    OtherSite,
    ChecksDisabled,
    PageModeUnknown,
    NotNormalView,
    NotProtectedTemplate,
}

impl Bypass {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Bypass::SiteUnknown => "site_unknown",
            Bypass::OtherSite => "other_site",
            Bypass::ChecksDisabled => "checks_disabled",
            Bypass::PageModeUnknown => "page_mode_unknown",
            Bypass::NotNormalView => "not_normal_view",
            Bypass::NotProtectedTemplate => "not_protected_template",
        }
    }
}

impl fmt::Display for Bypass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Decision reached by the hook for one read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum HookOutcome {
    /// Template definition item; default security only
    Structural,
    /// Policy gating did not match; default security only
    NotApplicable(Bypass),
    /// Policy granted; default security still runs
    Authorized,
    /// Policy denied; the item is hidden
    Denied(DenialReason),
}

impl HookOutcome {
    pub fn is_denied(&self) -> bool {
        matches!(self, HookOutcome::Denied(_))
    }
}

/// Which site and template family the policy protects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookSettings {
    pub protected_site: String,
    pub protected_template: TemplateId,
    pub standard_template: TemplateId,
}

impl HookSettings {
    pub fn new(protected_site: impl Into<String>, protected_template: TemplateId) -> Self {
        Self {
            protected_site: protected_site.into(),
            protected_template,
            standard_template: STANDARD_TEMPLATE_ID,
        }
    }

    pub fn from_config(config: &GuardConfig) -> Result<Self, ConfigError> {
        let protected_template = config.protected_template.ok_or_else(|| ConfigError::Missing {
            field: "guard.protected_template".to_string(),
        })?;

        Ok(Self {
            protected_site: config.protected_site.clone(),
            protected_template,
            standard_template: config.standard_template,
        })
    }
}

/// Security hook over a host template source and default security pass
pub struct SecurityHook<S, D = PassThrough> {
    settings: HookSettings,
    resolver: DerivationResolver<S>,
    policy: AccessPolicy,
    default_security: D,
    metrics: Option<Arc<GuardMetrics>>,
}

impl<S: TemplateSource, D: DefaultSecurity> SecurityHook<S, D> {
    pub fn new(settings: HookSettings, resolver: DerivationResolver<S>, default_security: D) -> Self {
        Self {
            settings,
            resolver,
            policy: AccessPolicy::new(),
            default_security,
            metrics: None,
        }
    }

    /// Count every evaluation in `metrics`
    pub fn with_metrics(mut self, metrics: Arc<GuardMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Decide what should happen to `item`, without delegating
    pub fn evaluate(
        &self,
        item: &Item,
        mode: SecurityCheck,
        context: &RequestContext<'_>,
    ) -> HookOutcome {
        if item.template_id == self.settings.standard_template {
            return HookOutcome::Structural;
        }

        if let Some(bypass) = self.gate(item, mode, context) {
            trace!(item = %item.id, reason = %bypass, "Policy not applicable");
            return HookOutcome::NotApplicable(bypass);
        }

        match self.policy.is_authorized(context.principal, item) {
            AccessDecision::Granted => HookOutcome::Authorized,
            AccessDecision::Denied(reason) => {
                debug!(
                    item = %item.id,
                    principal = context.principal.principal_name(),
                    reason = %reason,
                    "Hiding item"
                );
                HookOutcome::Denied(reason)
            }
        }
    }

    /// Context gating; the derivation walk runs last as the costliest check
    fn gate(&self, item: &Item, mode: SecurityCheck, context: &RequestContext<'_>) -> Option<Bypass> {
        let Some(site) = context.site else {
            return Some(Bypass::SiteUnknown);
        };
        if !site.eq_ignore_ascii_case(&self.settings.protected_site) {
            return Some(Bypass::OtherSite);
        }
        if mode.is_disabled() {
            return Some(Bypass::ChecksDisabled);
        }
        let Some(page_mode) = context.page_mode else {
            return Some(Bypass::PageModeUnknown);
        };
        if !page_mode.is_normal() {
            return Some(Bypass::NotNormalView);
        }
        if !self
            .resolver
            .is_derived_from(item.template_id, self.settings.protected_template)
        {
            return Some(Bypass::NotProtectedTemplate);
        }
        None
    }

    /// Apply security to an item read.
    ///
    /// Returns [`ItemLookup::Hidden`] when the policy denies the item, and the
    /// default security result otherwise.
    pub fn apply_security(
        &self,
        item: Item,
        mode: SecurityCheck,
        context: &RequestContext<'_>,
    ) -> ItemLookup {
        self.apply_security_with_outcome(item, mode, context).1
    }

    /// Like [`apply_security`](Self::apply_security), also returning the
    /// outcome that decided the read. The item is evaluated once.
    pub fn apply_security_with_outcome(
        &self,
        item: Item,
        mode: SecurityCheck,
        context: &RequestContext<'_>,
    ) -> (HookOutcome, ItemLookup) {
        let outcome = self.evaluate(&item, mode, context);

        if let Some(metrics) = &self.metrics {
            metrics.record(&outcome);
        }

        let lookup = match &outcome {
            HookOutcome::Denied(_) => ItemLookup::Hidden,
            _ => self.default_security.apply(item, mode),
        };
        (outcome, lookup)
    }

    pub fn settings(&self) -> &HookSettings {
        &self.settings
    }

    pub fn resolver(&self) -> &DerivationResolver<S> {
        &self.resolver
    }

    pub fn metrics(&self) -> Option<&Arc<GuardMetrics>> {
        self.metrics.as_ref()
    }
}
