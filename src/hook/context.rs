//! Per-read request context
//!
//! The current site, page mode and principal, passed explicitly to the hook.
//! `None` for site or page mode means the host could not resolve it; the
//! policy then does not apply.

use crate::access_control::PrincipalCapabilities;
use crate::model::PageMode;
use std::fmt;

#[derive(Clone, Copy)]
pub struct RequestContext<'a> {
    pub site: Option<&'a str>,
    pub page_mode: Option<PageMode>,
    pub principal: &'a dyn PrincipalCapabilities,
}

impl<'a> RequestContext<'a> {
    /// Context with unknown site and page mode
    pub fn new(principal: &'a dyn PrincipalCapabilities) -> Self {
        Self {
            site: None,
            page_mode: None,
            principal,
        }
    }

    /// A normal end-user page view on `site`
    pub fn page_view(site: &'a str, principal: &'a dyn PrincipalCapabilities) -> Self {
        Self::new(principal)
            .with_site(site)
            .with_page_mode(PageMode::Normal)
    }

    pub fn with_site(mut self, site: &'a str) -> Self {
        self.site = Some(site);
        self
    }

    pub fn with_page_mode(mut self, mode: PageMode) -> Self {
        self.page_mode = Some(mode);
        self
    }
}

impl fmt::Debug for RequestContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("site", &self.site)
            .field("page_mode", &self.page_mode)
            .field("principal", &self.principal.principal_name())
            .finish()
    }
}
