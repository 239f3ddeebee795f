//! Security-checked item fetching
//!
//! Combines a host item store with the security hook. A missing item and a
//! hidden item produce the same result.

use crate::hook::context::RequestContext;
use crate::hook::security::{DefaultSecurity, HookOutcome, SecurityHook};
use crate::model::{Item, ItemId, ItemLookup, SecurityCheck};
use crate::templates::TemplateSource;
use std::sync::Arc;

/// Raw (unchecked) access to host item storage
pub trait ItemStore: Send + Sync {
    fn get_item(&self, id: &ItemId) -> Option<Item>;
}

impl<T: ItemStore + ?Sized> ItemStore for Arc<T> {
    fn get_item(&self, id: &ItemId) -> Option<Item> {
        (**self).get_item(id)
    }
}

pub struct ItemProvider<St, S, D> {
    store: St,
    hook: SecurityHook<S, D>,
}

impl<St, S, D> ItemProvider<St, S, D>
where
    St: ItemStore,
    S: TemplateSource,
    D: DefaultSecurity,
{
    pub fn new(store: St, hook: SecurityHook<S, D>) -> Self {
        Self { store, hook }
    }

    /// Fetch an item with security applied
    pub fn get_item(
        &self,
        id: &ItemId,
        mode: SecurityCheck,
        context: &RequestContext<'_>,
    ) -> ItemLookup {
        self.get_item_with_outcome(id, mode, context).1
    }

    /// Fetch an item with security applied, along with the hook outcome.
    ///
    /// The outcome is `None` when the store has no such item.
    pub fn get_item_with_outcome(
        &self,
        id: &ItemId,
        mode: SecurityCheck,
        context: &RequestContext<'_>,
    ) -> (Option<HookOutcome>, ItemLookup) {
        match self.store.get_item(id) {
            Some(item) => {
                let (outcome, lookup) = self.hook.apply_security_with_outcome(item, mode, context);
                (Some(outcome), lookup)
            }
            None => (None, ItemLookup::Hidden),
        }
    }

    /// Fetch several items, keeping only the visible ones (in input order)
    pub fn get_items<'i>(
        &self,
        ids: impl IntoIterator<Item = &'i ItemId>,
        mode: SecurityCheck,
        context: &RequestContext<'_>,
    ) -> Vec<Item> {
        ids.into_iter()
            .filter_map(|id| self.get_item(id, mode, context).into_item())
            .collect()
    }

    pub fn hook(&self) -> &SecurityHook<S, D> {
        &self.hook
    }

    pub fn store(&self) -> &St {
        &self.store
    }
}
