//! Template derivation resolver
//!
//! Answers "does this template equal, or transitively inherit from, that one?"
//! by walking declared base-template lists. The walk is an explicit
//! depth-first traversal with a visited set, so it terminates on cyclic
//! template data and never recurses on the call stack.
//!
//! Data-integrity problems fail closed: an unresolvable template contributes
//! no bases, and a revisited template is a non-match for that branch.

use crate::model::{Template, TemplateId};
use crate::templates::cache::DerivationCache;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace};

/// Read-only access to host template definitions
pub trait TemplateSource: Send + Sync {
    /// Fetch a template definition, or `None` if the id is unknown
    fn get_template(&self, id: &TemplateId) -> Option<Template>;
}

impl<T: TemplateSource + ?Sized> TemplateSource for Arc<T> {
    fn get_template(&self, id: &TemplateId) -> Option<Template> {
        (**self).get_template(id)
    }
}

impl<T: TemplateSource + ?Sized> TemplateSource for &T {
    fn get_template(&self, id: &TemplateId) -> Option<Template> {
        (**self).get_template(id)
    }
}

/// Derivation resolver over a host template source
pub struct DerivationResolver<S> {
    source: S,
    cache: Option<DerivationCache>,
}

impl<S: TemplateSource> DerivationResolver<S> {
    /// Create an uncached resolver
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: None,
        }
    }

    /// Create a resolver that memoises results in `cache`
    pub fn with_cache(source: S, cache: DerivationCache) -> Self {
        Self {
            source,
            cache: Some(cache),
        }
    }

    /// Check whether `template_id` is `ancestor_id` or inherits from it
    pub fn is_derived_from(&self, template_id: TemplateId, ancestor_id: TemplateId) -> bool {
        if template_id == ancestor_id {
            return true;
        }

        if let Some(cache) = &self.cache
            && let Some(derived) = cache.get(template_id, ancestor_id)
        {
            return derived;
        }

        let derived = self.walk(template_id, ancestor_id);

        if let Some(cache) = &self.cache {
            cache.insert(template_id, ancestor_id, derived);
        }
        derived
    }

    fn walk(&self, start: TemplateId, ancestor_id: TemplateId) -> bool {
        let mut visited = HashSet::new();
        let mut pending = vec![start];

        while let Some(current) = pending.pop() {
            if current == ancestor_id {
                trace!(template = %start, ancestor = %ancestor_id, via = %current, "Derivation found");
                return true;
            }

            if !visited.insert(current) {
                continue;
            }

            let Some(template) = self.source.get_template(&current) else {
                debug!(template = %current, "Template not found, treating branch as not derived");
                continue;
            };

            // Reverse so bases are explored in declaration order
            for base in template.base_templates.iter().rev() {
                if visited.contains(base) {
                    trace!(template = %current, base = %base, "Base already visited");
                } else {
                    pending.push(*base);
                }
            }
        }

        trace!(template = %start, ancestor = %ancestor_id, "Not derived");
        false
    }

    /// The template source this resolver reads from
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The result cache, if caching is enabled
    pub fn cache(&self) -> Option<&DerivationCache> {
        self.cache.as_ref()
    }

    /// Drop cached results after the host reports template changes
    pub fn invalidate(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct MapSource {
        templates: HashMap<TemplateId, Template>,
        lookups: AtomicUsize,
    }

    impl MapSource {
        fn add(&mut self, id: TemplateId, bases: &[TemplateId]) {
            self.templates.insert(
                id,
                Template::new(id, "t").with_bases(bases.iter().copied()),
            );
        }
    }

    impl TemplateSource for MapSource {
        fn get_template(&self, id: &TemplateId) -> Option<Template> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.templates.get(id).cloned()
        }
    }

    fn id() -> TemplateId {
        TemplateId::new_random()
    }

    #[test]
    fn test_reflexive_without_lookup() {
        let source = MapSource::default();
        let resolver = DerivationResolver::new(&source);
        let t = id();

        assert!(resolver.is_derived_from(t, t));
        assert_eq!(source.lookups.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_direct_and_transitive() {
        let (page, secured, base) = (id(), id(), id());
        let mut source = MapSource::default();
        source.add(page, &[secured]);
        source.add(secured, &[base]);
        source.add(base, &[]);

        let resolver = DerivationResolver::new(&source);
        assert!(resolver.is_derived_from(page, secured));
        assert!(resolver.is_derived_from(page, base));
        assert!(!resolver.is_derived_from(base, page));
    }

    #[test]
    fn test_multiple_inheritance() {
        let (page, nav, secured) = (id(), id(), id());
        let mut source = MapSource::default();
        source.add(page, &[nav, secured]);
        source.add(nav, &[]);
        source.add(secured, &[]);

        let resolver = DerivationResolver::new(&source);
        assert!(resolver.is_derived_from(page, secured));
        assert!(resolver.is_derived_from(page, nav));
    }

    #[test]
    fn test_missing_template_fails_closed() {
        let (page, missing, secured) = (id(), id(), id());
        let mut source = MapSource::default();
        source.add(page, &[missing]);

        let resolver = DerivationResolver::new(&source);
        assert!(!resolver.is_derived_from(page, secured));
        assert!(!resolver.is_derived_from(id(), secured));
    }

    #[test]
    fn test_cycle_terminates() {
        let (a, b, c) = (id(), id(), id());
        let mut source = MapSource::default();
        source.add(a, &[b]);
        source.add(b, &[a]);

        let resolver = DerivationResolver::new(&source);
        assert!(!resolver.is_derived_from(a, c));
        assert!(resolver.is_derived_from(a, b));
        assert!(resolver.is_derived_from(b, a));
    }

    #[test]
    fn test_diamond_visits_shared_base_once() {
        let (top, left, right, root, other) = (id(), id(), id(), id(), id());
        let mut source = MapSource::default();
        source.add(top, &[left, right]);
        source.add(left, &[root]);
        source.add(right, &[root]);
        source.add(root, &[]);

        let resolver = DerivationResolver::new(&source);
        assert!(!resolver.is_derived_from(top, other));
        // top, left, right, root
        assert_eq!(source.lookups.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_cached_result_skips_walk() {
        let (page, secured) = (id(), id());
        let mut source = MapSource::default();
        source.add(page, &[secured]);

        let resolver =
            DerivationResolver::with_cache(&source, DerivationCache::new(Duration::from_secs(60), 64));

        assert!(resolver.is_derived_from(page, secured));
        let after_first = source.lookups.load(Ordering::SeqCst);
        assert!(resolver.is_derived_from(page, secured));
        assert_eq!(source.lookups.load(Ordering::SeqCst), after_first);

        resolver.invalidate();
        assert!(resolver.is_derived_from(page, secured));
        assert!(source.lookups.load(Ordering::SeqCst) > after_first);
    }
}
