//! Cache-aware sizing-style extraction.

use std::collections::HashMap;

use growkit_css::{HostQuirks, NodeSizing};
use growkit_dom::{ControlId, TextControl};
use tracing::{debug, trace};

/// Resolves and caches sizing records for measured controls.
///
/// The cache never invalidates on its own. Callers purge an identity
/// whenever the underlying control's styling changes or the control goes
/// away; a stale entry produces wrong heights, not errors. Independent
/// components must use distinct identities to avoid cross-talk.
#[derive(Debug, Default)]
pub struct StyleExtractor {
    cache: HashMap<ControlId, NodeSizing>,
    quirks: HostQuirks,
}

impl StyleExtractor {
    /// Create an extractor for a host with the given capabilities.
    pub fn new(quirks: HostQuirks) -> Self {
        Self {
            cache: HashMap::new(),
            quirks,
        }
    }

    /// Sizing record for `control`.
    ///
    /// With `use_cache` set and a cached entry under `id`, returns the
    /// entry without touching the control at all. Otherwise reads the
    /// control's computed style and derives a fresh record, storing it
    /// under `id` when caching is enabled.
    ///
    /// `None` means the control cannot be measured right now: it is
    /// detached, has no resolvable style, or its box-sizing resolves to
    /// nothing. Callers skip the update and retry later.
    pub fn node_sizing(
        &mut self,
        control: &dyn TextControl,
        id: Option<ControlId>,
        use_cache: bool,
    ) -> Option<NodeSizing> {
        if use_cache {
            if let Some(id) = id {
                if let Some(cached) = self.cache.get(&id) {
                    trace!(id = id.raw(), "sizing cache hit");
                    return Some(cached.clone());
                }
            }
        }

        let style = control.computed_style()?;
        let sizing = NodeSizing::from_computed(&style, self.quirks)?;

        if use_cache {
            if let Some(id) = id {
                debug!(id = id.raw(), "sizing record cached");
                self.cache.insert(id, sizing.clone());
            }
        }

        Some(sizing)
    }

    /// Drop the cached record for `id`. No-op when nothing is cached.
    ///
    /// The only way an entry ever leaves the cache; call it on any change
    /// to a control's styling-relevant CSS and on control teardown.
    pub fn purge(&mut self, id: ControlId) {
        if self.cache.remove(&id).is_some() {
            trace!(id = id.raw(), "sizing record purged");
        }
    }

    /// Number of cached sizing records.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use growkit_css::ComputedStyleMap;
    use std::cell::Cell;

    struct CountingControl {
        style: Option<ComputedStyleMap>,
        style_reads: Cell<usize>,
    }

    impl CountingControl {
        fn attached() -> Self {
            let style = ComputedStyleMap::parse(
                "box-sizing: content-box; width: 100px; padding-top: 3px; padding-bottom: 3px",
            )
            .unwrap();
            Self {
                style: Some(style),
                style_reads: Cell::new(0),
            }
        }

        fn detached() -> Self {
            Self {
                style: None,
                style_reads: Cell::new(0),
            }
        }
    }

    impl TextControl for CountingControl {
        fn value(&self) -> String {
            String::new()
        }

        fn placeholder(&self) -> String {
            String::new()
        }

        fn computed_style(&self) -> Option<ComputedStyleMap> {
            self.style_reads.set(self.style_reads.get() + 1);
            self.style.clone()
        }
    }

    #[test]
    fn test_cache_hit_skips_style_read() {
        let mut extractor = StyleExtractor::default();
        let control = CountingControl::attached();
        let id = ControlId::new(1);

        let first = extractor.node_sizing(&control, Some(id), true).unwrap();
        let second = extractor.node_sizing(&control, Some(id), true).unwrap();

        assert_eq!(control.style_reads.get(), 1);
        assert_eq!(first, second);
        assert_eq!(extractor.cache_len(), 1);
    }

    #[test]
    fn test_uncached_calls_always_read() {
        let mut extractor = StyleExtractor::default();
        let control = CountingControl::attached();

        extractor.node_sizing(&control, None, false).unwrap();
        extractor.node_sizing(&control, None, false).unwrap();

        assert_eq!(control.style_reads.get(), 2);
        assert_eq!(extractor.cache_len(), 0);
    }

    #[test]
    fn test_cache_disabled_does_not_populate() {
        let mut extractor = StyleExtractor::default();
        let control = CountingControl::attached();
        let id = ControlId::new(7);

        extractor.node_sizing(&control, Some(id), false).unwrap();
        assert_eq!(extractor.cache_len(), 0);
    }

    #[test]
    fn test_purge_forces_reread() {
        let mut extractor = StyleExtractor::default();
        let control = CountingControl::attached();
        let id = ControlId::new(2);

        extractor.node_sizing(&control, Some(id), true).unwrap();
        extractor.purge(id);
        extractor.node_sizing(&control, Some(id), true).unwrap();

        assert_eq!(control.style_reads.get(), 2);
    }

    #[test]
    fn test_purge_unknown_id_is_noop() {
        let mut extractor = StyleExtractor::default();
        extractor.purge(ControlId::new(99));
        assert_eq!(extractor.cache_len(), 0);
    }

    #[test]
    fn test_detached_control_yields_nothing() {
        let mut extractor = StyleExtractor::default();
        let control = CountingControl::detached();

        assert!(extractor
            .node_sizing(&control, Some(ControlId::new(3)), true)
            .is_none());
        assert_eq!(extractor.cache_len(), 0);
    }

    #[test]
    fn test_distinct_identities_do_not_collide() {
        let mut extractor = StyleExtractor::default();
        let control = CountingControl::attached();

        extractor
            .node_sizing(&control, Some(ControlId::new(1)), true)
            .unwrap();
        extractor
            .node_sizing(&control, Some(ControlId::new(2)), true)
            .unwrap();

        assert_eq!(control.style_reads.get(), 2);
        assert_eq!(extractor.cache_len(), 2);
    }
}
