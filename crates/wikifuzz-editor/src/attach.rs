use std::collections::HashSet;

/// Which selector family made a surface eligible for autocomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// The host wiki's own editor textarea.
    HostEditor,
    /// A text field inside a third-party form plugin's container.
    FormPlugin,
    /// Anything else; never attached.
    Other,
}

/// An input surface reported by the embedding layer's structural watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    pub id: String,
    pub kind: SurfaceKind,
}

/// Tracks which surfaces already carry an autocomplete controller. The
/// structural watcher (a DOM observer in the browser embedding) feeds
/// surfaces in as it discovers them, including ones added long after page
/// load; attaching is idempotent per surface id.
#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    attached: HashSet<String>,
}

impl SurfaceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_attached(&self, surface_id: &str) -> bool {
        self.attached.contains(surface_id)
    }

    /// Consume a batch of discovered surfaces, returning the ids that
    /// should get a fresh controller. Ineligible and already-attached
    /// surfaces are skipped.
    pub fn observe<I>(&mut self, surfaces: I) -> Vec<String>
    where
        I: IntoIterator<Item = Surface>,
    {
        let mut fresh = Vec::new();
        for surface in surfaces {
            if !matches!(
                surface.kind,
                SurfaceKind::HostEditor | SurfaceKind::FormPlugin
            ) {
                continue;
            }
            if self.attached.insert(surface.id.clone()) {
                fresh.push(surface.id);
            }
        }
        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(id: &str, kind: SurfaceKind) -> Surface {
        Surface {
            id: id.to_string(),
            kind,
        }
    }

    #[test]
    fn attaches_each_eligible_surface_once() {
        let mut registry = SurfaceRegistry::new();
        let fresh = registry.observe(vec![
            surface("wikitext", SurfaceKind::HostEditor),
            surface("form-field-1", SurfaceKind::FormPlugin),
        ]);
        assert_eq!(fresh, ["wikitext", "form-field-1"]);

        // the watcher re-reports existing surfaces on every mutation
        let fresh = registry.observe(vec![
            surface("wikitext", SurfaceKind::HostEditor),
            surface("form-field-2", SurfaceKind::FormPlugin),
        ]);
        assert_eq!(fresh, ["form-field-2"]);
        assert!(registry.is_attached("wikitext"));
    }

    #[test]
    fn ineligible_surfaces_are_skipped() {
        let mut registry = SurfaceRegistry::new();
        let fresh = registry.observe(vec![surface("comment-box", SurfaceKind::Other)]);
        assert!(fresh.is_empty());
        assert!(!registry.is_attached("comment-box"));
    }
}
