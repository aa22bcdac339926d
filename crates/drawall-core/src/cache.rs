//! Visualizer cache.
//!
//! Maps component handles to the visualizer that draws them plus a cached
//! "owner is selected" flag. Keys are non-owning: a key is only ever checked
//! for liveness through the host, never dereferenced after its object died.
//! Dead keys are collected during a pass and removed afterwards with
//! [`VisualizerCache::remove_stale`].

use std::collections::hash_map;
use std::collections::HashMap;

use tracing::{debug, trace};

use crate::config::DrawAllConfig;
use crate::handle::ObjectId;
use crate::host::{EditorHost, ObjectKind};
use crate::scanner::for_each_component_visualizer;
use crate::visualizer::VisualizerHandle;

// ---------------------------------------------------------------------------
// CachedVisualizer
// ---------------------------------------------------------------------------

/// One cache entry.
#[derive(Clone)]
pub struct CachedVisualizer {
    /// The visualizer registered for the component's class.
    pub visualizer: VisualizerHandle,
    /// Whether the owning entity is selected. Selected entities are left to
    /// the host's own drawing path.
    pub is_selected: bool,
}

impl CachedVisualizer {
    fn new(visualizer: VisualizerHandle) -> Self {
        Self {
            visualizer,
            is_selected: false,
        }
    }
}

impl std::fmt::Debug for CachedVisualizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedVisualizer")
            .field("is_selected", &self.is_selected)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// VisualizerCache
// ---------------------------------------------------------------------------

/// Component handle → [`CachedVisualizer`]. At most one entry per component.
#[derive(Debug, Default)]
pub struct VisualizerCache {
    entries: HashMap<ObjectId, CachedVisualizer>,
}

impl VisualizerCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Clear the cache and refill it from a full world scan.
    ///
    /// One unselected entry is inserted per eligible component whose class
    /// is not excluded. Returns the number of entries.
    pub fn rebuild(&mut self, host: &dyn EditorHost, config: &DrawAllConfig) -> usize {
        self.entries.clear();

        for_each_component_visualizer(host, |_entity, component, visualizer| {
            let Some(class) = host.class_of(component) else {
                return;
            };
            if config.is_excluded(class) {
                return;
            }
            trace!(component = %component, class = %class, "cache: add visualizer");
            self.entries
                .insert(component, CachedVisualizer::new(visualizer.clone()));
        });

        debug!(visualizers = self.entries.len(), "cache: rebuilt");
        self.entries.len()
    }

    /// Insert a freshly constructed object if it is a component with a
    /// registered, non-excluded visualizer.
    ///
    /// The entry starts unselected even if its owner is selected: the host
    /// does not draw components added to an already selected entity until
    /// the next selection change, so this cache draws them meanwhile.
    ///
    /// Returns `true` if an entry was inserted.
    pub fn insert_constructed(
        &mut self,
        host: &dyn EditorHost,
        config: &DrawAllConfig,
        object: ObjectId,
    ) -> bool {
        if host.object_kind(object) != Some(ObjectKind::Component) {
            return false;
        }
        let Some(class) = host.class_of(object) else {
            return false;
        };
        let Some(visualizer) = host.find_visualizer(class) else {
            return false;
        };
        if config.is_excluded(class) {
            return false;
        }

        trace!(component = %object, class = %class, "cache: add constructed visualizer");
        self.entries.insert(object, CachedVisualizer::new(visualizer));
        true
    }

    /// Remove previously collected stale keys. Returns how many were present.
    pub fn remove_stale(&mut self, stale: &[ObjectId]) -> usize {
        stale
            .iter()
            .filter(|key| self.entries.remove(key).is_some())
            .count()
    }

    /// Look up the entry for a component.
    pub fn get(&self, component: ObjectId) -> Option<&CachedVisualizer> {
        self.entries.get(&component)
    }

    /// Whether a component has an entry.
    pub fn contains(&self, component: ObjectId) -> bool {
        self.entries.contains_key(&component)
    }

    /// Number of entries, live or stale.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in arbitrary order.
    pub fn iter(&self) -> hash_map::Iter<'_, ObjectId, CachedVisualizer> {
        self.entries.iter()
    }

    /// Iterate mutably over entries in arbitrary order.
    pub fn iter_mut(&mut self) -> hash_map::IterMut<'_, ObjectId, CachedVisualizer> {
        self.entries.iter_mut()
    }

    /// Cached component handles, sorted.
    pub fn keys_sorted(&self) -> Vec<ObjectId> {
        let mut keys: Vec<ObjectId> = self.entries.keys().copied().collect();
        keys.sort();
        keys
    }
}

impl<'a> IntoIterator for &'a VisualizerCache {
    type Item = (&'a ObjectId, &'a CachedVisualizer);
    type IntoIter = hash_map::Iter<'a, ObjectId, CachedVisualizer>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
