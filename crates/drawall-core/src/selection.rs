//! Selection tracker.
//!
//! Keeps a snapshot of the host's selected entities and refreshes the
//! `is_selected` flag of every cache entry from it. The snapshot is rebuilt
//! wholesale, never patched: selection-changed notifications only mark the
//! tracker dirty and the next frame does the work.

use std::collections::HashSet;

use tracing::debug;

use crate::cache::VisualizerCache;
use crate::handle::ObjectId;
use crate::host::EditorHost;

/// Counts produced by a selection rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionReport {
    /// Number of selected entities.
    pub selected_entities: usize,
    /// Cache entries whose owner is selected.
    pub selected_visualizers: usize,
    /// Total cache entries visited.
    pub total_visualizers: usize,
}

/// Snapshot of selected entities plus a dirty flag.
#[derive(Debug)]
pub struct SelectionTracker {
    selected: HashSet<ObjectId>,
    dirty: bool,
}

impl SelectionTracker {
    /// A new tracker starts dirty so the first frame reads the selection.
    pub fn new() -> Self {
        Self {
            selected: HashSet::new(),
            dirty: true,
        }
    }

    /// Request a rebuild on the next frame.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Whether a rebuild is pending.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether `entity` was selected at the last rebuild.
    pub fn contains(&self, entity: ObjectId) -> bool {
        self.selected.contains(&entity)
    }

    /// Number of selected entities at the last rebuild.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing was selected at the last rebuild.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Replace the snapshot with the host's current selection without
    /// touching any cache. Used by the uncached path, which filters against
    /// the snapshot directly. Returns the number of selected entities.
    pub fn refresh_snapshot(&mut self, host: &dyn EditorHost) -> usize {
        self.dirty = false;
        self.selected = host.selected_entities().iter().copied().collect();
        debug!(selected_entities = self.selected.len(), "selection: snapshot refreshed");
        self.selected.len()
    }

    /// Replace the snapshot with the host's current selection and refresh
    /// every cache entry's `is_selected` flag.
    ///
    /// Entries whose component is dead get `is_selected = false` and stay in
    /// the cache for the draw pass to evict.
    pub fn rebuild(&mut self, host: &dyn EditorHost, cache: &mut VisualizerCache) -> SelectionReport {
        self.dirty = false;
        self.selected = host.selected_entities().iter().copied().collect();

        let mut selected_visualizers = 0;
        for (&component, entry) in cache.iter_mut() {
            if !host.is_valid(component) {
                entry.is_selected = false;
                continue;
            }
            entry.is_selected = host
                .owner_of(component)
                .is_some_and(|owner| self.selected.contains(&owner));
            selected_visualizers += usize::from(entry.is_selected);
        }

        let report = SelectionReport {
            selected_entities: self.selected.len(),
            selected_visualizers,
            total_visualizers: cache.len(),
        };
        debug!(
            selected_entities = report.selected_entities,
            selected_visualizers = report.selected_visualizers,
            total_visualizers = report.total_visualizers,
            "selection: rebuilt"
        );
        report
    }
}

impl Default for SelectionTracker {
    fn default() -> Self {
        Self::new()
    }
}
