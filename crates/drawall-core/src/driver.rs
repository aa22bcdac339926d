//! Render-frame driver.
//!
//! [`DrawAllVisualizers`] is called once per drawn frame (3D pass, then HUD
//! pass) and by the host's event dispatch. Each 3D frame it:
//!
//! 1. Compares the live `enabled` flag with last frame's value. On a change
//!    the cache is cleared, a rebuild is flagged, the creation subscription
//!    is dropped when turning off, and every viewport is asked to redraw.
//! 2. Reads `no_cache` and picks the uncached path (scan every frame) or the
//!    cached path.
//! 3. On the cached path: rebuilds the cache if flagged, then the selection
//!    if flagged (always in that order), draws every unselected live entry in
//!    a visible world, and only after the loop evicts the dead keys it found.
//!
//! Notifications never do real work: they set flags that the next frame
//! consumes. The one exception is object creation, which patches the cache
//! with a single lookup and insert while the cache is valid.

use tracing::{debug, trace};

use crate::cache::VisualizerCache;
use crate::config::DrawAllConfig;
use crate::handle::{ObjectId, SubscriptionId};
use crate::host::{is_hidden_world, EditorHost, HostServices};
use crate::overlay::{
    format_type_counts, visualizer_type_counts, TYPE_COUNTS_MESSAGE_DURATION,
    TYPE_COUNTS_MESSAGE_KEY,
};
use crate::scanner::for_each_component_visualizer;
use crate::selection::SelectionTracker;
use crate::visualizer::{Canvas, PrimitiveDrawInterface, COLOR_RED};

// ---------------------------------------------------------------------------
// DrawMode / FrameReport
// ---------------------------------------------------------------------------

/// Driver state as of the last 3D frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DrawMode {
    #[default]
    Disabled,
    /// Enabled, scanning the world every frame.
    NoCache,
    /// Enabled, serving draws from the cache.
    Cached,
}

/// What one draw pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Mode the pass ran in.
    pub mode: DrawMode,
    /// Visualizer invocations.
    pub drawn: usize,
    /// Components skipped because their owner is selected.
    pub skipped_selected: usize,
    /// Components skipped because their world is missing or a preview.
    pub skipped_hidden: usize,
    /// Stale entries removed after the pass.
    pub evicted: usize,
    /// Whether the cache was rebuilt from a full scan this pass.
    pub cache_rebuilt: bool,
    /// Whether the selection snapshot was rebuilt this pass.
    pub selection_rebuilt: bool,
}

// ---------------------------------------------------------------------------
// DrawAllVisualizers
// ---------------------------------------------------------------------------

/// Decides which components get their visualizer invoked each frame.
#[derive(Debug)]
pub struct DrawAllVisualizers {
    /// `enabled` as seen on the previous 3D frame.
    enabled: bool,
    /// `no_cache` as seen on the previous enabled 3D frame.
    no_cache: bool,
    need_rebuild_cache: bool,
    cache: VisualizerCache,
    selection: SelectionTracker,
    object_created: Option<SubscriptionId>,
    /// Scratch list of dead keys found during the draw loop.
    stale: Vec<ObjectId>,
    last_report: FrameReport,
}

impl DrawAllVisualizers {
    /// A disabled driver with both rebuilds pending.
    pub fn new() -> Self {
        Self {
            enabled: false,
            no_cache: false,
            need_rebuild_cache: true,
            cache: VisualizerCache::new(),
            selection: SelectionTracker::new(),
            object_created: None,
            stale: Vec::new(),
            last_report: FrameReport::default(),
        }
    }

    // -- frame passes -------------------------------------------------------

    /// Run the 3D scene pass.
    pub fn draw_frame_3d(
        &mut self,
        host: &dyn EditorHost,
        services: &mut dyn HostServices,
        config: &DrawAllConfig,
        pdi: &mut dyn PrimitiveDrawInterface,
    ) -> FrameReport {
        self.sync_enabled(config.enabled, services);

        let report = if !self.enabled {
            FrameReport::default()
        } else {
            self.no_cache = config.no_cache;
            if self.no_cache {
                self.draw_uncached(host, config, pdi)
            } else {
                self.draw_cached(host, services, config, pdi)
            }
        };

        self.last_report = report;
        report
    }

    /// Run the 2D HUD pass.
    ///
    /// Uses the mode and cache state left by this frame's 3D pass. It never
    /// rebuilds, evicts or touches the dirty flags; dead entries are simply
    /// skipped.
    pub fn draw_frame_hud(
        &self,
        host: &dyn EditorHost,
        config: &DrawAllConfig,
        canvas: &mut dyn Canvas,
    ) -> FrameReport {
        let mut report = FrameReport {
            mode: self.mode(),
            ..FrameReport::default()
        };

        match report.mode {
            DrawMode::Disabled => {}
            DrawMode::NoCache => {
                for_each_component_visualizer(host, |entity, component, visualizer| {
                    if self.selection.contains(entity) {
                        report.skipped_selected += 1;
                        return;
                    }
                    if host.class_of(component).is_some_and(|c| config.is_excluded(c)) {
                        return;
                    }
                    visualizer.draw_visualization_hud(component, host, canvas);
                    report.drawn += 1;
                });
            }
            DrawMode::Cached => {
                for (&component, entry) in &self.cache {
                    if !host.is_valid(component) {
                        continue;
                    }
                    if entry.is_selected {
                        report.skipped_selected += 1;
                        continue;
                    }
                    if is_hidden_world(host, host.world_of(component)) {
                        report.skipped_hidden += 1;
                        continue;
                    }
                    entry.visualizer.draw_visualization_hud(component, host, canvas);
                    report.drawn += 1;
                }
            }
        }

        report
    }

    fn draw_uncached(
        &mut self,
        host: &dyn EditorHost,
        config: &DrawAllConfig,
        pdi: &mut dyn PrimitiveDrawInterface,
    ) -> FrameReport {
        // The cache is neither consulted nor modified here, but it can no
        // longer be trusted once cached mode resumes.
        self.need_rebuild_cache = true;

        let mut report = FrameReport {
            mode: DrawMode::NoCache,
            ..FrameReport::default()
        };

        // Only the snapshot: cached entries keep whatever flags they had.
        if self.selection.is_dirty() {
            self.selection.refresh_snapshot(host);
            report.selection_rebuilt = true;
        }

        let selection = &self.selection;
        for_each_component_visualizer(host, |entity, component, visualizer| {
            if selection.contains(entity) {
                report.skipped_selected += 1;
                return;
            }
            if host.class_of(component).is_some_and(|c| config.is_excluded(c)) {
                return;
            }
            visualizer.draw_visualization(component, host, pdi);
            report.drawn += 1;
        });

        report
    }

    fn draw_cached(
        &mut self,
        host: &dyn EditorHost,
        services: &mut dyn HostServices,
        config: &DrawAllConfig,
        pdi: &mut dyn PrimitiveDrawInterface,
    ) -> FrameReport {
        let mut report = FrameReport {
            mode: DrawMode::Cached,
            ..FrameReport::default()
        };

        if self.need_rebuild_cache {
            self.rebuild_cache(host, services, config);
            report.cache_rebuilt = true;
        }
        if self.selection.is_dirty() {
            self.selection.rebuild(host, &mut self.cache);
            report.selection_rebuilt = true;
        }

        // Dead keys are collected here and removed after the loop; the map is
        // never mutated while it is being iterated.
        self.stale.clear();
        for (&component, entry) in self.cache.iter() {
            if !host.is_valid(component) {
                self.stale.push(component);
                continue;
            }
            if entry.is_selected {
                report.skipped_selected += 1;
                continue;
            }
            if is_hidden_world(host, host.world_of(component)) {
                report.skipped_hidden += 1;
                continue;
            }
            entry.visualizer.draw_visualization(component, host, pdi);
            report.drawn += 1;
        }

        report.evicted = self.cache.remove_stale(&self.stale);
        self.stale.clear();
        if report.evicted > 0 {
            trace!(evicted = report.evicted, "cache: evicted stale entries");
        }

        if config.show_type_counts {
            let rows = visualizer_type_counts(host, &self.cache);
            services.add_on_screen_debug_message(
                TYPE_COUNTS_MESSAGE_KEY,
                TYPE_COUNTS_MESSAGE_DURATION,
                COLOR_RED,
                format_type_counts(&rows),
            );
        }

        report
    }

    // -- state transitions --------------------------------------------------

    fn sync_enabled(&mut self, enabled: bool, services: &mut dyn HostServices) {
        if enabled == self.enabled {
            return;
        }
        self.enabled = enabled;
        self.cache.clear();
        if !enabled {
            self.unsubscribe(services);
        }
        self.need_rebuild_cache = true;
        services.redraw_all_viewports();
        debug!(enabled, "draw all visualizers: enabled changed");
    }

    fn rebuild_cache(
        &mut self,
        host: &dyn EditorHost,
        services: &mut dyn HostServices,
        config: &DrawAllConfig,
    ) {
        self.need_rebuild_cache = false;
        self.cache.rebuild(host, config);

        if self.object_created.is_none() {
            self.object_created = Some(services.subscribe_object_created());
        }

        // Fresh entries all start unselected.
        self.selection.mark_dirty();
    }

    fn unsubscribe(&mut self, services: &mut dyn HostServices) {
        if let Some(subscription) = self.object_created.take() {
            services.unsubscribe_object_created(subscription);
        }
    }

    /// Release the creation subscription and drop all cached state. Called
    /// when the owning editor mode exits.
    pub fn shutdown(&mut self, services: &mut dyn HostServices) {
        self.unsubscribe(services);
        self.cache.clear();
        self.need_rebuild_cache = true;
    }

    // -- event ports --------------------------------------------------------

    /// The host's selection changed. The snapshot is rebuilt next frame.
    pub fn on_selection_changed(&mut self) {
        self.selection.mark_dirty();
    }

    /// A play or simulate session started.
    pub fn on_session_start(&mut self, is_simulating: bool) {
        debug!(is_simulating, "play session started");
        self.on_session_transition();
    }

    /// A play or simulate session ended.
    pub fn on_session_end(&mut self, is_simulating: bool) {
        debug!(is_simulating, "play session ended");
        self.on_session_transition();
    }

    fn on_session_transition(&mut self) {
        self.need_rebuild_cache = true;
        self.selection.mark_dirty();
    }

    /// An object was constructed somewhere in the host.
    ///
    /// Ignored while disabled or while a full rebuild is pending, since that
    /// rebuild will pick the object up.
    pub fn on_object_created(
        &mut self,
        host: &dyn EditorHost,
        config: &DrawAllConfig,
        object: ObjectId,
    ) {
        if !self.enabled || self.need_rebuild_cache {
            return;
        }
        self.cache.insert_constructed(host, config, object);
    }

    // -- accessors ----------------------------------------------------------

    /// Current driver state.
    pub fn mode(&self) -> DrawMode {
        match (self.enabled, self.no_cache) {
            (false, _) => DrawMode::Disabled,
            (true, true) => DrawMode::NoCache,
            (true, false) => DrawMode::Cached,
        }
    }

    /// The visualizer cache.
    pub fn cache(&self) -> &VisualizerCache {
        &self.cache
    }

    /// The selection tracker.
    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    /// Whether the next cached frame will rebuild from a full scan.
    pub fn needs_cache_rebuild(&self) -> bool {
        self.need_rebuild_cache
    }

    /// Whether the next frame will rebuild the selection snapshot.
    pub fn needs_selection_rebuild(&self) -> bool {
        self.selection.is_dirty()
    }

    /// Whether creation notifications are currently subscribed.
    pub fn is_subscribed(&self) -> bool {
        self.object_created.is_some()
    }

    /// Report of the last 3D pass.
    pub fn last_report(&self) -> FrameReport {
        self.last_report
    }
}

impl Default for DrawAllVisualizers {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
