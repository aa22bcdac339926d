//! End-to-end draw-all scenarios driven through the [`Editor`] facade.
//!
//! A recording visualizer is registered for two component classes; each test
//! mutates the scene through the editor, ticks, and checks which components
//! had their 3D and HUD draws invoked.

use std::cell::RefCell;
use std::rc::Rc;

use drawall_editor::commands::TOGGLE_DRAW_ALL_VISUALIZERS;
use drawall_editor::drawall_core::overlay::TYPE_COUNTS_MESSAGE_KEY;
use drawall_editor::prelude::*;

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Recording {
    scene: RefCell<Vec<ObjectId>>,
    hud: RefCell<Vec<ObjectId>>,
}

impl ComponentVisualizer for Recording {
    fn draw_visualization(
        &self,
        component: ObjectId,
        _host: &dyn EditorHost,
        _pdi: &mut dyn PrimitiveDrawInterface,
    ) {
        self.scene.borrow_mut().push(component);
    }

    fn draw_visualization_hud(
        &self,
        component: ObjectId,
        _host: &dyn EditorHost,
        _canvas: &mut dyn Canvas,
    ) {
        self.hud.borrow_mut().push(component);
    }
}

struct Harness {
    editor: Editor,
    recording: Rc<Recording>,
    level: ObjectId,
}

impl Harness {
    /// Editor with an empty map and draw-all enabled from the console.
    fn new() -> Self {
        let mut editor = Editor::new(EditorOptions::default()).unwrap();
        let recording = Rc::new(Recording::default());
        editor
            .visualizers_mut()
            .register("ArrowComponent", recording.clone());
        editor
            .visualizers_mut()
            .register("SplineComponent", recording.clone());
        let (_, level) = editor.load_map().unwrap();
        editor
            .execute_console_command("DrawAllVisualizers.Enabled 1")
            .unwrap();
        Self {
            editor,
            recording,
            level,
        }
    }

    fn entity(&mut self) -> ObjectId {
        self.editor.spawn_entity(self.level, "Actor", [0.0; 3]).unwrap()
    }

    fn component(&mut self, entity: ObjectId, class: &str) -> ObjectId {
        self.editor.add_component(entity, class, [0.0; 3]).unwrap()
    }

    /// Tick once; returns the sorted 3D and HUD draw targets.
    fn frame(&mut self) -> (Vec<ObjectId>, Vec<ObjectId>) {
        self.recording.scene.borrow_mut().clear();
        self.recording.hud.borrow_mut().clear();
        self.editor.tick(1.0 / 60.0);
        let mut scene = self.recording.scene.borrow().clone();
        let mut hud = self.recording.hud.borrow().clone();
        scene.sort();
        hud.sort();
        (scene, hud)
    }

    fn driver(&self) -> &DrawAllVisualizers {
        self.editor
            .draw_all_mode()
            .expect("draw-all mode active")
            .driver()
    }

    fn report(&self) -> FrameReport {
        self.driver().last_report()
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn unselected_component_is_drawn_once_per_pass() {
    let mut h = Harness::new();
    let e = h.entity();
    let c = h.component(e, "ArrowComponent");

    let (scene, hud) = h.frame();
    assert_eq!(scene, vec![c]);
    assert_eq!(hud, vec![c]);
    assert_eq!(h.report().mode, DrawMode::Cached);
    assert!(h.report().cache_rebuilt);
}

#[test]
fn selected_entity_is_left_to_the_native_path() {
    let mut h = Harness::new();
    let e = h.entity();
    let c = h.component(e, "ArrowComponent");
    let other = h.entity();
    let d = h.component(other, "ArrowComponent");
    h.frame();

    h.editor.select(e).unwrap();
    assert!(h.driver().needs_selection_rebuild());
    let (scene, hud) = h.frame();

    assert!(h.driver().cache().get(c).unwrap().is_selected);
    assert_eq!(scene, vec![d]);
    assert_eq!(hud, vec![d]);
    assert!(h.report().selection_rebuilt);
    assert!(!h.report().cache_rebuilt);
    assert_eq!(h.report().skipped_selected, 1);

    h.editor.deselect(e);
    let (scene, _) = h.frame();
    assert_eq!(scene, vec![c, d]);
}

#[test]
fn constructed_component_enters_cache_immediately() {
    let mut h = Harness::new();
    let e = h.entity();
    h.component(e, "ArrowComponent");
    h.frame();
    assert!(h.editor.services().has_object_created_subscribers());

    let d = h.component(e, "SplineComponent");
    let entry = h.driver().cache().get(d).expect("patched into the cache");
    assert!(!entry.is_selected);

    let (scene, _) = h.frame();
    assert!(scene.contains(&d));
    assert!(!h.report().cache_rebuilt);
}

#[test]
fn component_added_to_selected_entity_draws_until_selection_rebuild() {
    let mut h = Harness::new();
    let e = h.entity();
    let c = h.component(e, "ArrowComponent");
    h.editor.select(e).unwrap();
    h.frame();

    let d = h.component(e, "SplineComponent");
    let (scene, _) = h.frame();
    assert_eq!(scene, vec![d]);

    h.editor.clear_selection();
    h.editor.select(e).unwrap();
    let (scene, _) = h.frame();
    assert!(scene.is_empty(), "{c} and {d} both belong to the selection now");
}

#[test]
fn exclusion_is_not_retroactive() {
    let mut h = Harness::new();
    let e = h.entity();
    let c = h.component(e, "ArrowComponent");
    h.frame();

    h.editor
        .edit_settings(SettingsProperty::IgnoredVisualizers, |s| {
            s.ignored_visualizers.insert(ClassName::new("ArrowComponent"));
        });

    // Already cached: still drawn.
    let late = h.component(e, "ArrowComponent");
    let (scene, _) = h.frame();
    assert_eq!(scene, vec![c]);
    assert!(!h.driver().cache().contains(late));

    // A full rebuild applies the exclusion.
    h.editor.execute_command(TOGGLE_DRAW_ALL_VISUALIZERS).unwrap();
    h.frame();
    h.editor.execute_command(TOGGLE_DRAW_ALL_VISUALIZERS).unwrap();
    let (scene, _) = h.frame();
    assert!(scene.is_empty());
    assert!(h.driver().cache().is_empty());
}

#[test]
fn play_session_draws_only_play_worlds() {
    let mut h = Harness::new();
    let e = h.entity();
    let c = h.component(e, "ArrowComponent");
    h.frame();

    let pie_worlds = h.editor.begin_play(false).unwrap();
    assert!(h.driver().needs_cache_rebuild());
    assert!(h.driver().needs_selection_rebuild());

    let (scene, _) = h.frame();
    assert_eq!(scene.len(), 1);
    assert_ne!(scene[0], c);
    let scene_host = h.editor.scene();
    assert_eq!(scene_host.world_of(scene[0]), Some(pie_worlds[0]));
    assert!(h.report().cache_rebuilt);

    h.editor.end_play().unwrap();
    assert!(h.driver().needs_cache_rebuild());
    let (scene, _) = h.frame();
    assert_eq!(scene, vec![c]);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn rebuild_is_idempotent() {
    let mut h = Harness::new();
    for _ in 0..4 {
        let e = h.entity();
        h.component(e, "ArrowComponent");
        h.component(e, "SplineComponent");
        h.component(e, "StaticMeshComponent");
    }
    h.frame();
    let first = h.driver().cache().keys_sorted();

    h.editor.begin_play(true).unwrap();
    h.editor.end_play().unwrap();
    h.frame();
    assert!(h.report().cache_rebuilt);
    assert_eq!(h.driver().cache().keys_sorted(), first);
    assert_eq!(first.len(), 8);
}

#[test]
fn toggling_off_and_on_rebuilds_without_stale_entries() {
    let mut h = Harness::new();
    let e = h.entity();
    let c = h.component(e, "ArrowComponent");
    h.frame();
    let redraws = h.editor.services().redraw_requests();

    h.editor.execute_command(TOGGLE_DRAW_ALL_VISUALIZERS).unwrap();
    let (scene, hud) = h.frame();
    assert!(scene.is_empty() && hud.is_empty());
    assert_eq!(h.report().mode, DrawMode::Disabled);
    assert!(h.driver().cache().is_empty());
    assert!(!h.editor.services().has_object_created_subscribers());

    // Destroyed while off; nothing may resurrect it.
    h.editor.destroy(c).unwrap();
    let fresh = h.component(e, "ArrowComponent");

    h.editor.execute_command(TOGGLE_DRAW_ALL_VISUALIZERS).unwrap();
    let (scene, _) = h.frame();
    assert!(h.report().cache_rebuilt);
    assert_eq!(scene, vec![fresh]);
    assert_eq!(h.driver().cache().keys_sorted(), vec![fresh]);
    assert_eq!(h.editor.services().redraw_requests(), redraws + 2);
}

#[test]
fn no_cache_mode_leaves_cache_alone() {
    let mut h = Harness::new();
    let e = h.entity();
    let c = h.component(e, "ArrowComponent");
    h.frame();
    let before = h.driver().cache().keys_sorted();

    h.editor
        .execute_console_command("DrawAllVisualizers.NoCache 1")
        .unwrap();
    let (scene, _) = h.frame();
    assert_eq!(h.report().mode, DrawMode::NoCache);
    assert_eq!(scene, vec![c]);

    // Created while uncached: drawn by the scan, not patched into the cache.
    let d = h.component(e, "SplineComponent");
    let (scene, hud) = h.frame();
    let mut expected = vec![c, d];
    expected.sort();
    assert_eq!(scene, expected);
    assert_eq!(hud, expected);
    assert_eq!(h.driver().cache().keys_sorted(), before);

    h.editor
        .execute_console_command("DrawAllVisualizers.NoCache 0")
        .unwrap();
    let (scene, _) = h.frame();
    assert!(h.report().cache_rebuilt);
    assert_eq!(scene.len(), 2);
}

#[test]
fn destroyed_component_is_evicted_after_the_pass() {
    let mut h = Harness::new();
    let e = h.entity();
    let doomed = h.component(e, "ArrowComponent");
    let kept = h.component(e, "SplineComponent");
    h.frame();

    h.editor.destroy(doomed).unwrap();
    assert!(h.driver().cache().contains(doomed));

    let (scene, hud) = h.frame();
    assert_eq!(scene, vec![kept]);
    assert_eq!(hud, vec![kept]);
    assert_eq!(h.report().evicted, 1);
    assert!(!h.driver().cache().contains(doomed));
}

#[test]
fn pending_kill_component_is_skipped_and_evicted() {
    let mut h = Harness::new();
    let e = h.entity();
    let c = h.component(e, "ArrowComponent");
    h.frame();

    h.editor.mark_pending_kill(c).unwrap();
    let (scene, _) = h.frame();
    assert!(scene.is_empty());
    assert_eq!(h.report().evicted, 1);
}

#[test]
fn pending_kill_entity_drops_its_components_in_every_mode() {
    let mut h = Harness::new();
    let doomed = h.entity();
    let c = h.component(doomed, "ArrowComponent");
    let survivor = h.entity();
    let d = h.component(survivor, "SplineComponent");
    h.frame();
    assert!(h.driver().cache().contains(c));

    h.editor.mark_pending_kill(doomed).unwrap();
    let (cached, cached_hud) = h.frame();
    assert_eq!(cached, vec![d]);
    assert_eq!(cached_hud, vec![d]);
    assert_eq!(h.report().evicted, 1);
    assert!(!h.driver().cache().contains(c));

    h.editor
        .execute_console_command("DrawAllVisualizers.NoCache 1")
        .unwrap();
    let (uncached, uncached_hud) = h.frame();
    assert_eq!(h.report().mode, DrawMode::NoCache);
    assert_eq!(uncached, cached);
    assert_eq!(uncached_hud, cached_hud);

    h.editor
        .execute_console_command("DrawAllVisualizers.NoCache 0")
        .unwrap();
    let (rebuilt, _) = h.frame();
    assert!(h.report().cache_rebuilt);
    assert_eq!(rebuilt, cached);
    assert_eq!(h.driver().cache().keys_sorted(), vec![d]);
}

#[test]
fn preview_worlds_are_never_drawn() {
    let mut h = Harness::new();
    let preview = h.editor.create_world(WorldKind::EditorPreview);
    let level = h.editor.add_level(preview).unwrap();
    let e = h.editor.spawn_entity(level, "Actor", [0.0; 3]).unwrap();
    h.editor.add_component(e, "ArrowComponent", [0.0; 3]).unwrap();

    let (scene, _) = h.frame();
    assert!(scene.is_empty());
}

#[test]
fn type_count_overlay_is_posted_each_cached_frame() {
    let mut h = Harness::new();
    h.editor
        .edit_settings(SettingsProperty::DisplayTypeCountsOnScreen, |s| {
            s.display_type_counts_on_screen = true;
        });
    let e = h.entity();
    h.component(e, "ArrowComponent");
    h.component(e, "ArrowComponent");
    h.component(e, "SplineComponent");
    h.frame();

    let message = h
        .editor
        .services()
        .messages()
        .get(TYPE_COUNTS_MESSAGE_KEY)
        .expect("overlay posted");
    assert_eq!(
        message.text,
        "Visualized component types:\n    ArrowComponent 2\n    SplineComponent 1\n"
    );
    assert_eq!(h.editor.services().messages().len(), 1);
}

#[test]
fn map_load_rebuilds_everything() {
    let mut h = Harness::new();
    let e = h.entity();
    h.component(e, "ArrowComponent");
    h.frame();

    let (_, level) = h.editor.load_map().unwrap();
    assert!(h.editor.draw_all_mode().is_none());
    assert!(!h.editor.services().has_object_created_subscribers());
    h.level = level;
    let e = h.entity();
    let c = h.component(e, "ArrowComponent");

    let (scene, _) = h.frame();
    assert_eq!(scene, vec![c]);
    assert!(h.report().cache_rebuilt);
}

#[test]
fn destroying_a_selected_entity_updates_selection() {
    let mut h = Harness::new();
    let e = h.entity();
    h.component(e, "ArrowComponent");
    h.editor.select(e).unwrap();
    h.frame();

    h.editor.destroy(e).unwrap();
    assert!(h.driver().needs_selection_rebuild());
    h.frame();
    assert!(h.driver().selection().is_empty());
    assert!(h.driver().cache().is_empty());
}
