//! The editor facade.
//!
//! [`Editor`] owns the scene, the viewport services, the mode manager, the
//! console variables and settings, and the command tables. Every scene
//! mutation goes through it so the resulting notifications (object
//! construction, selection changes, play sessions) reach the active modes
//! right after the mutation. [`Editor::tick`] runs next-tick timers and then
//! both draw passes of every viewport.
//!
//! The draw-all feature is installed by [`DrawAllVisualizersSubsystem`] when
//! the editor starts, unless it runs as a commandlet.

use std::time::{Duration, Instant};

use drawall_core::config::DrawAllConfig;
use drawall_core::handle::ObjectId;
use drawall_core::host::{EditorHost, WorldKind};
use drawall_core::visualizer::VisualizerRegistry;
use tracing::{debug, trace, warn};

use crate::commands::{
    toggle_command_info, toggle_draw_all_visualizers, ActionTable, CommandRegistry, EditorAction,
    InputChord, DRAW_ALL_CONTEXT, TOGGLE_DRAW_ALL_VISUALIZERS,
};
use crate::draw::ViewportFrame;
use crate::draw_all_mode::{DrawAllVisualizersMode, EM_DRAW_ALL_VISUALIZERS};
use crate::mode::{
    EditorModeRegistry, ModeContext, ModeExitContext, ModeId, ModeTools, PlaySessionEvent,
};
use crate::scene::{EditorScene, SceneEvent};
use crate::services::EditorServices;
use crate::settings::{ConsoleVariables, DrawAllSettings, SettingsProperty};
use crate::timer::{TimerAction, TimerManager};
use crate::EditorError;

// ---------------------------------------------------------------------------
// EditorOptions
// ---------------------------------------------------------------------------

/// Startup options.
#[derive(Debug, Clone)]
pub struct EditorOptions {
    /// Number of level viewports drawn each tick.
    pub viewports: usize,
    /// Running a headless commandlet; editor subsystems are not created.
    pub is_commandlet: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            viewports: 1,
            is_commandlet: false,
        }
    }
}

// ---------------------------------------------------------------------------
// TickDiagnostics
// ---------------------------------------------------------------------------

/// Timing diagnostics for the last tick.
#[derive(Debug, Clone, Default)]
pub struct TickDiagnostics {
    /// Wall-clock time of both passes, per viewport.
    pub viewport_times: Vec<Duration>,
    /// Total time for the tick.
    pub total_time: Duration,
    /// Next-tick timers that ran.
    pub timers_run: usize,
}

// ---------------------------------------------------------------------------
// Editor
// ---------------------------------------------------------------------------

/// The editor.
#[derive(Debug)]
pub struct Editor {
    options: EditorOptions,
    scene: EditorScene,
    services: EditorServices,
    mode_registry: EditorModeRegistry,
    modes: ModeTools,
    timers: TimerManager,
    cvars: ConsoleVariables,
    settings: DrawAllSettings,
    commands: CommandRegistry,
    play_world_actions: ActionTable,
    draw_all_subsystem: bool,
    exit_requested: bool,
    tick_count: u64,
    last_diagnostics: TickDiagnostics,
}

impl Editor {
    /// Start an editor with default settings.
    ///
    /// # Errors
    ///
    /// Propagates subsystem initialization failures.
    pub fn new(options: EditorOptions) -> Result<Self, EditorError> {
        Self::with_settings(options, DrawAllSettings::default())
    }

    /// Start an editor with previously loaded settings.
    ///
    /// # Errors
    ///
    /// Propagates subsystem initialization failures.
    pub fn with_settings(options: EditorOptions, settings: DrawAllSettings) -> Result<Self, EditorError> {
        let mut editor = Self {
            options,
            scene: EditorScene::new(),
            services: EditorServices::new(),
            mode_registry: EditorModeRegistry::new(),
            modes: ModeTools::new(),
            timers: TimerManager::new(),
            cvars: ConsoleVariables::new(),
            settings,
            commands: CommandRegistry::new(),
            play_world_actions: ActionTable::new(),
            draw_all_subsystem: false,
            exit_requested: false,
            tick_count: 0,
            last_diagnostics: TickDiagnostics::default(),
        };
        editor.settings.post_init(&mut editor.cvars);

        if DrawAllVisualizersSubsystem::should_create(&editor.options) {
            DrawAllVisualizersSubsystem::initialize(&mut editor)?;
        }
        Ok(editor)
    }

    // -- ticking ------------------------------------------------------------

    /// Run one editor tick: next-tick timers, then the 3D and HUD passes of
    /// every viewport, then age on-screen messages by `delta_seconds`.
    pub fn tick(&mut self, delta_seconds: f32) -> Vec<ViewportFrame> {
        let tick_start = Instant::now();
        let timers_run = self.run_timers();

        let config = self.config_snapshot();
        let mut frames = Vec::with_capacity(self.options.viewports);
        let mut viewport_times = Vec::with_capacity(self.options.viewports);
        for index in 0..self.options.viewports {
            let viewport_start = Instant::now();
            let mut frame = ViewportFrame::new(index);
            let mut ctx = ModeContext {
                scene: &self.scene,
                services: &mut self.services,
                config: &config,
            };
            self.modes.render(&mut ctx, &mut frame.scene);
            self.modes.draw_hud(&mut ctx, &mut frame.hud);
            viewport_times.push(viewport_start.elapsed());
            frames.push(frame);
        }

        self.services.messages_mut().tick(delta_seconds);
        self.tick_count += 1;
        self.last_diagnostics = TickDiagnostics {
            viewport_times,
            total_time: tick_start.elapsed(),
            timers_run,
        };
        frames
    }

    fn run_timers(&mut self) -> usize {
        let actions = self.timers.take_next_tick();
        let count = actions.len();
        for action in actions {
            match action {
                TimerAction::ActivateMode(id) => {
                    if let Err(err) = self.activate_mode(id) {
                        warn!(mode = %id, %err, "timer: mode activation failed");
                    }
                }
            }
        }
        count
    }

    /// Configuration snapshot from the console variables and settings.
    pub fn config_snapshot(&self) -> DrawAllConfig {
        self.cvars.snapshot(&self.settings)
    }

    // -- scene --------------------------------------------------------------

    /// Forward queued scene notifications to the active modes.
    fn dispatch_scene_events(&mut self) {
        let events = self.scene.drain_events();
        let mut config: Option<DrawAllConfig> = None;
        for event in events {
            match event {
                SceneEvent::SelectionChanged => self.modes.on_selection_changed(),
                SceneEvent::ObjectConstructed(object) => {
                    if !self.services.has_object_created_subscribers() {
                        continue;
                    }
                    trace!(%object, "object constructed");
                    let snapshot =
                        config.get_or_insert_with(|| self.cvars.snapshot(&self.settings));
                    let mut ctx = ModeContext {
                        scene: &self.scene,
                        services: &mut self.services,
                        config: snapshot,
                    };
                    self.modes.on_object_constructed(&mut ctx, object);
                }
            }
        }
    }

    pub fn create_world(&mut self, kind: WorldKind) -> ObjectId {
        let world = self.scene.create_world(kind);
        self.dispatch_scene_events();
        world
    }

    pub fn add_level(&mut self, world: ObjectId) -> Result<ObjectId, EditorError> {
        let level = self.scene.add_level(world)?;
        self.dispatch_scene_events();
        Ok(level)
    }

    pub fn spawn_entity(
        &mut self,
        level: ObjectId,
        class: &str,
        location: [f32; 3],
    ) -> Result<ObjectId, EditorError> {
        let entity = self.scene.spawn_entity(level, class, location)?;
        self.dispatch_scene_events();
        Ok(entity)
    }

    pub fn add_component(
        &mut self,
        entity: ObjectId,
        class: &str,
        offset: [f32; 3],
    ) -> Result<ObjectId, EditorError> {
        let component = self.scene.add_component(entity, class, offset)?;
        self.dispatch_scene_events();
        Ok(component)
    }

    /// Destroy an object and everything it owns.
    pub fn destroy(&mut self, object: ObjectId) -> Result<usize, EditorError> {
        let destroyed = self.scene.destroy(object)?;
        self.dispatch_scene_events();
        Ok(destroyed)
    }

    pub fn mark_pending_kill(&mut self, object: ObjectId) -> Result<(), EditorError> {
        self.scene.mark_pending_kill(object)
    }

    pub fn set_location(&mut self, object: ObjectId, location: [f32; 3]) -> Result<(), EditorError> {
        self.scene.set_location(object, location)
    }

    pub fn select(&mut self, entity: ObjectId) -> Result<bool, EditorError> {
        let changed = self.scene.select(entity)?;
        self.dispatch_scene_events();
        Ok(changed)
    }

    pub fn deselect(&mut self, entity: ObjectId) -> bool {
        let changed = self.scene.deselect(entity);
        self.dispatch_scene_events();
        changed
    }

    pub fn clear_selection(&mut self) {
        self.scene.clear_selection();
        self.dispatch_scene_events();
    }

    /// Start a play (or simulate) session. Editor worlds are duplicated into
    /// play-in-editor worlds; modes are told once the copies exist.
    pub fn begin_play(&mut self, is_simulating: bool) -> Result<Vec<ObjectId>, EditorError> {
        let worlds = self.scene.begin_play(is_simulating)?;
        self.dispatch_scene_events();
        debug!(is_simulating, worlds = worlds.len(), "play session: started");
        self.modes
            .on_play_session(PlaySessionEvent::Started { is_simulating });
        Ok(worlds)
    }

    /// End the running play session and destroy its worlds.
    pub fn end_play(&mut self) -> Result<(), EditorError> {
        let session = self.scene.end_play()?;
        self.dispatch_scene_events();
        debug!(is_simulating = session.is_simulating, "play session: ended");
        self.modes.on_play_session(PlaySessionEvent::Ended {
            is_simulating: session.is_simulating,
        });
        Ok(())
    }

    /// Replace the edited map with an empty one.
    ///
    /// Ends any play session, deactivates every mode, destroys every world
    /// except preview contexts and creates a fresh editor world with one
    /// level. Returns `(world, level)`.
    pub fn load_map(&mut self) -> Result<(ObjectId, ObjectId), EditorError> {
        if self.scene.play_session().is_some() {
            self.end_play()?;
        }
        self.deactivate_all_modes();

        let doomed: Vec<ObjectId> = self
            .scene
            .world_contexts()
            .iter()
            .copied()
            .filter(|&w| self.scene.world_kind(w) != Some(WorldKind::EditorPreview))
            .collect();
        for world in doomed {
            self.scene.destroy(world)?;
        }

        let world = self.scene.create_world(WorldKind::Editor);
        let level = self.scene.add_level(world)?;
        self.dispatch_scene_events();
        debug!(%world, "map loaded");
        Ok((world, level))
    }

    // -- modes --------------------------------------------------------------

    /// Activate a registered mode. A no-op if it is already active.
    pub fn activate_mode(&mut self, id: ModeId) -> Result<(), EditorError> {
        let mut ctx = ModeExitContext {
            services: &mut self.services,
            timers: &mut self.timers,
            exit_requested: self.exit_requested,
        };
        self.modes.activate_mode(&self.mode_registry, id, &mut ctx)
    }

    pub fn deactivate_mode(&mut self, id: ModeId) -> bool {
        let mut ctx = ModeExitContext {
            services: &mut self.services,
            timers: &mut self.timers,
            exit_requested: self.exit_requested,
        };
        self.modes.deactivate_mode(id, &mut ctx)
    }

    pub fn deactivate_all_modes(&mut self) {
        let mut ctx = ModeExitContext {
            services: &mut self.services,
            timers: &mut self.timers,
            exit_requested: self.exit_requested,
        };
        self.modes.deactivate_all_modes(&mut ctx);
    }

    /// The active draw-all mode, if any.
    pub fn draw_all_mode(&self) -> Option<&DrawAllVisualizersMode> {
        self.modes.find::<DrawAllVisualizersMode>()
    }

    // -- commands and settings ----------------------------------------------

    /// Run a console line.
    pub fn execute_console_command(&mut self, line: &str) -> Result<String, EditorError> {
        self.cvars.execute(line)
    }

    /// Run a command mapped in the play-world action table.
    ///
    /// # Errors
    ///
    /// [`EditorError::UnknownCommand`] if nothing is mapped under `name`.
    pub fn execute_command(&mut self, name: &str) -> Result<(), EditorError> {
        let action = self
            .play_world_actions
            .action_for(name)
            .ok_or_else(|| EditorError::UnknownCommand {
                name: name.to_string(),
            })?;
        self.run_action(action);
        Ok(())
    }

    /// Handle a key chord. Returns whether an action ran.
    pub fn process_chord(&mut self, chord: &InputChord) -> bool {
        match self.play_world_actions.action_for_chord(chord) {
            Some(action) => {
                self.run_action(action);
                true
            }
            None => false,
        }
    }

    fn run_action(&mut self, action: EditorAction) {
        match action {
            EditorAction::ToggleDrawAllVisualizers => {
                toggle_draw_all_visualizers(&mut self.cvars);
            }
        }
    }

    /// Edit the settings object as the settings panel would, then export the
    /// edited property.
    pub fn edit_settings<F>(&mut self, property: SettingsProperty, edit: F)
    where
        F: FnOnce(&mut DrawAllSettings),
    {
        edit(&mut self.settings);
        self.settings.post_edit_change(property, &mut self.cvars);
    }

    /// Serialize the persisted settings.
    pub fn save_settings(&self) -> Result<String, EditorError> {
        self.settings.to_json()
    }

    /// Replace the persisted settings from JSON and export them. Session-only
    /// fields keep their current values.
    pub fn load_settings(&mut self, json: &str) -> Result<(), EditorError> {
        let mut loaded = DrawAllSettings::from_json(json)?;
        loaded.display_type_counts_on_screen = self.settings.display_type_counts_on_screen;
        self.settings = loaded;
        self.settings.post_init(&mut self.cvars);
        Ok(())
    }

    // -- lifecycle ----------------------------------------------------------

    /// Flag that the editor is exiting. Modes deactivated from now on do not
    /// ask to come back.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    /// Request exit, deinitialize subsystems and deactivate all modes.
    pub fn shutdown(&mut self) {
        self.request_exit();
        if self.draw_all_subsystem {
            DrawAllVisualizersSubsystem::deinitialize(self);
        }
        self.deactivate_all_modes();
    }

    // -- accessors ----------------------------------------------------------

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn scene(&self) -> &EditorScene {
        &self.scene
    }

    pub fn visualizers_mut(&mut self) -> &mut VisualizerRegistry {
        self.scene.visualizers_mut()
    }

    pub fn services(&self) -> &EditorServices {
        &self.services
    }

    pub fn cvars(&self) -> &ConsoleVariables {
        &self.cvars
    }

    pub fn settings(&self) -> &DrawAllSettings {
        &self.settings
    }

    pub fn mode_registry(&self) -> &EditorModeRegistry {
        &self.mode_registry
    }

    pub fn mode_registry_mut(&mut self) -> &mut EditorModeRegistry {
        &mut self.mode_registry
    }

    pub fn modes(&self) -> &ModeTools {
        &self.modes
    }

    pub fn timers(&self) -> &TimerManager {
        &self.timers
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub fn play_world_actions(&self) -> &ActionTable {
        &self.play_world_actions
    }

    pub fn play_world_actions_mut(&mut self) -> &mut ActionTable {
        &mut self.play_world_actions
    }

    pub fn is_exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn is_draw_all_subsystem_initialized(&self) -> bool {
        self.draw_all_subsystem
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn last_diagnostics(&self) -> &TickDiagnostics {
        &self.last_diagnostics
    }
}

// ---------------------------------------------------------------------------
// DrawAllVisualizersSubsystem
// ---------------------------------------------------------------------------

/// Installs the draw-all mode and its toggle command into an [`Editor`].
#[derive(Debug)]
pub struct DrawAllVisualizersSubsystem;

impl DrawAllVisualizersSubsystem {
    /// Commandlets have no viewports to draw into.
    pub fn should_create(options: &EditorOptions) -> bool {
        !options.is_commandlet
    }

    /// Register and activate the mode, register the toggle command and map
    /// it into the play-world action table.
    ///
    /// # Errors
    ///
    /// [`EditorError::DuplicateMode`] or [`EditorError::DuplicateCommand`]
    /// if the subsystem is already installed.
    pub fn initialize(editor: &mut Editor) -> Result<(), EditorError> {
        debug!("subsystem: initialize");
        editor.mode_registry.register(
            EM_DRAW_ALL_VISUALIZERS,
            "DrawAllVisualizers",
            DrawAllVisualizersMode::factory,
            false,
        )?;
        editor.activate_mode(EM_DRAW_ALL_VISUALIZERS)?;

        let toggle = toggle_command_info();
        editor.commands.register(DRAW_ALL_CONTEXT, toggle.clone())?;
        editor
            .play_world_actions
            .map_action(&toggle, EditorAction::ToggleDrawAllVisualizers);

        editor.draw_all_subsystem = true;
        Ok(())
    }

    /// Undo [`initialize`](Self::initialize). The mode is deactivated for
    /// good; it does not schedule its own return.
    pub fn deinitialize(editor: &mut Editor) {
        debug!("subsystem: deinitialize");
        let mut ctx = ModeExitContext {
            services: &mut editor.services,
            timers: &mut editor.timers,
            exit_requested: true,
        };
        editor.modes.deactivate_mode(EM_DRAW_ALL_VISUALIZERS, &mut ctx);
        editor.mode_registry.unregister(EM_DRAW_ALL_VISUALIZERS);
        editor.commands.unregister_context(DRAW_ALL_CONTEXT);
        editor.play_world_actions.unmap_action(TOGGLE_DRAW_ALL_VISUALIZERS);
        editor.draw_all_subsystem = false;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
