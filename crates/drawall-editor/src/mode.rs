//! Editor modes.
//!
//! An editor mode is a pluggable layer that receives the viewport's render
//! and HUD callbacks plus editor notifications. Modes are created from
//! factories registered in an [`EditorModeRegistry`] and live in
//! [`ModeTools`] while active. Activating a mode deactivates every active
//! mode that is incompatible with it (neither side declares compatibility);
//! deactivation calls [`EdMode::exit`].

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use drawall_core::config::DrawAllConfig;
use drawall_core::handle::ObjectId;
use drawall_core::visualizer::{Canvas, PrimitiveDrawInterface};
use tracing::debug;

use crate::scene::EditorScene;
use crate::services::EditorServices;
use crate::timer::TimerManager;
use crate::EditorError;

// ---------------------------------------------------------------------------
// ModeId
// ---------------------------------------------------------------------------

/// Stable identifier of an editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModeId(pub &'static str);

impl fmt::Display for ModeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

// ---------------------------------------------------------------------------
// Contexts
// ---------------------------------------------------------------------------

/// What a mode sees while drawing or handling object construction.
pub struct ModeContext<'a> {
    pub scene: &'a EditorScene,
    pub services: &'a mut EditorServices,
    /// Configuration snapshot for this frame.
    pub config: &'a DrawAllConfig,
}

/// What a mode sees while being deactivated.
pub struct ModeExitContext<'a> {
    pub services: &'a mut EditorServices,
    pub timers: &'a mut TimerManager,
    /// The editor is shutting down.
    pub exit_requested: bool,
}

/// Play session notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaySessionEvent {
    Started { is_simulating: bool },
    Ended { is_simulating: bool },
}

// ---------------------------------------------------------------------------
// EdMode
// ---------------------------------------------------------------------------

/// An editor mode. Every callback but [`id`](Self::id) and
/// [`as_any`](Self::as_any) defaults to doing nothing.
pub trait EdMode {
    fn id(&self) -> ModeId;

    /// Downcasting hook for [`ModeTools::find`].
    fn as_any(&self) -> &dyn Any;

    /// Called once after construction, before [`enter`](Self::enter).
    fn initialize(&mut self) {}

    fn enter(&mut self) {}

    fn exit(&mut self, _ctx: &mut ModeExitContext<'_>) {}

    /// Whether this mode may stay active alongside `other`.
    fn is_compatible_with(&self, _other: ModeId) -> bool {
        false
    }

    /// 3D scene pass of one viewport.
    fn render(&mut self, _ctx: &mut ModeContext<'_>, _pdi: &mut dyn PrimitiveDrawInterface) {}

    /// 2D HUD pass of one viewport, after [`render`](Self::render).
    fn draw_hud(&mut self, _ctx: &mut ModeContext<'_>, _canvas: &mut dyn Canvas) {}

    fn on_selection_changed(&mut self) {}

    fn on_play_session(&mut self, _event: PlaySessionEvent) {}

    fn on_object_constructed(&mut self, _ctx: &mut ModeContext<'_>, _object: ObjectId) {}
}

// ---------------------------------------------------------------------------
// EditorModeRegistry
// ---------------------------------------------------------------------------

/// Builds a fresh mode instance.
pub type ModeFactory = fn() -> Box<dyn EdMode>;

struct RegisteredMode {
    name: String,
    factory: ModeFactory,
    visible: bool,
}

/// Factories for every known mode.
#[derive(Default)]
pub struct EditorModeRegistry {
    modes: HashMap<ModeId, RegisteredMode>,
}

impl EditorModeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mode factory. Hidden modes do not appear in the mode
    /// toolbar.
    ///
    /// # Errors
    ///
    /// [`EditorError::DuplicateMode`] if `id` is taken.
    pub fn register(
        &mut self,
        id: ModeId,
        name: &str,
        factory: ModeFactory,
        visible: bool,
    ) -> Result<(), EditorError> {
        if self.modes.contains_key(&id) {
            return Err(EditorError::DuplicateMode { id });
        }
        self.modes.insert(
            id,
            RegisteredMode {
                name: name.to_string(),
                factory,
                visible,
            },
        );
        debug!(mode = %id, name, visible, "mode registry: registered");
        Ok(())
    }

    /// Remove a mode factory. Active instances are not affected.
    pub fn unregister(&mut self, id: ModeId) -> bool {
        self.modes.remove(&id).is_some()
    }

    pub fn contains(&self, id: ModeId) -> bool {
        self.modes.contains_key(&id)
    }

    /// Display name of a registered mode.
    pub fn name(&self, id: ModeId) -> Option<&str> {
        self.modes.get(&id).map(|m| m.name.as_str())
    }

    /// Ids of the modes shown in the mode toolbar, sorted.
    pub fn visible_modes(&self) -> Vec<ModeId> {
        let mut ids: Vec<ModeId> = self
            .modes
            .iter()
            .filter(|(_, m)| m.visible)
            .map(|(&id, _)| id)
            .collect();
        ids.sort();
        ids
    }

    /// Instantiate a mode.
    ///
    /// # Errors
    ///
    /// [`EditorError::UnknownMode`] if `id` is not registered.
    pub fn create(&self, id: ModeId) -> Result<Box<dyn EdMode>, EditorError> {
        let registered = self.modes.get(&id).ok_or(EditorError::UnknownMode { id })?;
        Ok((registered.factory)())
    }
}

impl fmt::Debug for EditorModeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&ModeId> = self.modes.keys().collect();
        ids.sort();
        f.debug_struct("EditorModeRegistry").field("modes", &ids).finish()
    }
}

// ---------------------------------------------------------------------------
// ModeTools
// ---------------------------------------------------------------------------

/// The active modes, in activation order.
#[derive(Default)]
pub struct ModeTools {
    active: Vec<Box<dyn EdMode>>,
}

impl ModeTools {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate `id`. A no-op if it is already active.
    ///
    /// # Errors
    ///
    /// [`EditorError::UnknownMode`] if `id` is not registered.
    pub fn activate_mode(
        &mut self,
        registry: &EditorModeRegistry,
        id: ModeId,
        ctx: &mut ModeExitContext<'_>,
    ) -> Result<(), EditorError> {
        if self.is_active(id) {
            return Ok(());
        }
        let mut mode = registry.create(id)?;

        let mut index = 0;
        while index < self.active.len() {
            let other = &self.active[index];
            if mode.is_compatible_with(other.id()) || other.is_compatible_with(id) {
                index += 1;
                continue;
            }
            let mut evicted = self.active.remove(index);
            debug!(mode = %evicted.id(), by = %id, "mode tools: deactivated incompatible mode");
            evicted.exit(ctx);
        }

        mode.initialize();
        mode.enter();
        self.active.push(mode);
        debug!(mode = %id, "mode tools: activated");
        Ok(())
    }

    /// Deactivate `id`. Returns `false` if it was not active.
    pub fn deactivate_mode(&mut self, id: ModeId, ctx: &mut ModeExitContext<'_>) -> bool {
        let Some(index) = self.active.iter().position(|m| m.id() == id) else {
            return false;
        };
        let mut mode = self.active.remove(index);
        mode.exit(ctx);
        debug!(mode = %id, "mode tools: deactivated");
        true
    }

    /// Deactivate every active mode, most recent first.
    pub fn deactivate_all_modes(&mut self, ctx: &mut ModeExitContext<'_>) {
        while let Some(mut mode) = self.active.pop() {
            mode.exit(ctx);
            debug!(mode = %mode.id(), "mode tools: deactivated");
        }
    }

    pub fn is_active(&self, id: ModeId) -> bool {
        self.active.iter().any(|m| m.id() == id)
    }

    /// Ids of the active modes, in activation order.
    pub fn active_modes(&self) -> Vec<ModeId> {
        self.active.iter().map(|m| m.id()).collect()
    }

    /// First active mode of concrete type `T`.
    pub fn find<T: EdMode + 'static>(&self) -> Option<&T> {
        self.active.iter().find_map(|m| m.as_any().downcast_ref::<T>())
    }

    // -- dispatch -----------------------------------------------------------

    pub fn render(&mut self, ctx: &mut ModeContext<'_>, pdi: &mut dyn PrimitiveDrawInterface) {
        for mode in &mut self.active {
            mode.render(ctx, pdi);
        }
    }

    pub fn draw_hud(&mut self, ctx: &mut ModeContext<'_>, canvas: &mut dyn Canvas) {
        for mode in &mut self.active {
            mode.draw_hud(ctx, canvas);
        }
    }

    pub fn on_selection_changed(&mut self) {
        for mode in &mut self.active {
            mode.on_selection_changed();
        }
    }

    pub fn on_play_session(&mut self, event: PlaySessionEvent) {
        for mode in &mut self.active {
            mode.on_play_session(event);
        }
    }

    pub fn on_object_constructed(&mut self, ctx: &mut ModeContext<'_>, object: ObjectId) {
        for mode in &mut self.active {
            mode.on_object_constructed(ctx, object);
        }
    }
}

impl fmt::Debug for ModeTools {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeTools")
            .field("active", &self.active_modes())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
