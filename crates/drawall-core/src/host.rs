//! Host ports.
//!
//! The core has no dependency on a particular editor. The host environment
//! implements [`EditorHost`] to expose its live object graph (read-only) and
//! [`HostServices`] to accept the few outputs the core produces. Native
//! events are forwarded to the methods of
//! [`DrawAllVisualizers`](crate::driver::DrawAllVisualizers).

use crate::class::ClassName;
use crate::handle::{ObjectId, SubscriptionId};
use crate::visualizer::{Color, VisualizerHandle};

// ---------------------------------------------------------------------------
// Object taxonomy
// ---------------------------------------------------------------------------

/// What role a world plays in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorldKind {
    /// The world being edited.
    Editor,
    /// A transient preview context (asset thumbnails, previews). Never
    /// scanned or drawn.
    EditorPreview,
    /// A standalone game world.
    Game,
    /// A play-in-editor world created for a play session.
    Pie,
    /// Loaded but not active.
    Inactive,
}

impl WorldKind {
    /// Transient preview contexts are excluded from every scan.
    pub fn is_preview(self) -> bool {
        matches!(self, WorldKind::EditorPreview)
    }

    /// Worlds that belong to a running play session.
    pub fn is_play_session(self) -> bool {
        matches!(self, WorldKind::Game | WorldKind::Pie)
    }
}

/// Coarse kind of a host object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    World,
    Level,
    /// A top-level entity placed in a level.
    Entity,
    /// A component owned by an entity.
    Component,
}

// ---------------------------------------------------------------------------
// EditorHost
// ---------------------------------------------------------------------------

/// Read-only view of the host's live object graph.
///
/// Enumeration methods may return handles of destroyed or pending-kill
/// objects; callers check [`is_valid`](Self::is_valid) before using them.
/// Queries on dead handles return `None` or an empty slice.
pub trait EditorHost {
    /// Every world context known to the editor.
    fn world_contexts(&self) -> &[ObjectId];

    /// Levels of a world.
    fn levels(&self, world: ObjectId) -> &[ObjectId];

    /// Entities placed in a level.
    fn entities(&self, level: ObjectId) -> &[ObjectId];

    /// Direct components of an entity. Nested sub-objects are not listed.
    fn components(&self, entity: ObjectId) -> &[ObjectId];

    /// Whether `object` is alive and not pending destruction.
    fn is_valid(&self, object: ObjectId) -> bool;

    /// Coarse kind of a live object.
    fn object_kind(&self, object: ObjectId) -> Option<ObjectKind>;

    /// Exact runtime class of a live object.
    fn class_of(&self, object: ObjectId) -> Option<&ClassName>;

    /// Entity owning a live component.
    fn owner_of(&self, component: ObjectId) -> Option<ObjectId>;

    /// World a live object belongs to. Can be `None` for objects created
    /// outside any world.
    fn world_of(&self, object: ObjectId) -> Option<ObjectId>;

    /// Kind of a live world.
    fn world_kind(&self, world: ObjectId) -> Option<WorldKind>;

    /// Whether a play or simulate session is running.
    fn is_playing_session(&self) -> bool;

    /// Currently selected top-level entities.
    fn selected_entities(&self) -> &[ObjectId];

    /// Visualizer registered for exactly `class`.
    fn find_visualizer(&self, class: &ClassName) -> Option<VisualizerHandle>;

    /// World-space location of a live object, when it has one.
    fn location(&self, object: ObjectId) -> Option<[f32; 3]>;
}

/// Whether `world` is missing, dead or a preview context, i.e. nothing in it
/// should be drawn.
pub fn is_hidden_world(host: &dyn EditorHost, world: Option<ObjectId>) -> bool {
    match world.and_then(|w| host.world_kind(w)) {
        Some(kind) => kind.is_preview(),
        None => true,
    }
}

// ---------------------------------------------------------------------------
// HostServices
// ---------------------------------------------------------------------------

/// Outputs the core sends back to the host.
pub trait HostServices {
    /// Ask every viewport to redraw.
    fn redraw_all_viewports(&mut self);

    /// Start forwarding object-creation notifications to the core.
    fn subscribe_object_created(&mut self) -> SubscriptionId;

    /// Stop forwarding object-creation notifications.
    fn unsubscribe_object_created(&mut self, subscription: SubscriptionId);

    /// Show a debug message on screen. A message with the same `key`
    /// replaces the previous one instead of stacking.
    fn add_on_screen_debug_message(&mut self, key: u64, duration: f32, color: Color, text: String);
}
