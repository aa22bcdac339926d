//! In-memory editor object graph.
//!
//! [`EditorScene`] owns every world, level, entity and component, hands out
//! generational [`ObjectId`]s for them and implements
//! [`EditorHost`] so the core can scan it. Mutations queue
//! [`SceneEvent`]s (object construction, selection changes) which the
//! [`Editor`](crate::editor::Editor) drains and dispatches right after each
//! call.
//!
//! Objects can be destroyed outright (their handle is released) or marked
//! pending-kill, in which case they stay listed by their parent but no longer
//! count as valid.

use std::collections::HashMap;

use drawall_core::prelude::*;

use crate::EditorError;

// ---------------------------------------------------------------------------
// SceneEvent
// ---------------------------------------------------------------------------

/// Notifications produced by scene mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    /// An object was constructed.
    ObjectConstructed(ObjectId),
    /// The set of selected entities changed.
    SelectionChanged,
}

// ---------------------------------------------------------------------------
// PlaySession
// ---------------------------------------------------------------------------

/// A running play-in-editor session.
#[derive(Debug, Clone)]
pub struct PlaySession {
    /// Simulate-in-editor rather than play.
    pub is_simulating: bool,
    /// Worlds duplicated for the session.
    pub worlds: Vec<ObjectId>,
}

// ---------------------------------------------------------------------------
// ObjectRecord
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct ObjectRecord {
    kind: ObjectKind,
    class: ClassName,
    outer: Option<ObjectId>,
    world: Option<ObjectId>,
    world_kind: Option<WorldKind>,
    children: Vec<ObjectId>,
    location: [f32; 3],
    pending_kill: bool,
}

// ---------------------------------------------------------------------------
// EditorScene
// ---------------------------------------------------------------------------

/// Class name given to worlds.
pub const WORLD_CLASS: &str = "World";
/// Class name given to levels.
pub const LEVEL_CLASS: &str = "Level";

/// Owns the editor's object graph.
#[derive(Debug, Default)]
pub struct EditorScene {
    allocator: HandleAllocator,
    objects: HashMap<ObjectId, ObjectRecord>,
    worlds: Vec<ObjectId>,
    selection: Vec<ObjectId>,
    play_session: Option<PlaySession>,
    visualizers: VisualizerRegistry,
    events: Vec<SceneEvent>,
}

impl EditorScene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    // -- construction -------------------------------------------------------

    fn construct(
        &mut self,
        kind: ObjectKind,
        class: ClassName,
        outer: Option<ObjectId>,
        world: Option<ObjectId>,
        location: [f32; 3],
    ) -> ObjectId {
        let id = self.allocator.allocate();
        self.objects.insert(
            id,
            ObjectRecord {
                kind,
                class,
                outer,
                world,
                world_kind: None,
                children: Vec::new(),
                location,
                pending_kill: false,
            },
        );
        if let Some(parent) = outer.and_then(|o| self.objects.get_mut(&o)) {
            parent.children.push(id);
        }
        self.events.push(SceneEvent::ObjectConstructed(id));
        id
    }

    fn expect_kind(&self, object: ObjectId, expected: ObjectKind) -> Result<&ObjectRecord, EditorError> {
        let record = self
            .objects
            .get(&object)
            .ok_or(EditorError::StaleObject { object })?;
        if record.kind != expected {
            return Err(EditorError::WrongKind {
                object,
                expected,
                actual: record.kind,
            });
        }
        Ok(record)
    }

    /// Create a world with no levels.
    pub fn create_world(&mut self, kind: WorldKind) -> ObjectId {
        let id = self.construct(ObjectKind::World, ClassName::new(WORLD_CLASS), None, None, [0.0; 3]);
        if let Some(record) = self.objects.get_mut(&id) {
            record.world = Some(id);
            record.world_kind = Some(kind);
        }
        self.worlds.push(id);
        id
    }

    /// Add a level to a world.
    pub fn add_level(&mut self, world: ObjectId) -> Result<ObjectId, EditorError> {
        self.expect_kind(world, ObjectKind::World)?;
        Ok(self.construct(
            ObjectKind::Level,
            ClassName::new(LEVEL_CLASS),
            Some(world),
            Some(world),
            [0.0; 3],
        ))
    }

    /// Spawn an entity of `class` in a level.
    pub fn spawn_entity(
        &mut self,
        level: ObjectId,
        class: &str,
        location: [f32; 3],
    ) -> Result<ObjectId, EditorError> {
        let world = self.expect_kind(level, ObjectKind::Level)?.world;
        Ok(self.construct(
            ObjectKind::Entity,
            ClassName::new(class),
            Some(level),
            world,
            location,
        ))
    }

    /// Attach a component of `class` to an entity, placed at `offset` from
    /// the entity.
    pub fn add_component(
        &mut self,
        entity: ObjectId,
        class: &str,
        offset: [f32; 3],
    ) -> Result<ObjectId, EditorError> {
        let owner = self.expect_kind(entity, ObjectKind::Entity)?;
        let world = owner.world;
        let base = owner.location;
        let location = [base[0] + offset[0], base[1] + offset[1], base[2] + offset[2]];
        Ok(self.construct(
            ObjectKind::Component,
            ClassName::new(class),
            Some(entity),
            world,
            location,
        ))
    }

    // -- destruction --------------------------------------------------------

    /// Destroy an object and everything it owns, releasing their handles.
    ///
    /// Destroyed entities are dropped from the selection. Returns the number
    /// of objects destroyed.
    pub fn destroy(&mut self, object: ObjectId) -> Result<usize, EditorError> {
        let outer = self
            .objects
            .get(&object)
            .ok_or(EditorError::StaleObject { object })?
            .outer;

        let doomed = self.subtree(object);
        for id in &doomed {
            if self.objects.remove(id).is_some() {
                self.allocator.release(*id);
            }
        }

        if let Some(parent) = outer.and_then(|o| self.objects.get_mut(&o)) {
            parent.children.retain(|&c| c != object);
        }
        self.worlds.retain(|w| !doomed.contains(w));

        let selected_before = self.selection.len();
        self.selection.retain(|e| !doomed.contains(e));
        if self.selection.len() != selected_before {
            self.events.push(SceneEvent::SelectionChanged);
        }

        Ok(doomed.len())
    }

    /// Mark an object and everything it owns pending-kill. They stay listed
    /// by their parents but are no longer valid.
    pub fn mark_pending_kill(&mut self, object: ObjectId) -> Result<(), EditorError> {
        if !self.objects.contains_key(&object) {
            return Err(EditorError::StaleObject { object });
        }
        for id in self.subtree(object) {
            if let Some(record) = self.objects.get_mut(&id) {
                record.pending_kill = true;
            }
        }
        Ok(())
    }

    /// `root` followed by all its descendants, breadth first.
    fn subtree(&self, root: ObjectId) -> Vec<ObjectId> {
        let mut ids = vec![root];
        let mut cursor = 0;
        while cursor < ids.len() {
            if let Some(record) = self.objects.get(&ids[cursor]) {
                ids.extend(record.children.iter().copied());
            }
            cursor += 1;
        }
        ids
    }

    /// Move an object.
    pub fn set_location(&mut self, object: ObjectId, location: [f32; 3]) -> Result<(), EditorError> {
        let record = self
            .objects
            .get_mut(&object)
            .ok_or(EditorError::StaleObject { object })?;
        record.location = location;
        Ok(())
    }

    // -- selection ----------------------------------------------------------

    /// Add an entity to the selection. Returns `false` if it already was.
    pub fn select(&mut self, entity: ObjectId) -> Result<bool, EditorError> {
        self.expect_kind(entity, ObjectKind::Entity)?;
        if self.selection.contains(&entity) {
            return Ok(false);
        }
        self.selection.push(entity);
        self.events.push(SceneEvent::SelectionChanged);
        Ok(true)
    }

    /// Remove an entity from the selection. Returns `false` if it was not
    /// selected.
    pub fn deselect(&mut self, entity: ObjectId) -> bool {
        let before = self.selection.len();
        self.selection.retain(|&e| e != entity);
        let changed = self.selection.len() != before;
        if changed {
            self.events.push(SceneEvent::SelectionChanged);
        }
        changed
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.events.push(SceneEvent::SelectionChanged);
        }
    }

    // -- play sessions ------------------------------------------------------

    /// Start a play session by duplicating every editor world into a
    /// play-in-editor world. Returns the new worlds.
    pub fn begin_play(&mut self, is_simulating: bool) -> Result<Vec<ObjectId>, EditorError> {
        if self.play_session.is_some() {
            return Err(EditorError::AlreadyPlaying);
        }

        let sources: Vec<ObjectId> = self
            .worlds
            .iter()
            .copied()
            .filter(|&w| self.world_kind(w) == Some(WorldKind::Editor))
            .collect();

        let mut worlds = Vec::with_capacity(sources.len());
        for source in sources {
            worlds.push(self.duplicate_world(source, WorldKind::Pie)?);
        }

        self.play_session = Some(PlaySession {
            is_simulating,
            worlds: worlds.clone(),
        });
        Ok(worlds)
    }

    /// End the running play session, destroying its worlds.
    pub fn end_play(&mut self) -> Result<PlaySession, EditorError> {
        let session = self.play_session.take().ok_or(EditorError::NotPlaying)?;
        for &world in &session.worlds {
            if self.objects.contains_key(&world) {
                self.destroy(world)?;
            }
        }
        Ok(session)
    }

    /// The running play session, if any.
    pub fn play_session(&self) -> Option<&PlaySession> {
        self.play_session.as_ref()
    }

    /// Copy a world's live levels, entities and components into a new world.
    pub fn duplicate_world(&mut self, source: ObjectId, kind: WorldKind) -> Result<ObjectId, EditorError> {
        let levels = self.expect_kind(source, ObjectKind::World)?.children.clone();
        let copy = self.create_world(kind);

        for level in levels {
            if !self.is_valid(level) {
                continue;
            }
            let new_level = self.add_level(copy)?;
            let entities = self.objects[&level].children.clone();
            for entity in entities {
                let Some(record) = self.live(entity) else {
                    continue;
                };
                let (class, location) = (record.class.clone(), record.location);
                let components = record.children.clone();
                let new_entity = self.spawn_entity(new_level, class.as_str(), location)?;
                for component in components {
                    let Some(record) = self.live(component) else {
                        continue;
                    };
                    let class = record.class.clone();
                    let offset = [
                        record.location[0] - location[0],
                        record.location[1] - location[1],
                        record.location[2] - location[2],
                    ];
                    self.add_component(new_entity, class.as_str(), offset)?;
                }
            }
        }
        Ok(copy)
    }

    // -- accessors ----------------------------------------------------------

    /// Take the queued notifications.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    /// The visualizer registry.
    pub fn visualizers(&self) -> &VisualizerRegistry {
        &self.visualizers
    }

    /// Mutable access to the visualizer registry.
    pub fn visualizers_mut(&mut self) -> &mut VisualizerRegistry {
        &mut self.visualizers
    }

    /// Number of objects that still hold a handle (including pending-kill).
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    fn live(&self, object: ObjectId) -> Option<&ObjectRecord> {
        self.objects.get(&object).filter(|r| !r.pending_kill)
    }

    fn children(&self, object: ObjectId) -> &[ObjectId] {
        self.objects
            .get(&object)
            .map_or(&[][..], |r| r.children.as_slice())
    }
}

impl EditorHost for EditorScene {
    fn world_contexts(&self) -> &[ObjectId] {
        &self.worlds
    }

    fn levels(&self, world: ObjectId) -> &[ObjectId] {
        self.children(world)
    }

    fn entities(&self, level: ObjectId) -> &[ObjectId] {
        self.children(level)
    }

    fn components(&self, entity: ObjectId) -> &[ObjectId] {
        self.children(entity)
    }

    fn is_valid(&self, object: ObjectId) -> bool {
        self.live(object).is_some()
    }

    fn object_kind(&self, object: ObjectId) -> Option<ObjectKind> {
        self.live(object).map(|r| r.kind)
    }

    fn class_of(&self, object: ObjectId) -> Option<&ClassName> {
        self.live(object).map(|r| &r.class)
    }

    fn owner_of(&self, component: ObjectId) -> Option<ObjectId> {
        self.live(component)
            .filter(|r| r.kind == ObjectKind::Component)
            .and_then(|r| r.outer)
    }

    fn world_of(&self, object: ObjectId) -> Option<ObjectId> {
        self.live(object).and_then(|r| r.world)
    }

    fn world_kind(&self, world: ObjectId) -> Option<WorldKind> {
        self.live(world).and_then(|r| r.world_kind)
    }

    fn is_playing_session(&self) -> bool {
        self.play_session.is_some()
    }

    fn selected_entities(&self) -> &[ObjectId] {
        &self.selection
    }

    fn find_visualizer(&self, class: &ClassName) -> Option<VisualizerHandle> {
        self.visualizers.find(class.as_str())
    }

    fn location(&self, object: ObjectId) -> Option<[f32; 3]> {
        self.live(object).map(|r| r.location)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
