//! Minimal in-memory host used by the unit tests of this crate.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::class::ClassName;
use crate::handle::{HandleAllocator, ObjectId, SubscriptionId};
use crate::host::{EditorHost, HostServices, ObjectKind, WorldKind};
use crate::visualizer::{
    Canvas, Color, ComponentVisualizer, PrimitiveDrawInterface, VisualizerHandle,
    VisualizerRegistry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pass {
    Scene,
    Hud,
}

pub(crate) type DrawLog = Rc<RefCell<Vec<(Pass, ObjectId)>>>;

struct Recording {
    log: DrawLog,
}

impl ComponentVisualizer for Recording {
    fn draw_visualization(
        &self,
        component: ObjectId,
        _host: &dyn EditorHost,
        _pdi: &mut dyn PrimitiveDrawInterface,
    ) {
        self.log.borrow_mut().push((Pass::Scene, component));
    }

    fn draw_visualization_hud(
        &self,
        component: ObjectId,
        _host: &dyn EditorHost,
        _canvas: &mut dyn Canvas,
    ) {
        self.log.borrow_mut().push((Pass::Hud, component));
    }
}

struct Record {
    kind: ObjectKind,
    class: ClassName,
    outer: Option<ObjectId>,
    world: Option<ObjectId>,
    world_kind: Option<WorldKind>,
    children: Vec<ObjectId>,
    valid: bool,
}

pub(crate) struct TestHost {
    alloc: HandleAllocator,
    objects: HashMap<ObjectId, Record>,
    worlds: Vec<ObjectId>,
    registry: VisualizerRegistry,
    pub selected: Vec<ObjectId>,
    pub playing: bool,
    pub log: DrawLog,
}

impl TestHost {
    pub fn new() -> Self {
        Self {
            alloc: HandleAllocator::new(),
            objects: HashMap::new(),
            worlds: Vec::new(),
            registry: VisualizerRegistry::new(),
            selected: Vec::new(),
            playing: false,
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn insert(
        &mut self,
        kind: ObjectKind,
        class: &str,
        outer: Option<ObjectId>,
        world: Option<ObjectId>,
    ) -> ObjectId {
        let id = self.alloc.allocate();
        self.objects.insert(
            id,
            Record {
                kind,
                class: ClassName::new(class),
                outer,
                world,
                world_kind: None,
                children: Vec::new(),
                valid: true,
            },
        );
        if let Some(outer) = outer {
            if let Some(parent) = self.objects.get_mut(&outer) {
                parent.children.push(id);
            }
        }
        id
    }

    pub fn add_world(&mut self, kind: WorldKind) -> ObjectId {
        let id = self.insert(ObjectKind::World, "World", None, None);
        if let Some(record) = self.objects.get_mut(&id) {
            record.world = Some(id);
            record.world_kind = Some(kind);
        }
        self.worlds.push(id);
        id
    }

    pub fn add_level(&mut self, world: ObjectId) -> ObjectId {
        self.insert(ObjectKind::Level, "Level", Some(world), Some(world))
    }

    pub fn add_entity(&mut self, level: ObjectId) -> ObjectId {
        let world = self.objects[&level].world;
        self.insert(ObjectKind::Entity, "Actor", Some(level), world)
    }

    pub fn add_component(&mut self, entity: ObjectId, class: &str) -> ObjectId {
        let world = self.objects[&entity].world;
        self.insert(ObjectKind::Component, class, Some(entity), world)
    }

    pub fn register_visualizer(&mut self, class: &str) {
        let log = Rc::clone(&self.log);
        self.registry.register(class, Rc::new(Recording { log }));
    }

    /// Mark an object pending-kill while leaving it listed by its parent.
    pub fn kill(&mut self, object: ObjectId) {
        if let Some(record) = self.objects.get_mut(&object) {
            record.valid = false;
        }
    }

    /// Fully destroy an object and release its handle.
    pub fn destroy(&mut self, object: ObjectId) {
        if self.objects.remove(&object).is_some() {
            self.alloc.release(object);
        }
    }

    pub fn scene_draws(&self) -> Vec<ObjectId> {
        self.draws(Pass::Scene)
    }

    pub fn hud_draws(&self) -> Vec<ObjectId> {
        self.draws(Pass::Hud)
    }

    fn draws(&self, pass: Pass) -> Vec<ObjectId> {
        let mut out: Vec<ObjectId> = self
            .log
            .borrow()
            .iter()
            .filter(|(p, _)| *p == pass)
            .map(|&(_, id)| id)
            .collect();
        out.sort();
        out
    }

    pub fn clear_log(&self) {
        self.log.borrow_mut().clear();
    }

    fn live(&self, object: ObjectId) -> Option<&Record> {
        self.objects.get(&object).filter(|r| r.valid)
    }
}

impl EditorHost for TestHost {
    fn world_contexts(&self) -> &[ObjectId] {
        &self.worlds
    }

    fn levels(&self, world: ObjectId) -> &[ObjectId] {
        self.objects.get(&world).map_or(&[][..], |r| r.children.as_slice())
    }

    fn entities(&self, level: ObjectId) -> &[ObjectId] {
        self.objects.get(&level).map_or(&[][..], |r| r.children.as_slice())
    }

    fn components(&self, entity: ObjectId) -> &[ObjectId] {
        self.objects.get(&entity).map_or(&[][..], |r| r.children.as_slice())
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
        self.live(component).and_then(|r| r.outer)
    }

    fn world_of(&self, object: ObjectId) -> Option<ObjectId> {
        self.live(object).and_then(|r| r.world)
    }

    fn world_kind(&self, world: ObjectId) -> Option<WorldKind> {
        self.live(world).and_then(|r| r.world_kind)
    }

    fn is_playing_session(&self) -> bool {
        self.playing
    }

    fn selected_entities(&self) -> &[ObjectId] {
        &self.selected
    }

    fn find_visualizer(&self, class: &ClassName) -> Option<VisualizerHandle> {
        self.registry.find(class.as_str())
    }

    fn location(&self, _object: ObjectId) -> Option<[f32; 3]> {
        None
    }
}

#[derive(Default)]
pub(crate) struct TestServices {
    pub redraws: usize,
    pub subscriptions: HashSet<SubscriptionId>,
    next_subscription: u64,
    pub messages: HashMap<u64, String>,
}

impl HostServices for TestServices {
    fn redraw_all_viewports(&mut self) {
        self.redraws += 1;
    }

    fn subscribe_object_created(&mut self) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.subscriptions.insert(id);
        id
    }

    fn unsubscribe_object_created(&mut self, subscription: SubscriptionId) {
        self.subscriptions.remove(&subscription);
    }

    fn add_on_screen_debug_message(&mut self, key: u64, _duration: f32, _color: Color, text: String) {
        self.messages.insert(key, text);
    }
}

/// Draw sink that discards everything; the recording visualizer logs calls.
#[derive(Default)]
pub(crate) struct NullSink;

impl PrimitiveDrawInterface for NullSink {
    fn draw_line(&mut self, _start: [f32; 3], _end: [f32; 3], _color: Color) {}
    fn draw_point(&mut self, _position: [f32; 3], _size: f32, _color: Color) {}
}

impl Canvas for NullSink {
    fn draw_text(&mut self, _position: [f32; 2], _text: &str, _color: Color) {}
}
