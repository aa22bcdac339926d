//! Visualizer capabilities and the per-class registry.
//!
//! A [`ComponentVisualizer`] knows how to draw debug geometry (3D pass) and
//! screen-space text (HUD pass) for components of one class. The host owns a
//! [`VisualizerRegistry`] and exposes lookups through
//! [`EditorHost::find_visualizer`](crate::host::EditorHost::find_visualizer).
//! The core never draws anything itself; it only decides which components get
//! their visualizer invoked.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::class::ClassName;
use crate::handle::ObjectId;
use crate::host::EditorHost;

// ---------------------------------------------------------------------------
// Draw sinks
// ---------------------------------------------------------------------------

/// RGBA color (each channel 0.0..1.0).
pub type Color = [f32; 4];

/// Red, used by the type-count overlay.
pub const COLOR_RED: Color = [1.0, 0.0, 0.0, 1.0];

/// Sink for 3D scene primitives.
pub trait PrimitiveDrawInterface {
    /// Draw a line segment in world space.
    fn draw_line(&mut self, start: [f32; 3], end: [f32; 3], color: Color);
    /// Draw a point sprite in world space.
    fn draw_point(&mut self, position: [f32; 3], size: f32, color: Color);
}

/// Sink for 2D screen-space drawing.
pub trait Canvas {
    /// Draw a line of text at a screen position.
    fn draw_text(&mut self, position: [f32; 2], text: &str, color: Color);
}

// ---------------------------------------------------------------------------
// ComponentVisualizer
// ---------------------------------------------------------------------------

/// A registered handler able to draw debug visuals for one component class.
pub trait ComponentVisualizer {
    /// Draw the 3D visualization of `component`.
    fn draw_visualization(
        &self,
        component: ObjectId,
        host: &dyn EditorHost,
        pdi: &mut dyn PrimitiveDrawInterface,
    );

    /// Draw the screen-space part of the visualization. Most visualizers
    /// have none.
    fn draw_visualization_hud(
        &self,
        _component: ObjectId,
        _host: &dyn EditorHost,
        _canvas: &mut dyn Canvas,
    ) {
    }
}

/// Shared handle to a visualizer capability.
pub type VisualizerHandle = Rc<dyn ComponentVisualizer>;

// ---------------------------------------------------------------------------
// VisualizerRegistry
// ---------------------------------------------------------------------------

/// Maps exact component classes to their visualizer.
///
/// Lookups are by exact class: a visualizer registered for a base class does
/// not apply to derived classes.
#[derive(Default)]
pub struct VisualizerRegistry {
    by_class: HashMap<ClassName, VisualizerHandle>,
}

impl VisualizerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `visualizer` for `class`, returning the handler it replaced.
    pub fn register(
        &mut self,
        class: impl Into<ClassName>,
        visualizer: VisualizerHandle,
    ) -> Option<VisualizerHandle> {
        self.by_class.insert(class.into(), visualizer)
    }

    /// Remove the visualizer registered for `class`.
    pub fn unregister(&mut self, class: &str) -> Option<VisualizerHandle> {
        self.by_class.remove(class)
    }

    /// Look up the visualizer for an exact class.
    pub fn find(&self, class: &str) -> Option<VisualizerHandle> {
        self.by_class.get(class).cloned()
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.by_class.len()
    }

    /// Whether no visualizer is registered.
    pub fn is_empty(&self) -> bool {
        self.by_class.is_empty()
    }

    /// Registered class names, sorted.
    pub fn classes(&self) -> Vec<&ClassName> {
        let mut classes: Vec<&ClassName> = self.by_class.keys().collect();
        classes.sort();
        classes
    }
}

impl fmt::Debug for VisualizerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisualizerRegistry")
            .field("classes", &self.classes())
            .finish()
    }
}
