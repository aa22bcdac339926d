//! DrawAll core -- draw component visualizers for every eligible object, not
//! just the selected ones.
//!
//! Editors normally run a component's debug visualizer only while its owner is
//! selected. This crate decides, every frame, which components across all open
//! worlds should have their visualizer invoked, leaving selected entities to
//! the host's native path. Scanning the whole world each frame is expensive,
//! so the answer is kept in a [`VisualizerCache`](cache::VisualizerCache) that
//! is rebuilt lazily on invalidation and patched on object creation.
//!
//! The crate is engine-agnostic. A host implements
//! [`EditorHost`](host::EditorHost) and [`HostServices`](host::HostServices)
//! and forwards its native events to the
//! [`DrawAllVisualizers`](driver::DrawAllVisualizers) ports.
//!
//! # Modules
//!
//! - [`handle`]: generational non-owning object handles.
//! - [`host`]: host ports.
//! - [`visualizer`]: visualizer capability trait, registry, draw sinks.
//! - [`scanner`]: full-world enumeration of eligible components.
//! - [`cache`]: the visualizer cache.
//! - [`selection`]: selected-entity snapshot.
//! - [`driver`]: per-frame state machine.
//! - [`overlay`]: per-class count overlay text.

#![deny(unsafe_code)]

pub mod cache;
pub mod class;
pub mod config;
pub mod driver;
pub mod handle;
pub mod host;
pub mod overlay;
pub mod scanner;
pub mod selection;
pub mod visualizer;

#[cfg(test)]
pub(crate) mod testing;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::cache::{CachedVisualizer, VisualizerCache};
    pub use crate::class::ClassName;
    pub use crate::config::DrawAllConfig;
    pub use crate::driver::{DrawAllVisualizers, DrawMode, FrameReport};
    pub use crate::handle::{HandleAllocator, ObjectId, SubscriptionId};
    pub use crate::host::{EditorHost, HostServices, ObjectKind, WorldKind};
    pub use crate::overlay::{format_type_counts, visualizer_type_counts};
    pub use crate::scanner::for_each_component_visualizer;
    pub use crate::selection::{SelectionReport, SelectionTracker};
    pub use crate::visualizer::{
        Canvas, Color, ComponentVisualizer, PrimitiveDrawInterface, VisualizerHandle,
        VisualizerRegistry,
    };
}
