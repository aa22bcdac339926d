//! DrawAll editor -- a self-contained editor host for the DrawAll core.
//!
//! This crate provides everything around the
//! [`DrawAllVisualizers`](drawall_core::driver::DrawAllVisualizers) driver that
//! an editor plugin needs: an object graph to scan, viewport services, the
//! persistent editor mode that owns the driver, console variables and project
//! settings, a toggle command, and the subsystem that wires them together.
//!
//! # Quick Start
//!
//! ```
//! use std::rc::Rc;
//! use drawall_editor::prelude::*;
//!
//! let mut editor = Editor::new(EditorOptions::default()).unwrap();
//! editor
//!     .visualizers_mut()
//!     .register("ArrowComponent", Rc::new(MarkerVisualizer::default()));
//!
//! let (_world, level) = editor.load_map().unwrap();
//! let entity = editor.spawn_entity(level, "Actor", [0.0; 3]).unwrap();
//! editor.add_component(entity, "ArrowComponent", [0.0; 3]).unwrap();
//!
//! editor.execute_console_command("DrawAllVisualizers.Enabled 1").unwrap();
//! let frames = editor.tick(1.0 / 60.0);
//! assert!(!frames[0].scene.is_empty());
//! ```
//!
//! # Modules
//!
//! - [`scene`]: the object graph ([`EditorScene`](scene::EditorScene)).
//! - [`services`]: viewport redraws, creation subscriptions, on-screen
//!   messages.
//! - [`settings`]: project settings and console variables.
//! - [`commands`]: UI commands and the play-world action table.
//! - [`mode`]: editor modes and the mode manager.
//! - [`draw_all_mode`]: the persistent mode owning the driver.
//! - [`timer`]: next-tick callbacks.
//! - [`draw`]: recorded draw output.
//! - [`visualizers`]: a stock visualizer.
//! - [`editor`]: the editor facade and subsystem lifecycle.
//! - [`demo`]: seeded random scene population.

#![deny(unsafe_code)]

pub mod commands;
pub mod demo;
pub mod draw;
pub mod draw_all_mode;
pub mod editor;
pub mod mode;
pub mod scene;
pub mod services;
pub mod settings;
pub mod timer;
pub mod visualizers;

use drawall_core::handle::ObjectId;
use drawall_core::host::ObjectKind;
use tracing_subscriber::EnvFilter;

use crate::mode::ModeId;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by editor operations.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// The handle does not refer to a live object.
    #[error("object {object} does not exist -- it was destroyed or never allocated")]
    StaleObject {
        /// The stale handle.
        object: ObjectId,
    },

    /// The object exists but is the wrong kind for the operation.
    #[error("object {object} is a {actual:?}, expected a {expected:?}")]
    WrongKind {
        /// The offending object.
        object: ObjectId,
        /// Kind the operation needs.
        expected: ObjectKind,
        /// Kind the object has.
        actual: ObjectKind,
    },

    /// A play session is already running.
    #[error("a play session is already running")]
    AlreadyPlaying,

    /// No play session is running.
    #[error("no play session is running")]
    NotPlaying,

    /// No factory is registered for the mode.
    #[error("editor mode '{id}' is not registered")]
    UnknownMode {
        /// The requested mode.
        id: ModeId,
    },

    /// A factory is already registered for the mode.
    #[error("editor mode '{id}' is already registered")]
    DuplicateMode {
        /// The mode id.
        id: ModeId,
    },

    /// No command with this name exists.
    #[error("command '{name}' is not registered")]
    UnknownCommand {
        /// The command name.
        name: String,
    },

    /// A command with this name is already registered.
    #[error("command '{name}' is already registered")]
    DuplicateCommand {
        /// The command name.
        name: String,
    },

    /// Console input named a variable that does not exist.
    #[error("unknown console variable '{name}'")]
    UnknownConsoleVariable {
        /// The name as typed.
        name: String,
    },

    /// Console input carried a value the variable cannot take.
    #[error("invalid value '{value}' for console variable '{name}' -- expected 1, 0, true or false")]
    InvalidConsoleValue {
        /// The variable.
        name: String,
        /// The value as typed.
        value: String,
    },

    /// Settings JSON could not be read or written.
    #[error("settings serialization failed: {0}")]
    Settings(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Install a `tracing` subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter`. Does nothing if a subscriber is already installed.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

/// Re-export the core crate for convenience.
pub use drawall_core;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common editor usage.
pub mod prelude {
    pub use drawall_core::prelude::*;

    pub use crate::commands::{ActionTable, CommandRegistry, EditorAction, InputChord, UiCommandInfo};
    pub use crate::draw::{DrawCommand, DrawList, ViewportFrame};
    pub use crate::draw_all_mode::{DrawAllVisualizersMode, EM_DRAW_ALL_VISUALIZERS};
    pub use crate::editor::{DrawAllVisualizersSubsystem, Editor, EditorOptions};
    pub use crate::mode::{EdMode, EditorModeRegistry, ModeId, ModeTools};
    pub use crate::scene::{EditorScene, SceneEvent};
    pub use crate::services::{EditorServices, OnScreenMessage, OnScreenMessages};
    pub use crate::settings::{ConsoleVariables, DrawAllSettings, SetBy, SettingsProperty};
    pub use crate::timer::{TimerAction, TimerManager};
    pub use crate::visualizers::MarkerVisualizer;
    pub use crate::EditorError;
}
