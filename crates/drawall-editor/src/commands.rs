//! UI commands and the play-world action table.
//!
//! Commands are registered per binding context and mapped to an
//! [`EditorAction`] in the global [`ActionTable`], which the editor consults
//! for both command execution and key chords, whether or not a play session
//! is running.

use std::collections::HashMap;

use tracing::info;

use crate::settings::ConsoleVariables;
use crate::EditorError;

/// Binding context of the draw-all commands.
pub const DRAW_ALL_CONTEXT: &str = "DrawAllVisualizers";

/// Name of the toggle command.
pub const TOGGLE_DRAW_ALL_VISUALIZERS: &str = "ToggleDrawAllVisualizersEnabled";

// ---------------------------------------------------------------------------
// InputChord / UiCommandInfo
// ---------------------------------------------------------------------------

/// A key plus modifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct InputChord {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl InputChord {
    /// A chord with no modifiers.
    pub fn key(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Self::default()
        }
    }

    /// An empty key means "unbound".
    pub fn is_bound(&self) -> bool {
        !self.key.is_empty()
    }
}

/// Description of a UI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiCommandInfo {
    pub name: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub default_chord: InputChord,
}

/// The "Toggle Draw All Visualizers" command. Unbound by default.
pub fn toggle_command_info() -> UiCommandInfo {
    UiCommandInfo {
        name: TOGGLE_DRAW_ALL_VISUALIZERS,
        label: "Toggle Draw All Visualizers",
        description: "Toggles whether unselected Component Visualizers are drawn",
        default_chord: InputChord::default(),
    }
}

// ---------------------------------------------------------------------------
// CommandRegistry
// ---------------------------------------------------------------------------

/// Registered commands, grouped by binding context.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    contexts: HashMap<&'static str, Vec<UiCommandInfo>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `info` under `context`.
    ///
    /// # Errors
    ///
    /// [`EditorError::DuplicateCommand`] if a command with the same name is
    /// registered in any context.
    pub fn register(&mut self, context: &'static str, info: UiCommandInfo) -> Result<(), EditorError> {
        if self.find(info.name).is_some() {
            return Err(EditorError::DuplicateCommand {
                name: info.name.to_string(),
            });
        }
        self.contexts.entry(context).or_default().push(info);
        Ok(())
    }

    /// Drop a whole binding context. Returns the number of commands removed.
    pub fn unregister_context(&mut self, context: &str) -> usize {
        self.contexts.remove(context).map_or(0, |c| c.len())
    }

    /// Find a command by name.
    pub fn find(&self, name: &str) -> Option<&UiCommandInfo> {
        self.contexts.values().flatten().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.contexts.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// ActionTable
// ---------------------------------------------------------------------------

/// Things a command can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    ToggleDrawAllVisualizers,
}

/// Command name to action mapping, plus chord bindings.
#[derive(Debug, Default)]
pub struct ActionTable {
    actions: HashMap<String, EditorAction>,
    chords: HashMap<InputChord, String>,
}

impl ActionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a command to an action, binding its default chord if it has one.
    pub fn map_action(&mut self, command: &UiCommandInfo, action: EditorAction) {
        self.actions.insert(command.name.to_string(), action);
        if command.default_chord.is_bound() {
            self.chords
                .insert(command.default_chord.clone(), command.name.to_string());
        }
    }

    /// Remove a command's mapping and any chords bound to it.
    pub fn unmap_action(&mut self, command: &str) -> bool {
        self.chords.retain(|_, name| name != command);
        self.actions.remove(command).is_some()
    }

    /// Bind `chord` to a mapped command, replacing any previous binding of
    /// that chord.
    ///
    /// # Errors
    ///
    /// [`EditorError::UnknownCommand`] if the command is not mapped.
    pub fn bind_chord(&mut self, chord: InputChord, command: &str) -> Result<(), EditorError> {
        if !self.actions.contains_key(command) {
            return Err(EditorError::UnknownCommand {
                name: command.to_string(),
            });
        }
        self.chords.insert(chord, command.to_string());
        Ok(())
    }

    /// Action mapped to a command name.
    pub fn action_for(&self, command: &str) -> Option<EditorAction> {
        self.actions.get(command).copied()
    }

    /// Action bound to a chord.
    pub fn action_for_chord(&self, chord: &InputChord) -> Option<EditorAction> {
        self.chords.get(chord).and_then(|name| self.action_for(name))
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Flip `DrawAllVisualizers.Enabled`, keeping whoever last set it as the
/// owner. Returns the new value.
pub fn toggle_draw_all_visualizers(cvars: &mut ConsoleVariables) -> bool {
    let enabled = !cvars.enabled().get();
    info!(enabled, "toggle draw all visualizers");
    cvars.enabled_mut().set_with_current_priority(enabled);
    enabled
}
