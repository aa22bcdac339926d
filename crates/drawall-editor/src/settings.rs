//! Project settings and console variables.
//!
//! The live flags are two console variables, `DrawAllVisualizers.Enabled` and
//! `DrawAllVisualizers.NoCache`. Each remembers who last set it; a write from
//! a lower-priority source than the current one is ignored, so a value typed
//! at the console wins over the project settings until the editor restarts.
//!
//! [`DrawAllSettings`] is the persisted settings object. On load
//! ([`post_init`](DrawAllSettings::post_init)) and on every property edit
//! ([`post_edit_change`](DrawAllSettings::post_edit_change)) it exports its
//! flags into the console variables with project-setting priority.
//!
//! Once per frame the editor combines both into a
//! [`DrawAllConfig`] with [`ConsoleVariables::snapshot`].

use std::collections::BTreeSet;

use drawall_core::class::ClassName;
use drawall_core::config::DrawAllConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::EditorError;

/// Console name of the enabled flag.
pub const CVAR_ENABLED: &str = "DrawAllVisualizers.Enabled";
/// Console name of the no-cache flag.
pub const CVAR_NO_CACHE: &str = "DrawAllVisualizers.NoCache";

// ---------------------------------------------------------------------------
// SetBy
// ---------------------------------------------------------------------------

/// Who last wrote a console variable, lowest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SetBy {
    /// The registered default.
    Constructor,
    /// Project settings.
    ProjectSetting,
    /// Typed at the console.
    Console,
}

// ---------------------------------------------------------------------------
// ConsoleVariable
// ---------------------------------------------------------------------------

/// A boolean console variable.
#[derive(Debug, Clone)]
pub struct ConsoleVariable {
    name: &'static str,
    help: &'static str,
    value: bool,
    set_by: SetBy,
}

impl ConsoleVariable {
    fn new(name: &'static str, help: &'static str, default: bool) -> Self {
        Self {
            name,
            help,
            value: default,
            set_by: SetBy::Constructor,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn help(&self) -> &'static str {
        self.help
    }

    pub fn get(&self) -> bool {
        self.value
    }

    pub fn set_by(&self) -> SetBy {
        self.set_by
    }

    /// Write `value` as `set_by`. Returns `false` and leaves the variable
    /// untouched if it was last set by a higher-priority source.
    pub fn set(&mut self, value: bool, set_by: SetBy) -> bool {
        if set_by < self.set_by {
            warn!(
                name = self.name,
                ?set_by,
                current = ?self.set_by,
                "console variable: ignored lower-priority write"
            );
            return false;
        }
        self.value = value;
        self.set_by = set_by;
        true
    }

    /// Write `value` keeping the current priority.
    pub fn set_with_current_priority(&mut self, value: bool) {
        self.value = value;
    }
}

// ---------------------------------------------------------------------------
// ConsoleVariables
// ---------------------------------------------------------------------------

/// The console variables owned by the draw-all feature.
#[derive(Debug, Clone)]
pub struct ConsoleVariables {
    enabled: ConsoleVariable,
    no_cache: ConsoleVariable,
}

impl ConsoleVariables {
    /// Both variables registered with their default `false`.
    pub fn new() -> Self {
        Self {
            enabled: ConsoleVariable::new(CVAR_ENABLED, "Draw all component visualizers?", false),
            no_cache: ConsoleVariable::new(
                CVAR_NO_CACHE,
                "Skip cache? Try this if cached mode is not working for you for some reason",
                false,
            ),
        }
    }

    pub fn enabled(&self) -> &ConsoleVariable {
        &self.enabled
    }

    pub fn enabled_mut(&mut self) -> &mut ConsoleVariable {
        &mut self.enabled
    }

    pub fn no_cache(&self) -> &ConsoleVariable {
        &self.no_cache
    }

    pub fn no_cache_mut(&mut self) -> &mut ConsoleVariable {
        &mut self.no_cache
    }

    /// Look a variable up by name, ignoring ASCII case like the console does.
    pub fn find(&self, name: &str) -> Option<&ConsoleVariable> {
        [&self.enabled, &self.no_cache]
            .into_iter()
            .find(|v| v.name.eq_ignore_ascii_case(name))
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut ConsoleVariable> {
        [&mut self.enabled, &mut self.no_cache]
            .into_iter()
            .find(|v| v.name.eq_ignore_ascii_case(name))
    }

    /// Run a console line such as `DrawAllVisualizers.Enabled 1`.
    ///
    /// A bare variable name reports its value. Values are `1`, `0`, `true`
    /// or `false`. Returns the text the console would print.
    ///
    /// # Errors
    ///
    /// - [`EditorError::UnknownConsoleVariable`] if the name is not one of
    ///   ours (including an empty line).
    /// - [`EditorError::InvalidConsoleValue`] if the value does not parse.
    pub fn execute(&mut self, line: &str) -> Result<String, EditorError> {
        let mut parts = line.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let variable = self
            .find_mut(name)
            .ok_or_else(|| EditorError::UnknownConsoleVariable {
                name: name.to_string(),
            })?;

        let Some(raw) = parts.next() else {
            return Ok(format!(
                "{} = \"{}\"      LastSetBy: {:?}",
                variable.name,
                u8::from(variable.value),
                variable.set_by
            ));
        };

        let value = parse_bool(raw).ok_or_else(|| EditorError::InvalidConsoleValue {
            name: variable.name.to_string(),
            value: raw.to_string(),
        })?;
        variable.set(value, SetBy::Console);
        debug!(name = variable.name, value, "console variable: set from console");
        Ok(format!("{} = \"{}\"", variable.name, u8::from(variable.value)))
    }

    /// Build the per-frame configuration.
    pub fn snapshot(&self, settings: &DrawAllSettings) -> DrawAllConfig {
        DrawAllConfig {
            enabled: self.enabled.get(),
            no_cache: self.no_cache.get(),
            excluded_types: settings.ignored_visualizers.clone(),
            show_type_counts: settings.display_type_counts_on_screen,
        }
    }
}

impl Default for ConsoleVariables {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// DrawAllSettings
// ---------------------------------------------------------------------------

/// Editable settings properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsProperty {
    Enabled,
    NoCache,
    DisplayTypeCountsOnScreen,
    IgnoredVisualizers,
}

/// Persisted draw-all settings, shown under the "Editor" category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawAllSettings {
    /// Mirrors `DrawAllVisualizers.Enabled`.
    pub enabled: bool,
    /// Mirrors `DrawAllVisualizers.NoCache`.
    pub no_cache: bool,
    /// Show the per-class count overlay. Session only, never saved.
    #[serde(skip)]
    pub display_type_counts_on_screen: bool,
    /// Component classes whose visualizers are never drawn.
    pub ignored_visualizers: BTreeSet<ClassName>,
}

impl DrawAllSettings {
    /// Settings category the object is listed under.
    pub fn category_name(&self) -> &'static str {
        "Editor"
    }

    /// Export the loaded flags into the console variables.
    pub fn post_init(&self, cvars: &mut ConsoleVariables) {
        debug!(enabled = self.enabled, no_cache = self.no_cache, "settings: post init");
        cvars.enabled_mut().set(self.enabled, SetBy::ProjectSetting);
        cvars.no_cache_mut().set(self.no_cache, SetBy::ProjectSetting);
    }

    /// Export one edited property. Properties without a console variable
    /// are read directly from the settings each frame.
    pub fn post_edit_change(&self, property: SettingsProperty, cvars: &mut ConsoleVariables) {
        match property {
            SettingsProperty::Enabled => {
                cvars.enabled_mut().set(self.enabled, SetBy::ProjectSetting);
            }
            SettingsProperty::NoCache => {
                cvars.no_cache_mut().set(self.no_cache, SetBy::ProjectSetting);
            }
            SettingsProperty::DisplayTypeCountsOnScreen | SettingsProperty::IgnoredVisualizers => {}
        }
    }

    /// Serialize the persisted fields.
    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load persisted fields; unsaved fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
