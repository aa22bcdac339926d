//! Per-frame configuration snapshot.
//!
//! The host owns the live flags (console variables, a settings object) and
//! hands the driver a [`DrawAllConfig`] built once per frame. The driver
//! detects changes by comparing against the values it saw last frame.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::class::ClassName;

/// Configuration read by the core. Read-only from the core's perspective.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawAllConfig {
    /// Draw visualizers for every eligible component.
    pub enabled: bool,
    /// Re-scan the world every frame instead of using the cache.
    pub no_cache: bool,
    /// Component classes whose visualizers are never drawn.
    pub excluded_types: BTreeSet<ClassName>,
    /// Post the per-class count overlay every frame.
    pub show_type_counts: bool,
}

impl DrawAllConfig {
    /// Whether components of `class` are excluded.
    pub fn is_excluded(&self, class: &ClassName) -> bool {
        self.excluded_types.contains(class)
    }
}
