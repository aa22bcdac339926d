//! Debug overlay: live visualizer counts per component class.

use std::collections::HashMap;
use std::fmt::Write;

use crate::cache::VisualizerCache;
use crate::class::ClassName;
use crate::host::{is_hidden_world, EditorHost};

/// Stable key for the on-screen message so each frame overwrites the last.
pub const TYPE_COUNTS_MESSAGE_KEY: u64 = 0x4452_4157_414C_4C31;

/// How long the overlay message stays up if it stops being refreshed.
pub const TYPE_COUNTS_MESSAGE_DURATION: f32 = 1.0;

/// Count live cache entries per component class.
///
/// Dead components and components in hidden (missing or preview) worlds are
/// not counted. Rows are sorted by count, highest first. Classes with equal
/// counts are ordered by name rather than left in hash order, so the overlay
/// text is identical from frame to frame while the counts hold.
pub fn visualizer_type_counts(
    host: &dyn EditorHost,
    cache: &VisualizerCache,
) -> Vec<(ClassName, usize)> {
    let mut counts: HashMap<&ClassName, usize> = HashMap::new();

    for (&component, _entry) in cache {
        let Some(class) = host.class_of(component) else {
            continue;
        };
        if is_hidden_world(host, host.world_of(component)) {
            continue;
        }
        *counts.entry(class).or_default() += 1;
    }

    let mut rows: Vec<(ClassName, usize)> = counts
        .into_iter()
        .map(|(class, count)| (class.clone(), count))
        .collect();
    rows.sort_by(|(a_name, a), (b_name, b)| b.cmp(a).then_with(|| a_name.cmp(b_name)));
    rows
}

/// Render count rows as the multi-line overlay text.
pub fn format_type_counts(rows: &[(ClassName, usize)]) -> String {
    let mut text = String::from("Visualized component types:\n");
    for (class, count) in rows {
        let _ = writeln!(text, "    {class} {count}");
    }
    text
}
