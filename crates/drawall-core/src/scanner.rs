//! Entity scanner: the full-world enumeration the cache exists to amortize.
//!
//! Walks world contexts → levels → entities → direct components and yields
//! every (entity, component, visualizer) triple whose component class has a
//! registered visualizer. Cost is linear in the total number of components
//! across all active worlds.

use crate::handle::ObjectId;
use crate::host::EditorHost;
use crate::visualizer::VisualizerHandle;

/// Invoke `visit` once per eligible (entity, component, visualizer) triple.
///
/// Eligibility:
///
/// 1. Worlds that are missing, dead, or transient preview contexts are
///    skipped.
/// 2. During a play session only play-session worlds are scanned.
/// 3. Invalid levels are skipped.
/// 4. Invalid entities are skipped.
/// 5. A component is yielded only if a visualizer is registered for its
///    exact class.
///
/// Nested sub-objects of components are not visited. No side effects.
pub fn for_each_component_visualizer<F>(host: &dyn EditorHost, mut visit: F)
where
    F: FnMut(ObjectId, ObjectId, &VisualizerHandle),
{
    let playing = host.is_playing_session();

    for &world in host.world_contexts() {
        let Some(kind) = host.world_kind(world) else {
            continue;
        };
        if kind.is_preview() {
            continue;
        }
        if playing && !kind.is_play_session() {
            continue;
        }

        for &level in host.levels(world) {
            if !host.is_valid(level) {
                continue;
            }

            for &entity in host.entities(level) {
                if !host.is_valid(entity) {
                    continue;
                }

                for &component in host.components(entity) {
                    // Components are not checked for validity here; a dead
                    // handle has no class and falls out below.
                    let Some(class) = host.class_of(component) else {
                        continue;
                    };
                    let Some(visualizer) = host.find_visualizer(class) else {
                        continue;
                    };
                    visit(entity, component, &visualizer);
                }
            }
        }
    }
}
