//! Seeded random scenes for the demo binary and the benchmarks.

use std::rc::Rc;

use drawall_core::handle::ObjectId;
use drawall_core::visualizer::VisualizerRegistry;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::editor::Editor;
use crate::visualizers::MarkerVisualizer;
use crate::EditorError;

/// Component classes the demo scatters around. `StaticMeshComponent` has no
/// visualizer.
pub const DEMO_COMPONENT_CLASSES: &[&str] = &[
    "ArrowComponent",
    "AudioComponent",
    "BoxComponent",
    "PointLightComponent",
    "SplineComponent",
    "StaticMeshComponent",
];

const DEMO_ENTITY_CLASSES: &[&str] = &["Actor", "Light", "Trigger", "Pawn"];

/// Register a [`MarkerVisualizer`] for every demo class except
/// `StaticMeshComponent`, each in its own color.
pub fn register_demo_visualizers(registry: &mut VisualizerRegistry) {
    let palette = [
        [1.0, 0.2, 0.2, 1.0],
        [0.2, 1.0, 0.2, 1.0],
        [0.2, 0.2, 1.0, 1.0],
        [1.0, 1.0, 0.2, 1.0],
        [1.0, 0.2, 1.0, 1.0],
    ];
    let visualized = DEMO_COMPONENT_CLASSES
        .iter()
        .filter(|&&class| class != "StaticMeshComponent");
    for (class, color) in visualized.zip(palette) {
        registry.register(
            *class,
            Rc::new(MarkerVisualizer {
                color,
                ..MarkerVisualizer::default()
            }),
        );
    }
}

/// Entities and components created by [`SceneBuilder::populate`].
#[derive(Debug, Clone, Default)]
pub struct PopulatedScene {
    pub entities: Vec<ObjectId>,
    pub components: Vec<ObjectId>,
}

/// Deterministic scene generator.
#[derive(Debug, Clone)]
pub struct SceneBuilder {
    rng: Pcg64Mcg,
    /// Entities are placed within `[-extent, extent]` on each axis.
    pub extent: f32,
}

impl SceneBuilder {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg64Mcg::seed_from_u64(seed),
            extent: 5_000.0,
        }
    }

    /// Spawn `entities` entities in `level`, each with between zero and
    /// `max_components` components of random demo classes.
    pub fn populate(
        &mut self,
        editor: &mut Editor,
        level: ObjectId,
        entities: usize,
        max_components: usize,
    ) -> Result<PopulatedScene, EditorError> {
        let mut scene = PopulatedScene::default();
        for _ in 0..entities {
            let location = [
                self.rng.gen_range(-self.extent..=self.extent),
                self.rng.gen_range(-self.extent..=self.extent),
                self.rng.gen_range(0.0..=self.extent / 10.0),
            ];
            let class = DEMO_ENTITY_CLASSES
                .choose(&mut self.rng)
                .copied()
                .unwrap_or("Actor");
            let entity = editor.spawn_entity(level, class, location)?;
            scene.entities.push(entity);

            for _ in 0..self.rng.gen_range(0..=max_components) {
                let class = DEMO_COMPONENT_CLASSES
                    .choose(&mut self.rng)
                    .copied()
                    .unwrap_or("ArrowComponent");
                let offset = [
                    self.rng.gen_range(-50.0..=50.0),
                    self.rng.gen_range(-50.0..=50.0),
                    self.rng.gen_range(-50.0..=50.0),
                ];
                scene
                    .components
                    .push(editor.add_component(entity, class, offset)?);
            }
        }
        Ok(scene)
    }

    /// Replace the selection with `count` random entities from `candidates`.
    pub fn select_random(
        &mut self,
        editor: &mut Editor,
        candidates: &[ObjectId],
        count: usize,
    ) -> Result<Vec<ObjectId>, EditorError> {
        editor.clear_selection();
        let picked: Vec<ObjectId> = candidates
            .choose_multiple(&mut self.rng, count)
            .copied()
            .collect();
        for &entity in &picked {
            editor.select(entity)?;
        }
        Ok(picked)
    }
}
