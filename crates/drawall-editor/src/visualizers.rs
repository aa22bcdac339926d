//! Stock visualizers.

use drawall_core::handle::ObjectId;
use drawall_core::host::EditorHost;
use drawall_core::visualizer::{Canvas, Color, ComponentVisualizer, PrimitiveDrawInterface};

/// Draws a point and an axis cross at the component's location, and labels
/// it with its class name on the HUD.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerVisualizer {
    pub color: Color,
    /// Half-length of the axis cross.
    pub extent: f32,
    /// Draw the class-name label on the HUD.
    pub label: bool,
}

impl Default for MarkerVisualizer {
    fn default() -> Self {
        Self {
            color: [0.2, 0.8, 1.0, 1.0],
            extent: 25.0,
            label: true,
        }
    }
}

impl ComponentVisualizer for MarkerVisualizer {
    fn draw_visualization(
        &self,
        component: ObjectId,
        host: &dyn EditorHost,
        pdi: &mut dyn PrimitiveDrawInterface,
    ) {
        let Some(origin) = host.location(component) else {
            return;
        };
        pdi.draw_point(origin, 4.0, self.color);
        for axis in 0..3 {
            let mut start = origin;
            let mut end = origin;
            start[axis] -= self.extent;
            end[axis] += self.extent;
            pdi.draw_line(start, end, self.color);
        }
    }

    fn draw_visualization_hud(
        &self,
        component: ObjectId,
        host: &dyn EditorHost,
        canvas: &mut dyn Canvas,
    ) {
        if !self.label {
            return;
        }
        let (Some(class), Some(origin)) = (host.class_of(component), host.location(component)) else {
            return;
        };
        // Top-down projection; the editor has no camera.
        canvas.draw_text([origin[0], origin[1]], class.as_str(), self.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{DrawCommand, DrawList};
    use crate::scene::EditorScene;
    use drawall_core::host::WorldKind;

    #[test]
    fn marker_draws_point_and_cross() {
        let mut scene = EditorScene::new();
        let world = scene.create_world(WorldKind::Editor);
        let level = scene.add_level(world).unwrap();
        let entity = scene.spawn_entity(level, "Actor", [1.0, 2.0, 3.0]).unwrap();
        let component = scene.add_component(entity, "ArrowComponent", [0.0; 3]).unwrap();

        let marker = MarkerVisualizer::default();
        let mut list = DrawList::new();
        marker.draw_visualization(component, &scene, &mut list);
        assert_eq!(list.len(), 4);
        assert!(matches!(
            list.commands()[0],
            DrawCommand::Point { position: [1.0, 2.0, 3.0], .. }
        ));

        let mut hud = DrawList::new();
        marker.draw_visualization_hud(component, &scene, &mut hud);
        assert_eq!(hud.texts().collect::<Vec<_>>(), vec!["ArrowComponent"]);
    }

    #[test]
    fn dead_component_draws_nothing() {
        let mut scene = EditorScene::new();
        let world = scene.create_world(WorldKind::Editor);
        let level = scene.add_level(world).unwrap();
        let entity = scene.spawn_entity(level, "Actor", [0.0; 3]).unwrap();
        let component = scene.add_component(entity, "ArrowComponent", [0.0; 3]).unwrap();
        scene.destroy(component).unwrap();

        let mut list = DrawList::new();
        MarkerVisualizer::default().draw_visualization(component, &scene, &mut list);
        assert!(list.is_empty());
    }
}
