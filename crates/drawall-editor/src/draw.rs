//! Recorded draw output.
//!
//! Viewports do not rasterize anything; every primitive a visualizer emits is
//! recorded into a [`DrawList`] so callers and tests can inspect a frame.

use drawall_core::visualizer::{Canvas, Color, PrimitiveDrawInterface};

/// One recorded primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        start: [f32; 3],
        end: [f32; 3],
        color: Color,
    },
    Point {
        position: [f32; 3],
        size: f32,
        color: Color,
    },
    Text {
        position: [f32; 2],
        text: String,
        color: Color,
    },
}

/// Primitives recorded during one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Recorded text strings, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl PrimitiveDrawInterface for DrawList {
    fn draw_line(&mut self, start: [f32; 3], end: [f32; 3], color: Color) {
        self.commands.push(DrawCommand::Line { start, end, color });
    }

    fn draw_point(&mut self, position: [f32; 3], size: f32, color: Color) {
        self.commands.push(DrawCommand::Point {
            position,
            size,
            color,
        });
    }
}

impl Canvas for DrawList {
    fn draw_text(&mut self, position: [f32; 2], text: &str, color: Color) {
        self.commands.push(DrawCommand::Text {
            position,
            text: text.to_string(),
            color,
        });
    }
}

/// Output of one viewport for one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewportFrame {
    /// Viewport index.
    pub index: usize,
    /// 3D scene pass.
    pub scene: DrawList,
    /// 2D HUD pass.
    pub hud: DrawList,
}

impl ViewportFrame {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }
}
