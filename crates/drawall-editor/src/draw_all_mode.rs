//! The persistent editor mode that owns the draw-all driver.
//!
//! [`DrawAllVisualizersMode`] forwards the viewport passes and editor
//! notifications to a [`DrawAllVisualizers`] driver. It is compatible with
//! every other mode so it stays active underneath whatever tool the user
//! picks. If something force-deactivates it anyway (a map load tears down all
//! modes) it schedules its own re-activation for the next tick, unless the
//! editor is shutting down.

use std::any::Any;

use drawall_core::driver::DrawAllVisualizers;
use drawall_core::handle::ObjectId;
use drawall_core::visualizer::{Canvas, PrimitiveDrawInterface};
use tracing::debug;

use crate::mode::{EdMode, ModeContext, ModeExitContext, ModeId, PlaySessionEvent};
use crate::timer::TimerAction;

/// Id of the draw-all mode.
pub const EM_DRAW_ALL_VISUALIZERS: ModeId = ModeId("EM_DrawAllVisualizers");

/// Editor mode wrapping the driver.
#[derive(Debug, Default)]
pub struct DrawAllVisualizersMode {
    driver: DrawAllVisualizers,
}

impl DrawAllVisualizersMode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory for the mode registry.
    pub fn factory() -> Box<dyn EdMode> {
        Box::new(Self::new())
    }

    /// The driver state.
    pub fn driver(&self) -> &DrawAllVisualizers {
        &self.driver
    }
}

impl EdMode for DrawAllVisualizersMode {
    fn id(&self) -> ModeId {
        EM_DRAW_ALL_VISUALIZERS
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn initialize(&mut self) {
        debug!("draw all mode: initialize");
    }

    fn enter(&mut self) {
        debug!("draw all mode: enter");
    }

    fn exit(&mut self, ctx: &mut ModeExitContext<'_>) {
        debug!(exit_requested = ctx.exit_requested, "draw all mode: exit");
        self.driver.shutdown(&mut *ctx.services);
        if !ctx.exit_requested {
            ctx.timers
                .set_timer_for_next_tick(TimerAction::ActivateMode(EM_DRAW_ALL_VISUALIZERS));
        }
    }

    fn is_compatible_with(&self, _other: ModeId) -> bool {
        true
    }

    fn render(&mut self, ctx: &mut ModeContext<'_>, pdi: &mut dyn PrimitiveDrawInterface) {
        self.driver
            .draw_frame_3d(ctx.scene, &mut *ctx.services, ctx.config, pdi);
    }

    fn draw_hud(&mut self, ctx: &mut ModeContext<'_>, canvas: &mut dyn Canvas) {
        self.driver.draw_frame_hud(ctx.scene, ctx.config, canvas);
    }

    fn on_selection_changed(&mut self) {
        self.driver.on_selection_changed();
    }

    fn on_play_session(&mut self, event: PlaySessionEvent) {
        match event {
            PlaySessionEvent::Started { is_simulating } => self.driver.on_session_start(is_simulating),
            PlaySessionEvent::Ended { is_simulating } => self.driver.on_session_end(is_simulating),
        }
    }

    fn on_object_constructed(&mut self, ctx: &mut ModeContext<'_>, object: ObjectId) {
        self.driver.on_object_created(ctx.scene, ctx.config, object);
    }
}
