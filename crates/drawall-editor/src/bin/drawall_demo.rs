//! Headless demo: builds a random scene, turns draw-all on and reports what
//! each frame drew.
//!
//! Usage: `drawall-demo [seed] [entities] [frames]`. Set `RUST_LOG=debug` to
//! see cache and selection activity.

use anyhow::{bail, Context, Result};
use drawall_editor::demo::{register_demo_visualizers, SceneBuilder};
use drawall_editor::prelude::*;
use tracing::info;

fn parse_arg(args: &[String], index: usize, default: u64) -> Result<u64> {
    match args.get(index) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("argument {index} ('{raw}') is not a number")),
        None => Ok(default),
    }
}

fn main() -> Result<()> {
    drawall_editor::init_tracing("info");

    let args: Vec<String> = std::env::args().collect();
    let seed = parse_arg(&args, 1, 0x5EED)?;
    let entity_count = usize::try_from(parse_arg(&args, 2, 500)?)?;
    let frames = parse_arg(&args, 3, 5)?;
    if frames == 0 {
        bail!("need at least one frame");
    }

    let mut editor = Editor::new(EditorOptions::default())?;
    register_demo_visualizers(editor.visualizers_mut());
    editor.edit_settings(SettingsProperty::DisplayTypeCountsOnScreen, |s| {
        s.display_type_counts_on_screen = true;
    });

    let (_world, level) = editor.load_map()?;
    let mut builder = SceneBuilder::new(seed);
    let scene = builder.populate(&mut editor, level, entity_count, 4)?;
    info!(
        entities = scene.entities.len(),
        components = scene.components.len(),
        "scene populated"
    );

    editor.execute_command(drawall_editor::commands::TOGGLE_DRAW_ALL_VISUALIZERS)?;

    for frame in 0..frames {
        if frame == 2 {
            let picked = builder.select_random(&mut editor, &scene.entities, entity_count / 10)?;
            info!(selected = picked.len(), "selection changed");
        }
        let viewports = editor.tick(1.0 / 60.0);
        let report = editor
            .draw_all_mode()
            .map(|mode| mode.driver().last_report())
            .unwrap_or_default();
        info!(
            frame,
            mode = ?report.mode,
            drawn = report.drawn,
            skipped_selected = report.skipped_selected,
            cache_rebuilt = report.cache_rebuilt,
            primitives = viewports.first().map_or(0, |v| v.scene.len()),
            elapsed_us = editor.last_diagnostics().total_time.as_micros() as u64,
            "frame"
        );
    }

    if let Some(message) = editor
        .services()
        .messages()
        .get(drawall_editor::drawall_core::overlay::TYPE_COUNTS_MESSAGE_KEY)
    {
        println!("{}", message.text);
    }

    editor.shutdown();
    Ok(())
}
