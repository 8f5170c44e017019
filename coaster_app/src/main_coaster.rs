//! Coaster demo
//!
//! A car rides an editable Bézier track. An optional second argument names a
//! `.ron` or `.toml` track layout; the edited layout is written back to
//! `track_edited.ron` at the end.

mod common;

use std::path::PathBuf;

use common::{AppError, ScriptedInput};
use scene_engine::prelude::*;
use scene_engine::scene::builders;

fn main() -> Result<(), AppError> {
    let (mut config, from_file) = common::load_config()?;
    if !from_file {
        config.camera.eye = Vec3::new(0.0, 90.0, 160.0);
    }
    let layout_path = std::env::args().nth(2).map(PathBuf::from);
    let layout = TrackLayout::load_or_default(layout_path.as_deref())?;

    log::info!("Starting coaster demo with {} curves", layout.curves.len());
    let mut backend = RecordingBackend::new();
    let mut scene = builders::coaster_scene(&mut backend, &config, &layout)?;

    let script = [
        ScriptedInput::at(30, InputEvent::key(KeyCode::Right)),
        ScriptedInput::at(31, InputEvent::key(KeyCode::Y)),
        ScriptedInput::at(32, InputEvent::Scroll { dy: 4.0 }),
        ScriptedInput::at(33, InputEvent::shift_key(KeyCode::X)),
        ScriptedInput::at(90, InputEvent::key(KeyCode::E)),
        ScriptedInput::at(120, InputEvent::key(KeyCode::R)),
        ScriptedInput::at(300, InputEvent::key(KeyCode::R)),
        ScriptedInput::at(360, InputEvent::key(KeyCode::L)),
        ScriptedInput::at(361, InputEvent::Scroll { dy: -5.0 }),
        ScriptedInput::at(420, InputEvent::key(KeyCode::Escape)),
    ];
    common::run(&mut scene, &mut backend, &config, &script)?;

    if let Some(track) = scene.tracks().values().next() {
        log::info!("Track length after edits: {:.2}", track.total_length());
        track.layout().save_to_file("track_edited.ron")?;
    }
    Ok(())
}
