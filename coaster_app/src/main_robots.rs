//! Robot army demo
//!
//! A 10x10 grid of animated robots viewed from one corner. The scripted input
//! toggles culling, bounds display, demo mode and pause to show their effect
//! on the visible count.

mod common;

use common::{AppError, ScriptedInput};
use scene_engine::prelude::*;
use scene_engine::scene::builders;

fn main() -> Result<(), AppError> {
    let (mut config, from_file) = common::load_config()?;
    if !from_file {
        config.camera.eye = Vec3::new(225.0, 80.0, -120.0);
        config.camera.center = Vec3::new(225.0, 0.0, 225.0);
    }

    log::info!("Starting robot army demo");
    let mut backend = RecordingBackend::new();
    let mut scene = builders::robot_army_scene(&mut backend, &config)?;

    let script = [
        ScriptedInput::at(60, InputEvent::key(KeyCode::B)),
        ScriptedInput::at(120, InputEvent::key(KeyCode::D)),
        ScriptedInput::at(121, InputEvent::Scroll { dy: -20.0 }),
        ScriptedInput::at(180, InputEvent::key(KeyCode::D)),
        ScriptedInput::at(240, InputEvent::key(KeyCode::C)),
        ScriptedInput::at(300, InputEvent::key(KeyCode::C)),
        ScriptedInput::at(360, InputEvent::CursorMoved { x: 320.0, y: 240.0 }),
        ScriptedInput::at(360, InputEvent::MouseButton { button: MouseButton::Left, pressed: true }),
        ScriptedInput::at(361, InputEvent::CursorMoved { x: 380.0, y: 250.0 }),
        ScriptedInput::at(362, InputEvent::MouseButton { button: MouseButton::Left, pressed: false }),
        ScriptedInput::at(420, InputEvent::key(KeyCode::P)),
        ScriptedInput::at(480, InputEvent::key(KeyCode::P)),
    ];
    common::run(&mut scene, &mut backend, &config, &script)?;

    log::info!("Robot army demo finished after {} frames", backend.frames_completed());
    Ok(())
}
