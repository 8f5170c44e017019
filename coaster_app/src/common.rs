//! Shared pieces of the headless demo binaries

use std::path::PathBuf;

use scene_engine::foundation::logging;
use scene_engine::prelude::*;

/// Demo failures
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scene construction or a frame failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}

/// Load the configuration named by the first command-line argument
///
/// Returns the config and whether it came from a file. Logging is initialized
/// from the loaded log level.
pub fn load_config() -> Result<(ApplicationConfig, bool), AppError> {
    let path = std::env::args().nth(1).map(PathBuf::from);
    let config = ApplicationConfig::load_or_default(path.as_deref())?;
    logging::init(&config.engine.log_level);
    Ok((config, path.is_some()))
}

/// Input scheduled for a given frame
pub struct ScriptedInput {
    /// Frame number the event is delivered before
    pub frame: u64,
    /// The event
    pub event: InputEvent,
}

impl ScriptedInput {
    /// Schedule `event` before `frame`
    pub fn at(frame: u64, event: InputEvent) -> Self {
        Self { frame, event }
    }
}

/// Tick `scene` for the configured number of frames, replaying `script`
///
/// Stops early when a Quit action arrives.
pub fn run(
    scene: &mut Scene,
    backend: &mut RecordingBackend,
    config: &ApplicationConfig,
    script: &[ScriptedInput],
) -> Result<(), AppError> {
    let mut clock = FixedStep::new(config.engine.fixed_delta);
    let mut total_visible = 0usize;

    for _ in 0..config.engine.frame_count {
        let frame = clock.frame_count() + 1;
        for input in script.iter().filter(|input| input.frame == frame) {
            log::info!("Frame {}: {:?}", frame, input.event);
            scene.handle_event(&input.event)?;
        }
        if scene.quit_requested() {
            log::info!("Quit requested at frame {}", frame);
            break;
        }

        let stats = scene.tick(clock.tick(), backend)?;
        total_visible += stats.visible;
        if stats.frustum_recomputed || stats.frame % 60 == 0 {
            log::info!(
                "Frame {}: {} visible, {} draws, frustum recomputed: {}",
                stats.frame,
                stats.visible,
                backend.frame().draws.len(),
                stats.frustum_recomputed
            );
        }
    }

    let frames = clock.frame_count().max(1);
    log::info!(
        "Simulated {:.1}s over {} frames; {:.1} visible per frame, {} frustum rebuilds",
        clock.total_time(),
        clock.frame_count(),
        total_visible as f32 / frames as f32,
        scene.culler().recompute_count()
    );
    Ok(())
}
