//! Time management utilities

use std::time::Instant;

/// Source of per-frame delta times
///
/// The live loop uses [`Timer`]; headless runs and tests use [`FixedStep`].
pub trait FrameClock {
    /// Advance the clock by one frame and return the elapsed seconds
    fn tick(&mut self) -> f32;

    /// Number of frames ticked so far
    fn frame_count(&self) -> u64;
}

/// High-precision timer for frame timing
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the average FPS since timer creation
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

impl FrameClock for Timer {
    fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
        self.delta_time
    }

    fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Deterministic clock that always reports the same delta
#[derive(Debug, Clone)]
pub struct FixedStep {
    step: f32,
    frame_count: u64,
}

impl FixedStep {
    /// Create a clock advancing `step` seconds per frame
    pub fn new(step: f32) -> Self {
        Self { step, frame_count: 0 }
    }

    /// Total simulated time
    pub fn total_time(&self) -> f32 {
        self.step * self.frame_count as f32
    }
}

impl FrameClock for FixedStep {
    fn tick(&mut self) -> f32 {
        self.frame_count += 1;
        self.step
    }

    fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_step_accumulates() {
        let mut clock = FixedStep::new(0.5);
        assert_eq!(clock.tick(), 0.5);
        assert_eq!(clock.tick(), 0.5);
        assert_eq!(clock.frame_count(), 2);
        assert!((clock.total_time() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_timer_counts_frames() {
        let mut timer = Timer::new();
        let dt = timer.tick();
        assert!(dt >= 0.0);
        assert_eq!(timer.frame_count(), 1);
    }
}
