//! The frame loop
//!
//! [`FlameEffect`] owns the intensity buffer and the random source and
//! drives one simulation-render cycle per frame: reseed the fuel row,
//! propagate, blit, then optionally pace on the device's vertical blank and
//! poll its exit signal. The loop itself is an explicit state machine:
//! `Uninitialized` until the palette is installed, then `Running` until the
//! exit signal (or an injected termination predicate) fires. `Halted` is
//! terminal; the effect has no graceful shutdown beyond ceasing to render.
//!
//! The termination predicate exists so tests and headless runs can execute
//! a bounded number of frames; the production loop passes one that never
//! fires and runs until the device requests exit.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::buffer::FireBuffer;
use crate::config::{ConfigError, FlameConfig};
use crate::display::DisplayDevice;
use crate::palette;
use crate::render;
use crate::rng::{Lcg8, RandomSource};

/// Frames between periodic progress logs.
const LOG_INTERVAL: u64 = 600;

/// Where the loop is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Constructed, but the device has not been set up yet.
    Uninitialized,
    /// Producing frames.
    Running,
    /// Exit observed. Terminal.
    Halted,
}

/// Snapshot of loop progress.
#[derive(Debug, Clone)]
pub struct FrameStats {
    pub frames_rendered: u64,
    pub elapsed: Duration,
    pub state: LoopState,
}

/// The continuous fire effect: buffer, random source, and frame loop.
pub struct FlameEffect<R: RandomSource = Lcg8> {
    config: FlameConfig,
    buffer: FireBuffer,
    rng: R,
    state: LoopState,
    frames_rendered: u64,
    started: Option<Instant>,
}

impl FlameEffect<Lcg8> {
    /// Create an effect with an entropy-seeded generator, so the flame
    /// differs between launches.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the configuration fails validation.
    pub fn new(config: FlameConfig) -> Result<Self, ConfigError> {
        FlameEffect::with_rng(config, Lcg8::from_entropy())
    }
}

impl<R: RandomSource> FlameEffect<R> {
    /// Create an effect with an explicit random source.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the configuration fails validation.
    pub fn with_rng(config: FlameConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let buffer = FireBuffer::new(
            config.width,
            config.height,
            config.max_intensity,
            config.fuel_policy,
        );
        info!(
            "flame effect created: {}x{}, {} intensities, {:?} fuel",
            config.width,
            config.height,
            config.palette_len(),
            config.fuel_policy
        );
        Ok(FlameEffect {
            config,
            buffer,
            rng,
            state: LoopState::Uninitialized,
            frames_rendered: 0,
            started: None,
        })
    }

    pub fn config(&self) -> &FlameConfig {
        &self.config
    }

    pub fn buffer(&self) -> &FireBuffer {
        &self.buffer
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Set up the device and transition to `Running`: generate the ramp,
    /// enter graphics mode, install the palette. Does nothing unless the
    /// effect is `Uninitialized`.
    pub fn start(&mut self, device: &mut impl DisplayDevice) {
        if self.state != LoopState::Uninitialized {
            return;
        }
        let ramp = palette::generate(self.config.palette_len(), self.config.dac_depth);
        device.enter_graphics_mode(self.config.width, self.config.height);
        device.install_palette(&ramp);
        self.state = LoopState::Running;
        self.started = Some(Instant::now());
        info!(
            "running: {}x{} indexed mode, {}-entry ramp installed",
            self.config.width,
            self.config.height,
            ramp.len()
        );
    }

    /// Produce one frame: reseed the fuel row, propagate, blit.
    ///
    /// Pacing and exit polling are the caller's concern ([`run_until`] does
    /// both); this is the bounded unit that tests drive directly.
    ///
    /// [`run_until`]: FlameEffect::run_until
    pub fn run_frame(&mut self, device: &mut impl DisplayDevice) {
        self.buffer.seed_fuel_row(&mut self.rng);
        self.buffer.propagate_frame(&mut self.rng);
        render::blit(&self.buffer, device.framebuffer());
        self.frames_rendered += 1;
        if self.frames_rendered % LOG_INTERVAL == 0 {
            debug!("{} frames rendered", self.frames_rendered);
        }
    }

    /// Run frames until the device requests exit or `should_stop` returns
    /// true (called after each frame with the running frame count).
    ///
    /// Starts the device first if needed. Returns immediately if the effect
    /// has already halted.
    pub fn run_until(
        &mut self,
        device: &mut impl DisplayDevice,
        mut should_stop: impl FnMut(u64) -> bool,
    ) {
        self.start(device);
        while self.state == LoopState::Running {
            self.run_frame(device);
            if self.config.pace_to_vsync {
                device.wait_vsync();
            }
            if device.exit_requested() || should_stop(self.frames_rendered) {
                self.halt();
            }
        }
    }

    /// Run until the device requests exit. Infinite by design when the
    /// device has no exit signal.
    pub fn run(&mut self, device: &mut impl DisplayDevice) {
        self.run_until(device, |_| false);
    }

    /// Transition to the terminal `Halted` state.
    pub fn halt(&mut self) {
        if self.state == LoopState::Halted {
            return;
        }
        self.state = LoopState::Halted;
        info!(
            "halted after {} frames ({:.1?})",
            self.frames_rendered,
            self.elapsed()
        );
    }

    /// Progress snapshot.
    pub fn stats(&self) -> FrameStats {
        FrameStats {
            frames_rendered: self.frames_rendered,
            elapsed: self.elapsed(),
            state: self.state,
        }
    }

    fn elapsed(&self) -> Duration {
        self.started.map_or(Duration::ZERO, |t| t.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::MemoryDisplay;

    fn small_config() -> FlameConfig {
        FlameConfig {
            width: 16,
            height: 8,
            max_intensity: 36,
            pace_to_vsync: false,
            ..FlameConfig::default()
        }
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let config = FlameConfig {
            width: 0,
            ..small_config()
        };
        assert!(FlameEffect::new(config).is_err());
    }

    #[test]
    fn test_state_machine_transitions() {
        let mut effect = FlameEffect::new(small_config()).unwrap();
        assert_eq!(effect.state(), LoopState::Uninitialized);

        let mut display = MemoryDisplay::new();
        effect.start(&mut display);
        assert_eq!(effect.state(), LoopState::Running);

        effect.halt();
        assert_eq!(effect.state(), LoopState::Halted);
    }

    #[test]
    fn test_halted_is_terminal() {
        let mut effect = FlameEffect::new(small_config()).unwrap();
        let mut display = MemoryDisplay::new();
        effect.run_until(&mut display, |frames| frames >= 3);
        assert_eq!(effect.state(), LoopState::Halted);
        assert_eq!(effect.frames_rendered(), 3);

        // Further runs are no-ops once halted.
        effect.run_until(&mut display, |_| false);
        assert_eq!(effect.frames_rendered(), 3);
    }

    #[test]
    fn test_start_installs_full_palette() {
        let mut effect = FlameEffect::new(small_config()).unwrap();
        let mut display = MemoryDisplay::new();
        effect.start(&mut display);
        assert_eq!(display.palette().len(), 37);
        assert_eq!(display.pixels().len(), 16 * 8);
    }

    #[test]
    fn test_stats_track_frames() {
        let mut effect = FlameEffect::new(small_config()).unwrap();
        let mut display = MemoryDisplay::new();
        effect.run_until(&mut display, |frames| frames >= 10);
        let stats = effect.stats();
        assert_eq!(stats.frames_rendered, 10);
        assert_eq!(stats.state, LoopState::Halted);
    }
}
