//! Effect configuration
//!
//! Everything about a run that is fixed at construction time: grid
//! dimensions, the intensity range (and with it the palette size), the
//! fuel-row policy, the target DAC depth, and whether the frame loop paces
//! on the display's vertical blank. Dimensions never change after
//! construction; there is no runtime mode switching.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::buffer::FuelPolicy;
use crate::palette::DacDepth;

/// Canonical resolution of the reference display mode.
pub const DEFAULT_WIDTH: usize = 320;
pub const DEFAULT_HEIGHT: usize = 200;

/// Classic ramp: intensities 0..=36, a 37-entry palette.
pub const DEFAULT_MAX_INTENSITY: u8 = 36;

/// Construction-time parameters of a flame effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlameConfig {
    /// Framebuffer and grid width in pixels.
    pub width: usize,
    /// Framebuffer and grid height in pixels.
    pub height: usize,
    /// Hottest intensity value; the palette has `max_intensity + 1` entries.
    pub max_intensity: u8,
    /// Fuel-row reseeding policy.
    pub fuel_policy: FuelPolicy,
    /// Dynamic range of the device's color lookup table.
    pub dac_depth: DacDepth,
    /// Wait for the display's vertical blank after each blit. Disabling
    /// this uncaps the frame rate at the cost of visible tearing.
    pub pace_to_vsync: bool,
}

impl Default for FlameConfig {
    fn default() -> Self {
        FlameConfig {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            max_intensity: DEFAULT_MAX_INTENSITY,
            fuel_policy: FuelPolicy::Constant,
            dac_depth: DacDepth::SixBit,
            pace_to_vsync: true,
        }
    }
}

impl FlameConfig {
    /// Number of palette entries implied by the intensity range.
    pub fn palette_len(&self) -> usize {
        usize::from(self.max_intensity) + 1
    }

    /// Size in bytes of the framebuffer region this effect writes.
    pub fn framebuffer_len(&self) -> usize {
        self.width * self.height
    }

    /// Check the configuration for values the effect cannot run with.
    ///
    /// # Errors
    /// Returns [`ConfigError::ZeroDimension`] if either dimension is zero,
    /// or [`ConfigError::NoIntensityRange`] if the intensity range is a
    /// single value (the flame would be invisible).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        if self.max_intensity == 0 {
            return Err(ConfigError::NoIntensityRange);
        }
        Ok(())
    }
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Width or height is zero.
    ZeroDimension { width: usize, height: usize },
    /// `max_intensity` is zero, leaving only the background color.
    NoIntensityRange,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroDimension { width, height } => {
                write!(f, "grid dimensions must be nonzero, got {width}x{height}")
            }
            ConfigError::NoIntensityRange => {
                write!(f, "max_intensity must be at least 1")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
