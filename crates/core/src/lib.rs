//! Flame Effect Core Library
//!
//! A continuous cellular-automaton fire effect rendered through an indexed
//! color ramp into a linear byte framebuffer. The bottom row of the
//! intensity grid is resupplied with fuel every frame; each row above it is
//! rederived from the row below with randomized horizontal jitter and decay,
//! so heat climbs and dies out toward the top of the screen.
//!
//! The display is an external capability behind the [`DisplayDevice`] trait:
//! the core generates the palette, asks the device for an indexed graphics
//! mode, and from then on only writes intensity bytes, each one used
//! directly as a palette index. [`MemoryDisplay`] backs tests and headless
//! runs; frontends supply their own devices.

// Core simulation
pub mod buffer;
pub mod rng;

// Color ramp
pub mod palette;

// Output path
pub mod display;
pub mod render;

// Loop and configuration
pub mod config;
pub mod effect;

// Re-export the working set
pub use buffer::{FireBuffer, FuelPolicy};
pub use config::{ConfigError, FlameConfig};
pub use display::{DisplayDevice, MemoryDisplay};
pub use effect::{FlameEffect, FrameStats, LoopState};
pub use palette::{DacDepth, Rgb};
pub use render::blit;
pub use rng::{Lcg8, RandomSource};
