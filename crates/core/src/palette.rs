//! Fire color ramp generation
//!
//! Produces the indexed palette the display device installs at startup:
//! black at index 0 rising through deep red, red, orange and yellow to
//! white-hot at the top index. Intensities in the fire buffer are used
//! directly as indices into this ramp, so the ramp length is always
//! `max_intensity + 1`.
//!
//! Channels are interpolated between gradient stops in linear light (through
//! the `sRGB` transfer function) so the ramp brightens smoothly instead of
//! banding in the dark reds, then quantized to the target DAC range.
//! The ramp is computed rather than stored as a literal table; it is
//! generated exactly once per run.

use serde::{Deserialize, Serialize};

/// One palette entry: a channel triple in DAC units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Channel sum, the brightness proxy used by the monotonicity checks.
    pub fn brightness(self) -> u16 {
        u16::from(self.r) + u16::from(self.g) + u16::from(self.b)
    }
}

/// Dynamic range of the target device's color lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DacDepth {
    /// VGA-style DAC, 6 bits per channel (0..=63).
    #[default]
    SixBit,
    /// Full 8 bits per channel (0..=255).
    EightBit,
}

impl DacDepth {
    /// Largest representable value per channel.
    pub fn channel_max(self) -> u8 {
        match self {
            DacDepth::SixBit => 63,
            DacDepth::EightBit => 255,
        }
    }
}

/// Gradient stops as (position, `sRGB` channels), positions over [0, 1].
///
/// Every channel is non-decreasing across the stop sequence, which is what
/// makes the generated ramp monotonic in brightness.
const STOPS: &[(f32, [f32; 3])] = &[
    (0.00, [0.00, 0.00, 0.00]), // black
    (0.15, [0.20, 0.00, 0.00]), // deep red
    (0.35, [0.80, 0.00, 0.00]), // red
    (0.55, [1.00, 0.35, 0.00]), // orange
    (0.75, [1.00, 0.75, 0.10]), // yellow
    (1.00, [1.00, 1.00, 1.00]), // white-hot
];

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
fn linear_to_srgb(c: f32) -> f32 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Sample the ramp at `t` in [0, 1], interpolating in linear light within
/// the segment that contains `t`.
fn sample(t: f32) -> [f32; 3] {
    let (first_pos, first_color) = STOPS[0];
    if t <= first_pos {
        return first_color;
    }
    let (last_pos, last_color) = STOPS[STOPS.len() - 1];
    if t >= last_pos {
        return last_color;
    }
    for pair in STOPS.windows(2) {
        let (p0, c0) = pair[0];
        let (p1, c1) = pair[1];
        if t <= p1 {
            let u = (t - p0) / (p1 - p0);
            let mut out = [0.0f32; 3];
            for ch in 0..3 {
                let lin = lerp(srgb_to_linear(c0[ch]), srgb_to_linear(c1[ch]), u);
                out[ch] = linear_to_srgb(lin);
            }
            return out;
        }
    }
    last_color
}

#[inline]
fn quantize(channel: f32, channel_max: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * channel_max).round() as u8
}

/// Generate the fire ramp with `count` entries for the given DAC depth.
///
/// Guarantees: entry 0 is exact black, the final entry has every channel at
/// the DAC maximum, and [`Rgb::brightness`] is non-decreasing across
/// consecutive entries. Pure; called once at startup.
pub fn generate(count: usize, depth: DacDepth) -> Vec<Rgb> {
    let channel_max = f32::from(depth.channel_max());
    let divisor = count.saturating_sub(1).max(1) as f32;
    (0..count)
        .map(|i| {
            let t = i as f32 / divisor;
            let [r, g, b] = sample(t);
            Rgb::new(
                quantize(r, channel_max),
                quantize(g, channel_max),
                quantize(b, channel_max),
            )
        })
        .collect()
}
