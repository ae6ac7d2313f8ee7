//! Intensity grid and the upward propagation rule
//!
//! The buffer is a fixed W×H grid of byte intensities, row-major, with row
//! `height - 1` (the bottom) acting as the fuel row. Each frame the fuel row
//! is reseeded and every other row is rederived from the row directly below
//! it: sample a horizontally-jittered source cell, subtract a small random
//! decay, saturate at zero. Heat therefore climbs one row per frame and dies
//! out with distance from the fuel row.
//!
//! The grid is allocated once and mutated in place; propagation never
//! allocates and never reads out of bounds (source columns are reduced
//! modulo the width before use).

use serde::{Deserialize, Serialize};

use crate::rng::RandomSource;

/// How the fuel row is resupplied each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FuelPolicy {
    /// Every fuel cell is set to the maximum intensity, giving a level,
    /// perpetual flame base. Reapplied every frame.
    #[default]
    Constant,
    /// Each fuel cell gets a randomized value in the upper half of the
    /// intensity range, making the base of the flame shimmer.
    Flicker,
}

/// Fixed-size grid of flame intensities.
#[derive(Debug, Clone)]
pub struct FireBuffer {
    width: usize,
    height: usize,
    max_intensity: u8,
    policy: FuelPolicy,
    cells: Vec<u8>,
}

impl FireBuffer {
    /// Create a zeroed buffer. The fuel row stays cold until the first
    /// [`seed_fuel_row`] call.
    ///
    /// [`seed_fuel_row`]: FireBuffer::seed_fuel_row
    pub fn new(width: usize, height: usize, max_intensity: u8, policy: FuelPolicy) -> Self {
        debug_assert!(width > 0 && height > 0, "buffer dimensions must be nonzero");
        FireBuffer {
            width,
            height,
            max_intensity,
            policy,
            cells: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn max_intensity(&self) -> u8 {
        self.max_intensity
    }

    pub fn policy(&self) -> FuelPolicy {
        self.policy
    }

    /// All cells, row-major, top row first.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Intensity at `(x, y)`; row 0 is the top of the flame.
    pub fn cell(&self, x: usize, y: usize) -> u8 {
        self.cells[y * self.width + x]
    }

    /// Overwrite every cell with `value`.
    pub fn fill(&mut self, value: u8) {
        self.cells.fill(value);
    }

    /// Resupply the fuel row according to the configured policy.
    ///
    /// Called once per frame before propagation. Under `Constant` fuel the
    /// call is idempotent: reseeding without an intervening propagation
    /// leaves the row unchanged.
    pub fn seed_fuel_row(&mut self, rng: &mut impl RandomSource) {
        let fuel_row = (self.height - 1) * self.width;
        match self.policy {
            FuelPolicy::Constant => {
                self.cells[fuel_row..].fill(self.max_intensity);
            }
            FuelPolicy::Flicker => {
                let half_range = self.max_intensity / 2 + 1;
                for cell in &mut self.cells[fuel_row..] {
                    *cell = self.max_intensity - rng.next_byte() % half_range;
                }
            }
        }
    }

    /// Derive every row above the fuel row from the row below it.
    ///
    /// Rows are processed from `height - 2` up to 0 in a single sweep; each
    /// row reads only the row strictly below it, which was either reseeded
    /// this frame (the fuel row) or finalized earlier in the same sweep. Per
    /// cell, the source column is `(x + small(4)) mod width`, wrapping
    /// horizontally rather than clamping, and the sampled value loses
    /// `small(2)` intensity, saturating at zero.
    pub fn propagate_frame(&mut self, rng: &mut impl RandomSource) {
        let width = self.width;
        for y in (0..self.height - 1).rev() {
            let row = y * width;
            let below = row + width;
            for x in 0..width {
                let src = (x + usize::from(rng.small(4))) % width;
                let decay = rng.small(2);
                self.cells[row + x] = self.cells[below + src].saturating_sub(decay);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Lcg8;

    #[test]
    fn test_new_buffer_is_cold() {
        let buf = FireBuffer::new(16, 8, 36, FuelPolicy::Constant);
        assert_eq!(buf.cells().len(), 16 * 8);
        assert!(buf.cells().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_constant_seed_fills_fuel_row_only() {
        let mut buf = FireBuffer::new(16, 8, 36, FuelPolicy::Constant);
        buf.seed_fuel_row(&mut Lcg8::default());
        for x in 0..16 {
            assert_eq!(buf.cell(x, 7), 36);
        }
        for y in 0..7 {
            for x in 0..16 {
                assert_eq!(buf.cell(x, y), 0, "row {y} touched by seeding");
            }
        }
    }

    #[test]
    fn test_constant_seed_is_idempotent() {
        let mut buf = FireBuffer::new(16, 8, 36, FuelPolicy::Constant);
        let mut rng = Lcg8::default();
        buf.seed_fuel_row(&mut rng);
        let snapshot = buf.cells().to_vec();
        buf.seed_fuel_row(&mut rng);
        buf.seed_fuel_row(&mut rng);
        assert_eq!(buf.cells(), &snapshot[..]);
    }

    #[test]
    fn test_flicker_seed_stays_in_upper_half() {
        let mut buf = FireBuffer::new(32, 4, 36, FuelPolicy::Flicker);
        let mut rng = Lcg8::default();
        for _ in 0..10 {
            buf.seed_fuel_row(&mut rng);
            for x in 0..32 {
                let v = buf.cell(x, 3);
                assert!((18..=36).contains(&v), "fuel cell out of upper half: {v}");
            }
        }
    }

    #[test]
    fn test_propagation_keeps_intensities_in_range() {
        let mut buf = FireBuffer::new(24, 16, 36, FuelPolicy::Constant);
        let mut rng = Lcg8::default();
        for _ in 0..200 {
            buf.seed_fuel_row(&mut rng);
            buf.propagate_frame(&mut rng);
            assert!(buf.cells().iter().all(|&c| c <= 36));
        }
    }

    #[test]
    fn test_propagation_mutates_in_place() {
        let mut buf = FireBuffer::new(24, 16, 36, FuelPolicy::Constant);
        let cells_ptr = buf.cells().as_ptr();
        let mut rng = Lcg8::default();
        for _ in 0..50 {
            buf.seed_fuel_row(&mut rng);
            buf.propagate_frame(&mut rng);
        }
        assert_eq!(buf.cells().as_ptr(), cells_ptr, "grid was reallocated");
    }

    #[test]
    fn test_single_row_buffer_is_all_fuel() {
        let mut buf = FireBuffer::new(8, 1, 4, FuelPolicy::Constant);
        let mut rng = Lcg8::default();
        buf.seed_fuel_row(&mut rng);
        // Nothing above the fuel row; propagation is a no-op.
        buf.propagate_frame(&mut rng);
        assert!(buf.cells().iter().all(|&c| c == 4));
    }
}
