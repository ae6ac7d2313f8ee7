//! End-to-end frame loop behavior against in-memory display devices

use flame_fx_core::{
    blit, DisplayDevice, FireBuffer, FlameConfig, FlameEffect, FuelPolicy, Lcg8, LoopState,
    MemoryDisplay, Rgb,
};

fn test_config() -> FlameConfig {
    FlameConfig {
        width: 32,
        height: 20,
        max_intensity: 36,
        ..FlameConfig::default()
    }
}

/// Memory display that counts capability calls and requests exit after a
/// fixed number of polls.
#[derive(Default)]
struct InstrumentedDisplay {
    inner: MemoryDisplay,
    vsync_waits: u32,
    exit_polls: u32,
    exit_after: u32,
}

impl DisplayDevice for InstrumentedDisplay {
    fn enter_graphics_mode(&mut self, width: usize, height: usize) {
        self.inner.enter_graphics_mode(width, height);
    }

    fn install_palette(&mut self, palette: &[Rgb]) {
        self.inner.install_palette(palette);
    }

    fn framebuffer(&mut self) -> &mut [u8] {
        self.inner.framebuffer()
    }

    fn wait_vsync(&mut self) {
        self.vsync_waits += 1;
    }

    fn exit_requested(&mut self) -> bool {
        self.exit_polls += 1;
        self.exit_polls >= self.exit_after
    }
}

#[test]
fn test_uniform_buffer_blits_as_uniform_framebuffer() {
    // The direct intensity-as-palette-index contract: an all-k grid becomes
    // an all-k framebuffer, for every representable k.
    let mut display = MemoryDisplay::new();
    display.enter_graphics_mode(8, 4);
    for k in [0u8, 1, 17, 36] {
        let mut buffer = FireBuffer::new(8, 4, 36, FuelPolicy::Constant);
        buffer.fill(k);
        blit(&buffer, display.framebuffer());
        assert!(display.pixels().iter().all(|&p| p == k), "k = {k}");
    }
}

#[test]
fn test_bounded_run_produces_a_burning_frame() {
    let mut effect = FlameEffect::with_rng(test_config(), Lcg8::new(0x2E)).unwrap();
    let mut display = MemoryDisplay::new();
    effect.run_until(&mut display, |frames| frames >= 60);

    assert_eq!(effect.state(), LoopState::Halted);
    let pixels = display.pixels();
    assert_eq!(pixels.len(), 32 * 20);
    // Fuel row fully hot, everything within the palette range.
    assert!(pixels[pixels.len() - 32..].iter().all(|&p| p == 36));
    assert!(pixels.iter().all(|&p| p <= 36));
    // After 60 frames the flame has climbed: some heat above the fuel row.
    assert!(
        pixels[..pixels.len() - 32].iter().any(|&p| p > 0),
        "no heat propagated above the fuel row"
    );
}

#[test]
fn test_device_exit_signal_halts_loop() {
    let mut effect = FlameEffect::with_rng(test_config(), Lcg8::default()).unwrap();
    let mut display = InstrumentedDisplay {
        exit_after: 5,
        ..InstrumentedDisplay::default()
    };
    effect.run(&mut display);

    assert_eq!(effect.state(), LoopState::Halted);
    assert_eq!(effect.frames_rendered(), 5);
    assert_eq!(display.exit_polls, 5);
}

#[test]
fn test_vsync_paced_once_per_frame() {
    let mut effect = FlameEffect::with_rng(test_config(), Lcg8::default()).unwrap();
    let mut display = InstrumentedDisplay {
        exit_after: 8,
        ..InstrumentedDisplay::default()
    };
    effect.run(&mut display);
    assert_eq!(display.vsync_waits, 8);
}

#[test]
fn test_unpaced_run_skips_vsync() {
    let config = FlameConfig {
        pace_to_vsync: false,
        ..test_config()
    };
    let mut effect = FlameEffect::with_rng(config, Lcg8::default()).unwrap();
    let mut display = InstrumentedDisplay {
        exit_after: 8,
        ..InstrumentedDisplay::default()
    };
    effect.run(&mut display);
    assert_eq!(display.vsync_waits, 0);
    assert_eq!(effect.frames_rendered(), 8);
}

#[test]
fn test_palette_installed_before_first_blit() {
    let mut effect = FlameEffect::with_rng(test_config(), Lcg8::default()).unwrap();
    let mut display = MemoryDisplay::new();
    effect.start(&mut display);
    assert_eq!(display.palette().len(), 37);
    assert_eq!(display.palette()[0], Rgb::BLACK);
    assert_eq!(display.palette()[36], Rgb::new(63, 63, 63));
}
