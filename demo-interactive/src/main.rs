//! Live terminal flame viewer
//!
//! Runs the flame effect against a terminal-backed display device: the
//! intensity framebuffer is presented as half-block cells (two pixels per
//! terminal row) colored through the generated palette, the vertical-blank
//! wait becomes a fixed frame-interval sleep, and the exit signal is the
//! keyboard (`q`, Esc, or Ctrl-C).
//!
//! The fire grid is sized to the terminal at startup; resize mid-run is not
//! handled (the effect renders at a fixed resolution by design).
//!
//! # Usage
//!
//! ```bash
//! cargo run --package demo-interactive
//! ```

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use flame_fx_core::{DisplayDevice, FlameConfig, FlameEffect, Rgb};
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::style::Color;
use ratatui::DefaultTerminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Frames per second the vsync emulation paces to.
const TARGET_FPS: u64 = 30;

/// A display device backed by the terminal.
struct TerminalDisplay {
    terminal: DefaultTerminal,
    width: usize,
    height: usize,
    pixels: Vec<u8>,
    colors: Vec<Color>,
    frame_interval: Duration,
    next_frame: Instant,
}

impl TerminalDisplay {
    fn new(terminal: DefaultTerminal) -> Self {
        TerminalDisplay {
            terminal,
            width: 0,
            height: 0,
            pixels: Vec::new(),
            colors: Vec::new(),
            frame_interval: Duration::from_micros(1_000_000 / TARGET_FPS),
            next_frame: Instant::now(),
        }
    }

    /// Draw the framebuffer as half-block cells: each terminal cell shows
    /// two vertically-stacked pixels, upper in the foreground and lower in
    /// the background of a `▀` glyph.
    fn present(&mut self) {
        let width = self.width;
        let pixels = &self.pixels;
        let colors = &self.colors;
        let lookup = |x: usize, y: usize| -> Color {
            pixels
                .get(y * width + x)
                .and_then(|&index| colors.get(usize::from(index)).copied())
                .unwrap_or(Color::Black)
        };
        // Presentation failures are not part of the device contract; drop
        // the frame and keep simulating.
        let _ = self.terminal.draw(|frame| {
            let area = frame.area();
            let buf = frame.buffer_mut();
            for row in 0..area.height {
                for col in 0..area.width {
                    let x = usize::from(col);
                    let y = usize::from(row) * 2;
                    if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                        cell.set_symbol("▀")
                            .set_fg(lookup(x, y))
                            .set_bg(lookup(x, y + 1));
                    }
                }
            }
        });
    }
}

impl DisplayDevice for TerminalDisplay {
    fn enter_graphics_mode(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![0; width * height];
        self.next_frame = Instant::now() + self.frame_interval;
        info!("terminal display presenting {width}x{height} pixels");
    }

    fn install_palette(&mut self, palette: &[Rgb]) {
        // DAC units scale to the terminal's 8-bit truecolor range; the top
        // entry is full white, so its red channel is the DAC maximum.
        let max = palette.last().map_or(255, |top| top.r.max(1));
        let scale = |v: u8| (u16::from(v) * 255 / u16::from(max)) as u8;
        self.colors = palette
            .iter()
            .map(|entry| Color::Rgb(scale(entry.r), scale(entry.g), scale(entry.b)))
            .collect();
    }

    fn framebuffer(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    fn wait_vsync(&mut self) {
        self.present();
        let now = Instant::now();
        if self.next_frame > now {
            thread::sleep(self.next_frame - now);
        }
        self.next_frame += self.frame_interval;
        if self.next_frame < Instant::now() {
            // Fell behind a full frame; resync rather than racing to catch up.
            self.next_frame = Instant::now() + self.frame_interval;
        }
    }

    fn exit_requested(&mut self) -> bool {
        while event::poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let ctrl_c = key.code == KeyCode::Char('c')
                    && key.modifiers.contains(KeyModifiers::CONTROL);
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) || ctrl_c {
                    return true;
                }
            }
        }
        false
    }
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let terminal = ratatui::init();
    let result = run(terminal);
    ratatui::restore();
    result
}

fn run(terminal: DefaultTerminal) -> io::Result<()> {
    let size = terminal.size()?;
    let config = FlameConfig {
        width: usize::from(size.width).max(1),
        height: usize::from(size.height).max(1) * 2,
        pace_to_vsync: true,
        ..FlameConfig::default()
    };

    let mut effect = FlameEffect::new(config)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
    let mut display = TerminalDisplay::new(terminal);

    // Runs until the keyboard requests exit.
    effect.run(&mut display);

    let stats = effect.stats();
    info!(
        "exited after {} frames ({:.1?})",
        stats.frames_rendered, stats.elapsed
    );
    Ok(())
}
