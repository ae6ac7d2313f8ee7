use clap::Parser;
use flame_fx_core::{
    DacDepth, FlameConfig, FlameEffect, FuelPolicy, Lcg8, MemoryDisplay, Rgb,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Flame effect demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "flame-fx-demo")]
#[command(about = "Headless flame effect demo", long_about = None)]
struct Args {
    /// Framebuffer width in pixels
    #[arg(short = 'W', long, default_value_t = 320)]
    width: usize,

    /// Framebuffer height in pixels
    #[arg(short = 'H', long, default_value_t = 200)]
    height: usize,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// RNG seed (omit for a different flame every run)
    #[arg(short, long)]
    seed: Option<u8>,

    /// Fuel row policy (constant, flicker)
    #[arg(long, default_value = "constant")]
    fuel: String,

    /// Number of palette entries (2-256)
    #[arg(short, long, default_value_t = 37)]
    palette_size: usize,

    /// Generate the ramp for an 8-bit DAC instead of the VGA 6-bit one
    #[arg(long)]
    eight_bit: bool,

    /// Report interval in frames
    #[arg(short, long, default_value_t = 100)]
    report_interval: u64,

    /// Write the final frame as a PPM image
    #[arg(long)]
    dump_frame: Option<PathBuf>,

    /// Write the generated palette ramp as a PPM strip
    #[arg(long)]
    dump_palette: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    println!("=== Flame Effect Demo ===\n");

    let fuel_policy = match args.fuel.to_lowercase().as_str() {
        "flicker" => FuelPolicy::Flicker,
        "constant" => FuelPolicy::Constant,
        other => {
            println!("Unknown fuel policy '{}', using constant", other);
            FuelPolicy::Constant
        }
    };

    if !(2..=256).contains(&args.palette_size) {
        eprintln!("palette size must be in 2..=256, got {}", args.palette_size);
        std::process::exit(1);
    }

    let config = FlameConfig {
        width: args.width,
        height: args.height,
        max_intensity: (args.palette_size - 1) as u8,
        fuel_policy,
        dac_depth: if args.eight_bit {
            DacDepth::EightBit
        } else {
            DacDepth::SixBit
        },
        pace_to_vsync: false,
    };

    let rng = match args.seed {
        Some(seed) => Lcg8::new(seed),
        None => Lcg8::from_entropy(),
    };

    let mut effect = match FlameEffect::with_rng(config, rng) {
        Ok(effect) => effect,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "Created {}x{} effect, {} palette entries, {:?} fuel",
        args.width, args.height, args.palette_size, fuel_policy
    );

    let mut display = MemoryDisplay::new();
    effect.start(&mut display);

    for frame in 1..=args.frames {
        effect.run_frame(&mut display);
        if frame % args.report_interval == 0 || frame == args.frames {
            report(frame, display.pixels());
        }
    }
    effect.halt();

    let stats = effect.stats();
    println!(
        "\nDone: {} frames in {:.2?} ({:.0} fps)",
        stats.frames_rendered,
        stats.elapsed,
        stats.frames_rendered as f64 / stats.elapsed.as_secs_f64().max(1e-9)
    );

    if let Some(path) = &args.dump_palette {
        match write_palette_ppm(path, display.palette()) {
            Ok(()) => println!("Palette written to {}", path.display()),
            Err(e) => eprintln!("Failed to write palette: {}", e),
        }
    }

    if let Some(path) = &args.dump_frame {
        match write_frame_ppm(path, &display) {
            Ok(()) => println!("Frame written to {}", path.display()),
            Err(e) => eprintln!("Failed to write frame: {}", e),
        }
    }
}

/// Print flame coverage for one report line.
fn report(frame: u64, pixels: &[u8]) {
    let lit = pixels.iter().filter(|&&p| p > 0).count();
    let total: u64 = pixels.iter().map(|&p| u64::from(p)).sum();
    let mean = total as f64 / pixels.len() as f64;
    println!(
        "frame {:>6}: {:>5.1}% lit, mean intensity {:.2}",
        frame,
        100.0 * lit as f64 / pixels.len() as f64,
        mean
    );
}

/// Scale a DAC channel value to the 8-bit range PPM expects.
fn to_ppm_channel(value: u8, channel_max: u8) -> u8 {
    (u16::from(value) * 255 / u16::from(channel_max)) as u8
}

fn channel_max(palette: &[Rgb]) -> u8 {
    // The top entry is white at full DAC range, so its red channel tells us
    // whether this ramp targets a 6-bit or 8-bit DAC.
    palette.last().map_or(255, |top| top.r.max(1))
}

fn write_ppm_header(out: &mut impl Write, width: usize, height: usize) -> std::io::Result<()> {
    writeln!(out, "P6\n{} {}\n255", width, height)
}

/// Final frame mapped through the installed palette, as binary PPM.
fn write_frame_ppm(path: &Path, display: &MemoryDisplay) -> std::io::Result<()> {
    let palette = display.palette();
    let max = channel_max(palette);
    let mut out = BufWriter::new(File::create(path)?);
    write_ppm_header(&mut out, display.width(), display.height())?;
    for &index in display.pixels() {
        let entry = palette[usize::from(index)];
        out.write_all(&[
            to_ppm_channel(entry.r, max),
            to_ppm_channel(entry.g, max),
            to_ppm_channel(entry.b, max),
        ])?;
    }
    out.flush()
}

/// The ramp as a 16-row strip, one column per entry.
fn write_palette_ppm(path: &Path, palette: &[Rgb]) -> std::io::Result<()> {
    const STRIP_HEIGHT: usize = 16;
    let max = channel_max(palette);
    let mut out = BufWriter::new(File::create(path)?);
    write_ppm_header(&mut out, palette.len(), STRIP_HEIGHT)?;
    for _ in 0..STRIP_HEIGHT {
        for entry in palette {
            out.write_all(&[
                to_ppm_channel(entry.r, max),
                to_ppm_channel(entry.g, max),
                to_ppm_channel(entry.b, max),
            ])?;
        }
    }
    out.flush()
}
