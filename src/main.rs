use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use emuchip::{timer::TIMER_HZ, Emulator};
use log::{debug, info, warn};

use frontend::{sound::Sound, window::Screen};

mod frontend;

// Separately:
// CPU: --ips times per second
// Display: 60 times per second
// Timer: 60 times per second
const DEFAULT_IPS: u32 = 700;

#[derive(Parser, Debug)]
#[command(version, about = "CHIP-8 interpreter", long_about = None)]
struct Args {
    /// Program image to run
    rom: PathBuf,

    #[arg(long, default_value_t = DEFAULT_IPS, value_parser = clap::value_parser!(u32).range(1..))]
    /// Instructions per second, spread evenly over 60 frames
    ips: u32,

    #[arg(long, default_value_t = 16)]
    /// Window scale: 1, 2, 4, 8, 16 or 32
    scale: u32,

    #[arg(long)]
    /// Seed for the random number instruction
    seed: Option<u64>,

    #[arg(long)]
    /// Never play the tone
    mute: bool,
}

/// Splits the instruction rate over timer frames. The remainder of
/// `ips / TIMER_HZ` is carried so a second of frames adds up to `ips`.
struct StepBudget {
    per_frame: u32,
    remainder: u32,
    carry: u32,
}

impl StepBudget {
    fn new(ips: u32) -> Self {
        Self {
            per_frame: ips / TIMER_HZ,
            remainder: ips % TIMER_HZ,
            carry: 0,
        }
    }

    fn next_frame(&mut self) -> u32 {
        self.carry += self.remainder;
        if self.carry >= TIMER_HZ {
            self.carry -= TIMER_HZ;
            self.per_frame + 1
        } else {
            self.per_frame
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let program = fs::read(&args.rom)
        .with_context(|| format!("could not read {}", args.rom.display()))?;
    info!("loaded {} ({} bytes)", args.rom.display(), program.len());

    let mut emu = match args.seed {
        Some(seed) => Emulator::with_seed(&program, seed),
        None => Emulator::new(&program),
    }
    .with_context(|| format!("could not load {}", args.rom.display()))?;

    let scale = frontend::window::scale_from(args.scale)
        .with_context(|| format!("unsupported scale {}", args.scale))?;
    let mut screen = Screen::new(scale)?;

    let sound = if args.mute {
        None
    } else {
        match Sound::new() {
            Ok(sound) => Some(sound),
            Err(err) => {
                warn!("audio unavailable, running silent: {err:#}");
                None
            }
        }
    };
    info!("audio {}", if sound.is_some() { "on" } else { "off" });

    let mut budget = StepBudget::new(args.ips);
    info!("{} instructions/s over {TIMER_HZ} frames/s", args.ips);

    // the window caps this loop at ~60 Hz
    while screen.is_running() {
        emu.set_keys(screen.keys());
        for _ in 0..budget.next_frame() {
            if let Err(err) = emu.step() {
                debug!("{err}");
            }
        }

        if emu.tick_timers() {
            debug!("sound timer expired");
        }
        if let Some(sound) = &sound {
            sound.set_playing(emu.tone_active());
        }

        screen.present(emu.framebuffer(), emu.draw_needed())?;
        emu.clear_draw_flag();
    }

    Ok(())
}
