use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use chip8_vm::{Chip8, Config, Display, ScriptedKeypad, CLOCK_SPEED, TIMER_SPEED};
use clap::Parser;
use display::{DebugDisplay, TextDisplay};
use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;

use crate::keymap::parse_keys;
use crate::run::{describe, run, Outcome, Pacing};

mod keymap;
mod run;

/// Runs a Chip-8 rom in the terminal
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the rom image
    rom: PathBuf,

    /// Instructions executed per second
    #[arg(long, default_value_t = CLOCK_SPEED)]
    hz: u32,

    /// Timer decrements and frames per second
    #[arg(long, default_value_t = TIMER_SPEED)]
    timer_hz: u32,

    /// Stop after this many instructions
    #[arg(long)]
    max_steps: Option<u64>,

    /// Ignore the clock and run as fast as possible
    #[arg(long)]
    fast_forward: bool,

    /// Bytes of addressable memory
    #[arg(long, default_value_t = Config::default().memory_size)]
    memory_size: usize,

    /// Address the rom is loaded at and execution starts from
    #[arg(long, default_value_t = Config::default().program_start, value_parser = parse_address)]
    start: u16,

    /// Skip over unknown opcodes instead of stopping
    #[arg(long)]
    permissive: bool,

    /// Key presses handed to the program, in order, as typed on the mapped keyboard
    #[arg(long, default_value = "")]
    keys: String,

    /// Print frames as a numbered `*`/`_` grid instead of drawing blocks
    #[arg(long)]
    debug_display: bool,

    /// Print the register table when the program stops
    #[arg(long)]
    dump: bool,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,
}

/// Accepts addresses in decimal or `0x` prefixed hex
fn parse_address(s: &str) -> Result<u16, String> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    }
    .map_err(|e| format!("invalid address '{}': {}", s, e))
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    SimpleLogger::new().with_level(args.log_level).init()?;

    let stdout = io::stdout();
    if args.debug_display {
        start(&args, DebugDisplay::new(stdout.lock()))
    } else {
        start(&args, TextDisplay::new(stdout.lock())?)
    }
}

fn start<D: Display>(args: &Args, display: D) -> Result<(), Box<dyn Error>> {
    let config = Config {
        memory_size: args.memory_size,
        program_start: args.start,
        strict: !args.permissive,
    };
    let keypad = ScriptedKeypad::with_presses(&parse_keys(&args.keys)?);
    let mut chip8 = Chip8::new(config, display, keypad)?;

    // Load ROM
    let mut reader = BufReader::new(File::open(&args.rom)?);
    let size = chip8.load_program(&mut reader)?;
    info!("loaded {} ({} bytes)", args.rom.display(), size);

    let pacing = Pacing {
        clock_speed: args.hz,
        timer_speed: args.timer_hz,
        max_steps: args.max_steps,
        fast_forward: args.fast_forward,
    };
    describe(&pacing);

    let result = run(&mut chip8, &pacing);
    if args.dump {
        println!("\r\n{}", chip8.state());
    }
    match result {
        Ok(Outcome::Halted { steps }) => info!("halted after {} steps", steps),
        Ok(Outcome::StepLimit { steps }) => info!("stopped after {} steps", steps),
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("0x200"), Ok(0x200));
        assert_eq!(parse_address("512"), Ok(512));
        assert!(parse_address("0xZZ").is_err());
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["chip8", "game.ch8"]).unwrap();
        assert_eq!(args.hz, CLOCK_SPEED);
        assert_eq!(args.start, 0x200);
        assert_eq!(args.memory_size, 4096);
        assert!(args.keys.is_empty());
        assert_eq!(args.log_level, LevelFilter::Warn);
    }

    #[test]
    fn test_args_keys_and_start() {
        let args =
            Args::try_parse_from(["chip8", "game.ch8", "--keys", "qw", "--start", "0x600"]).unwrap();
        assert_eq!(parse_keys(&args.keys).unwrap(), vec![0x4, 0x5]);
        assert_eq!(args.start, 0x600);
    }
}
