use std::time::{Duration, Instant};

use chip8_vm::{Chip8, Display, Keypad, RandomSource, Result};
use log::{debug, info};

/// How fast to drive the virtual machine
#[derive(Clone, Copy, Debug)]
pub struct Pacing {
    /// Instructions per second
    pub clock_speed: u32,
    /// Timer decrements (and frames rendered) per second
    pub timer_speed: u32,
    /// Stop after this many instructions
    pub max_steps: Option<u64>,
    /// Whether or not the clock speed should be respected
    pub fast_forward: bool,
}

/// Why the run loop stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The program jumped to itself, which is how Chip-8 programs end
    Halted { steps: u64 },
    /// `max_steps` instructions were executed
    StepLimit { steps: u64 },
}

/// Drives `chip8` until it halts, hits the step limit or fails
///
/// Steps at `clock_speed`; counts the timers down and renders at `timer_speed`.
pub fn run<D, K, R>(chip8: &mut Chip8<D, K, R>, pacing: &Pacing) -> Result<Outcome>
where
    D: Display,
    K: Keypad,
    R: RandomSource,
{
    let cycle_time = Duration::from_secs(1) / pacing.clock_speed.max(1);
    let frame_time = Duration::from_secs(1) / pacing.timer_speed.max(1);
    let cycles_per_frame = u64::from((pacing.clock_speed / pacing.timer_speed.max(1)).max(1));

    let mut steps: u64 = 0;
    let mut last_cycle = Instant::now();
    let mut last_frame = last_cycle;

    loop {
        if pacing.max_steps.map_or(false, |max| steps >= max) {
            chip8.render()?;
            return Ok(Outcome::StepLimit { steps });
        }

        let pc = chip8.state().pc;
        chip8.step()?;
        steps += 1;
        if chip8.state().pc == pc {
            info!("program halted at {:#05X} after {} steps", pc, steps);
            chip8.render()?;
            return Ok(Outcome::Halted { steps });
        }

        // Fast forwarding ties the timers to the instruction count instead of the clock
        let frame_due = if pacing.fast_forward {
            steps % cycles_per_frame == 0
        } else {
            last_frame.elapsed() >= frame_time
        };
        if frame_due {
            chip8.decrement_timers();
            chip8.render()?;
            last_frame = Instant::now();
        }

        if !pacing.fast_forward {
            let elapsed = last_cycle.elapsed();
            if let Some(remaining) = cycle_time.checked_sub(elapsed) {
                std::thread::sleep(remaining);
            }
            last_cycle = Instant::now();
        }
    }
}

/// Logs the pacing a run will use
pub fn describe(pacing: &Pacing) {
    debug!(
        "running at {}Hz with timers at {}Hz{}",
        pacing.clock_speed,
        pacing.timer_speed,
        if pacing.fast_forward { " (fast forward)" } else { "" }
    );
}
