//! The `run` and `disasm` commands.

use std::fs;
use std::io::Write;
use std::path::Path;

use chip8_core::{
    disassemble_program, disassemble_window, drive, CoreState, CountedTicks, FixedRateClock,
    Peripherals, RandomSource, RunOutcome, RunState, SeededRandom, StepOutcome, TickSource,
};

use crate::cli::{DisasmArgs, RunArgs};
use crate::host::{LogTrace, ScriptedKeys, TerminalDisplay};
use crate::RunError;

/// Rows shown on each side of a faulting instruction.
const FAULT_CONTEXT_ROWS: usize = 3;

/// Result of a completed `run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks driven and the last step outcome.
    pub outcome: RunOutcome,
    /// Run state when the run stopped.
    pub run_state: RunState,
    /// Frames handed to the display.
    pub frames: u64,
}

impl RunSummary {
    /// One-line description of how the run ended.
    #[must_use]
    pub fn status_line(&self) -> String {
        let state = match self.run_state {
            RunState::Running => "running".to_string(),
            RunState::AwaitingKey { register } => format!("waiting for key into {register:?}"),
            RunState::Halted => "halted".to_string(),
            RunState::Faulted(cause) => format!("faulted: {cause}"),
        };
        format!(
            "{state} after {} ticks, {} frames",
            self.outcome.steps, self.frames
        )
    }
}

fn read_rom(path: &Path) -> Result<Vec<u8>, RunError> {
    fs::read(path).map_err(|source| RunError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads `args.rom`, drives it, and writes the final screen and a status line
/// to `out`.
///
/// # Errors
///
/// Returns [`RunError::Read`] or [`RunError::Load`] when the program cannot be
/// loaded, [`RunError::Faulted`] when execution ends on a fault, and
/// [`RunError::Output`] when writing to `out` fails.
pub fn run_program<W: Write>(args: &RunArgs, out: W) -> Result<RunSummary, RunError> {
    let image = read_rom(&args.rom)?;
    let config = args.core_config();
    let mut state = CoreState::with_config(&config);
    let loaded = state
        .load_program(&image)
        .map_err(|source| RunError::Load {
            path: args.rom.clone(),
            source,
        })?;
    log::info!("loaded {loaded} bytes from {}", args.rom.display());

    let mut display = TerminalDisplay::new(out, args.live);
    let mut keys = ScriptedKeys::new(&args.held, &args.keys);
    let mut random: Box<dyn RandomSource> = match args.seed {
        Some(seed) => Box::new(SeededRandom::seeded(seed)),
        None => Box::new(SeededRandom::from_entropy()),
    };
    let mut trace = LogTrace;
    let mut ticks = tick_source(args);

    let outcome = {
        let mut io = Peripherals::new(&mut display, &mut keys, &mut *random);
        if config.tracing_enabled {
            io = io.with_trace(&mut trace);
        }
        drive(&mut state, &mut io, &config, &mut *ticks)
    };

    if keys.pending() > 0 {
        log::warn!("{} scripted key presses were never read", keys.pending());
    }

    let summary = RunSummary {
        outcome,
        run_state: state.run_state,
        frames: display.frames(),
    };

    if let Some(StepOutcome::Fault { cause }) = outcome.final_step {
        let pc = state.registers.pc();
        let listing = disassemble_window(
            pc,
            FAULT_CONTEXT_ROWS,
            FAULT_CONTEXT_ROWS,
            state.memory.as_slice(),
        )
        .iter()
        .map(|row| {
            let marker = if row.addr == pc { "=>" } else { "  " };
            format!("{marker} {row}")
        })
        .collect::<Vec<_>>()
        .join("\n");
        return Err(RunError::Faulted { cause, pc, listing });
    }

    let mut out = display.finish()?;
    writeln!(out, "{}", summary.status_line())?;
    Ok(summary)
}

fn tick_source(args: &RunArgs) -> Box<dyn TickSource> {
    if args.hz == 0 {
        return Box::new(CountedTicks(args.ticks.unwrap_or(u64::MAX)));
    }
    let clock = FixedRateClock::new(args.hz);
    match args.ticks {
        Some(limit) => Box::new(clock.with_limit(limit)),
        None => Box::new(clock),
    }
}

/// Writes the disassembly listing of `args.rom` to `out`, one row per line.
///
/// # Errors
///
/// Returns [`RunError::Read`] when the file cannot be read and
/// [`RunError::Output`] when writing fails.
pub fn disassemble_file<W: Write>(args: &DisasmArgs, mut out: W) -> Result<usize, RunError> {
    let image = read_rom(&args.rom)?;
    let rows = disassemble_program(&image, args.origin);
    for row in &rows {
        writeln!(out, "{row}")?;
    }
    out.flush()?;
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;

    use super::{disassemble_file, run_program};
    use crate::cli::{Cli, Command};
    use crate::RunError;
    use chip8_core::{FaultCode, RunState};

    fn run_args(rom: &std::path::Path, extra: &[&str]) -> crate::cli::RunArgs {
        let mut argv = vec!["chip8-run", "run", rom.to_str().expect("utf8 path")];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).expect("valid args").command {
            Command::Run(args) => args,
            Command::Disasm(_) => panic!("expected run"),
        }
    }

    #[test]
    fn unpaced_run_stops_after_tick_limit() {
        let dir = tempfile::tempdir().expect("tempdir");
        let rom = dir.path().join("spin.ch8");
        fs::write(&rom, [0x12, 0x00]).expect("write rom");

        let mut out = Vec::new();
        let summary =
            run_program(&run_args(&rom, &["--hz", "0", "--ticks", "7"]), &mut out).expect("runs");

        assert_eq!(summary.outcome.steps, 7);
        assert_eq!(summary.run_state, RunState::Running);
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.ends_with("running after 7 ticks, 0 frames\n"));
    }

    #[test]
    fn fault_reports_listing_around_pc() {
        let dir = tempfile::tempdir().expect("tempdir");
        let rom = dir.path().join("ret.ch8");
        fs::write(&rom, [0x60, 0x01, 0x00, 0xEE]).expect("write rom");

        let error = run_program(&run_args(&rom, &["--hz", "0"]), Vec::new())
            .expect_err("underflow faults");

        let (cause, pc, listing) = match error {
            RunError::Faulted { cause, pc, listing } => (cause, pc, listing),
            other => panic!("expected fault, got {other:?}"),
        };
        assert_eq!(cause, FaultCode::StackUnderflow);
        assert_eq!(pc, 0x202);
        assert!(listing.contains("=> [0x0202] RTN"));
        assert!(listing.contains("   [0x0200] SET V0, 0x01"));
    }

    #[test]
    fn oversized_rom_is_a_load_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let rom = dir.path().join("big.ch8");
        fs::write(&rom, vec![0_u8; 4096]).expect("write rom");

        let error = run_program(&run_args(&rom, &["--hz", "0"]), Vec::new())
            .expect_err("too large");
        assert!(matches!(
            error,
            RunError::Load {
                source: FaultCode::MalformedLoad,
                ..
            }
        ));
    }

    #[test]
    fn disassembly_lists_every_word() {
        let dir = tempfile::tempdir().expect("tempdir");
        let rom = dir.path().join("two.ch8");
        fs::write(&rom, [0x00, 0xE0, 0x12, 0x00]).expect("write rom");
        let args = match Cli::try_parse_from(["chip8-run", "disasm", rom.to_str().expect("utf8")])
            .expect("valid args")
            .command
        {
            Command::Disasm(args) => args,
            Command::Run(_) => panic!("expected disasm"),
        };

        let mut out = Vec::new();
        assert_eq!(disassemble_file(&args, &mut out).expect("lists"), 2);
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "[0x0200] CLS\n[0x0202] JMP 0x200\n"
        );
    }
}
