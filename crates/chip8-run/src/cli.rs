//! Command-line arguments.

use std::path::PathBuf;

use chip8_core::{CoreConfig, SpriteEdge, PROGRAM_ORIGIN, STACK_DEPTH_CANONICAL, TICK_RATE_HZ};
use clap::{Args, Parser, Subcommand};

/// Runs and inspects CHIP-8 programs.
#[derive(Debug, Parser)]
#[command(name = "chip8-run", version, about)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load a program and run it.
    Run(RunArgs),
    /// Print the disassembly of a program file.
    Disasm(DisasmArgs),
}

/// Options for `run`.
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Program image to load at 0x200.
    pub rom: PathBuf,

    /// Stop after this many ticks (runs until halt or fault when omitted).
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Tick rate in Hz; 0 runs unpaced.
    #[arg(long, default_value_t = TICK_RATE_HZ)]
    pub hz: u32,

    /// Seed for the random source (operating-system entropy when omitted).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Key presses delivered to `FX0A`, in order (hex digit, repeatable).
    #[arg(long = "key", value_parser = parse_key)]
    pub keys: Vec<u8>,

    /// Keys reported as held for `EX9E`/`EXA1` (hex digit, repeatable).
    #[arg(long = "hold", value_parser = parse_key)]
    pub held: Vec<u8>,

    /// Call stack capacity in frames.
    #[arg(long, default_value_t = STACK_DEPTH_CANONICAL, value_parser = parse_stack_depth)]
    pub stack_depth: usize,

    /// Leave `I` past the last register after `FX55`/`FX65`.
    #[arg(long)]
    pub increment_index: bool,

    /// Hold the timers while blocked in `FX0A`.
    #[arg(long)]
    pub freeze_timers_on_wait: bool,

    /// Drop sprite pixels past the display edge instead of wrapping them.
    #[arg(long)]
    pub clip_sprites: bool,

    /// Log every trace event at `trace` level.
    #[arg(long)]
    pub trace: bool,

    /// Redraw the screen on every frame instead of only at exit.
    #[arg(long)]
    pub live: bool,
}

impl RunArgs {
    /// Core configuration selected by the flags.
    #[must_use]
    pub fn core_config(&self) -> CoreConfig {
        CoreConfig {
            stack_depth: self.stack_depth,
            store_load_increments_index: self.increment_index,
            timers_tick_while_waiting: !self.freeze_timers_on_wait,
            sprite_edge: if self.clip_sprites {
                SpriteEdge::Clip
            } else {
                SpriteEdge::Wrap
            },
            tracing_enabled: self.trace,
        }
    }
}

/// Options for `disasm`.
#[derive(Debug, Clone, Args)]
pub struct DisasmArgs {
    /// Program image to list.
    pub rom: PathBuf,

    /// Address of the first byte in the listing.
    #[arg(long, default_value_t = PROGRAM_ORIGIN, value_parser = parse_address)]
    pub origin: u16,
}

fn parse_key(raw: &str) -> Result<u8, String> {
    let raw = raw.trim_start_matches("0x");
    match u8::from_str_radix(raw, 16) {
        Ok(key) if key <= 0xF => Ok(key),
        _ => Err(format!("`{raw}` is not a key between 0 and F")),
    }
}

fn parse_stack_depth(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("stack depth must be at least 1".to_string()),
        Ok(depth) => Ok(depth),
        Err(e) => Err(e.to_string()),
    }
}

fn parse_address(raw: &str) -> Result<u16, String> {
    let parsed = raw.strip_prefix("0x").map_or_else(
        || raw.parse::<u16>(),
        |hex| u16::from_str_radix(hex, 16),
    );
    match parsed {
        Ok(addr) if usize::from(addr) < chip8_core::MEMORY_BYTES => Ok(addr),
        Ok(addr) => Err(format!("{addr:#X} is past the end of memory")),
        Err(e) => Err(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_address, parse_key, parse_stack_depth, Cli, Command};
    use chip8_core::{SpriteEdge, STACK_DEPTH_CANONICAL, STACK_DEPTH_EXTENDED, TICK_RATE_HZ};
    use clap::Parser;

    #[test]
    fn run_defaults_match_core_defaults() {
        let cli = Cli::try_parse_from(["chip8-run", "run", "game.ch8"]).expect("valid args");
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };

        assert_eq!(args.hz, TICK_RATE_HZ);
        assert_eq!(args.ticks, None);
        assert_eq!(args.core_config(), chip8_core::CoreConfig::default());
    }

    #[test]
    fn run_flags_map_onto_config() {
        let cli = Cli::try_parse_from([
            "chip8-run",
            "run",
            "game.ch8",
            "--stack-depth",
            "48",
            "--increment-index",
            "--freeze-timers-on-wait",
            "--clip-sprites",
            "--trace",
            "--key",
            "a",
            "--key",
            "0x3",
        ])
        .expect("valid args");
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        let config = args.core_config();

        assert_eq!(config.stack_depth, STACK_DEPTH_EXTENDED);
        assert!(config.store_load_increments_index);
        assert!(!config.timers_tick_while_waiting);
        assert_eq!(config.sprite_edge, SpriteEdge::Clip);
        assert!(config.tracing_enabled);
        assert_eq!(args.keys, [0xA, 0x3]);
    }

    #[test]
    fn key_parser_rejects_out_of_range() {
        assert_eq!(parse_key("F"), Ok(0xF));
        assert!(parse_key("10").is_err());
        assert!(parse_key("z").is_err());
    }

    #[test]
    fn stack_depth_must_be_positive() {
        assert_eq!(parse_stack_depth("16"), Ok(STACK_DEPTH_CANONICAL));
        assert!(parse_stack_depth("0").is_err());
    }

    #[test]
    fn address_accepts_hex_and_decimal() {
        assert_eq!(parse_address("0x300"), Ok(0x300));
        assert_eq!(parse_address("512"), Ok(0x200));
        assert!(parse_address("0x1000").is_err());
    }
}
