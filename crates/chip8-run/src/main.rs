//! CLI entry point for the chip8-run binary.

use std::io;

use anyhow::Context as _;
use chip8_core as _;
use chip8_run::{disassemble_file, run_program, Cli, Command};
use clap::Parser as _;
use env_logger::Env;
use log as _;
#[cfg(test)]
use tempfile as _;
use thiserror as _;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = match &cli.command {
        Command::Run(args) if args.trace => "trace",
        _ => "warn",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    let stdout = io::stdout();
    match cli.command {
        Command::Run(args) => {
            run_program(&args, stdout.lock())
                .with_context(|| format!("running {}", args.rom.display()))?;
        }
        Command::Disasm(args) => {
            disassemble_file(&args, stdout.lock())
                .with_context(|| format!("disassembling {}", args.rom.display()))?;
        }
    }

    Ok(())
}
