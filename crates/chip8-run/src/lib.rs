//! Command-line host for the CHIP-8 interpreter core.

use anyhow as _;
use env_logger as _;

/// Command-line argument definitions.
pub mod cli;
/// Runner error type.
pub mod error;
/// Terminal display, scripted keypad, and log-backed trace sink.
pub mod host;
/// The `run` and `disasm` commands.
pub mod session;

pub use cli::{Cli, Command, DisasmArgs, RunArgs};
pub use error::RunError;
pub use host::{render_frame, LogTrace, ScriptedKeys, TerminalDisplay};
pub use session::{disassemble_file, run_program, RunSummary};
