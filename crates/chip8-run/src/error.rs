use std::io;
use std::path::PathBuf;

use chip8_core::FaultCode;
use thiserror::Error;

/// Failures reported by the runner.
#[derive(Debug, Error)]
pub enum RunError {
    /// The program file could not be read.
    #[error("failed to read {path}")]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The program image was rejected by the loader.
    #[error("failed to load {path}")]
    Load {
        /// File that was read.
        path: PathBuf,
        /// Load-time fault.
        #[source]
        source: FaultCode,
    },
    /// Execution stopped on a latched fault.
    #[error("{cause} at {pc:#05X}\n{listing}")]
    Faulted {
        /// Latched fault.
        cause: FaultCode,
        /// Address of the faulting instruction.
        pc: u16,
        /// Disassembly around the faulting instruction.
        listing: String,
    },
    /// Writing output failed.
    #[error("failed to write output")]
    Output(#[from] io::Error),
}
