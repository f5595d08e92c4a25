//! Interpreter core crate for the CHIP-8 virtual machine.

/// Flat 4 KiB memory, region map, bounds checks, and the built-in font.
pub mod memory;
pub use memory::{
    decode_memory_region, glyph_address, new_address_space, validate_fetch, validate_read,
    validate_write, Memory, MemoryRegion, RegionDescriptor, FIXED_MEMORY_REGIONS, FONT_BASE,
    FONT_GLYPHS, GLYPH_BYTES, GLYPH_COUNT, INTERPRETER_END, INTERPRETER_START, MEMORY_BYTES,
    PROGRAM_END, PROGRAM_ORIGIN, PROGRAM_START, WORD_ACCESS_BYTES,
};

/// Architectural state: registers, call stack, timers, and run state.
pub mod state;
pub use state::{
    CallStack, Register, Registers, RunState, Timers, REGISTER_COUNT, STACK_DEPTH_CANONICAL,
    STACK_DEPTH_EXTENDED,
};

/// Monochrome framebuffer and display collaborator.
pub mod display;
pub use display::{
    Display, DisplayEncoding, Framebuffer, HeadlessDisplay, SpriteEdge, DISPLAY_HEIGHT,
    DISPLAY_WIDTH, FRAMEBUFFER_BYTES, ROW_BYTES,
};

/// Public host-facing API contract and integration types.
pub mod api;
pub use api::{
    CoreConfig, CoreState, Input, NoInput, Peripherals, RandomSource, RngSource, RunBoundary,
    RunOutcome, SeededRandom, StepOutcome, TraceEvent, TraceSink, KEY_COUNT, MAX_PROGRAM_BYTES,
};

/// Opcode families and the mask/pattern classification table.
pub mod encoding;
pub use encoding::{classify_opcode, OpcodeEncoding, OpcodeFamily, OPCODE_ENCODING_TABLE};

/// Instruction decode with operand field extraction.
pub mod decoder;
pub use decoder::{Decoder, Instruction, OperandFields};

/// Fault taxonomy for runtime and load-time failures.
pub mod fault;
pub use fault::{FaultClass, FaultCode};

/// Instruction execution pipeline.
pub mod execute;
pub use execute::{
    apply_alu, commit_execution, execute_instruction, run_until, step_one, AluOp, AluResult,
    ExecuteState, StackOp,
};

/// Tick sources and the fixed-rate driving loop.
pub mod tick;
pub use tick::{drive, CountedTicks, FixedRateClock, TickSource, TICK_RATE_HZ};

/// Decoder-backed disassembly for listings and diagnostics.
pub mod disasm;
pub use disasm::{
    disassemble_at, disassemble_program, disassemble_window, disassemble_word,
    format_instruction, DisassemblyRow,
};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
