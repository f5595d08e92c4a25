//! Machine state primitives owned by the execution engine.

/// Register file types and storage model.
pub mod registers;
/// Engine run-state machine.
pub mod run_state;
/// Bounded call stack.
pub mod stack;
/// Delay and sound countdown timers.
pub mod timers;

pub use registers::{Register, Registers, REGISTER_COUNT};
pub use run_state::RunState;
pub use stack::{CallStack, STACK_DEPTH_CANONICAL, STACK_DEPTH_EXTENDED};
pub use timers::Timers;
