//! Host-facing contracts for embedding the interpreter core.
//!
//! The engine owns all machine state in [`CoreState`]. Everything outside the
//! machine (display, keypad, randomness, trace capture) is reached through
//! the collaborator traits bundled in [`Peripherals`] and is called
//! synchronously from inside a step.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::{
    CallStack, Display, FaultCode, Framebuffer, Instruction, Memory, Register, Registers,
    RunState, SpriteEdge, Timers, MEMORY_BYTES, PROGRAM_ORIGIN, STACK_DEPTH_CANONICAL,
};

/// Largest program image accepted at the canonical origin.
pub const MAX_PROGRAM_BYTES: usize = MEMORY_BYTES - PROGRAM_ORIGIN as usize;

/// Number of keys on the hexadecimal keypad.
pub const KEY_COUNT: u8 = 16;

/// Interpreter options, read on every step.
///
/// The fields cover the behaviours where historical interpreters disagree;
/// defaults follow the COSMAC VIP interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CoreConfig {
    /// Call stack capacity in frames; applied to the state's stack each step.
    pub stack_depth: usize,
    /// `FX55`/`FX65` leave `I` pointing past the last register copied.
    pub store_load_increments_index: bool,
    /// Timers keep counting down on ticks spent blocked in `FX0A`.
    pub timers_tick_while_waiting: bool,
    /// Handling of sprite pixels past the display edge.
    pub sprite_edge: SpriteEdge,
    /// Forwards [`TraceEvent`]s to an attached [`TraceSink`].
    pub tracing_enabled: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            stack_depth: STACK_DEPTH_CANONICAL,
            store_load_increments_index: false,
            timers_tick_while_waiting: true,
            sprite_edge: SpriteEdge::Wrap,
            tracing_enabled: false,
        }
    }
}

/// Complete machine state, mutated only by the execution engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreState {
    /// `V0..VF`, `I`, and `PC`.
    pub registers: Registers,
    /// 4 KiB address space holding the glyph table and program image.
    pub memory: Memory,
    /// Return-address stack.
    pub stack: CallStack,
    /// Delay and sound timers.
    pub timers: Timers,
    /// Display contents last handed to the display collaborator.
    pub framebuffer: Framebuffer,
    /// Current execution state.
    pub run_state: RunState,
}

impl Default for CoreState {
    fn default() -> Self {
        Self::with_config(&CoreConfig::default())
    }
}

impl CoreState {
    /// Creates a running core with zeroed memory and the glyph table installed.
    #[must_use]
    pub fn with_config(config: &CoreConfig) -> Self {
        let mut memory = Memory::new();
        memory.install_font();

        Self {
            registers: Registers::default(),
            memory,
            stack: CallStack::with_capacity(config.stack_depth),
            timers: Timers::default(),
            framebuffer: Framebuffer::default(),
            run_state: RunState::Running,
        }
    }

    /// Loads a program image at [`PROGRAM_ORIGIN`].
    ///
    /// Returns the number of bytes copied. An empty image is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::MalformedLoad`] when the image is larger than
    /// [`MAX_PROGRAM_BYTES`]; memory is left untouched in that case.
    pub fn load_program(&mut self, image: &[u8]) -> Result<usize, FaultCode> {
        self.load_image(PROGRAM_ORIGIN, image)
    }

    /// Loads an image at an arbitrary origin, rejecting images that would be
    /// truncated.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::MalformedLoad`] when `image` does not fit between
    /// `origin` and the end of memory.
    pub fn load_image(&mut self, origin: u16, image: &[u8]) -> Result<usize, FaultCode> {
        let available = MEMORY_BYTES.saturating_sub(usize::from(origin));
        if image.len() > available {
            log::warn!(
                "rejecting {} byte image at {origin:#05X}: only {available} bytes available",
                image.len()
            );
            return Err(FaultCode::MalformedLoad);
        }
        let copied = self.memory.load(origin, image);
        log::debug!("loaded {copied} bytes at {origin:#05X}");
        Ok(copied)
    }

    /// Restores registers, stack, timers, framebuffer, and run state to
    /// power-on values.
    ///
    /// Memory is preserved so a loaded program can be restarted; the glyph
    /// table is rewritten in case the program overwrote it.
    pub fn reset_canonical(&mut self) {
        self.registers = Registers::default();
        self.stack.clear();
        self.timers = Timers::default();
        self.framebuffer.clear();
        self.run_state = RunState::Running;
        self.memory.install_font();
    }
}

/// Hexadecimal keypad.
pub trait Input {
    /// Returns whether `key` (`0..=0xF`) is currently held.
    fn is_pressed(&self, key: u8) -> bool;

    /// Takes the next key-press edge, if one has arrived.
    ///
    /// This is the non-suspending form of "block until a key is pressed": the
    /// engine never sleeps, so a `None` keeps `FX0A` blocked and the query is
    /// repeated on the following tick.
    fn wait_for_key(&mut self) -> Option<u8>;
}

/// Keypad with no keys ever pressed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl Input for NoInput {
    fn is_pressed(&self, _key: u8) -> bool {
        false
    }

    fn wait_for_key(&mut self) -> Option<u8> {
        None
    }
}

/// Source of bytes for `CXNN`.
pub trait RandomSource {
    /// Returns the next random byte.
    fn next_byte(&mut self) -> u8;
}

/// [`RandomSource`] backed by any [`rand::RngCore`].
#[derive(Debug, Clone)]
pub struct RngSource<R>(R);

impl<R: RngCore> RngSource<R> {
    /// Wraps a generator.
    pub const fn new(rng: R) -> Self {
        Self(rng)
    }
}

/// Reproducible random source for a given seed.
pub type SeededRandom = RngSource<StdRng>;

impl RngSource<StdRng> {
    /// Creates a generator that yields the same sequence for the same seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// Creates a generator seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl<R: RngCore> RandomSource for RngSource<R> {
    fn next_byte(&mut self) -> u8 {
        let mut byte = [0_u8; 1];
        self.0.fill_bytes(&mut byte);
        byte[0]
    }
}

/// Trace events emitted at step boundaries when tracing is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceEvent {
    /// Instruction fetched and about to execute.
    InstructionStart {
        /// Program counter used for the fetch.
        pc: u16,
        /// Raw big-endian instruction word.
        word: u16,
    },
    /// Instruction committed.
    InstructionRetired {
        /// Program counter of the retired instruction.
        pc: u16,
        /// Program counter after commit.
        next_pc: u16,
    },
    /// Framebuffer handed to the display collaborator.
    DrawRequested {
        /// Program counter of the drawing instruction.
        pc: u16,
    },
    /// `FX0A` found no key press and blocked.
    KeyAwaited {
        /// Register that will receive the key.
        register: Register,
    },
    /// A blocked `FX0A` received its key.
    KeyReceived {
        /// Register written.
        register: Register,
        /// Key value stored.
        key: u8,
    },
    /// A fault was latched.
    FaultRaised {
        /// Latched fault.
        cause: FaultCode,
        /// Program counter of the faulting instruction.
        pc: u16,
    },
    /// The program counter left the addressable region.
    Halted {
        /// Program counter that could not be fetched.
        pc: u16,
    },
}

/// Receiver for [`TraceEvent`]s.
pub trait TraceSink {
    /// Records an event in execution order.
    fn on_event(&mut self, event: TraceEvent);
}

impl TraceSink for Vec<TraceEvent> {
    fn on_event(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

/// Collaborators reached by a step.
pub struct Peripherals<'a> {
    /// Display surface for `00E0` and `DXYN`.
    pub display: &'a mut dyn Display,
    /// Keypad for `EX9E`, `EXA1`, and `FX0A`.
    pub input: &'a mut dyn Input,
    /// Byte source for `CXNN`.
    pub random: &'a mut dyn RandomSource,
    /// Optional trace receiver.
    pub trace: Option<&'a mut dyn TraceSink>,
}

impl<'a> Peripherals<'a> {
    /// Bundles the three required collaborators with no trace receiver.
    pub fn new(
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        random: &'a mut dyn RandomSource,
    ) -> Self {
        Self {
            display,
            input,
            random,
            trace: None,
        }
    }

    /// Attaches a trace receiver.
    #[must_use]
    pub fn with_trace(mut self, sink: &'a mut dyn TraceSink) -> Self {
        self.trace = Some(sink);
        self
    }

    pub(crate) fn emit(&mut self, config: &CoreConfig, event: TraceEvent) {
        if !config.tracing_enabled {
            return;
        }
        if let Some(sink) = self.trace.as_deref_mut() {
            sink.on_event(event);
        }
    }
}

/// Result of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// One instruction committed.
    Retired {
        /// Address the instruction was fetched from.
        pc: u16,
        /// The committed instruction.
        instruction: Instruction,
    },
    /// `FX0A` is blocked waiting for a key.
    AwaitingKey,
    /// The engine is halted.
    Halted,
    /// A fault is latched.
    Fault {
        /// Latched fault.
        cause: FaultCode,
    },
}

impl StepOutcome {
    /// Returns `true` when the step handed a frame to the display.
    #[must_use]
    pub const fn drew(self) -> bool {
        matches!(
            self,
            Self::Retired {
                instruction: Instruction::ClearScreen | Instruction::Draw { .. },
                ..
            }
        )
    }

    /// Returns `true` for outcomes no further step can change.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Halted | Self::Fault { .. })
    }
}

/// Stop conditions for batched execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunBoundary {
    /// Stop only when halted or faulted.
    Terminal,
    /// Also stop when `FX0A` blocks.
    AwaitingKey,
    /// Also stop after any step that drew a frame.
    Draw,
}

/// Aggregated outcome of a batched run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunOutcome {
    /// Number of steps taken.
    pub steps: u32,
    /// Outcome of the last step, `None` when no step ran.
    pub final_step: Option<StepOutcome>,
}

#[cfg(test)]
mod tests {
    use super::{
        CoreConfig, CoreState, NoInput, RandomSource, SeededRandom, StepOutcome,
        MAX_PROGRAM_BYTES,
    };
    use crate::{
        FaultCode, Input, Instruction, Register, RunState, SpriteEdge, FONT_BASE, FONT_GLYPHS,
        PROGRAM_ORIGIN, STACK_DEPTH_CANONICAL, STACK_DEPTH_EXTENDED,
    };

    #[test]
    fn default_core_config_matches_cosmac_vip() {
        let config = CoreConfig::default();

        assert_eq!(config.stack_depth, STACK_DEPTH_CANONICAL);
        assert!(!config.store_load_increments_index);
        assert!(config.timers_tick_while_waiting);
        assert_eq!(config.sprite_edge, SpriteEdge::Wrap);
        assert!(!config.tracing_enabled);
    }

    #[test]
    fn new_core_has_font_and_starts_at_origin() {
        let state = CoreState::default();
        let base = usize::from(FONT_BASE);
        assert_eq!(
            &state.memory.as_slice()[base..base + FONT_GLYPHS.len()],
            &FONT_GLYPHS
        );
        assert_eq!(state.registers.pc(), PROGRAM_ORIGIN);
        assert_eq!(state.run_state, RunState::Running);
        assert_eq!(state.stack.capacity(), STACK_DEPTH_CANONICAL);
    }

    #[test]
    fn stack_depth_follows_config() {
        let config = CoreConfig {
            stack_depth: STACK_DEPTH_EXTENDED,
            ..CoreConfig::default()
        };
        assert_eq!(
            CoreState::with_config(&config).stack.capacity(),
            STACK_DEPTH_EXTENDED
        );
    }

    #[test]
    fn largest_program_fits_exactly() {
        let mut state = CoreState::default();
        let image = vec![0xAB; MAX_PROGRAM_BYTES];
        assert_eq!(state.load_program(&image), Ok(MAX_PROGRAM_BYTES));
        assert_eq!(state.memory.read8(0xFFF), Ok(0xAB));
    }

    #[test]
    fn oversized_program_is_malformed_and_leaves_memory_untouched() {
        let mut state = CoreState::default();
        let before = state.memory.clone();
        let image = vec![0xAB; MAX_PROGRAM_BYTES + 1];
        assert_eq!(state.load_program(&image), Err(FaultCode::MalformedLoad));
        assert_eq!(state.memory, before);
    }

    #[test]
    fn empty_program_loads_nothing() {
        let mut state = CoreState::default();
        assert_eq!(state.load_program(&[]), Ok(0));
    }

    #[test]
    fn canonical_reset_restores_defaults_and_preserves_program() {
        let mut state = CoreState::default();
        state.load_program(&[0x12, 0x00]).expect("fits");
        state.registers.set_v(Register::V4, 9);
        state.registers.set_pc(0x456);
        state.registers.set_i(0x300);
        state.stack.push(0x202).expect("room");
        state.timers.set_delay(30);
        state.memory.write8(FONT_BASE, 0x00).expect("in range");
        state.run_state = RunState::Faulted(FaultCode::StackOverflow);

        state.reset_canonical();

        assert_eq!(state.registers.pc(), PROGRAM_ORIGIN);
        assert_eq!(state.registers.v(Register::V4), 0);
        assert_eq!(state.registers.i(), 0);
        assert!(state.stack.is_empty());
        assert_eq!(state.timers.delay(), 0);
        assert_eq!(state.run_state, RunState::Running);
        assert_eq!(state.memory.read16(PROGRAM_ORIGIN), Ok(0x1200));
        assert_eq!(state.memory.read8(FONT_BASE), Ok(FONT_GLYPHS[0]));
    }

    #[test]
    fn seeded_random_is_reproducible() {
        let mut a = SeededRandom::seeded(7);
        let mut b = SeededRandom::seeded(7);
        let left: Vec<u8> = (0..32).map(|_| a.next_byte()).collect();
        let right: Vec<u8> = (0..32).map(|_| b.next_byte()).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn no_input_never_reports_keys() {
        let mut input = NoInput;
        assert!((0..16).all(|key| !input.is_pressed(key)));
        assert_eq!(input.wait_for_key(), None);
    }

    #[test]
    fn step_outcome_classifies_draws_and_terminals() {
        let draw = StepOutcome::Retired {
            pc: 0x200,
            instruction: Instruction::ClearScreen,
        };
        let jump = StepOutcome::Retired {
            pc: 0x200,
            instruction: Instruction::Jump { addr: 0x200 },
        };
        assert!(draw.drew());
        assert!(!jump.drew());
        assert!(StepOutcome::Halted.is_terminal());
        assert!(StepOutcome::Fault {
            cause: FaultCode::StackUnderflow
        }
        .is_terminal());
        assert!(!StepOutcome::AwaitingKey.is_terminal());
    }
}
