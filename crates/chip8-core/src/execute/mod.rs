//! Instruction execution pipeline.
//!
//! One step runs in a fixed order:
//! 1. Decrement the delay and sound timers
//! 2. Fetch the big-endian word at `PC` (halting when it is out of range)
//! 3. Decode
//! 4. Compute every side effect into an [`ExecuteState`] without touching the machine
//! 5. Commit stack and memory effects, then registers, `I`, timers, framebuffer, and `PC`
//! 6. Hand a changed framebuffer to the display
//!
//! Faults are precise: a faulting instruction commits nothing and the fault
//! is latched into [`RunState::Faulted`].

mod alu;

pub use alu::{apply as apply_alu, AluOp, AluResult};

use crate::{
    glyph_address, validate_read, CoreConfig, CoreState, Decoder, DisplayEncoding, FaultCode,
    Framebuffer, Input, Instruction, Peripherals, Register, RunBoundary, RunOutcome, RunState,
    StepOutcome, TraceEvent, KEY_COUNT,
};

/// Pending stack effect of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StackOp {
    /// Stack untouched.
    #[default]
    None,
    /// Push a return address.
    Push(u16),
    /// Pop the top frame.
    Pop,
}

/// Side effects accumulated while executing one instruction.
///
/// Nothing here is visible to the machine until [`commit_execution`] runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecuteState {
    /// New program counter. Every executed instruction sets this exactly once.
    pub next_pc: Option<u16>,
    /// Register writes in commit order; `VF` results come last.
    pub register_writes: Vec<(Register, u8)>,
    /// New value of `I`.
    pub index: Option<u16>,
    /// Byte writes, validated in range before being recorded.
    pub memory_writes: Vec<(u16, u8)>,
    /// Stack effect.
    pub stack_op: StackOp,
    /// New delay timer value.
    pub delay_timer: Option<u8>,
    /// New sound timer value.
    pub sound_timer: Option<u8>,
    /// Replacement framebuffer for `00E0` and `DXYN`.
    pub framebuffer: Option<Framebuffer>,
    /// Register to fill once `FX0A` receives a key.
    pub await_key: Option<Register>,
}

impl ExecuteState {
    fn write(&mut self, reg: Register, value: u8) {
        self.register_writes.push((reg, value));
    }

    fn jump(&mut self, target: u16) {
        debug_assert!(self.next_pc.is_none(), "program counter assigned twice");
        self.next_pc = Some(target);
    }
}

/// Computes the side effects of `instruction` against the current state.
///
/// Collaborators are queried here (random bytes, key state), but the machine
/// itself is only read.
///
/// # Errors
///
/// Returns [`FaultCode::StackOverflow`], [`FaultCode::StackUnderflow`], or
/// [`FaultCode::AddressOutOfRange`] when the instruction cannot complete.
#[allow(clippy::too_many_lines)]
pub fn execute_instruction(
    instruction: Instruction,
    state: &CoreState,
    io: &mut Peripherals<'_>,
    config: &CoreConfig,
) -> Result<ExecuteState, FaultCode> {
    let regs = &state.registers;
    let pc = regs.pc();
    let next = pc.wrapping_add(2);
    let skip = pc.wrapping_add(4);
    let skip_if = |taken: bool| if taken { skip } else { next };

    let mut exec = ExecuteState::default();

    match instruction {
        Instruction::Sys { .. } | Instruction::Unknown(_) => exec.jump(next),
        Instruction::ClearScreen => {
            exec.framebuffer = Some(Framebuffer::default());
            exec.jump(next);
        }
        Instruction::Return => {
            let target = state.stack.peek().ok_or(FaultCode::StackUnderflow)?;
            exec.stack_op = StackOp::Pop;
            exec.jump(target);
        }
        Instruction::Jump { addr } => exec.jump(addr),
        Instruction::Call { addr } => {
            if state.stack.depth() >= config.stack_depth {
                return Err(FaultCode::StackOverflow);
            }
            exec.stack_op = StackOp::Push(next);
            exec.jump(addr);
        }
        Instruction::SkipEqImm { x, byte } => exec.jump(skip_if(regs.v(x) == byte)),
        Instruction::SkipNeImm { x, byte } => exec.jump(skip_if(regs.v(x) != byte)),
        Instruction::SkipEqReg { x, y } => exec.jump(skip_if(regs.v(x) == regs.v(y))),
        Instruction::SkipNeReg { x, y } => exec.jump(skip_if(regs.v(x) != regs.v(y))),
        Instruction::LoadImm { x, byte } => {
            exec.write(x, byte);
            exec.jump(next);
        }
        Instruction::AddImm { x, byte } => {
            exec.write(x, regs.v(x).wrapping_add(byte));
            exec.jump(next);
        }
        Instruction::Move { x, y }
        | Instruction::Or { x, y }
        | Instruction::And { x, y }
        | Instruction::Xor { x, y }
        | Instruction::AddReg { x, y }
        | Instruction::SubReg { x, y }
        | Instruction::ShiftRight { x, y }
        | Instruction::SubNeg { x, y }
        | Instruction::ShiftLeft { x, y } => {
            let Some(op) = AluOp::of(instruction) else {
                unreachable!("every 8XY_ variant maps to an ALU op");
            };
            let AluResult { value, flag } = alu::apply(op, regs.v(x), regs.v(y));
            exec.write(x, value);
            if let Some(flag) = flag {
                exec.write(Register::FLAG, flag);
            }
            exec.jump(next);
        }
        Instruction::LoadIndex { addr } => {
            exec.index = Some(addr);
            exec.jump(next);
        }
        Instruction::JumpOffset { addr } => {
            exec.jump(addr.wrapping_add(u16::from(regs.v(Register::V0))));
        }
        Instruction::Random { x, mask } => {
            exec.write(x, io.random.next_byte() & mask);
            exec.jump(next);
        }
        Instruction::Draw { x, y, rows } => {
            let sprite = state.memory.read_range(regs.i(), u16::from(rows))?;
            let mut framebuffer = state.framebuffer.clone();
            let collision =
                framebuffer.draw_sprite(regs.v(x), regs.v(y), sprite, config.sprite_edge);
            exec.write(Register::FLAG, u8::from(collision));
            exec.framebuffer = Some(framebuffer);
            exec.jump(next);
        }
        Instruction::SkipKeyPressed { x } => {
            exec.jump(skip_if(key_held(&*io.input, regs.v(x))));
        }
        Instruction::SkipKeyNotPressed { x } => {
            exec.jump(skip_if(!key_held(&*io.input, regs.v(x))));
        }
        Instruction::LoadDelay { x } => {
            exec.write(x, state.timers.delay());
            exec.jump(next);
        }
        Instruction::WaitKey { x } => match io.input.wait_for_key() {
            Some(key) => {
                exec.write(x, key & 0x0F);
                exec.jump(next);
            }
            None => {
                exec.await_key = Some(x);
                exec.jump(pc);
            }
        },
        Instruction::SetDelay { x } => {
            exec.delay_timer = Some(regs.v(x));
            exec.jump(next);
        }
        Instruction::SetSound { x } => {
            exec.sound_timer = Some(regs.v(x));
            exec.jump(next);
        }
        Instruction::AddIndex { x } => {
            exec.index = Some(regs.i().wrapping_add(u16::from(regs.v(x))));
            exec.jump(next);
        }
        Instruction::LoadGlyph { x } => {
            exec.index = Some(glyph_address(regs.v(x)));
            exec.jump(next);
        }
        Instruction::StoreBcd { x } => {
            let i = regs.i();
            validate_read(i, 3)?;
            let value = regs.v(x);
            exec.memory_writes.extend([
                (i, value / 100),
                (i + 1, value / 10 % 10),
                (i + 2, value % 10),
            ]);
            exec.jump(next);
        }
        Instruction::StoreRegisters { x } => {
            let i = regs.i();
            let count = register_window(x);
            validate_read(i, count)?;
            exec.memory_writes
                .extend((i..).zip(x.through()).map(|(addr, reg)| (addr, regs.v(reg))));
            if config.store_load_increments_index {
                exec.index = Some(i + count);
            }
            exec.jump(next);
        }
        Instruction::LoadRegisters { x } => {
            let i = regs.i();
            let count = register_window(x);
            let bytes = state.memory.read_range(i, count)?;
            exec.register_writes.extend(x.through().zip(bytes.iter().copied()));
            if config.store_load_increments_index {
                exec.index = Some(i + count);
            }
            exec.jump(next);
        }
    }

    Ok(exec)
}

/// Number of registers `V0..=x` moved by `FX55`/`FX65`.
fn register_window(x: Register) -> u16 {
    u16::from(x as u8) + 1
}

/// Keys outside the 16-key pad are never held.
fn key_held(input: &dyn Input, value: u8) -> bool {
    value < KEY_COUNT && input.is_pressed(value)
}

/// Applies accumulated side effects to the machine.
///
/// Stack and memory effects go first since they are the only fallible ones;
/// both were checked while executing, so a failure here leaves the rest of
/// the machine untouched.
///
/// # Errors
///
/// Returns the stack or memory fault if a recorded effect no longer applies.
pub fn commit_execution(state: &mut CoreState, exec: &ExecuteState) -> Result<(), FaultCode> {
    match exec.stack_op {
        StackOp::None => {}
        StackOp::Push(addr) => state.stack.push(addr)?,
        StackOp::Pop => {
            state.stack.pop()?;
        }
    }

    for &(addr, value) in &exec.memory_writes {
        state.memory.write8(addr, value)?;
    }

    for &(reg, value) in &exec.register_writes {
        state.registers.set_v(reg, value);
    }

    if let Some(index) = exec.index {
        state.registers.set_i(index);
    }
    if let Some(delay) = exec.delay_timer {
        state.timers.set_delay(delay);
    }
    if let Some(sound) = exec.sound_timer {
        state.timers.set_sound(sound);
    }
    if let Some(framebuffer) = &exec.framebuffer {
        state.framebuffer.clone_from(framebuffer);
    }
    if let Some(pc) = exec.next_pc {
        state.registers.set_pc(pc);
    }

    Ok(())
}

/// Runs one tick: timers, then at most one instruction.
///
/// The call stack capacity is taken from `config` on every step, so a core
/// built with one depth and stepped with another overflows at the depth it is
/// stepped with.
///
/// Halted and faulted cores return their terminal outcome without doing
/// anything. A core blocked in `FX0A` only polls for its key (and, depending
/// on [`CoreConfig::timers_tick_while_waiting`], counts the timers down).
pub fn step_one(
    state: &mut CoreState,
    io: &mut Peripherals<'_>,
    config: &CoreConfig,
) -> StepOutcome {
    match state.run_state {
        RunState::Halted => return StepOutcome::Halted,
        RunState::Faulted(cause) => return StepOutcome::Fault { cause },
        RunState::AwaitingKey { register } => return resume_key_wait(state, io, config, register),
        RunState::Running => {}
    }

    state.stack.set_capacity(config.stack_depth);
    state.timers.tick();

    let pc = state.registers.pc();
    let Ok(word) = state.memory.read16(pc) else {
        log::info!("program counter {pc:#06X} left addressable memory, halting");
        state.run_state = RunState::Halted;
        io.emit(config, TraceEvent::Halted { pc });
        return StepOutcome::Halted;
    };

    io.emit(config, TraceEvent::InstructionStart { pc, word });
    let instruction = Decoder::decode(word);
    log::trace!("{pc:#05X}: {word:04X} {instruction:?}");

    let committed = execute_instruction(instruction, state, io, config)
        .and_then(|exec| commit_execution(state, &exec).map(|()| exec));
    let exec = match committed {
        Ok(exec) => exec,
        Err(cause) => {
            log::warn!("{cause} at {pc:#05X} ({word:04X})");
            state.run_state = RunState::Faulted(cause);
            io.emit(config, TraceEvent::FaultRaised { cause, pc });
            return StepOutcome::Fault { cause };
        }
    };

    if let Some(register) = exec.await_key {
        log::debug!("waiting for key into {register:?}");
        state.run_state = RunState::AwaitingKey { register };
        io.emit(config, TraceEvent::KeyAwaited { register });
        return StepOutcome::AwaitingKey;
    }

    if exec.framebuffer.is_some() {
        io.display
            .draw(&state.framebuffer, DisplayEncoding::MonochromePacked);
        io.emit(config, TraceEvent::DrawRequested { pc });
    }

    io.emit(
        config,
        TraceEvent::InstructionRetired {
            pc,
            next_pc: state.registers.pc(),
        },
    );
    StepOutcome::Retired { pc, instruction }
}

fn resume_key_wait(
    state: &mut CoreState,
    io: &mut Peripherals<'_>,
    config: &CoreConfig,
    register: Register,
) -> StepOutcome {
    if config.timers_tick_while_waiting {
        state.timers.tick();
    }

    let Some(key) = io.input.wait_for_key() else {
        return StepOutcome::AwaitingKey;
    };
    let key = key & 0x0F;
    let pc = state.registers.pc();
    state.registers.set_v(register, key);
    state.registers.set_pc(pc.wrapping_add(2));
    state.run_state = RunState::Running;
    log::debug!("key {key:X} received into {register:?}");
    io.emit(config, TraceEvent::KeyReceived { register, key });
    io.emit(
        config,
        TraceEvent::InstructionRetired {
            pc,
            next_pc: state.registers.pc(),
        },
    );

    StepOutcome::Retired {
        pc,
        instruction: Instruction::WaitKey { x: register },
    }
}

/// Steps until `boundary` is reached or `max_steps` steps have run.
pub fn run_until(
    state: &mut CoreState,
    io: &mut Peripherals<'_>,
    config: &CoreConfig,
    boundary: RunBoundary,
    max_steps: u32,
) -> RunOutcome {
    let mut outcome = RunOutcome {
        steps: 0,
        final_step: None,
    };

    while outcome.steps < max_steps {
        let step = step_one(state, io, config);
        outcome.steps += 1;
        outcome.final_step = Some(step);

        let stop = step.is_terminal()
            || match boundary {
                RunBoundary::Terminal => false,
                RunBoundary::AwaitingKey => step == StepOutcome::AwaitingKey,
                RunBoundary::Draw => step.drew(),
            };
        if stop {
            break;
        }
    }

    outcome
}
