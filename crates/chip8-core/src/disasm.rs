//! Instruction disassembly.
//!
//! A read-only consumer of the decoder used for diagnostics and listings.
//! The engine never calls into this module.

use std::fmt;

use crate::{Decoder, Instruction, Register, WORD_ACCESS_BYTES};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single disassembled instruction row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisassemblyRow {
    /// Address of the first byte.
    pub addr: u16,
    /// Raw big-endian word.
    pub word: u16,
    /// Mnemonic (e.g. `"JMP"`, `"SET"`).
    pub mnemonic: String,
    /// Formatted operands (e.g. `"V10, 0x0F"`), empty when there are none.
    pub operands: String,
    /// Whether the word is outside the instruction table.
    pub is_unknown: bool,
}

impl fmt::Display for DisassemblyRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:#06X}] {}", self.addr, self.mnemonic)?;
        if !self.operands.is_empty() {
            write!(f, " {}", self.operands)?;
        }
        Ok(())
    }
}

/// Disassembles one word located at `addr`.
#[must_use]
pub fn disassemble_word(addr: u16, word: u16) -> DisassemblyRow {
    let instruction = Decoder::decode(word);
    let (mnemonic, operands) = format_instruction(instruction);
    DisassemblyRow {
        addr,
        word,
        mnemonic: mnemonic.to_string(),
        operands,
        is_unknown: instruction.is_unknown(),
    }
}

/// Disassembles the word at `pc`, or `None` when it runs past `memory`.
#[must_use]
pub fn disassemble_at(pc: u16, memory: &[u8]) -> Option<DisassemblyRow> {
    let hi = *memory.get(usize::from(pc))?;
    let lo = *memory.get(usize::from(pc) + 1)?;
    Some(disassemble_word(pc, u16::from_be_bytes([hi, lo])))
}

/// Disassembles a program image as it would sit in memory at `origin`.
///
/// Every 2-byte word becomes one row. A trailing odd byte is shown as an
/// unknown word padded with a zero low byte.
#[must_use]
pub fn disassemble_program(image: &[u8], origin: u16) -> Vec<DisassemblyRow> {
    let mut addr = origin;
    image
        .chunks(usize::from(WORD_ACCESS_BYTES))
        .map(|chunk| {
            let row = match *chunk {
                [hi, lo] => disassemble_word(addr, u16::from_be_bytes([hi, lo])),
                [hi] => DisassemblyRow {
                    addr,
                    word: u16::from(hi) << 8,
                    mnemonic: ".byte".to_string(),
                    operands: format!("{hi:#04X}"),
                    is_unknown: true,
                },
                _ => unreachable!("chunks of two yield one or two bytes"),
            };
            addr = addr.wrapping_add(WORD_ACCESS_BYTES);
            row
        })
        .collect()
}

/// Disassembles `before` rows ahead of `center_pc`, the row at `center_pc`,
/// and `after` rows past it.
///
/// Rows that would fall outside `memory` are omitted, so windows near either
/// end come back short.
#[must_use]
pub fn disassemble_window(
    center_pc: u16,
    before: usize,
    after: usize,
    memory: &[u8],
) -> Vec<DisassemblyRow> {
    let step = usize::from(WORD_ACCESS_BYTES);
    let center = usize::from(center_pc);
    let first = center.saturating_sub(before.saturating_mul(step));
    // Keep the center's alignment when clamped at address zero.
    let first = first + (center - first) % step;
    let last = center
        .saturating_add(after.saturating_mul(step))
        .min(memory.len());

    (first..=last)
        .step_by(step)
        .filter_map(|addr| u16::try_from(addr).ok())
        .filter_map(|addr| disassemble_at(addr, memory))
        .collect()
}

fn reg(register: Register) -> String {
    format!("V{}", register.index())
}

fn pair(x: Register, y: Register) -> String {
    format!("{}, {}", reg(x), reg(y))
}

fn reg_byte(x: Register, byte: u8) -> String {
    format!("{}, {byte:#04X}", reg(x))
}

fn address(addr: u16) -> String {
    format!("{addr:#05X}")
}

/// Mnemonic and operand text for a decoded instruction.
#[must_use]
pub fn format_instruction(instruction: Instruction) -> (&'static str, String) {
    match instruction {
        Instruction::Sys { addr } => ("RCA", address(addr)),
        Instruction::ClearScreen => ("CLS", String::new()),
        Instruction::Return => ("RTN", String::new()),
        Instruction::Jump { addr } => ("JMP", address(addr)),
        Instruction::Call { addr } => ("SBR", address(addr)),
        Instruction::SkipEqImm { x, byte } => ("JEQ", reg_byte(x, byte)),
        Instruction::SkipNeImm { x, byte } => ("JNE", reg_byte(x, byte)),
        Instruction::SkipEqReg { x, y } => ("JEQ", pair(x, y)),
        Instruction::SkipNeReg { x, y } => ("JNE", pair(x, y)),
        Instruction::LoadImm { x, byte } => ("SET", reg_byte(x, byte)),
        Instruction::AddImm { x, byte } => ("ADD", reg_byte(x, byte)),
        Instruction::Move { x, y } => ("SET", pair(x, y)),
        Instruction::Or { x, y } => ("OR", pair(x, y)),
        Instruction::And { x, y } => ("AND", pair(x, y)),
        Instruction::Xor { x, y } => ("XOR", pair(x, y)),
        Instruction::AddReg { x, y } => ("ADD", pair(x, y)),
        Instruction::SubReg { x, y } => ("SUB", pair(x, y)),
        Instruction::ShiftRight { x, y } => ("BSR", pair(x, y)),
        Instruction::SubNeg { x, y } => ("SUB", pair(y, x)),
        Instruction::ShiftLeft { x, y } => ("BSL", pair(x, y)),
        Instruction::LoadIndex { addr } => ("ADR", address(addr)),
        Instruction::JumpOffset { addr } => ("JMA", address(addr)),
        Instruction::Random { x, mask } => ("RND", reg_byte(x, mask)),
        Instruction::Draw { x, y, rows } => ("DRW", format!("{}, {rows}", pair(x, y))),
        Instruction::SkipKeyPressed { x } => ("JKP", reg(x)),
        Instruction::SkipKeyNotPressed { x } => ("JKN", reg(x)),
        Instruction::LoadDelay { x } => ("SET", format!("{}, DT", reg(x))),
        Instruction::WaitKey { x } => ("WKP", reg(x)),
        Instruction::SetDelay { x } => ("SET", format!("DT, {}", reg(x))),
        Instruction::SetSound { x } => ("SET", format!("ST, {}", reg(x))),
        Instruction::AddIndex { x } => ("ADD", format!("I, {}", reg(x))),
        Instruction::LoadGlyph { x } => ("FNT", reg(x)),
        Instruction::StoreBcd { x } => ("BCD", reg(x)),
        Instruction::StoreRegisters { x } => ("DMP", reg(x)),
        Instruction::LoadRegisters { x } => ("LOD", reg(x)),
        Instruction::Unknown(word) => (".word", format!("{word:#06X}")),
    }
}
