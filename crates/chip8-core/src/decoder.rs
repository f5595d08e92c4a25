//! Instruction decoder.
//!
//! Decoding is pure and total: every 16-bit word maps to an [`Instruction`],
//! with unassigned words landing on [`Instruction::Unknown`] so the engine
//! can treat them as no-ops.

use crate::encoding::{classify_opcode, OpcodeEncoding, OpcodeFamily};
use crate::Register;

/// Raw operand fields of an instruction word, extracted without validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperandFields {
    /// Top nibble.
    pub family: OpcodeFamily,
    /// Bits 11..8 as a register index.
    pub x: Register,
    /// Bits 7..4 as a register index.
    pub y: Register,
    /// Low nibble.
    pub n: u8,
    /// Low byte.
    pub nn: u8,
    /// Low 12 bits.
    pub nnn: u16,
}

impl OperandFields {
    /// Splits `word` into its operand fields.
    #[must_use]
    pub const fn from_word(word: u16) -> Self {
        let [hi, lo] = word.to_be_bytes();
        Self {
            family: OpcodeFamily::of_word(word),
            x: Register::from_low_nibble(hi),
            y: Register::from_low_nibble(lo >> 4),
            n: lo & 0x0F,
            nn: lo,
            nnn: word & 0x0FFF,
        }
    }
}

/// Decoded instruction with typed operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(missing_docs)]
pub enum Instruction {
    /// `0NNN`: machine-code routine; ignored.
    Sys { addr: u16 },
    /// `00E0`
    ClearScreen,
    /// `00EE`
    Return,
    /// `1NNN`
    Jump { addr: u16 },
    /// `2NNN`
    Call { addr: u16 },
    /// `3XNN`
    SkipEqImm { x: Register, byte: u8 },
    /// `4XNN`
    SkipNeImm { x: Register, byte: u8 },
    /// `5XY0`
    SkipEqReg { x: Register, y: Register },
    /// `6XNN`
    LoadImm { x: Register, byte: u8 },
    /// `7XNN`
    AddImm { x: Register, byte: u8 },
    /// `8XY0`
    Move { x: Register, y: Register },
    /// `8XY1`
    Or { x: Register, y: Register },
    /// `8XY2`
    And { x: Register, y: Register },
    /// `8XY3`
    Xor { x: Register, y: Register },
    /// `8XY4`
    AddReg { x: Register, y: Register },
    /// `8XY5`
    SubReg { x: Register, y: Register },
    /// `8XY6`
    ShiftRight { x: Register, y: Register },
    /// `8XY7`
    SubNeg { x: Register, y: Register },
    /// `8XYE`
    ShiftLeft { x: Register, y: Register },
    /// `9XY0`
    SkipNeReg { x: Register, y: Register },
    /// `ANNN`
    LoadIndex { addr: u16 },
    /// `BNNN`
    JumpOffset { addr: u16 },
    /// `CXNN`
    Random { x: Register, mask: u8 },
    /// `DXYN`
    Draw { x: Register, y: Register, rows: u8 },
    /// `EX9E`
    SkipKeyPressed { x: Register },
    /// `EXA1`
    SkipKeyNotPressed { x: Register },
    /// `FX07`
    LoadDelay { x: Register },
    /// `FX0A`
    WaitKey { x: Register },
    /// `FX15`
    SetDelay { x: Register },
    /// `FX18`
    SetSound { x: Register },
    /// `FX1E`
    AddIndex { x: Register },
    /// `FX29`
    LoadGlyph { x: Register },
    /// `FX33`
    StoreBcd { x: Register },
    /// `FX55`
    StoreRegisters { x: Register },
    /// `FX65`
    LoadRegisters { x: Register },
    /// Any word outside the defined table.
    Unknown(u16),
}

impl Instruction {
    /// Returns the table encoding, or `None` for [`Instruction::Unknown`].
    #[must_use]
    pub const fn encoding(self) -> Option<OpcodeEncoding> {
        Some(match self {
            Self::Sys { .. } => OpcodeEncoding::Sys,
            Self::ClearScreen => OpcodeEncoding::ClearScreen,
            Self::Return => OpcodeEncoding::Return,
            Self::Jump { .. } => OpcodeEncoding::Jump,
            Self::Call { .. } => OpcodeEncoding::Call,
            Self::SkipEqImm { .. } => OpcodeEncoding::SkipEqImm,
            Self::SkipNeImm { .. } => OpcodeEncoding::SkipNeImm,
            Self::SkipEqReg { .. } => OpcodeEncoding::SkipEqReg,
            Self::LoadImm { .. } => OpcodeEncoding::LoadImm,
            Self::AddImm { .. } => OpcodeEncoding::AddImm,
            Self::Move { .. } => OpcodeEncoding::Move,
            Self::Or { .. } => OpcodeEncoding::Or,
            Self::And { .. } => OpcodeEncoding::And,
            Self::Xor { .. } => OpcodeEncoding::Xor,
            Self::AddReg { .. } => OpcodeEncoding::AddReg,
            Self::SubReg { .. } => OpcodeEncoding::SubReg,
            Self::ShiftRight { .. } => OpcodeEncoding::ShiftRight,
            Self::SubNeg { .. } => OpcodeEncoding::SubNeg,
            Self::ShiftLeft { .. } => OpcodeEncoding::ShiftLeft,
            Self::SkipNeReg { .. } => OpcodeEncoding::SkipNeReg,
            Self::LoadIndex { .. } => OpcodeEncoding::LoadIndex,
            Self::JumpOffset { .. } => OpcodeEncoding::JumpOffset,
            Self::Random { .. } => OpcodeEncoding::Random,
            Self::Draw { .. } => OpcodeEncoding::Draw,
            Self::SkipKeyPressed { .. } => OpcodeEncoding::SkipKeyPressed,
            Self::SkipKeyNotPressed { .. } => OpcodeEncoding::SkipKeyNotPressed,
            Self::LoadDelay { .. } => OpcodeEncoding::LoadDelay,
            Self::WaitKey { .. } => OpcodeEncoding::WaitKey,
            Self::SetDelay { .. } => OpcodeEncoding::SetDelay,
            Self::SetSound { .. } => OpcodeEncoding::SetSound,
            Self::AddIndex { .. } => OpcodeEncoding::AddIndex,
            Self::LoadGlyph { .. } => OpcodeEncoding::LoadGlyph,
            Self::StoreBcd { .. } => OpcodeEncoding::StoreBcd,
            Self::StoreRegisters { .. } => OpcodeEncoding::StoreRegisters,
            Self::LoadRegisters { .. } => OpcodeEncoding::LoadRegisters,
            Self::Unknown(_) => return None,
        })
    }

    /// Returns `true` for words outside the defined table.
    #[must_use]
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown(_))
    }

    /// Re-encodes this instruction into its 16-bit word.
    #[must_use]
    pub const fn encode(self) -> u16 {
        const fn xy(base: u16, x: Register, y: Register) -> u16 {
            base | (x as u16) << 8 | (y as u16) << 4
        }
        const fn xnn(base: u16, x: Register, byte: u8) -> u16 {
            base | (x as u16) << 8 | byte as u16
        }
        const fn fx(low: u16, x: Register) -> u16 {
            0xF000 | (x as u16) << 8 | low
        }

        match self {
            Self::Sys { addr } => addr & 0x0FFF,
            Self::ClearScreen => 0x00E0,
            Self::Return => 0x00EE,
            Self::Jump { addr } => 0x1000 | (addr & 0x0FFF),
            Self::Call { addr } => 0x2000 | (addr & 0x0FFF),
            Self::SkipEqImm { x, byte } => xnn(0x3000, x, byte),
            Self::SkipNeImm { x, byte } => xnn(0x4000, x, byte),
            Self::SkipEqReg { x, y } => xy(0x5000, x, y),
            Self::LoadImm { x, byte } => xnn(0x6000, x, byte),
            Self::AddImm { x, byte } => xnn(0x7000, x, byte),
            Self::Move { x, y } => xy(0x8000, x, y),
            Self::Or { x, y } => xy(0x8001, x, y),
            Self::And { x, y } => xy(0x8002, x, y),
            Self::Xor { x, y } => xy(0x8003, x, y),
            Self::AddReg { x, y } => xy(0x8004, x, y),
            Self::SubReg { x, y } => xy(0x8005, x, y),
            Self::ShiftRight { x, y } => xy(0x8006, x, y),
            Self::SubNeg { x, y } => xy(0x8007, x, y),
            Self::ShiftLeft { x, y } => xy(0x800E, x, y),
            Self::SkipNeReg { x, y } => xy(0x9000, x, y),
            Self::LoadIndex { addr } => 0xA000 | (addr & 0x0FFF),
            Self::JumpOffset { addr } => 0xB000 | (addr & 0x0FFF),
            Self::Random { x, mask } => xnn(0xC000, x, mask),
            Self::Draw { x, y, rows } => xy(0xD000, x, y) | (rows & 0x0F) as u16,
            Self::SkipKeyPressed { x } => 0xE09E | (x as u16) << 8,
            Self::SkipKeyNotPressed { x } => 0xE0A1 | (x as u16) << 8,
            Self::LoadDelay { x } => fx(0x07, x),
            Self::WaitKey { x } => fx(0x0A, x),
            Self::SetDelay { x } => fx(0x15, x),
            Self::SetSound { x } => fx(0x18, x),
            Self::AddIndex { x } => fx(0x1E, x),
            Self::LoadGlyph { x } => fx(0x29, x),
            Self::StoreBcd { x } => fx(0x33, x),
            Self::StoreRegisters { x } => fx(0x55, x),
            Self::LoadRegisters { x } => fx(0x65, x),
            Self::Unknown(word) => word,
        }
    }
}

/// Stateless instruction decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder;

impl Decoder {
    /// Decodes an instruction word. Total over all 65536 inputs.
    #[must_use]
    pub fn decode(word: u16) -> Instruction {
        let Some(encoding) = classify_opcode(word) else {
            return Instruction::Unknown(word);
        };
        let OperandFields {
            x, y, n, nn, nnn, ..
        } = OperandFields::from_word(word);

        match encoding {
            OpcodeEncoding::Sys => Instruction::Sys { addr: nnn },
            OpcodeEncoding::ClearScreen => Instruction::ClearScreen,
            OpcodeEncoding::Return => Instruction::Return,
            OpcodeEncoding::Jump => Instruction::Jump { addr: nnn },
            OpcodeEncoding::Call => Instruction::Call { addr: nnn },
            OpcodeEncoding::SkipEqImm => Instruction::SkipEqImm { x, byte: nn },
            OpcodeEncoding::SkipNeImm => Instruction::SkipNeImm { x, byte: nn },
            OpcodeEncoding::SkipEqReg => Instruction::SkipEqReg { x, y },
            OpcodeEncoding::LoadImm => Instruction::LoadImm { x, byte: nn },
            OpcodeEncoding::AddImm => Instruction::AddImm { x, byte: nn },
            OpcodeEncoding::Move => Instruction::Move { x, y },
            OpcodeEncoding::Or => Instruction::Or { x, y },
            OpcodeEncoding::And => Instruction::And { x, y },
            OpcodeEncoding::Xor => Instruction::Xor { x, y },
            OpcodeEncoding::AddReg => Instruction::AddReg { x, y },
            OpcodeEncoding::SubReg => Instruction::SubReg { x, y },
            OpcodeEncoding::ShiftRight => Instruction::ShiftRight { x, y },
            OpcodeEncoding::SubNeg => Instruction::SubNeg { x, y },
            OpcodeEncoding::ShiftLeft => Instruction::ShiftLeft { x, y },
            OpcodeEncoding::SkipNeReg => Instruction::SkipNeReg { x, y },
            OpcodeEncoding::LoadIndex => Instruction::LoadIndex { addr: nnn },
            OpcodeEncoding::JumpOffset => Instruction::JumpOffset { addr: nnn },
            OpcodeEncoding::Random => Instruction::Random { x, mask: nn },
            OpcodeEncoding::Draw => Instruction::Draw { x, y, rows: n },
            OpcodeEncoding::SkipKeyPressed => Instruction::SkipKeyPressed { x },
            OpcodeEncoding::SkipKeyNotPressed => Instruction::SkipKeyNotPressed { x },
            OpcodeEncoding::LoadDelay => Instruction::LoadDelay { x },
            OpcodeEncoding::WaitKey => Instruction::WaitKey { x },
            OpcodeEncoding::SetDelay => Instruction::SetDelay { x },
            OpcodeEncoding::SetSound => Instruction::SetSound { x },
            OpcodeEncoding::AddIndex => Instruction::AddIndex { x },
            OpcodeEncoding::LoadGlyph => Instruction::LoadGlyph { x },
            OpcodeEncoding::StoreBcd => Instruction::StoreBcd { x },
            OpcodeEncoding::StoreRegisters => Instruction::StoreRegisters { x },
            OpcodeEncoding::LoadRegisters => Instruction::LoadRegisters { x },
        }
    }
}
