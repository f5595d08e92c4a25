/// Opcode families selected by the top nibble of an instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum OpcodeFamily {
    System = 0x0,
    Jump = 0x1,
    Call = 0x2,
    SkipEqImm = 0x3,
    SkipNeImm = 0x4,
    SkipEqReg = 0x5,
    LoadImm = 0x6,
    AddImm = 0x7,
    Alu = 0x8,
    SkipNeReg = 0x9,
    LoadIndex = 0xA,
    JumpOffset = 0xB,
    Random = 0xC,
    Draw = 0xD,
    Key = 0xE,
    Misc = 0xF,
}

impl OpcodeFamily {
    /// Converts a 4-bit value into its family.
    #[must_use]
    pub const fn from_u4(bits: u8) -> Option<Self> {
        match bits {
            0x0 => Some(Self::System),
            0x1 => Some(Self::Jump),
            0x2 => Some(Self::Call),
            0x3 => Some(Self::SkipEqImm),
            0x4 => Some(Self::SkipNeImm),
            0x5 => Some(Self::SkipEqReg),
            0x6 => Some(Self::LoadImm),
            0x7 => Some(Self::AddImm),
            0x8 => Some(Self::Alu),
            0x9 => Some(Self::SkipNeReg),
            0xA => Some(Self::LoadIndex),
            0xB => Some(Self::JumpOffset),
            0xC => Some(Self::Random),
            0xD => Some(Self::Draw),
            0xE => Some(Self::Key),
            0xF => Some(Self::Misc),
            _ => None,
        }
    }

    /// Family of an instruction word. Total: every word has a family.
    #[must_use]
    pub const fn of_word(word: u16) -> Self {
        match Self::from_u4((word >> 12) as u8) {
            Some(family) => family,
            // A u16 shifted right by 12 always fits in four bits.
            None => Self::Misc,
        }
    }
}

/// The 35 defined instruction encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum OpcodeEncoding {
    /// `0NNN` machine-code routine call, executed as a no-op.
    Sys,
    /// `00E0`
    ClearScreen,
    /// `00EE`
    Return,
    /// `1NNN`
    Jump,
    /// `2NNN`
    Call,
    /// `3XNN`
    SkipEqImm,
    /// `4XNN`
    SkipNeImm,
    /// `5XY0`
    SkipEqReg,
    /// `6XNN`
    LoadImm,
    /// `7XNN`
    AddImm,
    /// `8XY0`
    Move,
    /// `8XY1`
    Or,
    /// `8XY2`
    And,
    /// `8XY3`
    Xor,
    /// `8XY4`
    AddReg,
    /// `8XY5`
    SubReg,
    /// `8XY6`
    ShiftRight,
    /// `8XY7`
    SubNeg,
    /// `8XYE`
    ShiftLeft,
    /// `9XY0`
    SkipNeReg,
    /// `ANNN`
    LoadIndex,
    /// `BNNN`
    JumpOffset,
    /// `CXNN`
    Random,
    /// `DXYN`
    Draw,
    /// `EX9E`
    SkipKeyPressed,
    /// `EXA1`
    SkipKeyNotPressed,
    /// `FX07`
    LoadDelay,
    /// `FX0A`
    WaitKey,
    /// `FX15`
    SetDelay,
    /// `FX18`
    SetSound,
    /// `FX1E`
    AddIndex,
    /// `FX29`
    LoadGlyph,
    /// `FX33`
    StoreBcd,
    /// `FX55`
    StoreRegisters,
    /// `FX65`
    LoadRegisters,
}

/// `(mask, pattern, encoding)` rows; a word matches when `word & mask == pattern`.
///
/// Rows are ordered so the exact `00E0`/`00EE` matches win over `0NNN`.
pub const OPCODE_ENCODING_TABLE: &[(u16, u16, OpcodeEncoding)] = &[
    (0xFFFF, 0x00E0, OpcodeEncoding::ClearScreen),
    (0xFFFF, 0x00EE, OpcodeEncoding::Return),
    (0xF000, 0x0000, OpcodeEncoding::Sys),
    (0xF000, 0x1000, OpcodeEncoding::Jump),
    (0xF000, 0x2000, OpcodeEncoding::Call),
    (0xF000, 0x3000, OpcodeEncoding::SkipEqImm),
    (0xF000, 0x4000, OpcodeEncoding::SkipNeImm),
    (0xF00F, 0x5000, OpcodeEncoding::SkipEqReg),
    (0xF000, 0x6000, OpcodeEncoding::LoadImm),
    (0xF000, 0x7000, OpcodeEncoding::AddImm),
    (0xF00F, 0x8000, OpcodeEncoding::Move),
    (0xF00F, 0x8001, OpcodeEncoding::Or),
    (0xF00F, 0x8002, OpcodeEncoding::And),
    (0xF00F, 0x8003, OpcodeEncoding::Xor),
    (0xF00F, 0x8004, OpcodeEncoding::AddReg),
    (0xF00F, 0x8005, OpcodeEncoding::SubReg),
    (0xF00F, 0x8006, OpcodeEncoding::ShiftRight),
    (0xF00F, 0x8007, OpcodeEncoding::SubNeg),
    (0xF00F, 0x800E, OpcodeEncoding::ShiftLeft),
    (0xF00F, 0x9000, OpcodeEncoding::SkipNeReg),
    (0xF000, 0xA000, OpcodeEncoding::LoadIndex),
    (0xF000, 0xB000, OpcodeEncoding::JumpOffset),
    (0xF000, 0xC000, OpcodeEncoding::Random),
    (0xF000, 0xD000, OpcodeEncoding::Draw),
    (0xF0FF, 0xE09E, OpcodeEncoding::SkipKeyPressed),
    (0xF0FF, 0xE0A1, OpcodeEncoding::SkipKeyNotPressed),
    (0xF0FF, 0xF007, OpcodeEncoding::LoadDelay),
    (0xF0FF, 0xF00A, OpcodeEncoding::WaitKey),
    (0xF0FF, 0xF015, OpcodeEncoding::SetDelay),
    (0xF0FF, 0xF018, OpcodeEncoding::SetSound),
    (0xF0FF, 0xF01E, OpcodeEncoding::AddIndex),
    (0xF0FF, 0xF029, OpcodeEncoding::LoadGlyph),
    (0xF0FF, 0xF033, OpcodeEncoding::StoreBcd),
    (0xF0FF, 0xF055, OpcodeEncoding::StoreRegisters),
    (0xF0FF, 0xF065, OpcodeEncoding::LoadRegisters),
];

/// Looks up the encoding of an instruction word, `None` for unassigned words.
#[must_use]
pub fn classify_opcode(word: u16) -> Option<OpcodeEncoding> {
    OPCODE_ENCODING_TABLE
        .iter()
        .find_map(|(mask, pattern, encoding)| (word & mask == *pattern).then_some(*encoding))
}
