use crate::PROGRAM_ORIGIN;

/// Number of general-purpose registers (`V0..VF`).
pub const REGISTER_COUNT: usize = 16;

/// General-purpose register identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Register {
    V0 = 0x0,
    V1 = 0x1,
    V2 = 0x2,
    V3 = 0x3,
    V4 = 0x4,
    V5 = 0x5,
    V6 = 0x6,
    V7 = 0x7,
    V8 = 0x8,
    V9 = 0x9,
    VA = 0xA,
    VB = 0xB,
    VC = 0xC,
    VD = 0xD,
    VE = 0xE,
    VF = 0xF,
}

impl Register {
    /// Ordered list of all registers.
    pub const ALL: [Self; REGISTER_COUNT] = [
        Self::V0,
        Self::V1,
        Self::V2,
        Self::V3,
        Self::V4,
        Self::V5,
        Self::V6,
        Self::V7,
        Self::V8,
        Self::V9,
        Self::VA,
        Self::VB,
        Self::VC,
        Self::VD,
        Self::VE,
        Self::VF,
    ];

    /// Register overwritten by carry, borrow, shift, and collision results.
    pub const FLAG: Self = Self::VF;

    /// Returns the array index for this register (`0..=15`).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Decodes a 4-bit register field, rejecting values above `0xF`.
    #[must_use]
    pub const fn from_u4(bits: u8) -> Option<Self> {
        if bits < REGISTER_COUNT as u8 {
            Some(Self::ALL[bits as usize])
        } else {
            None
        }
    }

    /// Decodes the low nibble of `bits`, ignoring the high nibble.
    #[must_use]
    pub const fn from_low_nibble(bits: u8) -> Self {
        Self::ALL[(bits & 0x0F) as usize]
    }

    /// Registers `V0..=self`, the window touched by `FX55`/`FX65`.
    pub fn through(self) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().take(self.index() + 1)
    }
}

/// Register file: `V0..VF`, the address register `I`, and the program counter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Registers {
    v: [u8; REGISTER_COUNT],
    i: u16,
    pc: u16,
}

impl Default for Registers {
    fn default() -> Self {
        Self {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_ORIGIN,
        }
    }
}

impl Registers {
    /// Reads a general-purpose register.
    #[must_use]
    pub const fn v(&self, reg: Register) -> u8 {
        self.v[reg.index()]
    }

    /// Writes a general-purpose register.
    pub const fn set_v(&mut self, reg: Register, value: u8) {
        self.v[reg.index()] = value;
    }

    /// Reads the flag register `VF`.
    #[must_use]
    pub const fn flag(&self) -> u8 {
        self.v(Register::FLAG)
    }

    /// Reads the `I` register.
    #[must_use]
    pub const fn i(&self) -> u16 {
        self.i
    }

    /// Writes the `I` register.
    pub const fn set_i(&mut self, value: u16) {
        self.i = value;
    }

    /// Reads the program counter.
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }

    /// Writes the program counter.
    pub const fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    /// Borrows the full `V` file in index order.
    #[must_use]
    pub const fn v_file(&self) -> &[u8; REGISTER_COUNT] {
        &self.v
    }
}
