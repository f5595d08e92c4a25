use crate::Instruction;

/// Register-to-register operations of the `8XY_` family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AluOp {
    /// `8XY0`: `Vx = Vy`.
    Move,
    /// `8XY1`: `Vx |= Vy`.
    Or,
    /// `8XY2`: `Vx &= Vy`.
    And,
    /// `8XY3`: `Vx ^= Vy`.
    Xor,
    /// `8XY4`: add with carry into `VF`.
    Add,
    /// `8XY5`: `Vx - Vy`, `VF` = no borrow.
    Sub,
    /// `8XY6`: `Vy >> 1`, `VF` = shifted-out bit.
    ShiftRight,
    /// `8XY7`: `Vy - Vx`, `VF` = no borrow.
    SubNeg,
    /// `8XYE`: `Vy << 1`, `VF` = shifted-out bit.
    ShiftLeft,
}

impl AluOp {
    /// Maps an `8XY_` instruction to its operation.
    #[must_use]
    pub const fn of(instruction: Instruction) -> Option<Self> {
        Some(match instruction {
            Instruction::Move { .. } => Self::Move,
            Instruction::Or { .. } => Self::Or,
            Instruction::And { .. } => Self::And,
            Instruction::Xor { .. } => Self::Xor,
            Instruction::AddReg { .. } => Self::Add,
            Instruction::SubReg { .. } => Self::Sub,
            Instruction::ShiftRight { .. } => Self::ShiftRight,
            Instruction::SubNeg { .. } => Self::SubNeg,
            Instruction::ShiftLeft { .. } => Self::ShiftLeft,
            _ => return None,
        })
    }
}

/// Result of an ALU operation: the new `Vx` and, when defined, the new `VF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AluResult {
    /// Value for `Vx`.
    pub value: u8,
    /// Value for `VF`, written after `Vx`.
    pub flag: Option<u8>,
}

/// Computes `op` on the pre-instruction values of `Vx` and `Vy`.
#[must_use]
pub fn apply(op: AluOp, vx: u8, vy: u8) -> AluResult {
    let (value, flag) = match op {
        AluOp::Move => (vy, None),
        AluOp::Or => (vx | vy, None),
        AluOp::And => (vx & vy, None),
        AluOp::Xor => (vx ^ vy, None),
        AluOp::Add => {
            let (sum, carry) = vx.overflowing_add(vy);
            (sum, Some(u8::from(carry)))
        }
        AluOp::Sub => (vx.wrapping_sub(vy), Some(u8::from(vx >= vy))),
        AluOp::ShiftRight => (vy >> 1, Some(vy & 0x01)),
        AluOp::SubNeg => (vy.wrapping_sub(vx), Some(u8::from(vy >= vx))),
        AluOp::ShiftLeft => (vy << 1, Some(vy >> 7)),
    };
    AluResult { value, flag }
}

#[cfg(test)]
mod tests {
    use super::{apply, AluOp, AluResult};
    use rstest::rstest;

    #[rstest]
    #[case(AluOp::Or, 0x55, 0x02, 0x57)]
    #[case(AluOp::And, 0x55, 0xFE, 0x54)]
    #[case(AluOp::Xor, 0x55, 0xFF, 0xAA)]
    #[case(AluOp::Move, 0x12, 0x34, 0x34)]
    fn bitwise_ops_leave_flag_alone(
        #[case] op: AluOp,
        #[case] vx: u8,
        #[case] vy: u8,
        #[case] expected: u8,
    ) {
        assert_eq!(
            apply(op, vx, vy),
            AluResult {
                value: expected,
                flag: None
            }
        );
    }

    #[rstest]
    #[case(0xFE, 0x01, 0xFF, 0)]
    #[case(0xFF, 0x02, 0x01, 1)]
    #[case(0x80, 0x80, 0x00, 1)]
    fn add_sets_carry(#[case] vx: u8, #[case] vy: u8, #[case] sum: u8, #[case] carry: u8) {
        assert_eq!(
            apply(AluOp::Add, vx, vy),
            AluResult {
                value: sum,
                flag: Some(carry)
            }
        );
    }

    #[test]
    fn sub_flag_is_no_borrow_including_equal_operands() {
        assert_eq!(apply(AluOp::Sub, 0xFF, 0x02).value, 0xFD);
        assert_eq!(apply(AluOp::Sub, 0xFF, 0x02).flag, Some(1));
        assert_eq!(apply(AluOp::Sub, 0x05, 0x05).flag, Some(1));
        assert_eq!(apply(AluOp::Sub, 0x01, 0x02).value, 0xFF);
        assert_eq!(apply(AluOp::Sub, 0x01, 0x02).flag, Some(0));
    }

    #[test]
    fn sub_neg_reverses_operands() {
        assert_eq!(apply(AluOp::SubNeg, 0x02, 0xFF).value, 0xFD);
        assert_eq!(apply(AluOp::SubNeg, 0x02, 0xFF).flag, Some(1));
        assert_eq!(apply(AluOp::SubNeg, 0x03, 0x01).flag, Some(0));
    }

    #[test]
    fn shifts_use_vy_and_report_shifted_bit() {
        assert_eq!(
            apply(AluOp::ShiftRight, 0xFF, 0x03),
            AluResult {
                value: 0x01,
                flag: Some(1)
            }
        );
        assert_eq!(
            apply(AluOp::ShiftLeft, 0x00, 0x81),
            AluResult {
                value: 0x02,
                flag: Some(1)
            }
        );
        assert_eq!(apply(AluOp::ShiftLeft, 0xFF, 0x40).flag, Some(0));
    }
}
