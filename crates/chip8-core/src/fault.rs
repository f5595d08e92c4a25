use thiserror::Error;

/// Fault classes used for reporting and policy decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultClass {
    /// Call stack capacity violation.
    Stack,
    /// Fetch or data access past the end of memory.
    Memory,
    /// Program image rejected before execution started.
    Load,
}

/// Stable fault taxonomy for terminal interpreter conditions.
///
/// Every runtime fault ends the run: the engine latches it into
/// [`RunState::Faulted`](crate::RunState::Faulted) and refuses further steps
/// until reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum FaultCode {
    /// `2NNN` executed with every stack frame in use.
    #[error("call stack overflow")]
    StackOverflow = 0x01,
    /// `00EE` executed with an empty stack.
    #[error("return with empty call stack")]
    StackUnderflow = 0x02,
    /// Instruction fetch or memory operand past the end of the address space.
    #[error("memory address out of range")]
    AddressOutOfRange = 0x03,
    /// Program image does not fit between the load origin and the end of memory.
    #[error("program image does not fit in memory")]
    MalformedLoad = 0x04,
}

impl FaultCode {
    /// Converts a fault code to its stable byte value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Converts a stable byte value back into a fault code.
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::StackOverflow),
            0x02 => Some(Self::StackUnderflow),
            0x03 => Some(Self::AddressOutOfRange),
            0x04 => Some(Self::MalformedLoad),
            _ => None,
        }
    }

    /// Returns the reporting class for this fault code.
    #[must_use]
    pub const fn class(self) -> FaultClass {
        match self {
            Self::StackOverflow | Self::StackUnderflow => FaultClass::Stack,
            Self::AddressOutOfRange => FaultClass::Memory,
            Self::MalformedLoad => FaultClass::Load,
        }
    }

    /// Faults reported while loading a program rather than while stepping.
    #[must_use]
    pub const fn is_load_time(self) -> bool {
        matches!(self, Self::MalformedLoad)
    }
}

#[cfg(test)]
mod tests {
    use super::{FaultClass, FaultCode};

    #[test]
    fn stable_code_roundtrip_is_bijective_for_defined_values() {
        for code in 0x01u8..=0x04 {
            let fault = FaultCode::from_u8(code).expect("defined taxonomy code");
            assert_eq!(fault.as_u8(), code);
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert!(FaultCode::from_u8(0x00).is_none());
        assert!(FaultCode::from_u8(0x05).is_none());
        assert!(FaultCode::from_u8(0xFF).is_none());
    }

    #[test]
    fn only_malformed_load_is_reported_at_load_time() {
        assert!(FaultCode::MalformedLoad.is_load_time());
        assert!(!FaultCode::StackOverflow.is_load_time());
        assert!(!FaultCode::StackUnderflow.is_load_time());
        assert!(!FaultCode::AddressOutOfRange.is_load_time());
    }

    #[test]
    fn class_mapping_matches_fault_taxonomy() {
        assert_eq!(FaultCode::StackOverflow.class(), FaultClass::Stack);
        assert_eq!(FaultCode::StackUnderflow.class(), FaultClass::Stack);
        assert_eq!(FaultCode::AddressOutOfRange.class(), FaultClass::Memory);
        assert_eq!(FaultCode::MalformedLoad.class(), FaultClass::Load);
    }

    #[test]
    fn display_text_names_the_condition() {
        assert_eq!(FaultCode::StackOverflow.to_string(), "call stack overflow");
        assert_eq!(
            FaultCode::MalformedLoad.to_string(),
            "program image does not fit in memory"
        );
    }
}
