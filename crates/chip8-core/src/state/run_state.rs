use crate::{FaultCode, Register};

/// Execution-state machine observed by the driving loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// Ready to execute the next instruction.
    #[default]
    Running,
    /// `FX0A` is blocking the instruction stream until a key press arrives.
    AwaitingKey {
        /// Register receiving the key once it arrives.
        register: Register,
    },
    /// The program counter ran past the addressable program region.
    Halted,
    /// A fault is latched and no further progress is possible without reset.
    Faulted(FaultCode),
}

impl RunState {
    /// Returns the latched fault, if this state is faulted.
    #[must_use]
    pub const fn fault(self) -> Option<FaultCode> {
        match self {
            Self::Faulted(cause) => Some(cause),
            Self::Running | Self::AwaitingKey { .. } | Self::Halted => None,
        }
    }

    /// Returns `true` for the states no step can leave.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Halted | Self::Faulted(_))
    }
}
