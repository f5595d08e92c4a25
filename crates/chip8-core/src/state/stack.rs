use crate::FaultCode;

/// Call depth of the COSMAC VIP interpreter; the default capacity.
pub const STACK_DEPTH_CANONICAL: usize = 16;
/// Deeper call stack used by later interpreters, selectable through config.
pub const STACK_DEPTH_EXTENDED: usize = 48;

/// Bounded LIFO of return addresses.
///
/// Pushes past the capacity are refused. The engine re-applies
/// [`CoreConfig::stack_depth`](crate::CoreConfig::stack_depth) before every
/// step, so the capacity follows the config the core is stepped with. Neither
/// error is retryable: the engine latches both as terminal faults.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CallStack {
    frames: Vec<u16>,
    capacity: usize,
}

impl Default for CallStack {
    fn default() -> Self {
        Self::with_capacity(STACK_DEPTH_CANONICAL)
    }
}

impl CallStack {
    /// Creates an empty stack holding at most `capacity` frames.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            frames: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Pushes a return address.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::StackOverflow`] when every frame is in use.
    pub fn push(&mut self, addr: u16) -> Result<(), FaultCode> {
        if self.is_full() {
            return Err(FaultCode::StackOverflow);
        }
        self.frames.push(addr);
        Ok(())
    }

    /// Pops the most recent return address.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::StackUnderflow`] when the stack is empty.
    pub fn pop(&mut self) -> Result<u16, FaultCode> {
        self.frames.pop().ok_or(FaultCode::StackUnderflow)
    }

    /// Returns the most recent return address without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<u16> {
        self.frames.last().copied()
    }

    /// Number of frames in use.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Maximum number of frames.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Changes the capacity, keeping every frame already pushed.
    ///
    /// Shrinking below the current depth leaves the stack full until enough
    /// frames are popped.
    pub const fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    /// Returns `true` when a further push would overflow.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.frames.len() >= self.capacity
    }

    /// Returns `true` when a pop would underflow.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Drops every frame, keeping the capacity.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Frames from oldest to most recent.
    #[must_use]
    pub fn frames(&self) -> &[u16] {
        &self.frames
    }
}
