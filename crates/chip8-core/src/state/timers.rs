/// Delay and sound countdown timers.
///
/// Both count down once per tick while nonzero and saturate at zero. Only the
/// sound timer's value is modelled; producing a tone is up to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Timers {
    delay: u8,
    sound: u8,
}

impl Timers {
    /// Decrements each nonzero timer by one.
    pub const fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    /// Reads the delay timer (`DT`).
    #[must_use]
    pub const fn delay(self) -> u8 {
        self.delay
    }

    /// Writes the delay timer (`DT`).
    pub const fn set_delay(&mut self, value: u8) {
        self.delay = value;
    }

    /// Reads the sound timer (`ST`).
    #[must_use]
    pub const fn sound(self) -> u8 {
        self.sound
    }

    /// Writes the sound timer (`ST`).
    pub const fn set_sound(&mut self, value: u8) {
        self.sound = value;
    }

    /// Returns `true` while the host should be sounding a tone.
    #[must_use]
    pub const fn sound_active(self) -> bool {
        self.sound > 0
    }
}

#[cfg(test)]
mod tests {
    use super::Timers;

    #[test]
    fn tick_decrements_both_timers() {
        let mut timers = Timers::default();
        timers.set_delay(3);
        timers.set_sound(1);
        timers.tick();
        assert_eq!(timers.delay(), 2);
        assert_eq!(timers.sound(), 0);
        assert!(!timers.sound_active());
    }

    #[test]
    fn tick_saturates_at_zero() {
        let mut timers = Timers::default();
        timers.tick();
        timers.tick();
        assert_eq!(timers.delay(), 0);
        assert_eq!(timers.sound(), 0);
    }

    #[test]
    fn full_countdown_takes_value_ticks() {
        let mut timers = Timers::default();
        timers.set_delay(u8::MAX);
        for _ in 0..u8::MAX {
            timers.tick();
        }
        assert_eq!(timers.delay(), 0);
    }
}
