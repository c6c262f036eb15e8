/// Rate at which the host is expected to call `Emulator::tick_timers`.
pub const TIMER_HZ: u32 = 60;

/// An 8-bit countdown that saturates at zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub count: u8,
}

impl Timer {
    pub fn set(&mut self, value: u8) {
        self.count = value;
    }

    pub fn is_active(&self) -> bool {
        self.count > 0
    }

    /// Counts down by one. Returns true only on the tick that reaches zero.
    pub fn tick(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count -= 1;
        self.count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn reaches_zero_once_and_stays_there() {
        let mut timer = Timer { count: 2 };
        assert!(!timer.tick());
        assert!(timer.tick());
        assert!(!timer.tick());
        assert_eq!(timer.count, 0);
        assert!(!timer.is_active());
    }
}
