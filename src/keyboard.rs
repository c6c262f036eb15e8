pub const KEY_COUNT: usize = 16;

/// Snapshot of the 16-key hex pad, indexed by key value 0x0..=0xF.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Keyboard {
    keys: [bool; KEY_COUNT],
}

impl Keyboard {
    pub fn new() -> Self {
        Self {
            keys: [false; KEY_COUNT],
        }
    }

    pub fn set_all(&mut self, keys: [bool; KEY_COUNT]) {
        self.keys = keys;
    }

    pub fn update_key(&mut self, n: u8, pressed: bool) {
        self.keys[(n & 0xF) as usize] = pressed;
    }

    // only the low nibble of a register names a key
    pub fn get_key_status_from_num(&self, n: u8) -> bool {
        self.keys[(n & 0xF) as usize]
    }

    /// Lowest-numbered key currently held, if any.
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&k| k).map(|i| i as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn key_lookup_masks_to_a_nibble() {
        let mut kb = Keyboard::new();
        kb.update_key(0xA, true);
        assert!(kb.get_key_status_from_num(0xA));
        assert!(kb.get_key_status_from_num(0xFA));
        assert!(!kb.get_key_status_from_num(0xB));
    }

    #[test]
    fn first_pressed_picks_lowest_index() {
        let mut kb = Keyboard::new();
        assert_eq!(kb.first_pressed(), None);
        let mut keys = [false; KEY_COUNT];
        keys[0xC] = true;
        keys[0x5] = true;
        kb.set_all(keys);
        assert_eq!(kb.first_pressed(), Some(0x5));
        kb.set_all([false; KEY_COUNT]);
        assert_eq!(kb.first_pressed(), None);
    }
}
