use crate::memory::{TypeAddr, MEMORY_SIZE};

pub const REGISTER_COUNT: usize = 16;
/// VF doubles as the carry/borrow/collision flag.
pub const FLAG: u8 = 0xF;

pub struct Registers {
    registers: [u8; REGISTER_COUNT],
}

impl Registers {
    pub fn new() -> Self {
        Self {
            registers: [0; REGISTER_COUNT],
        }
    }

    // register operands are nibbles; the mask keeps a stray wide value in range
    pub fn set_register(&mut self, reg_num: u8, value: u8) {
        self.registers[(reg_num & 0xF) as usize] = value;
    }

    pub fn add_to_register(&mut self, reg_num: u8, value: u8) {
        let total = self.get(reg_num).wrapping_add(value);
        self.set_register(reg_num, total);
    }

    pub fn get(&self, reg_num: u8) -> u8 {
        self.registers[(reg_num & 0xF) as usize]
    }

    pub fn set_flag(&mut self, flag: bool) {
        self.set_register(FLAG, flag as u8);
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

// Special registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramCounter(pub TypeAddr);

impl ProgramCounter {
    pub fn increment(&mut self) {
        self.set_addr(self.0.wrapping_add(2));
    }

    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr % MEMORY_SIZE as TypeAddr;
    }
}

/// Full 16 bits wide; memory accesses through it wrap instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRegister(pub TypeAddr);

impl IndexRegister {
    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }
}
