use crate::{
    error::LoadError,
    registers::{IndexRegister, ProgramCounter},
};

pub type TypeAddr = u16; // in reality u12

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: TypeAddr = 0x200;
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

pub const FONT_START: TypeAddr = 0x000;
pub const FONT_HEIGHT: u8 = 5;
pub const STACK_SIZE: usize = 16;

type FontBytes = [u8; FONT_HEIGHT as usize * 16];

const DEFAULT_FONT: FontBytes = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Address of the glyph for hex digit `digit` (only the low nibble counts).
pub fn glyph_addr(digit: u8) -> TypeAddr {
    FONT_START + (digit & 0xF) as TypeAddr * FONT_HEIGHT as TypeAddr
}

pub struct Memory {
    // 4k bytes
    // font data stored from 000 -> 04F, programs from 200 onwards
    bytes: [u8; MEMORY_SIZE],
    pub pc: ProgramCounter,
    pub index: IndexRegister,
    pub stack: Stack,
}

impl Memory {
    pub fn new() -> Self {
        Self {
            bytes: [0; MEMORY_SIZE],
            pc: ProgramCounter(PROGRAM_START),
            index: IndexRegister(0x0),
            stack: Stack::new(),
        }
    }

    // every address is taken modulo the address space, so program-derived
    // indices can never leave it
    fn wrap(addr: TypeAddr) -> usize {
        addr as usize % MEMORY_SIZE
    }

    pub fn set(&mut self, addr: TypeAddr, val: u8) {
        self.bytes[Self::wrap(addr)] = val;
    }

    pub fn get(&self, addr: TypeAddr) -> u8 {
        self.bytes[Self::wrap(addr)]
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn increment_pc(&mut self) {
        self.pc.increment();
    }

    /// Big-endian word at the program counter. Does not move the counter.
    pub fn current_instruction(&self) -> u16 {
        let pc = self.pc.0;
        let (l, r) = (self.get(pc), self.get(pc.wrapping_add(1)));
        ((l as u16) << 8) | r as u16
    }

    pub fn set_pc(&mut self, addr: TypeAddr) {
        self.pc.set_addr(addr);
    }

    pub fn set_index(&mut self, addr: TypeAddr) {
        self.index.set_addr(addr);
    }

    /// Installs the font at the bottom of memory and the program at 0x200.
    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<(), LoadError> {
        if bytes.len() > MAX_PROGRAM_SIZE {
            return Err(LoadError::ProgramTooLarge {
                size: bytes.len(),
                max_size: MAX_PROGRAM_SIZE,
            });
        }

        let start_index = PROGRAM_START as usize;
        self.bytes[start_index..start_index + bytes.len()].copy_from_slice(bytes);

        let start_index = FONT_START as usize;
        self.bytes[start_index..start_index + DEFAULT_FONT.len()].copy_from_slice(&DEFAULT_FONT);

        Ok(())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-capacity return-address stack.
pub struct Stack {
    addresses: [TypeAddr; STACK_SIZE],
    pointer: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            addresses: [0; STACK_SIZE],
            pointer: 0,
        }
    }

    /// Returns false, leaving the stack untouched, when it is already full.
    #[must_use]
    pub fn push(&mut self, addr: TypeAddr) -> bool {
        if self.pointer == STACK_SIZE {
            return false;
        }
        self.addresses[self.pointer] = addr;
        self.pointer += 1;
        true
    }

    pub fn pop(&mut self) -> Option<TypeAddr> {
        if self.pointer == 0 {
            return None;
        }
        self.pointer -= 1;
        Some(self.addresses[self.pointer])
    }

    pub fn depth(&self) -> usize {
        self.pointer
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
