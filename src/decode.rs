use std::fmt;

use crate::{error::DecodeError, memory::TypeAddr};

/// Field view over a raw instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInstruction {
    code: u16,
}

impl RawInstruction {
    pub fn new(code: u16) -> Self {
        RawInstruction { code }
    }

    // n is starting digit (1-based, from the left), m is length
    pub fn nth_m_digits(&self, n: u8, m: u8) -> u16 {
        // 0110 1100 1111 0001
        // -------------------
        // 1111 1111 1111 1111
        //      1111 1111 1111
        //           1111 1111
        //                1111
        let shift_places = (4 - m - (n - 1)) * 4;
        let mask = (1u32 << (m * 4)) - 1;
        (((self.code as u32) >> shift_places) & mask) as u16
    }

    pub fn identifier(&self) -> u8 {
        self.nth_m_digits(1, 1) as u8
    }

    pub fn x(&self) -> u8 {
        self.nth_m_digits(2, 1) as u8
    }

    pub fn y(&self) -> u8 {
        self.nth_m_digits(3, 1) as u8
    }

    pub fn n(&self) -> u8 {
        self.nth_m_digits(4, 1) as u8
    }

    pub fn nn(&self) -> u8 {
        self.nth_m_digits(3, 2) as u8
    }

    pub fn nnn(&self) -> TypeAddr {
        self.nth_m_digits(2, 3)
    }
}

// 00E0 / 00EE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemOp {
    // turn all pixels to 0
    ClearScreen,
    PopSubroutine,
}

// 8XY?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    // 8XY0
    CopyRegister,
    // 8XY1
    Or,
    // 8XY2
    And,
    // 8XY3
    XOr,
    // 8XY4, VF = carry
    Add,
    // 8XY5, VX = VX - VY, VF = no borrow
    SubtractForward,
    // 8XY6, VF = shifted out bit
    RightShift,
    // 8XY7, VX = VY - VX, VF = no borrow
    SubtractBackward,
    // 8XYE
    LeftShift,
}

// EX??
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOp {
    // EX9E
    SkipIfPressed,
    // EXA1
    SkipIfNotPressed,
}

// FX??
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiscOp {
    // FX07
    CopyDelayToRegister,
    // FX0A
    GetKey,
    // FX15
    CopyRegisterToDelay,
    // FX18
    CopyRegisterToSound,
    // FX1E
    AddToIndex,
    // FX29
    PointChar,
    // FX33
    ToDecimal,
    // FX55
    StoreRegisterToMemory,
    // FX65
    LoadRegisterFromMemory,
}

/// One variant per top nibble; the four overloaded families carry a nested op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCodes {
    // 0NNN
    System(SystemOp),
    // 1NNN
    // set PC to address NNN, "jump" to memory location
    Jump(TypeAddr),
    // 2NNN
    PushSubroutine(TypeAddr),
    // 3XNN
    SkipEqualConstant(u8, u8),
    // 4XNN
    SkipNotEqualConstant(u8, u8),
    // 5XY0
    SkipEqualRegister(u8, u8),
    // 6XNN
    SetRegister(u8, u8),
    // 7XNN
    AddToRegister(u8, u8),
    // 8XYN
    Alu(AluOp, u8, u8),
    // 9XY0
    SkipNotEqualRegister(u8, u8),
    // ANNN
    SetIndexRegister(TypeAddr),
    // BNNN
    JumpWithOffset(TypeAddr),
    // CXNN
    Random(u8, u8),
    // DXYN
    // draw an N pixel tall sprite starting at I at (VX, VY)
    // XOR pixels on screen using sprite data, VF = 1 if any pixel went off
    Display(u8, u8, u8),
    // EXNN
    Key(KeyOp, u8),
    // FXNN
    Misc(MiscOp, u8),
}

impl OpCodes {
    /// Decodes `ins`, fetched from `addr`. The address is only used to
    /// report an unknown word.
    pub fn decode_raw(ins: u16, addr: TypeAddr) -> Result<Self, DecodeError> {
        let raw = RawInstruction::new(ins);
        let unknown = DecodeError::UnknownOpcode { word: ins, addr };
        let (x, y) = (raw.x(), raw.y());

        let op = match raw.identifier() {
            0x0 => match raw.nnn() {
                0x0E0 => Self::System(SystemOp::ClearScreen),
                0x0EE => Self::System(SystemOp::PopSubroutine),
                // 0NNN machine-code calls are not supported
                _ => return Err(unknown),
            },
            0x1 => Self::Jump(raw.nnn()),
            0x2 => Self::PushSubroutine(raw.nnn()),
            0x3 => Self::SkipEqualConstant(x, raw.nn()),
            0x4 => Self::SkipNotEqualConstant(x, raw.nn()),
            0x5 => Self::SkipEqualRegister(x, y),
            0x6 => Self::SetRegister(x, raw.nn()),
            0x7 => Self::AddToRegister(x, raw.nn()),
            0x8 => {
                let alu_type = match raw.n() {
                    0x0 => AluOp::CopyRegister,
                    0x1 => AluOp::Or,
                    0x2 => AluOp::And,
                    0x3 => AluOp::XOr,
                    0x4 => AluOp::Add,
                    0x5 => AluOp::SubtractForward,
                    0x6 => AluOp::RightShift,
                    0x7 => AluOp::SubtractBackward,
                    0xE => AluOp::LeftShift,
                    _ => return Err(unknown),
                };
                Self::Alu(alu_type, x, y)
            }
            0x9 => Self::SkipNotEqualRegister(x, y),
            0xA => Self::SetIndexRegister(raw.nnn()),
            0xB => Self::JumpWithOffset(raw.nnn()),
            0xC => Self::Random(x, raw.nn()),
            0xD => Self::Display(x, y, raw.n()),
            0xE => {
                let k_type = match raw.nn() {
                    0x9E => KeyOp::SkipIfPressed,
                    0xA1 => KeyOp::SkipIfNotPressed,
                    _ => return Err(unknown),
                };
                Self::Key(k_type, x)
            }
            // 0xF, the last nibble
            _ => {
                let f_type = match raw.nn() {
                    0x07 => MiscOp::CopyDelayToRegister,
                    0x0A => MiscOp::GetKey,
                    0x15 => MiscOp::CopyRegisterToDelay,
                    0x18 => MiscOp::CopyRegisterToSound,
                    0x1E => MiscOp::AddToIndex,
                    0x29 => MiscOp::PointChar,
                    0x33 => MiscOp::ToDecimal,
                    0x55 => MiscOp::StoreRegisterToMemory,
                    0x65 => MiscOp::LoadRegisterFromMemory,
                    _ => return Err(unknown),
                };
                Self::Misc(f_type, x)
            }
        };
        Ok(op)
    }
}

impl fmt::Display for OpCodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::System(SystemOp::ClearScreen) => write!(f, "CLS"),
            Self::System(SystemOp::PopSubroutine) => write!(f, "RET"),
            Self::Jump(addr) => write!(f, "JP {addr:#05X}"),
            Self::PushSubroutine(addr) => write!(f, "CALL {addr:#05X}"),
            Self::SkipEqualConstant(x, nn) => write!(f, "SE V{x:X}, {nn:#04X}"),
            Self::SkipNotEqualConstant(x, nn) => write!(f, "SNE V{x:X}, {nn:#04X}"),
            Self::SkipEqualRegister(x, y) => write!(f, "SE V{x:X}, V{y:X}"),
            Self::SetRegister(x, nn) => write!(f, "LD V{x:X}, {nn:#04X}"),
            Self::AddToRegister(x, nn) => write!(f, "ADD V{x:X}, {nn:#04X}"),
            Self::Alu(op, x, y) => {
                let name = match op {
                    AluOp::CopyRegister => "LD",
                    AluOp::Or => "OR",
                    AluOp::And => "AND",
                    AluOp::XOr => "XOR",
                    AluOp::Add => "ADD",
                    AluOp::SubtractForward => "SUB",
                    AluOp::RightShift => "SHR",
                    AluOp::SubtractBackward => "SUBN",
                    AluOp::LeftShift => "SHL",
                };
                write!(f, "{name} V{x:X}, V{y:X}")
            }
            Self::SkipNotEqualRegister(x, y) => write!(f, "SNE V{x:X}, V{y:X}"),
            Self::SetIndexRegister(addr) => write!(f, "LD I, {addr:#05X}"),
            Self::JumpWithOffset(addr) => write!(f, "JP V0, {addr:#05X}"),
            Self::Random(x, nn) => write!(f, "RND V{x:X}, {nn:#04X}"),
            Self::Display(x, y, n) => write!(f, "DRW V{x:X}, V{y:X}, {n}"),
            Self::Key(KeyOp::SkipIfPressed, x) => write!(f, "SKP V{x:X}"),
            Self::Key(KeyOp::SkipIfNotPressed, x) => write!(f, "SKNP V{x:X}"),
            Self::Misc(op, x) => match op {
                MiscOp::CopyDelayToRegister => write!(f, "LD V{x:X}, DT"),
                MiscOp::GetKey => write!(f, "LD V{x:X}, K"),
                MiscOp::CopyRegisterToDelay => write!(f, "LD DT, V{x:X}"),
                MiscOp::CopyRegisterToSound => write!(f, "LD ST, V{x:X}"),
                MiscOp::AddToIndex => write!(f, "ADD I, V{x:X}"),
                MiscOp::PointChar => write!(f, "LD F, V{x:X}"),
                MiscOp::ToDecimal => write!(f, "LD B, V{x:X}"),
                MiscOp::StoreRegisterToMemory => write!(f, "LD [I], V{x:X}"),
                MiscOp::LoadRegisterFromMemory => write!(f, "LD V{x:X}, [I]"),
            },
        }
    }
}
