use thiserror::Error;

use crate::memory::TypeAddr;

/// The program image could not be placed in memory. Nothing of the
/// half-built machine is usable after this.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("program is too large ({size} bytes), max size is {max_size} bytes")]
    ProgramTooLarge { size: usize, max_size: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unknown opcode {word:#06X} at {addr:#05X}")]
    UnknownOpcode { word: u16, addr: TypeAddr },
}

/// Recoverable faults raised by a single step. By the time one of these is
/// returned the program counter has already moved past the offending word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StepError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("stack overflow: {word:#06X} at {addr:#05X} called with a full stack")]
    StackOverflow { word: u16, addr: TypeAddr },

    #[error("stack underflow: {word:#06X} at {addr:#05X} returned with an empty stack")]
    StackUnderflow { word: u16, addr: TypeAddr },
}

impl StepError {
    /// Address of the instruction that raised the fault.
    pub fn addr(&self) -> TypeAddr {
        match *self {
            StepError::Decode(DecodeError::UnknownOpcode { addr, .. })
            | StepError::StackOverflow { addr, .. }
            | StepError::StackUnderflow { addr, .. } => addr,
        }
    }

    pub fn word(&self) -> u16 {
        match *self {
            StepError::Decode(DecodeError::UnknownOpcode { word, .. })
            | StepError::StackOverflow { word, .. }
            | StepError::StackUnderflow { word, .. } => word,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn messages_carry_word_and_address() {
        let err = StepError::from(DecodeError::UnknownOpcode {
            word: 0xFFFF,
            addr: 0x204,
        });
        assert_eq!(err.to_string(), "unknown opcode 0xFFFF at 0x204");
        assert_eq!(err.addr(), 0x204);
        assert_eq!(err.word(), 0xFFFF);
    }

    #[test]
    fn load_error_reports_sizes() {
        let err = LoadError::ProgramTooLarge {
            size: 3585,
            max_size: 3584,
        };
        assert_eq!(
            err.to_string(),
            "program is too large (3585 bytes), max size is 3584 bytes"
        );
    }
}
