// 16 8-bit data registers named V0 to VF, VF doubling as the flag
// I -> address register (16 bits wide, accesses wrap at 4k)
//
// Stack of 16 return addresses
//
// Delay timer & Sound timer: Count down at 60 times / s until 0
// Beep when sound timer is non-zero
//
// Display res: 64 width, 32 height
//
// 35 opcodes, each are 2 bytes (big-endian)
//      NNN: address
//      NN: 8-bit constant
//      N: 4-bit constant
//      X and Y: 4-bit register identifier
//
// The library is the machine alone. Loading files, drawing, sound, key
// mapping and pacing belong to the host binary.

pub mod decode;
pub mod display;
pub mod emulator;
pub mod error;
pub mod keyboard;
pub mod memory;
pub mod registers;
pub mod timer;

pub use emulator::Emulator;
pub use error::{DecodeError, LoadError, StepError};
