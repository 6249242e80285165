//! Machine emulation for the UVSim.
//!
//! This module implements the complete UVSim architecture:
//! - 250 word-sized registers
//! - A single accumulator and a program counter
//! - The 13-instruction BasicML-style instruction set
//! - Suspend-on-READ console I/O via the [`Console`] trait

pub mod memory;
pub mod decode;
pub mod execute;
pub mod console;

pub use memory::{Memory, MemoryError, LAST_ADDRESS, MEMORY_SIZE};
pub use decode::{Instruction, Opcode, DecodeError, decode, encode};
pub use execute::{Machine, MachineError, RunState, Step};
pub use console::{Console, RecordingConsole};
