//! # UVSim Emulator
//!
//! An emulator of the UVSim educational decimal computer: 250 registers of
//! signed six-digit words, a single accumulator, and a 13-instruction
//! BasicML-style instruction set with suspend-on-READ console I/O.
//!
//! The machine itself carries no user interface. Hosts drive it through
//! [`Machine`] and observe it through the [`Console`] trait:
//!
//! ```
//! use uvsim::{Machine, RecordingConsole, RunState, parse_program};
//!
//! let program = parse_program("+010007\n+011007\n+043000").unwrap();
//!
//! let mut machine = Machine::new();
//! let mut console = RecordingConsole::default();
//! machine.load_program(&program).unwrap();
//!
//! assert_eq!(machine.start(&mut console).unwrap(), RunState::AwaitingInput);
//! machine.supply_input("+012345").unwrap();
//! assert_eq!(machine.run(&mut console), RunState::Halted);
//! assert_eq!(console.outputs.len(), 1);
//! ```

pub mod word;
pub mod machine;
pub mod loader;

// Re-export commonly used types
pub use word::{Word, WordError, ArithOp};
pub use machine::{
    Machine, MachineError, RunState, Step, Memory, MemoryError, Instruction, Opcode,
    Console, RecordingConsole, MEMORY_SIZE,
};
pub use loader::{parse_program, LoadError, export_image, load_image, save_image, ImageError};
