//! Instruction decoder for the UVSim.
//!
//! Each stored word decodes into a three-digit opcode and a three-digit
//! address operand: for the canonical encoding `[+-]DDDDDD`, the opcode is
//! the first three digits and the operand the last three. The sign character
//! plays no part in decoding.

use std::fmt;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::word::Word;

/// The thirteen recognized instruction codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Opcode {
    /// 000: no-op, the code blank registers carry
    Nop,
    /// 010: read a word from the console into a register (suspends the run)
    Read,
    /// 011: write a register's word to the console
    Write,
    /// 020: accumulator := register
    Load,
    /// 021: register := accumulator
    Store,
    /// 030: accumulator := accumulator + register
    Add,
    /// 031: accumulator := accumulator - register
    Subtract,
    /// 032: accumulator := accumulator / register (truncating)
    Divide,
    /// 033: accumulator := accumulator * register
    Multiply,
    /// 040: unconditional branch
    Branch,
    /// 041: branch if the accumulator is negative
    BranchNeg,
    /// 042: branch if the accumulator is zero
    BranchZero,
    /// 043: stop the run (not an error)
    Halt,
}

impl Opcode {
    /// Look up an opcode by its three-digit code.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(Opcode::Nop),
            10 => Some(Opcode::Read),
            11 => Some(Opcode::Write),
            20 => Some(Opcode::Load),
            21 => Some(Opcode::Store),
            30 => Some(Opcode::Add),
            31 => Some(Opcode::Subtract),
            32 => Some(Opcode::Divide),
            33 => Some(Opcode::Multiply),
            40 => Some(Opcode::Branch),
            41 => Some(Opcode::BranchNeg),
            42 => Some(Opcode::BranchZero),
            43 => Some(Opcode::Halt),
            _ => None,
        }
    }

    /// The three-digit code for this opcode.
    pub const fn code(self) -> u16 {
        match self {
            Opcode::Nop => 0,
            Opcode::Read => 10,
            Opcode::Write => 11,
            Opcode::Load => 20,
            Opcode::Store => 21,
            Opcode::Add => 30,
            Opcode::Subtract => 31,
            Opcode::Divide => 32,
            Opcode::Multiply => 33,
            Opcode::Branch => 40,
            Opcode::BranchNeg => 41,
            Opcode::BranchZero => 42,
            Opcode::Halt => 43,
        }
    }

    /// Mnemonic used in trace output.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Nop => "NOP",
            Opcode::Read => "READ",
            Opcode::Write => "WRITE",
            Opcode::Load => "LOAD",
            Opcode::Store => "STORE",
            Opcode::Add => "ADD",
            Opcode::Subtract => "SUBTRACT",
            Opcode::Divide => "DIVIDE",
            Opcode::Multiply => "MULTIPLY",
            Opcode::Branch => "BRANCH",
            Opcode::BranchNeg => "BRANCHNEG",
            Opcode::BranchZero => "BRANCHZERO",
            Opcode::Halt => "HALT",
        }
    }

    /// Whether the operand names a register this opcode touches.
    ///
    /// True for everything but NOP and HALT, whose operand digits are
    /// ignored.
    pub const fn is_addressed(self) -> bool {
        !matches!(self, Opcode::Nop | Opcode::Halt)
    }
}

/// A decoded instruction: opcode plus three-digit address operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operand: u16,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.opcode.is_addressed() {
            write!(f, "{} {:03}", self.opcode.mnemonic(), self.operand)
        } else {
            f.write_str(self.opcode.mnemonic())
        }
    }
}

/// Decode a stored word into an instruction.
///
/// The operand is carried through as-is (0..=999); whether it names a valid
/// register is checked at execution time, not here.
pub fn decode(word: Word) -> Result<Instruction, DecodeError> {
    let magnitude = word.value().unsigned_abs();
    let code = (magnitude / 1000) as u16;
    let operand = (magnitude % 1000) as u16;

    let opcode = Opcode::from_code(code).ok_or(DecodeError::InvalidOpcode(code))?;

    Ok(Instruction { opcode, operand })
}

/// Encode an instruction back to a stored word.
pub fn encode(instr: &Instruction) -> Word {
    let value = instr.opcode.code() as i32 * 1000 + instr.operand as i32;
    Word::from_value(value)
}

/// Errors that can occur during instruction decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unrecognized instruction code: {0:03}")]
    InvalidOpcode(u16),
}
