//! The UVSim register file.
//!
//! 250 word-sized registers, addresses 0 through 249, every one of which
//! powers on blank (`+000000`). The register file never resizes.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::word::Word;

/// The number of registers in the machine.
pub const MEMORY_SIZE: usize = 250;

/// Address of the last register.
pub const LAST_ADDRESS: u16 = (MEMORY_SIZE - 1) as u16;

/// The 250-register word store.
#[derive(Clone, Serialize, Deserialize)]
pub struct Memory {
    cells: Vec<Word>,
}

impl Memory {
    /// Create a register file with every cell blank.
    pub fn new() -> Self {
        Self {
            cells: vec![Word::ZERO; MEMORY_SIZE],
        }
    }

    /// Read the register at an instruction operand address.
    pub fn read(&self, addr: u16) -> Result<Word, MemoryError> {
        let index = Self::index(addr)?;
        Ok(self.cells[index])
    }

    /// Write the register at an instruction operand address.
    pub fn write(&mut self, addr: u16, value: Word) -> Result<(), MemoryError> {
        let index = Self::index(addr)?;
        self.cells[index] = value;
        Ok(())
    }

    fn index(addr: u16) -> Result<usize, MemoryError> {
        if addr as usize >= MEMORY_SIZE {
            return Err(MemoryError::AddressOutOfRange(addr));
        }
        Ok(addr as usize)
    }

    /// Reset every register to blank.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = Word::ZERO;
        }
    }

    /// Install a program into registers `0..program.len()`.
    ///
    /// Registers beyond the program keep their prior contents; callers that
    /// need a clean install clear the register file first.
    pub fn install(&mut self, program: &[Word]) -> Result<(), MemoryError> {
        if program.len() > MEMORY_SIZE {
            return Err(MemoryError::ProgramTooLarge {
                size: program.len(),
                available: MEMORY_SIZE,
            });
        }

        for (i, &word) in program.iter().enumerate() {
            self.cells[i] = word;
        }

        Ok(())
    }

    /// Address of the highest non-blank register, or 0 if all are blank.
    pub fn highest_used(&self) -> u16 {
        self.cells
            .iter()
            .rposition(|cell| !cell.is_zero())
            .unwrap_or(0) as u16
    }

    /// Iterate over `(address, word)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, Word)> + '_ {
        self.cells.iter().enumerate().map(|(i, &w)| (i as u16, w))
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Only summarize; 250 blank cells are not worth printing.
        let non_blank = self.cells.iter().filter(|cell| !cell.is_zero()).count();

        f.debug_struct("Memory")
            .field("non_blank_registers", &non_blank)
            .field("total_registers", &MEMORY_SIZE)
            .finish()
    }
}

/// Errors that can occur during register access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// Address is outside the valid register range.
    #[error("invalid address: {0}, the register address must be between 0 and 249")]
    AddressOutOfRange(u16),

    /// Program is too large to fit in the register file.
    #[error("program size {size} exceeds the {available} available registers")]
    ProgramTooLarge { size: usize, available: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_powers_on_blank() {
        let mem = Memory::new();
        for addr in 0..MEMORY_SIZE as u16 {
            assert_eq!(mem.read(addr).unwrap(), Word::ZERO);
        }
    }

    #[test]
    fn test_read_write() {
        let mut mem = Memory::new();
        let value = Word::from_value(10_000);

        mem.write(10, value).unwrap();
        assert_eq!(mem.read(10).unwrap(), value);
    }

    #[test]
    fn test_bounds() {
        let mem = Memory::new();

        assert!(mem.read(0).is_ok());
        assert!(mem.read(LAST_ADDRESS).is_ok());
        assert_eq!(
            mem.read(250).unwrap_err(),
            MemoryError::AddressOutOfRange(250)
        );
        assert!(mem.read(999).is_err());
    }

    #[test]
    fn test_install() {
        let mut mem = Memory::new();
        let program = vec![
            Word::from_value(10_007),
            Word::from_value(11_007),
            Word::from_value(43_000),
        ];

        mem.install(&program).unwrap();

        assert_eq!(mem.read(0).unwrap().value(), 10_007);
        assert_eq!(mem.read(2).unwrap().value(), 43_000);
        assert_eq!(mem.read(3).unwrap(), Word::ZERO);
    }

    #[test]
    fn test_install_full_capacity() {
        let mut mem = Memory::new();
        let program = vec![Word::from_value(43_000); MEMORY_SIZE];
        mem.install(&program).unwrap();

        let too_big = vec![Word::ZERO; MEMORY_SIZE + 1];
        assert!(matches!(
            mem.install(&too_big),
            Err(MemoryError::ProgramTooLarge { size: 251, .. })
        ));
    }

    #[test]
    fn test_highest_used() {
        let mut mem = Memory::new();
        assert_eq!(mem.highest_used(), 0);

        mem.write(17, Word::from_value(1)).unwrap();
        mem.write(3, Word::from_value(2)).unwrap();
        assert_eq!(mem.highest_used(), 17);
    }
}
