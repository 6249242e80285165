//! Program image files.
//!
//! An image is the persisted form of the register file: one canonical
//! seven-character word per line, covering address 0 through the highest
//! register that differs from `+000000`, with no trailing newline. Loading
//! an image runs the full program-text pipeline, so legacy short bodies and
//! the `-99999` terminator work in files too.

use std::path::Path;
use thiserror::Error;

use crate::loader::parse::{parse_program, LoadError};
use crate::machine::Memory;
use crate::word::Word;

/// Render the used portion of the register file as image text.
pub fn export_image(mem: &Memory) -> String {
    let end = mem.highest_used();
    let mut lines = Vec::with_capacity(end as usize + 1);

    for (addr, word) in mem.iter() {
        if addr > end {
            break;
        }
        lines.push(word.to_string());
    }

    lines.join("\n")
}

/// Write the register file to disk as an image.
pub fn save_image<P: AsRef<Path>>(path: P, mem: &Memory) -> Result<(), ImageError> {
    std::fs::write(path.as_ref(), export_image(mem))
        .map_err(|e| ImageError::Io(e.to_string()))
}

/// Load a program file from disk into a word sequence.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Vec<Word>, ImageError> {
    let source = std::fs::read_to_string(path.as_ref())
        .map_err(|e| ImageError::Io(e.to_string()))?;
    Ok(parse_program(&source)?)
}

/// Errors that can occur reading or writing image files.
#[derive(Debug, Clone, Error)]
pub enum ImageError {
    #[error("io error: {0}")]
    Io(String),

    #[error(transparent)]
    Load(#[from] LoadError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_covers_highest_used() {
        let mut mem = Memory::new();
        mem.write(0, Word::from_value(10_007)).unwrap();
        mem.write(2, Word::from_value(43_000)).unwrap();

        let image = export_image(&mem);

        assert_eq!(image, "+010007\n+000000\n+043000");
        assert!(!image.ends_with('\n'));
    }

    #[test]
    fn test_export_blank_memory_is_single_register() {
        let mem = Memory::new();
        assert_eq!(export_image(&mem), "+000000");
    }

    #[test]
    fn test_export_reloads() {
        let mut mem = Memory::new();
        mem.write(0, Word::from_value(10_007)).unwrap();
        mem.write(1, Word::from_value(-1234)).unwrap();

        let words = parse_program(&export_image(&mem)).unwrap();

        assert_eq!(words, vec![Word::from_value(10_007), Word::from_value(-1234)]);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = std::env::temp_dir();
        let path = dir.join("uvsim-image-test.txt");

        let mut mem = Memory::new();
        mem.write(0, Word::from_value(11_005)).unwrap();
        mem.write(5, Word::from_value(77)).unwrap();

        save_image(&path, &mem).unwrap();
        let words = load_image(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(words.len(), 6);
        assert_eq!(words[0].value(), 11_005);
        assert_eq!(words[5].value(), 77);
    }
}
