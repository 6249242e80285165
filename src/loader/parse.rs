//! Program text validation.
//!
//! Turns a block of raw program text into the word sequence to install into
//! registers 0 onward. The whole load either succeeds or fails; a failure
//! reports the 1-based line number and the offending text, and nothing
//! reaches the register file.

use thiserror::Error;

use crate::machine::MEMORY_SIZE;
use crate::word::Word;

/// The end-of-program marker. Discarded during loading; never stored.
pub const SENTINEL: &str = "-99999";

/// Parse raw program text into an ordered word sequence.
///
/// Rules, applied per line after trailing blank lines are stripped:
/// - 4-character bodies, optionally sign-prefixed, are widened with implied
///   leading zeros (legacy short-opcode form: `1020` becomes `010020`)
/// - seven characters with a leading sign: a signed word
/// - six digits: an unsigned word, implicitly positive
/// - the literal `-99999`: end of program, sentinel discarded
/// - an empty line: end of input
/// - anything else fails with [`LoadError::Format`]
pub fn parse_program(source: &str) -> Result<Vec<Word>, LoadError> {
    let mut lines: Vec<&str> = source.lines().collect();
    while lines.last() == Some(&"") {
        lines.pop();
    }

    if lines.len() > MEMORY_SIZE {
        return Err(LoadError::Capacity { lines: lines.len() });
    }

    let mut words = Vec::with_capacity(lines.len());

    for (idx, raw) in lines.iter().enumerate() {
        let line = widen(raw);

        if line.is_empty() || line == SENTINEL {
            break;
        }

        match line_to_word(&line) {
            Some(word) => words.push(word),
            None => {
                return Err(LoadError::Format {
                    line: idx + 1,
                    content: raw.to_string(),
                });
            }
        }
    }

    Ok(words)
}

/// Widen a legacy short instruction body with implied leading zeros.
///
/// A 4-character body `XYAB` becomes `0XY0AB`; a 5-character signed body
/// `sXYAB` becomes `s0XY0AB`. A 5-character line without a sign is left
/// alone (and rejected downstream): it is a 5-digit number, not a short
/// body. Everything else passes through.
fn widen(line: &str) -> String {
    if !line.is_ascii() {
        return line.to_string();
    }
    match line.len() {
        4 => format!("0{}0{}", &line[..2], &line[2..]),
        5 if line.starts_with('+') || line.starts_with('-') => {
            format!("{}0{}0{}", &line[..1], &line[1..3], &line[3..])
        }
        _ => line.to_string(),
    }
}

/// Classify one widened line as a word, or reject it.
///
/// Stricter than console input: no zero literals, exact widths only.
fn line_to_word(line: &str) -> Option<Word> {
    let bytes = line.as_bytes();
    match bytes.len() {
        7 if matches!(bytes[0], b'+' | b'-') && bytes[1..].iter().all(u8::is_ascii_digit) => {
            line.parse::<i32>().ok().map(Word::from_value)
        }
        6 if bytes.iter().all(u8::is_ascii_digit) => {
            line.parse::<i32>().ok().map(Word::from_value)
        }
        _ => None,
    }
}

/// Errors that can occur while loading a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// A line is not a valid instruction word.
    #[error("line {line}: `{content}` is not a valid instruction")]
    Format { line: usize, content: String },

    /// The program would occupy more than 250 registers.
    #[error("program contains {lines} lines but only 250 registers are available")]
    Capacity { lines: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let words = parse_program("+010007\n+011007\n+043000").unwrap();
        assert_eq!(words.len(), 3);
        assert_eq!(words[0].value(), 10_007);
        assert_eq!(words[2].value(), 43_000);
    }

    #[test]
    fn test_unsigned_lines_are_positive() {
        let words = parse_program("010007\n043000").unwrap();
        assert_eq!(words[0].to_string(), "+010007");
    }

    #[test]
    fn test_sentinel_ends_program() {
        let words = parse_program("+010007\n-99999\n+043000").unwrap();
        // Everything after the sentinel is ignored, the sentinel discarded.
        assert_eq!(words.len(), 1);
    }

    #[test]
    fn test_blank_line_ends_program() {
        let words = parse_program("+010007\n\n+043000").unwrap();
        assert_eq!(words.len(), 1);
    }

    #[test]
    fn test_trailing_blank_lines_stripped() {
        let words = parse_program("+043000\n\n\n").unwrap();
        assert_eq!(words.len(), 1);
    }

    #[test]
    fn test_legacy_four_character_widening() {
        let words = parse_program("1020").unwrap();
        assert_eq!(words[0].to_string(), "+010020");
    }

    #[test]
    fn test_legacy_five_character_widening() {
        let words = parse_program("+1020\n-4300").unwrap();
        assert_eq!(words[0].to_string(), "+010020");
        assert_eq!(words[1].to_string(), "-043000");
    }

    #[test]
    fn test_five_digit_signed_rejected() {
        let err = parse_program("+010007\n+00042").unwrap_err();
        assert_eq!(err, LoadError::Format { line: 2, content: "+00042".to_string() });
    }

    #[test]
    fn test_seven_chars_without_sign_rejected() {
        assert!(matches!(
            parse_program("0100071"),
            Err(LoadError::Format { line: 1, .. })
        ));
    }

    #[test]
    fn test_five_digits_without_sign_rejected() {
        assert_eq!(
            parse_program("12345").unwrap_err(),
            LoadError::Format { line: 1, content: "12345".to_string() }
        );
        // Short zero literals are console-only; the loader rejects them.
        assert!(matches!(
            parse_program("0"),
            Err(LoadError::Format { line: 1, .. })
        ));
    }

    #[test]
    fn test_non_numeric_rejected_with_position() {
        let err = parse_program("+010007\n+01a007\n+043000").unwrap_err();
        assert_eq!(err, LoadError::Format { line: 2, content: "+01a007".to_string() });
    }

    #[test]
    fn test_capacity() {
        let full = vec!["+043000"; MEMORY_SIZE].join("\n");
        assert_eq!(parse_program(&full).unwrap().len(), MEMORY_SIZE);

        let over = vec!["+043000"; MEMORY_SIZE + 1].join("\n");
        assert_eq!(
            parse_program(&over).unwrap_err(),
            LoadError::Capacity { lines: 251 }
        );
    }

    #[test]
    fn test_failure_is_total() {
        // One bad line anywhere fails the whole load.
        let err = parse_program("+043000\nnonsense").unwrap_err();
        assert!(matches!(err, LoadError::Format { line: 2, .. }));
    }
}
