//! Fixed-width signed decimal words.
//!
//! Every UVSim register, the accumulator included, holds one `Word`: a signed
//! integer in [-999999, +999999] whose canonical text form is exactly one
//! sign character followed by six decimal digits. Zero is always `+000000`;
//! a negative zero cannot be constructed.

use std::fmt;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::word::arith::ArithOp;

/// A signed six-digit decimal word.
///
/// Used for:
/// - Memory cells (the UVSim has 250 of these)
/// - The accumulator
/// - Instructions (three opcode digits, three address digits)
///
/// Value range: -999,999 to +999,999
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Word(i32);

impl Word {
    /// Maximum positive value: +999,999
    pub const MAX: i32 = 999_999;

    /// Minimum negative value: -999,999
    pub const MIN: i32 = -999_999;

    /// The blank word every register powers on with.
    pub const ZERO: Word = Word(0);

    /// Create a word from an integer value.
    ///
    /// # Panics
    /// Panics if value is outside the range [-999999, +999999].
    pub fn from_value(value: i32) -> Self {
        assert!(
            value >= Self::MIN && value <= Self::MAX,
            "Value {} out of range for Word [{}, {}]",
            value, Self::MIN, Self::MAX
        );
        Word(value)
    }

    /// Get the integer value.
    #[inline]
    pub const fn value(&self) -> i32 {
        self.0
    }

    /// Check if this word is blank (`+000000`).
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if this word is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Parse a word the way the console input path does.
    ///
    /// Accepted forms:
    /// - exactly seven characters, a `+` or `-` sign followed by six digits
    /// - exactly six digits, implicitly positive
    /// - a zero literal: an optionally signed digit string with value zero
    ///   (`0`, `000`, `+0`), stored as `+000000`
    ///
    /// Whitespace is not trimmed; anything else is a [`WordError::Format`].
    pub fn parse(text: &str) -> Result<Self, WordError> {
        let bytes = text.as_bytes();

        let signed = matches!(bytes.first(), Some(b'+') | Some(b'-'));
        let digits = if signed { &bytes[1..] } else { bytes };
        let numeric = !digits.is_empty() && digits.iter().all(u8::is_ascii_digit);

        if !numeric {
            return Err(WordError::Format { text: text.to_string() });
        }

        match bytes.len() {
            7 if signed => {
                // text is sign + six digits and parses as i32
                let value: i32 = text.parse().map_err(|_| WordError::Format {
                    text: text.to_string(),
                })?;
                Ok(Word(value))
            }
            6 if !signed => {
                let value: i32 = text.parse().map_err(|_| WordError::Format {
                    text: text.to_string(),
                })?;
                Ok(Word(value))
            }
            _ => {
                // Zero literals of any width are accepted on the console path.
                let all_zero = digits.iter().all(|d| *d == b'0');
                if all_zero {
                    Ok(Word::ZERO)
                } else {
                    Err(WordError::Format { text: text.to_string() })
                }
            }
        }
    }

    /// Apply a checked arithmetic operation, `self op rhs`.
    ///
    /// Division by a zero word fails before dividing; any result whose
    /// magnitude exceeds six digits fails with [`WordError::Overflow`].
    pub fn checked_op(self, rhs: Word, op: ArithOp) -> Result<Word, WordError> {
        crate::word::arith::checked_op(self, rhs, op)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `{:+07}` prints the sign plus a zero-padded six-digit magnitude,
        // and renders zero as `+000000`.
        write!(f, "{:+07}", self.0)
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({})", self)
    }
}

impl From<Word> for String {
    fn from(word: Word) -> Self {
        word.to_string()
    }
}

impl TryFrom<String> for Word {
    type Error = WordError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Word::parse(&text)
    }
}

/// Errors produced by word parsing and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordError {
    /// The text is not a valid signed six-digit word.
    #[error("`{text}` is not a valid signed six-digit word")]
    Format { text: String },

    /// An arithmetic result does not fit in six digits.
    #[error("overflow: {lhs} {op} {rhs} = {result} has more digits than a register can hold")]
    Overflow {
        op: ArithOp,
        lhs: Word,
        rhs: Word,
        result: i64,
    },

    /// The divisor register holds `+000000`.
    #[error("division by zero")]
    DivisionByZero,
}
