//! Checked arithmetic over words.
//!
//! All four accumulator operations funnel through [`checked_op`]: the
//! operand values are combined in 64-bit space, the result is range-checked
//! against the six-digit word bound, and only then re-encoded as a canonical
//! [`Word`]. Division truncates toward zero and is preceded by an explicit
//! zero-divisor check.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::word::{Word, WordError};

/// The arithmetic operation selected by an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        };
        f.write_str(symbol)
    }
}

/// Apply `lhs op rhs`, failing on division by zero or six-digit overflow.
pub fn checked_op(lhs: Word, rhs: Word, op: ArithOp) -> Result<Word, WordError> {
    let a = lhs.value() as i64;
    let b = rhs.value() as i64;

    let result = match op {
        ArithOp::Add => a + b,
        ArithOp::Sub => a - b,
        ArithOp::Mul => a * b,
        ArithOp::Div => {
            if rhs.is_zero() {
                return Err(WordError::DivisionByZero);
            }
            a / b
        }
    };

    if result > Word::MAX as i64 || result < Word::MIN as i64 {
        return Err(WordError::Overflow { op, lhs, rhs, result });
    }

    Ok(Word::from_value(result as i32))
}

/// Add two words, returning the canonical sum.
#[inline]
pub fn add(a: Word, b: Word) -> Result<Word, WordError> {
    checked_op(a, b, ArithOp::Add)
}

/// Subtract two words (a - b).
#[inline]
pub fn subtract(a: Word, b: Word) -> Result<Word, WordError> {
    checked_op(a, b, ArithOp::Sub)
}

/// Multiply two words.
#[inline]
pub fn multiply(a: Word, b: Word) -> Result<Word, WordError> {
    checked_op(a, b, ArithOp::Mul)
}

/// Divide two words (a / b), truncating toward zero.
#[inline]
pub fn divide(a: Word, b: Word) -> Result<Word, WordError> {
    checked_op(a, b, ArithOp::Div)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn w(value: i32) -> Word {
        Word::from_value(value)
    }

    #[test]
    fn test_add() {
        assert_eq!(add(w(4321), w(1234)).unwrap(), w(5555));
        assert_eq!(add(w(-1), w(1)).unwrap(), Word::ZERO);
    }

    #[test]
    fn test_add_overflow() {
        let err = add(w(999_999), w(1)).unwrap_err();
        assert!(matches!(err, WordError::Overflow { result: 1_000_000, .. }));

        // Negative overflow as well.
        assert!(add(w(-500_000), w(-500_000)).is_err());
    }

    #[test]
    fn test_zero_sum_is_canonical() {
        let sum = add(w(-100_000), w(100_000)).unwrap();
        assert_eq!(sum.to_string(), "+000000");
    }

    #[test]
    fn test_subtract() {
        assert_eq!(subtract(w(10), w(25)).unwrap(), w(-15));
        assert!(subtract(w(-999_999), w(1)).is_err());
    }

    #[test]
    fn test_multiply_overflow() {
        assert_eq!(multiply(w(1000), w(999)).unwrap(), w(999_000));
        assert!(multiply(w(1000), w(1000)).is_err());
        // i32 arithmetic alone would wrap here; the i64 widening must not.
        assert!(multiply(w(999_999), w(999_999)).is_err());
    }

    #[test]
    fn test_divide_truncates() {
        assert_eq!(divide(w(7), w(2)).unwrap(), w(3));
        assert_eq!(divide(w(-7), w(2)).unwrap(), w(-3));
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(divide(w(7), Word::ZERO).unwrap_err(), WordError::DivisionByZero);
    }

    proptest! {
        #[test]
        fn prop_add_then_subtract_restores(
            x in Word::MIN..=Word::MAX,
            y in Word::MIN..=Word::MAX,
        ) {
            if let Ok(sum) = add(w(x), w(y)) {
                // No overflow in the subtraction either, by construction.
                let restored = subtract(sum, w(y)).unwrap();
                prop_assert_eq!(restored, w(x));
            }
        }

        #[test]
        fn prop_overflow_never_constructs_a_word(
            x in Word::MIN..=Word::MAX,
            y in Word::MIN..=Word::MAX,
        ) {
            for op in [ArithOp::Add, ArithOp::Sub, ArithOp::Mul] {
                if let Ok(word) = checked_op(w(x), w(y), op) {
                    prop_assert!(word.value() >= Word::MIN && word.value() <= Word::MAX);
                }
            }
        }
    }
}
