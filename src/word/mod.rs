//! The signed six-digit decimal word the UVSim computes with.
//!
//! This module provides:
//! - [`Word`] - a register-sized value with the canonical `[+-]DDDDDD` encoding
//! - [`arith`] - checked arithmetic over words

mod value;
pub mod arith;

pub use value::{Word, WordError};
pub use arith::{ArithOp, checked_op};
