//! Error types for fixed-point arithmetic
//!
//! Every checked operation in the pricing core maps its `None` into one of
//! these variants so the caller learns which step failed.

use thiserror::Error;

/// Errors that can occur during fixed-point arithmetic operations
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    /// Result exceeds the representable range of the target type
    #[error("Overflow in {operation}")]
    Overflow { operation: &'static str },

    /// Unsigned subtraction went below zero
    #[error("Underflow in {operation}")]
    Underflow { operation: &'static str },

    /// Division by zero in fixed-point arithmetic
    #[error("Division by zero in {operation}")]
    DivisionByZero { operation: &'static str },

    /// Narrowing conversion lost bits
    #[error("Cast failed: {value_hint} does not fit {target}")]
    CastFailed {
        value_hint: &'static str,
        target: &'static str,
    },
}

impl MathError {
    pub const fn overflow(operation: &'static str) -> Self {
        Self::Overflow { operation }
    }

    pub const fn underflow(operation: &'static str) -> Self {
        Self::Underflow { operation }
    }

    pub const fn division_by_zero(operation: &'static str) -> Self {
        Self::DivisionByZero { operation }
    }
}

pub type MathResult<T> = std::result::Result<T, MathError>;
