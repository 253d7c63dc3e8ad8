//! Arithmetic operations
//!
//! The four supported operations are variants of a closed enum. Every variant
//! runs through the same [`Operation::calculate`] sequence: validate the
//! operands, execute the variant's arithmetic, then emit a diagnostic record.

use std::fmt;

use crate::error::{CalcError, Result};

/// One arithmetic capability of the calculator
///
/// Variants carry no state, so a value can be copied and reused freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `a + b`
    Add,
    /// `a - b`
    Subtract,
    /// `a * b`
    Multiply,
    /// `a / b`, rejecting a zero divisor
    Divide,
}

impl Operation {
    /// All operations, in the order they are listed to users
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    /// Human-readable name, also stored in the history file
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Add => "Add",
            Operation::Subtract => "Subtract",
            Operation::Multiply => "Multiply",
            Operation::Divide => "Divide",
        }
    }

    /// Short description used by the interactive help
    pub fn description(&self) -> &'static str {
        match self {
            Operation::Add => "Adds two numbers.",
            Operation::Subtract => "Subtracts two numbers.",
            Operation::Multiply => "Multiplies two numbers.",
            Operation::Divide => "Divides two numbers.",
        }
    }

    /// Check that both operands are finite numbers
    ///
    /// # Errors
    /// Returns [`CalcError::InvalidOperand`] naming the first offending value
    /// when either operand is NaN or infinite.
    pub fn validate(&self, a: f64, b: f64) -> Result<()> {
        for value in [a, b] {
            if !value.is_finite() {
                return Err(CalcError::invalid_operand(value));
            }
        }
        Ok(())
    }

    /// Variant-specific arithmetic, without validation or logging
    ///
    /// # Errors
    /// Returns [`CalcError::DivisionByZero`] for `Divide` when `b == 0`.
    pub fn execute(&self, a: f64, b: f64) -> Result<f64> {
        match self {
            Operation::Add => Ok(a + b),
            Operation::Subtract => Ok(a - b),
            Operation::Multiply => Ok(a * b),
            Operation::Divide => {
                if b == 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                Ok(a / b)
            }
        }
    }

    /// Validate, execute and record the calculation
    ///
    /// The order of steps is fixed for every variant. The diagnostic record
    /// is emitted only on success and never changes the returned value.
    ///
    /// # Examples
    /// ```
    /// use calc_history::operations::Operation;
    ///
    /// assert_eq!(Operation::Multiply.calculate(3.0, 4.0).unwrap(), 12.0);
    /// assert!(Operation::Divide.calculate(1.0, 0.0).is_err());
    /// assert!(Operation::Add.calculate(f64::NAN, 1.0).is_err());
    /// ```
    pub fn calculate(&self, a: f64, b: f64) -> Result<f64> {
        self.validate(a, b)?;
        let result = self.execute(a, b)?;
        log::info!("{} {} {} = {}", a, self.name(), b, result);
        Ok(result)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Convert a textual operand into a number
///
/// Surrounding whitespace is ignored. Text that is not a number, and the
/// non-finite spellings `nan`/`inf`, are rejected.
///
/// # Errors
/// Returns [`CalcError::InvalidOperand`] carrying the original text.
pub fn parse_operand(text: &str) -> Result<f64> {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CalcError::invalid_operand(text)),
    }
}
