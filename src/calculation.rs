use std::fmt;

use crate::error::Result;
use crate::history::HistoryEntry;
use crate::operations::Operation;

/// A single request to apply an [`Operation`] to two operands
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calculation {
    pub operation: Operation,
    pub operand1: f64,
    pub operand2: f64,
}

impl Calculation {
    pub fn new(operation: Operation, operand1: f64, operand2: f64) -> Self {
        Self {
            operation,
            operand1,
            operand2,
        }
    }

    /// Run the operation on the stored operands
    ///
    /// Failures from the operation are returned unchanged.
    pub fn perform_operation(&self) -> Result<f64> {
        perform_operation(self.operation, self.operand1, self.operand2)
    }

    /// Build the history record for this calculation and its result
    pub fn into_entry(self, result: f64) -> HistoryEntry {
        HistoryEntry::new(self.operation.name(), self.operand1, self.operand2, result)
    }
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.operand1, self.operation, self.operand2)
    }
}

/// Apply `operation` to the operands and return its result
pub fn perform_operation(operation: Operation, operand1: f64, operand2: f64) -> Result<f64> {
    operation.calculate(operand1, operand2)
}
