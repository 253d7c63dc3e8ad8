use std::str::FromStr;

use crate::error::{CalcError, Result};
use crate::operations::Operation;

/// Resolve a command name to an [`Operation`]
///
/// The name is lower-cased and then matched exactly against `add`,
/// `subtract`, `multiply` and `divide`. No trimming, prefix or fuzzy
/// matching is attempted.
///
/// # Errors
/// Returns [`CalcError::UnknownOperation`] when the name matches none of the
/// four operations.
///
/// # Examples
/// ```
/// use calc_history::operation_factory::create_operation;
/// use calc_history::operations::Operation;
///
/// assert_eq!(create_operation("add").unwrap(), Operation::Add);
/// assert_eq!(create_operation("DiViDe").unwrap(), Operation::Divide);
/// assert!(create_operation("modulo").is_err());
/// ```
pub fn create_operation(name: &str) -> Result<Operation> {
    let operation = match name.to_lowercase().as_str() {
        "add" => Operation::Add,
        "subtract" => Operation::Subtract,
        "multiply" => Operation::Multiply,
        "divide" => Operation::Divide,
        _ => return Err(CalcError::unknown_operation(name)),
    };

    log::debug!("Resolved '{}' to {}", name, operation);
    Ok(operation)
}

impl FromStr for Operation {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        create_operation(s)
    }
}
