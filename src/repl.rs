//! Interactive command interpreter
//!
//! Reads one command per line, resolves calculations through the operation
//! factory, records successes in the [`History`] it was given and renders
//! every failure as text so the loop can continue.

use std::io::{BufRead, Write};

use crate::calculation::Calculation;
use crate::error::{CalcError, Result};
use crate::history::History;
use crate::operation_factory::create_operation;
use crate::operations::{parse_operand, Operation};

pub const BANNER: &str = "Welcome to the calculator! Type 'help' for a list of commands.";
pub const PROMPT: &str = "Enter a command: ";
pub const INVALID_INPUT: &str =
    "Invalid input. Please enter a valid operation and two numbers. Type 'help' for instructions.";
pub const EXITING: &str = "Exiting calculator...";

/// One parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Exit,
    Undo,
    List,
    Calculate(Calculation),
    Empty,
}

impl Command {
    /// Parse a line of user input
    ///
    /// Keywords are case-insensitive. Calculation lines have exactly three
    /// words: operation name and two operands. Operands are checked before
    /// the operation name is resolved.
    ///
    /// # Errors
    /// - [`CalcError::MalformedCommand`] for the wrong number of words
    /// - [`CalcError::InvalidOperand`] when an operand is not a number
    /// - [`CalcError::UnknownOperation`] for an unrecognised operation name
    pub fn parse(line: &str) -> Result<Command> {
        let words: Vec<&str> = line.split_whitespace().collect();

        match words.as_slice() {
            [] => Ok(Command::Empty),
            [keyword] => match keyword.to_lowercase().as_str() {
                "help" => Ok(Command::Help),
                "exit" => Ok(Command::Exit),
                "undo" => Ok(Command::Undo),
                "list" => Ok(Command::List),
                _ => Err(CalcError::MalformedCommand {
                    input: line.trim().to_string(),
                }),
            },
            [name, operand1, operand2] => {
                let operand1 = parse_operand(operand1)?;
                let operand2 = parse_operand(operand2)?;
                let operation = create_operation(name)?;
                Ok(Command::Calculate(Calculation::new(
                    operation, operand1, operand2,
                )))
            }
            _ => Err(CalcError::MalformedCommand {
                input: line.trim().to_string(),
            }),
        }
    }
}

/// Result of executing one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    /// The command failed; the message has already been written
    Failed,
    Exit,
}

/// Help text, one line per command
pub fn help_lines() -> Vec<String> {
    let mut lines = vec!["Available commands:".to_string()];
    for op in Operation::ALL {
        let name = op.name().to_lowercase();
        lines.push(format!(
            "    ✶ {:<8} <num1> <num2>    : {}",
            name,
            op.description()
        ));
    }
    lines.push(format!("    ✶ {:<25} : Undoes the last calculation.", "undo"));
    lines.push(format!(
        "    ✶ {:<25} : Lists this session's calculations.",
        "list"
    ));
    lines.push(format!("    ✶ {:<25} : Shows this help.", "help"));
    lines.push(format!("    ✶ {:<25} : Exits the calculator.", "exit"));
    lines
}

pub struct Repl<'h, R, W> {
    input: R,
    output: W,
    history: &'h mut History,
}

impl<'h, R: BufRead, W: Write> Repl<'h, R, W> {
    pub fn new(input: R, output: W, history: &'h mut History) -> Self {
        Self {
            input,
            output,
            history,
        }
    }

    /// Prompt and execute lines until `exit` or end of input
    ///
    /// # Errors
    /// Only failures to read input or write output end the loop early.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "{BANNER}")?;

        loop {
            write!(self.output, "{PROMPT}")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                writeln!(self.output, "{EXITING}")?;
                break;
            }

            if self.execute(&line)? == Step::Exit {
                break;
            }
        }

        Ok(())
    }

    /// Execute one line and write its response
    pub fn execute(&mut self, line: &str) -> Result<Step> {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(CalcError::MalformedCommand { input }) => {
                log::warn!("Malformed command '{}'", input);
                writeln!(self.output, "{INVALID_INPUT}")?;
                return Ok(Step::Failed);
            }
            Err(e) => return self.report(e),
        };

        match command {
            Command::Empty => Ok(Step::Continue),
            Command::Help => {
                for line in help_lines() {
                    writeln!(self.output, "{line}")?;
                }
                Ok(Step::Continue)
            }
            Command::Exit => {
                writeln!(self.output, "{EXITING}")?;
                Ok(Step::Exit)
            }
            Command::Undo => match self.history.undo_last() {
                Ok(outcome) => {
                    writeln!(self.output, "{outcome}")?;
                    Ok(Step::Continue)
                }
                Err(e) => self.report(e),
            },
            Command::List => match self.history.list_session() {
                Ok(listing) => {
                    writeln!(self.output, "{listing}")?;
                    Ok(Step::Continue)
                }
                Err(e) => self.report(e),
            },
            Command::Calculate(calculation) => self.calculate(calculation),
        }
    }

    fn calculate(&mut self, calculation: Calculation) -> Result<Step> {
        let result = match calculation.perform_operation() {
            Ok(result) => result,
            Err(e) => return self.report(e),
        };
        writeln!(self.output, "Result: {result}")?;

        match self.history.append_entry(&calculation.into_entry(result)) {
            Ok(()) => Ok(Step::Continue),
            Err(e) => self.report(e),
        }
    }

    fn report(&mut self, error: CalcError) -> Result<Step> {
        log::warn!("Command failed: {}", error);
        writeln!(self.output, "Error: {error}")?;
        Ok(Step::Failed)
    }
}
