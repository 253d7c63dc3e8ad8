//! Four-function calculator with a persistent, session-aware history
//!
//! A command name is resolved to an [`operations::Operation`] by
//! [`operation_factory::create_operation`], applied through a
//! [`calculation::Calculation`], and the result is recorded in a
//! [`history::History`]. The [`repl`] module ties these together behind an
//! interactive prompt.

pub mod calculation;
pub mod common;
pub mod config;
pub mod error;
pub mod history;
pub mod operation_factory;
pub mod operations;
pub mod repl;

pub use error::{CalcError, Result};
