#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use calc_history::history::History;
use tempfile::TempDir;

pub const HEADER_LINE: &str = "Operation,Operand #1,Operand #2,Result\n";

/// A history file inside its own temporary directory
pub struct TempHistory {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl TempHistory {
    /// A location with no file yet
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        Self { dir, path }
    }

    /// A location pre-populated with rows from an earlier session
    pub fn with_rows(rows: &[&str]) -> Self {
        let temp = Self::new();
        let mut text = HEADER_LINE.to_string();
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        fs::write(&temp.path, text).unwrap();
        temp
    }

    pub fn open(&self) -> History {
        History::open(&self.path).unwrap()
    }

    pub fn contents(&self) -> String {
        fs::read_to_string(&self.path).unwrap()
    }
}

pub fn assert_error_contains(err: &str, expected: &str, context: &str) {
    assert!(
        err.to_lowercase().contains(&expected.to_lowercase()),
        "{}: Error should contain '{}', got: {}",
        context,
        expected,
        err
    );
}
