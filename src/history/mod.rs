//! Durable calculation history
//!
//! The history file is a comma-separated table with a fixed header. It holds
//! the entries of every past session; a [`History`] value additionally counts
//! the entries appended since it was opened, which scopes listing and undo
//! to the current session.
//!
//! One `History` is opened by the command interpreter and passed by mutable
//! reference to whatever needs to record or revert calculations.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::common::compact::CompactTable;
use crate::common::format::{format_row, parse_records, Record};
use crate::error::{CalcError, Result};

/// Column header of the history file
pub const HEADER: [&str; 4] = ["Operation", "Operand #1", "Operand #2", "Result"];

/// File name used when no location is configured
pub const DEFAULT_HISTORY_FILE: &str = "history.csv";

/// One recorded calculation
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub operation: String,
    pub operand1: f64,
    pub operand2: f64,
    pub result: f64,
}

impl HistoryEntry {
    pub fn new(operation: impl Into<String>, operand1: f64, operand2: f64, result: f64) -> Self {
        Self {
            operation: operation.into(),
            operand1,
            operand2,
            result,
        }
    }

    fn fields(&self) -> [String; 4] {
        [
            self.operation.clone(),
            self.operand1.to_string(),
            self.operand2.to_string(),
            self.result.to_string(),
        ]
    }

    fn to_row(&self) -> String {
        let fields = self.fields();
        let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
        format_row(&refs)
    }

    fn from_record(record: &Record) -> std::result::Result<Self, String> {
        let [operation, operand1, operand2, result] = record.fields.as_slice() else {
            return Err(format!(
                "line {}: expected {} fields, found {}",
                record.line,
                HEADER.len(),
                record.fields.len()
            ));
        };

        let number = |column: &str, text: &str| {
            text.trim().parse::<f64>().map_err(|_| {
                format!("line {}: {} '{}' is not a number", record.line, column, text)
            })
        };

        Ok(Self {
            operation: operation.clone(),
            operand1: number(HEADER[1], operand1.as_str())?,
            operand2: number(HEADER[2], operand2.as_str())?,
            result: number(HEADER[3], result.as_str())?,
        })
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} = {}",
            self.operand1, self.operation, self.operand2, self.result
        )
    }
}

/// What [`History::undo_last`] did
#[derive(Debug, Clone, PartialEq)]
pub enum UndoOutcome {
    /// The current session has not recorded anything; storage is untouched
    NothingToUndo,
    /// The last row of the store was removed
    Removed(HistoryEntry),
}

impl fmt::Display for UndoOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UndoOutcome::NothingToUndo => write!(f, "No operations to undo."),
            UndoOutcome::Removed(entry) => {
                write!(f, "Removed operation\n    {}\nfrom history.", entry)
            }
        }
    }
}

/// Entries recorded during the current session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionListing {
    Empty,
    /// Entries paired with their 0-based row position in the whole store
    Entries(Vec<(usize, HistoryEntry)>),
}

impl SessionListing {
    pub fn len(&self) -> usize {
        match self {
            SessionListing::Empty => 0,
            SessionListing::Entries(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for SessionListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionListing::Empty => write!(f, "History is empty."),
            SessionListing::Entries(rows) => {
                let mut table = CompactTable::new(&HEADER);
                for (index, entry) in rows {
                    table.add_row(*index, &entry.fields());
                }
                f.write_str(&table.render())
            }
        }
    }
}

trait PersistContext<T> {
    fn persist_context(self, path: &Path, action: &str) -> Result<T>;
}

impl<T> PersistContext<T> for io::Result<T> {
    fn persist_context(self, path: &Path, action: &str) -> Result<T> {
        self.map_err(|e| CalcError::persistence(path, format!("failed to {action}: {e}")))
    }
}

/// The history log of one interactive session
#[derive(Debug)]
pub struct History {
    path: PathBuf,
    session_count: usize,
}

impl History {
    /// Open the history file at `path`, creating it with the header if needed
    ///
    /// Existing rows are left untouched and do not count towards the
    /// session.
    ///
    /// # Errors
    /// Returns a persistence error if the file cannot be inspected or
    /// created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if ensure_store(&path)? {
            log::info!("History file created at {}", path.display());
        } else {
            log::info!("History file loaded from {}", path.display());
        }

        Ok(Self {
            path,
            session_count: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of entries appended since this log was opened
    pub fn session_count(&self) -> usize {
        self.session_count
    }

    /// Record a calculation at the end of the store
    ///
    /// The row is flushed and synced before returning. On failure the
    /// session count is unchanged.
    pub fn append(
        &mut self,
        operation_name: &str,
        operand1: f64,
        operand2: f64,
        result: f64,
    ) -> Result<()> {
        self.append_entry(&HistoryEntry::new(operation_name, operand1, operand2, result))
    }

    pub fn append_entry(&mut self, entry: &HistoryEntry) -> Result<()> {
        ensure_store(&self.path)?;

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .persist_context(&self.path, "open for append")?;
        writeln!(file, "{}", entry.to_row()).persist_context(&self.path, "append entry")?;
        file.flush().persist_context(&self.path, "flush")?;
        file.sync_data().persist_context(&self.path, "sync")?;

        self.session_count += 1;
        log::info!("Added '{}' to history", entry);
        Ok(())
    }

    /// Every entry in the store, oldest first, including prior sessions
    pub fn entries(&self) -> Result<Vec<HistoryEntry>> {
        let text = fs::read_to_string(&self.path).persist_context(&self.path, "read")?;
        let records =
            parse_records(&text).map_err(|e| CalcError::persistence(&self.path, e.to_string()))?;

        let mut records = records.into_iter();
        match records.next() {
            None => return Ok(Vec::new()),
            Some(header) if header.fields == HEADER => {}
            Some(header) => {
                return Err(CalcError::persistence(
                    &self.path,
                    format!("unexpected header '{}'", header.fields.join(",")),
                ))
            }
        }

        records
            .map(|record| {
                HistoryEntry::from_record(&record)
                    .map_err(|message| CalcError::persistence(&self.path, message))
            })
            .collect()
    }

    /// Remove the last row of the store if this session recorded anything
    ///
    /// The row removed is whatever is last in storage at the time of the
    /// call. The remaining rows replace the file atomically.
    pub fn undo_last(&mut self) -> Result<UndoOutcome> {
        if self.session_count == 0 {
            log::info!("Nothing to undo");
            return Ok(UndoOutcome::NothingToUndo);
        }

        let mut entries = self.entries()?;
        self.clamp_session(entries.len());
        let Some(removed) = entries.pop() else {
            return Ok(UndoOutcome::NothingToUndo);
        };

        self.rewrite(&entries)?;
        self.session_count -= 1;
        log::info!("Removed '{}' from history", removed);
        Ok(UndoOutcome::Removed(removed))
    }

    /// The rows appended during this session, with their store positions
    pub fn list_session(&self) -> Result<SessionListing> {
        if self.session_count == 0 {
            return Ok(SessionListing::Empty);
        }

        let entries = self.entries()?;
        let total = entries.len();
        let shown = self.session_count.min(total);
        if shown < self.session_count {
            log::warn!(
                "History file holds {} rows but {} were recorded this session",
                total,
                self.session_count
            );
        }
        if shown == 0 {
            return Ok(SessionListing::Empty);
        }

        let rows = entries
            .into_iter()
            .enumerate()
            .skip(total - shown)
            .collect();
        Ok(SessionListing::Entries(rows))
    }

    fn clamp_session(&mut self, total: usize) {
        if self.session_count > total {
            log::warn!(
                "History file holds {} rows, lowering session count from {}",
                total,
                self.session_count
            );
            self.session_count = total;
        }
    }

    fn rewrite(&self, entries: &[HistoryEntry]) -> Result<()> {
        let mut text = format_row(&HEADER);
        text.push('\n');
        for entry in entries {
            text.push_str(&entry.to_row());
            text.push('\n');
        }

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).persist_context(&self.path, "create temporary file")?;
        tmp.write_all(text.as_bytes())
            .persist_context(&self.path, "write temporary file")?;
        // Keep the store's permissions; temporary files are created 0600.
        if let Ok(meta) = fs::metadata(&self.path) {
            tmp.as_file()
                .set_permissions(meta.permissions())
                .persist_context(&self.path, "copy permissions")?;
        }
        tmp.as_file()
            .sync_all()
            .persist_context(&self.path, "sync temporary file")?;
        tmp.persist(&self.path)
            .map_err(|e| e.error)
            .persist_context(&self.path, "replace")?;
        Ok(())
    }
}

/// Create the store with its header when it holds no records
///
/// A missing file, an empty file and one containing only blank lines all get
/// a fresh header. Also terminates a last row written without a newline so
/// the next append starts on its own line. Returns whether the header was
/// written.
fn ensure_store(path: &Path) -> Result<bool> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e).persist_context(path, "read"),
    };

    // An unparseable file is left alone; reads report it.
    let has_records = parse_records(&text).map_or(true, |records| !records.is_empty());
    if !has_records {
        let mut header = format_row(&HEADER);
        header.push('\n');
        fs::write(path, header).persist_context(path, "create")?;
        return Ok(true);
    }

    if !text.ends_with('\n') {
        let mut file = OpenOptions::new()
            .append(true)
            .open(path)
            .persist_context(path, "open")?;
        file.write_all(b"\n")
            .persist_context(path, "terminate last row")?;
    }
    Ok(false)
}

#[cfg(test)]
mod history_tests;
