use super::*;
use eyre::Result;
use tempfile::tempdir;

const HEADER_LINE: &str = "Operation,Operand #1,Operand #2,Result\n";

#[test]
fn test_open_creates_file_with_header() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("history.csv");

    let history = History::open(&path)?;
    assert_eq!(history.session_count(), 0);
    assert_eq!(fs::read_to_string(&path)?, HEADER_LINE);
    Ok(())
}

#[test]
fn test_open_keeps_existing_rows() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("history.csv");
    let existing = format!("{HEADER_LINE}Add,1,2,3\n");
    fs::write(&path, &existing)?;

    let history = History::open(&path)?;
    assert_eq!(history.session_count(), 0);
    assert_eq!(fs::read_to_string(&path)?, existing);
    assert_eq!(history.entries()?.len(), 1);
    Ok(())
}

#[test]
fn test_open_writes_header_into_empty_file() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("history.csv");
    fs::write(&path, "")?;

    History::open(&path)?;
    assert_eq!(fs::read_to_string(&path)?, HEADER_LINE);
    Ok(())
}

#[test]
fn test_open_terminates_unfinished_last_row() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("history.csv");
    fs::write(&path, format!("{HEADER_LINE}Add,1,2,3"))?;

    let mut history = History::open(&path)?;
    history.append("Multiply", 2.0, 2.0, 4.0)?;
    assert_eq!(
        fs::read_to_string(&path)?,
        format!("{HEADER_LINE}Add,1,2,3\nMultiply,2,2,4\n")
    );
    Ok(())
}

#[test]
fn test_append_writes_rows_in_order() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("history.csv");
    let mut history = History::open(&path)?;

    history.append("Add", 5.0, 3.0, 8.0)?;
    history.append("Subtract", 10.0, 5.0, 5.0)?;

    assert_eq!(history.session_count(), 2);
    assert_eq!(
        fs::read_to_string(&path)?,
        format!("{HEADER_LINE}Add,5,3,8\nSubtract,10,5,5\n")
    );
    Ok(())
}

#[test]
fn test_append_failure_keeps_count() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("history.csv");
    let mut history = History::open(&path)?;

    // Replace the store with a directory so it can no longer be opened for append
    fs::remove_file(&path)?;
    fs::create_dir(&path)?;

    let err = history.append("Add", 1.0, 1.0, 2.0).unwrap_err();
    assert!(err.is_persistence());
    assert_eq!(history.session_count(), 0);
    Ok(())
}

#[test]
fn test_undo_with_empty_session_leaves_prior_rows() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("history.csv");
    let existing = format!("{HEADER_LINE}Add,1,2,3\nDivide,8,2,4\n");
    fs::write(&path, &existing)?;

    let mut history = History::open(&path)?;
    let outcome = history.undo_last()?;

    assert_eq!(outcome, UndoOutcome::NothingToUndo);
    assert_eq!(outcome.to_string(), "No operations to undo.");
    assert_eq!(fs::read_to_string(&path)?, existing);
    assert_eq!(history.session_count(), 0);
    Ok(())
}

#[test]
fn test_undo_removes_last_row() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("history.csv");
    let mut history = History::open(&path)?;
    history.append("Add", 5.0, 3.0, 8.0)?;

    let outcome = history.undo_last()?;
    assert_eq!(
        outcome,
        UndoOutcome::Removed(HistoryEntry::new("Add", 5.0, 3.0, 8.0))
    );
    assert_eq!(
        outcome.to_string(),
        "Removed operation\n    5 Add 3 = 8\nfrom history."
    );
    assert_eq!(history.session_count(), 0);
    assert_eq!(fs::read_to_string(&path)?, HEADER_LINE);
    Ok(())
}

#[test]
fn test_undo_targets_last_row_in_storage() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("history.csv");
    let mut history = History::open(&path)?;
    history.append("Add", 1.0, 1.0, 2.0)?;

    // Another writer appended after us; storage is the source of truth
    let mut file = OpenOptions::new().append(true).open(&path)?;
    writeln!(file, "Multiply,3,3,9")?;

    let outcome = history.undo_last()?;
    assert_eq!(
        outcome,
        UndoOutcome::Removed(HistoryEntry::new("Multiply", 3.0, 3.0, 9.0))
    );
    assert_eq!(history.entries()?, vec![HistoryEntry::new("Add", 1.0, 1.0, 2.0)]);
    Ok(())
}

#[test]
fn test_undo_after_external_truncation_is_a_no_op() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("history.csv");
    let mut history = History::open(&path)?;
    history.append("Add", 1.0, 1.0, 2.0)?;
    fs::write(&path, HEADER_LINE)?;

    assert_eq!(history.undo_last()?, UndoOutcome::NothingToUndo);
    assert_eq!(history.session_count(), 0);
    Ok(())
}

#[test]
fn test_list_empty_session() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("history.csv");
    fs::write(&path, format!("{HEADER_LINE}Add,1,2,3\n"))?;

    let history = History::open(&path)?;
    let listing = history.list_session()?;
    assert_eq!(listing, SessionListing::Empty);
    assert_eq!(listing.to_string(), "History is empty.");
    Ok(())
}

#[test]
fn test_list_shows_only_this_session() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("history.csv");
    fs::write(&path, format!("{HEADER_LINE}Add,1,2,3\nDivide,8,2,4\n"))?;

    let mut history = History::open(&path)?;
    history.append("Subtract", 10.0, 5.0, 5.0)?;

    let listing = history.list_session()?;
    assert_eq!(
        listing,
        SessionListing::Entries(vec![(2, HistoryEntry::new("Subtract", 10.0, 5.0, 5.0))])
    );
    assert_eq!(
        listing.to_string(),
        "   Operation  Operand #1  Operand #2  Result\n2   Subtract          10           5       5"
    );
    Ok(())
}

#[test]
fn test_entries_read_quoted_and_crlf_rows() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("history.csv");
    fs::write(
        &path,
        "Operation,Operand #1,Operand #2,Result\r\nAdd,1.0,2.0,3.0\r\n\"Divide\",8.0,2.0,4.0\r\n",
    )?;

    let history = History::open(&path)?;
    assert_eq!(
        history.entries()?,
        vec![
            HistoryEntry::new("Add", 1.0, 2.0, 3.0),
            HistoryEntry::new("Divide", 8.0, 2.0, 4.0),
        ]
    );
    Ok(())
}

#[test]
fn test_entries_reject_foreign_header() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("history.csv");
    fs::write(&path, "a,b,c\n1,2,3\n")?;

    let history = History::open(&path)?;
    let err = history.entries().unwrap_err();
    assert!(err.is_persistence());
    assert!(err.to_string().contains("unexpected header"));
    Ok(())
}

#[test]
fn test_entries_report_bad_rows_by_line() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("history.csv");
    fs::write(&path, format!("{HEADER_LINE}Add,1,2,3\nAdd,x,2,3\n"))?;

    let history = History::open(&path)?;
    let message = history.entries().unwrap_err().to_string();
    assert!(message.contains("line 3"), "got: {message}");

    fs::write(&path, format!("{HEADER_LINE}Add,1,2\n"))?;
    let message = history.entries().unwrap_err().to_string();
    assert!(message.contains("expected 4 fields, found 3"), "got: {message}");
    Ok(())
}

#[test]
fn test_fractional_values_survive_storage() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("history.csv");
    let mut history = History::open(&path)?;
    history.append("Add", 0.1, 0.2, 0.1 + 0.2)?;

    assert_eq!(
        history.entries()?,
        vec![HistoryEntry::new("Add", 0.1, 0.2, 0.1 + 0.2)]
    );
    Ok(())
}

#[test]
fn test_blank_line_file_gets_header_and_stays_readable() -> Result<()> {
    for blank in ["\n", "\r\n", "\n\n"] {
        let dir = tempdir()?;
        let path = dir.path().join("history.csv");
        fs::write(&path, blank)?;

        let mut history = History::open(&path)?;
        assert_eq!(fs::read_to_string(&path)?, HEADER_LINE);

        history.append("Add", 1.0, 2.0, 3.0)?;
        assert_eq!(fs::read_to_string(&path)?, format!("{HEADER_LINE}Add,1,2,3\n"));
        assert_eq!(
            history.list_session()?,
            SessionListing::Entries(vec![(0, HistoryEntry::new("Add", 1.0, 2.0, 3.0))])
        );
        assert_eq!(
            history.undo_last()?,
            UndoOutcome::Removed(HistoryEntry::new("Add", 1.0, 2.0, 3.0))
        );
        assert_eq!(fs::read_to_string(&path)?, HEADER_LINE);
    }
    Ok(())
}

#[test]
fn test_open_leaves_unparseable_file_untouched() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("history.csv");
    fs::write(&path, "\"unterminated\n")?;

    let history = History::open(&path)?;
    assert_eq!(fs::read_to_string(&path)?, "\"unterminated\n");
    assert!(history.entries().unwrap_err().is_persistence());
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_undo_keeps_file_permissions() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir()?;
    let path = dir.path().join("history.csv");
    let mut history = History::open(&path)?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644))?;

    history.append("Add", 5.0, 3.0, 8.0)?;
    history.undo_last()?;

    let mode = fs::metadata(history.path())?.permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
    Ok(())
}
