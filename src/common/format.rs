use std::mem;

use thiserror::Error;

/// A parsed record and the line it started on (1-based)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub line: usize,
    pub fields: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unterminated quoted field starting on line {line}")]
pub struct ParseError {
    pub line: usize,
}

fn escape_field(s: &str) -> String {
    // Quote only when needed; embedded quotes are doubled.
    if s.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Join fields into one comma-separated record, without a line terminator
pub fn format_row(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|field| escape_field(field))
        .collect::<Vec<_>>()
        .join(",")
}

/// Split comma-separated text into records
///
/// Accepts `\n` and `\r\n` terminators and quoted fields that span lines.
/// Blank lines are skipped.
pub fn parse_records(text: &str) -> Result<Vec<Record>, ParseError> {
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut quote_line = 1;

    let mut finish = |fields: &mut Vec<String>, field: &mut String, start: usize| {
        fields.push(mem::take(field));
        let done = mem::take(fields);
        if !(done.len() == 1 && done[0].is_empty()) {
            records.push(Record {
                line: start,
                fields: done,
            });
        }
    };

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => {
                in_quotes = true;
                quote_line = line;
            }
            ',' => fields.push(mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                finish(&mut fields, &mut field, record_line);
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(ParseError { line: quote_line });
    }
    if !field.is_empty() || !fields.is_empty() {
        finish(&mut fields, &mut field, record_line);
    }

    Ok(records)
}
