//! CSV export and import.
//!
//! Rows are flat: `date,name,start,end,durationMinutes,done` with `done`
//! written as `0`/`1`. A header row is optional on import and detected by
//! its `date,` prefix.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use log::warn;

use crate::error::TransferError;
use crate::store::DayStore;
use crate::task::Proposal;

pub const CSV_HEADER: &str = "date,name,start,end,durationMinutes,done";

/// Counts reported after an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
}

/// Render every stored task as CSV, days in date order.
pub fn export_csv(store: &DayStore) -> String {
    let mut out = String::new();
    out.push_str(CSV_HEADER);
    out.push('\n');
    for (date, tasks) in store.days() {
        for task in tasks {
            out.push_str(&format!(
                "{},{},{},{},{},{}\n",
                date,
                escape_csv(&task.name),
                task.start_time,
                task.end_time,
                task.duration_minutes,
                if task.done { 1 } else { 0 }
            ));
        }
    }
    out
}

pub fn export_to_file(store: &DayStore, path: &Path) -> Result<usize, TransferError> {
    let count: usize = store.days().values().map(Vec::len).sum();
    fs::write(path, export_csv(store))?;
    Ok(count)
}

/// Append the rows of `content` to the store.
///
/// Malformed rows are skipped with a warning. End times are recomputed from
/// start and duration.
pub fn import_csv(store: &mut DayStore, content: &str) -> Result<ImportReport, TransferError> {
    let mut records = parse_csv_records(content).into_iter().peekable();
    if records.peek().is_none() {
        return Err(TransferError::Empty);
    }
    if content.trim_start().starts_with("date,") {
        records.next();
    }

    let mut report = ImportReport::default();
    for (line_num, fields) in records {
        match parse_row(&fields) {
            Ok((date, proposal, done)) => match store.restore_task(date, &proposal, done) {
                Ok(_) => report.imported += 1,
                Err(e) => {
                    warn!("Line {}: {}. Skipping.", line_num, e);
                    report.skipped += 1;
                }
            },
            Err(msg) => {
                warn!("Line {}: {}. Skipping.", line_num, msg);
                report.skipped += 1;
            }
        }
    }
    Ok(report)
}

pub fn import_from_file(store: &mut DayStore, path: &Path) -> Result<ImportReport, TransferError> {
    let content = fs::read_to_string(path)?;
    import_csv(store, &content)
}

fn parse_row(fields: &[String]) -> Result<(NaiveDate, Proposal, bool), String> {
    if fields.len() != 6 {
        return Err(format!("has {} fields, expected 6", fields.len()));
    }
    let date = NaiveDate::parse_from_str(fields[0].trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}'", fields[0]))?;
    let duration = fields[4]
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("invalid duration '{}'", fields[4]))?;
    let done = matches!(fields[5].trim(), "1" | "true");
    let proposal = Proposal::new(fields[1].clone(), fields[2].trim(), duration);
    Ok((date, proposal, done))
}

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Split CSV content into records of fields, tagged with their first line.
///
/// Quoted fields may contain commas, doubled quotes and line breaks. Blank
/// lines produce no record.
fn parse_csv_records(content: &str) -> Vec<(usize, Vec<String>)> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current_field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    current_field.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => fields.push(std::mem::take(&mut current_field)),
            '\r' if !in_quotes => {}
            '\n' if !in_quotes => {
                fields.push(std::mem::take(&mut current_field));
                records.push((record_line, std::mem::take(&mut fields)));
                line += 1;
                record_line = line;
            }
            '\n' => {
                current_field.push(ch);
                line += 1;
            }
            _ => current_field.push(ch),
        }
    }
    if !current_field.is_empty() || !fields.is_empty() {
        fields.push(current_field);
        records.push((record_line, fields));
    }
    records.retain(|(_, fields)| !(fields.len() == 1 && fields[0].trim().is_empty()));
    records
}
