use std::fs;
use std::path::{Path, PathBuf};

use super::{Status, Task};

const HEADER: &str = "title,description,status";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed task file {path} (line {line}): {reason}")]
    Csv {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

/// Where the board's tasks live between runs.
///
/// `persist` always writes the complete task set, replacing whatever was
/// stored before.
pub trait TaskStore {
    fn load(&self) -> Result<Vec<Task>, StorageError>;
    fn persist(&mut self, tasks: &[Task]) -> Result<(), StorageError>;
}

/// Flat CSV file: `title,description,status`, one task per record.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    /// Open the store at `path`, creating a header-only file (and parent
    /// directories) if nothing exists there yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, format!("{HEADER}\n"))?;
            tracing::info!(path = %path.display(), "created empty task file");
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskStore for CsvStore {
    fn load(&self) -> Result<Vec<Task>, StorageError> {
        let content = fs::read_to_string(&self.path)?;
        let tasks = parse_tasks(&content).map_err(|(line, reason)| StorageError::Csv {
            path: self.path.clone(),
            line,
            reason,
        })?;
        tracing::debug!(count = tasks.len(), path = %self.path.display(), "loaded tasks");
        Ok(tasks)
    }

    fn persist(&mut self, tasks: &[Task]) -> Result<(), StorageError> {
        let tmp = self.path.with_extension("csv.tmp");
        fs::write(&tmp, serialize_tasks(tasks))?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(count = tasks.len(), path = %self.path.display(), "persisted tasks");
        Ok(())
    }
}

/// Render the full task set, header first.
pub fn serialize_tasks(tasks: &[Task]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for task in tasks {
        out.push_str(&escape_field(&task.title));
        out.push(',');
        out.push_str(&escape_field(&task.description));
        out.push(',');
        out.push_str(task.status.as_str());
        out.push('\n');
    }
    out
}

fn escape_field(field: &str) -> String {
    if field.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Parse a task file. The first record is the header and is skipped.
///
/// Unknown or missing statuses fall back to [`Status::Todo`]; the record is
/// kept. Errors carry the 1-based line where the bad record starts.
fn parse_tasks(content: &str) -> Result<Vec<Task>, (usize, String)> {
    let records = parse_records(content)?;
    let mut tasks = Vec::new();
    for (line, fields) in records.into_iter().skip(1) {
        let mut fields = fields.into_iter();
        let title = fields.next().unwrap_or_default();
        let description = fields.next().unwrap_or_default();
        let status = match fields.next() {
            Some(raw) => raw.parse::<Status>().unwrap_or_else(|err| {
                tracing::warn!(line, %err, "defaulting task status to todo");
                Status::default()
            }),
            None => {
                tracing::warn!(line, "task record has no status, defaulting to todo");
                Status::default()
            }
        };
        tasks.push(Task { status, title, description });
    }
    Ok(tasks)
}

/// Split CSV text into records of fields (RFC 4180 quoting). Blank lines
/// outside quotes are skipped.
fn parse_records(content: &str) -> Result<Vec<(usize, Vec<String>)>, (usize, String)> {
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = content.chars().peekable();

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
            '"' if field.is_empty() => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                if !fields.is_empty() || !field.is_empty() {
                    fields.push(std::mem::take(&mut field));
                    records.push((record_line, std::mem::take(&mut fields)));
                }
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err((record_line, "unterminated quoted field".into()));
    }
    if !fields.is_empty() || !field.is_empty() {
        fields.push(field);
        records.push((record_line, fields));
    }
    Ok(records)
}
