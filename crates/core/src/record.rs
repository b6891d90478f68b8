//! Input record reader.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One feature vector, exactly as it appears in the record file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputRecord {
    pub fields: Vec<String>,
}

impl InputRecord {
    /// Split a single line on commas. No quoting, trimming or parsing.
    pub fn from_line(line: &str) -> Self {
        let line = line
            .strip_suffix('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .unwrap_or(line);
        Self {
            fields: line.split(',').map(str::to_string).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Read the first line of `path` as an input record.
pub fn read_record(path: &Path) -> Result<InputRecord, CoreError> {
    let file = std::fs::File::open(path).map_err(|source| CoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut line = String::new();
    BufReader::new(file)
        .read_line(&mut line)
        .map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let record = InputRecord::from_line(&line);
    tracing::debug!("Read {} fields from {}", record.len(), path.display());
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_fields_are_kept_verbatim() {
        let record = InputRecord::from_line("1.2,0.5,3.3, 4 ,standing-ish-raw");
        assert_eq!(
            record.fields,
            vec!["1.2", "0.5", "3.3", " 4 ", "standing-ish-raw"]
        );
    }

    #[test]
    fn test_only_line_terminator_is_removed() {
        assert_eq!(InputRecord::from_line("a,b\n").fields, vec!["a", "b"]);
        assert_eq!(InputRecord::from_line("a,b\r\n").fields, vec!["a", "b"]);
        assert_eq!(InputRecord::from_line("a,b \n").fields, vec!["a", "b "]);
    }

    #[test]
    fn test_empty_line_is_a_single_empty_field() {
        assert_eq!(InputRecord::from_line("").fields, vec![""]);
        assert_eq!(InputRecord::from_line(",").fields, vec!["", ""]);
    }

    #[test]
    fn test_read_record_uses_first_line_only() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("record.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "0.1,0.2,0.3").unwrap();
        writeln!(file, "9,9,9").unwrap();

        let record = read_record(&path).unwrap();
        assert_eq!(record.fields, vec!["0.1", "0.2", "0.3"]);
    }

    #[test]
    fn test_missing_record_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.csv");

        match read_record(&path) {
            Err(CoreError::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected Io error, got {:?}", other),
        }
    }
}
