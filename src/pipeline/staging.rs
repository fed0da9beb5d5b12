use std::path::Path;

use log::debug;

use crate::error::{Result, SyncError};

use super::Table;

/// Writes `table` to `path` as CSV, header row first, replacing any
/// previous contents.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_table(path: &Path, table: &Table) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&table.header)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    debug!(
        "Staged {} rows to {}",
        table.rows.len(),
        path.display()
    );
    Ok(())
}

/// Reads a staged CSV file back as a rectangular block of rows, header
/// included.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a record is malformed, or
/// rows differ in width.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    let rows = reader
        .records()
        .map(|record| record.map(|r| r.iter().map(ToString::to_string).collect()))
        .collect::<std::result::Result<Vec<Vec<String>>, csv::Error>>()?;

    if rows.is_empty() {
        return Err(SyncError::Config(format!(
            "staging file {} has no header row",
            path.display()
        )));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        Table {
            header: vec!["Jira URL".to_string(), "Summary".to_string(), "Next".to_string()],
            rows: vec![
                vec![
                    "https://jira.riscv.org/browse/RVS-1".to_string(),
                    "Zfa, Zfh and Zvfh".to_string(),
                    r#"=HYPERLINK("https://jira.riscv.org/browse/RVS-2", "Plan")"#.to_string(),
                ],
                vec![
                    "https://jira.riscv.org/browse/RVG-1".to_string(),
                    String::new(),
                    "https://a\n https://b".to_string(),
                ],
            ],
        }
    }

    #[test]
    fn test_round_trip_preserves_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("specs.csv");
        let table = sample_table();

        write_table(&path, &table).unwrap();
        let rows = read_rows(&path).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], table.header);
        assert_eq!(rows[1], table.rows[0]);
        assert_eq!(rows[2], table.rows[1]);
    }

    #[test]
    fn test_write_overwrites_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groups.csv");

        write_table(&path, &sample_table()).unwrap();
        let header_only = Table {
            header: vec!["Jira URL".to_string()],
            rows: vec![],
        };
        write_table(&path, &header_only).unwrap();

        assert_eq!(read_rows(&path).unwrap(), vec![vec!["Jira URL".to_string()]]);
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("staging").join("specs.csv");

        write_table(&path, &sample_table()).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_read_rejects_ragged_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ragged.csv");
        std::fs::write(&path, "a,b\nc\n").unwrap();

        assert!(matches!(read_rows(&path), Err(SyncError::Csv(_))));
    }

    #[test]
    fn test_read_rejects_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "").unwrap();

        assert!(matches!(read_rows(&path), Err(SyncError::Config(_))));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_rows(&dir.path().join("missing.csv")).is_err());
    }
}
