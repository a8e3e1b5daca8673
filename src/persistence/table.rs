//! CSV table helpers shared by the file-backed stores

use anyhow::{Context, Result};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

/// Deserialize every row of a CSV table with a header line
pub fn read_rows<T: DeserializeOwned, R: io::Read>(reader: R) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for (index, row) in reader.deserialize().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        rows.push(row.with_context(|| format!("Invalid row on line {}", index + 2))?);
    }
    Ok(rows)
}

/// Serialize rows as a CSV table with a header line
pub fn write_rows<T: Serialize, W: io::Write>(writer: W, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Load a table from disk; a missing file is an empty table
pub fn load_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    match std::fs::File::open(path) {
        Ok(file) => read_rows(file).with_context(|| format!("Failed to read {}", path.display())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e).with_context(|| format!("Failed to open {}", path.display())),
    }
}

/// Write a table to disk through a temporary file and a rename
pub fn save_table<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let tmp_path = path.with_extension("csv.tmp");
    let file = std::fs::File::create(&tmp_path)
        .with_context(|| format!("Failed to create {}", tmp_path.display()))?;
    write_rows(file, rows).with_context(|| format!("Failed to write {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    Ok(())
}

/// Accept `true`/`false` in any case as well as `1`/`0`; empty means false
pub fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    match value.trim().to_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" | "" => Ok(false),
        other => Err(de::Error::custom(format!("invalid boolean '{}'", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        #[serde(rename = "Name")]
        name: String,
        #[serde(rename = "Flag", default, deserialize_with = "deserialize_flag")]
        flag: bool,
    }

    #[test]
    fn test_flag_spellings() {
        let input = "Name,Flag\na,True\nb,false\nc,1\nd,\n";
        let rows: Vec<Row> = read_rows(input.as_bytes()).unwrap();
        let flags: Vec<bool> = rows.iter().map(|r| r.flag).collect();
        assert_eq!(flags, vec![true, false, true, false]);

        let bad = "Name,Flag\na,maybe\n";
        assert!(read_rows::<Row, _>(bad.as_bytes()).is_err());
    }

    #[test]
    fn test_missing_column_uses_default() {
        let rows: Vec<Row> = read_rows("Name\nsolo\n".as_bytes()).unwrap();
        assert_eq!(
            rows,
            vec![Row {
                name: "solo".to_string(),
                flag: false
            }]
        );
    }

    #[test]
    fn test_write_then_read() {
        let rows = vec![Row {
            name: "Kim, Jr.".to_string(),
            flag: true,
        }];
        let mut buffer = Vec::new();
        write_rows(&mut buffer, &rows).unwrap();

        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.starts_with("Name,Flag\n"));

        let back: Vec<Row> = read_rows(buffer.as_slice()).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let path = std::env::temp_dir().join("club-ladder-does-not-exist.csv");
        let rows: Vec<Row> = load_table(&path).unwrap();
        assert!(rows.is_empty());
    }
}
