//! CSV-backed record store.
//!
//! The master workbook is a directory of CSV files, one per table. Loading a
//! table deserialises it into typed rows and normalises every blank-like
//! cell to the empty string, so downstream code never sees a NaN-style
//! sentinel. Saving a table rewrites exactly that table's file and leaves
//! every other table untouched.

pub mod records;

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub const TABLE_PROFILES: &str = "profiles";
pub const TABLE_JOBOFFERS: &str = "joboffers";
pub const TABLE_APPLICATIONS: &str = "applications";
pub const TABLE_SENDERS: &str = "senders";

#[derive(Debug, Error)]
pub enum StoreError {
    /// The table's file does not exist. Fatal for the core tables; the
    /// senders table treats it as "feature unavailable".
    #[error("Table '{table}' not found at {path}")]
    MissingTable { table: String, path: PathBuf },

    #[error("CSV error in table '{table}': {source}")]
    Csv {
        table: String,
        #[source]
        source: csv::Error,
    },

    #[error("I/O error on table '{table}': {source}")]
    Io {
        table: String,
        #[source]
        source: std::io::Error,
    },
}

/// Repository over the table directory. Components depend on this surface
/// only, so the backing format can change without touching business logic.
#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{table}.csv"))
    }

    /// Load every row of a named table.
    pub fn load<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>, StoreError> {
        let path = self.table_path(table);
        if !path.exists() {
            return Err(StoreError::MissingTable {
                table: table.to_string(),
                path,
            });
        }

        let mut reader = csv::Reader::from_path(&path).map_err(|source| StoreError::Csv {
            table: table.to_string(),
            source,
        })?;

        let mut rows = Vec::new();
        for record in reader.deserialize() {
            let row: T = record.map_err(|source| StoreError::Csv {
                table: table.to_string(),
                source,
            })?;
            rows.push(row);
        }
        Ok(rows)
    }

    /// Replace a named table with the given rows.
    pub fn save<T: Serialize>(&self, table: &str, rows: &[T]) -> Result<(), StoreError> {
        let path = self.table_path(table);
        let mut writer = csv::Writer::from_path(&path).map_err(|source| StoreError::Csv {
            table: table.to_string(),
            source,
        })?;
        for row in rows {
            writer.serialize(row).map_err(|source| StoreError::Csv {
                table: table.to_string(),
                source,
            })?;
        }
        writer.flush().map_err(|source| StoreError::Io {
            table: table.to_string(),
            source,
        })
    }
}

/// Normalise a raw spreadsheet cell: whitespace-only content and the literal
/// `nan`/`none` artifacts of spreadsheet exports become the empty string.
pub fn clean_cell(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed.eq_ignore_ascii_case("none")
    {
        String::new()
    } else {
        trimmed.to_string()
    }
}

/// Parse a counter cell leniently: blank or non-numeric values count as 0.
pub fn parse_count(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(0)
}
