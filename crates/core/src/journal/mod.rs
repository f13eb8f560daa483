//! Flat-file journal of order snapshots.
//!
//! Persistence is a JSON array of [`OrderRecord`]s rewritten wholesale on
//! each append. At-least-once durability between runs; no partial-write or
//! transaction guarantees.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use crate::order::OrderRecord;

/// Errors for journal operations.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("journal io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("journal serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Append-only log of order records backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct OrderJournal {
    path: PathBuf,
}

impl OrderJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all records. A missing file is an empty journal.
    pub fn load(&self) -> Result<Vec<OrderRecord>, JournalError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    /// Append a record by rewriting the whole array.
    pub fn append(&self, record: &OrderRecord) -> Result<(), JournalError> {
        let mut records = match self.load() {
            Ok(records) => records,
            Err(e) => {
                // A corrupt journal is reset rather than blocking new entries.
                warn!(path = %self.path.display(), "journal reset: {}", e);
                Vec::new()
            }
        };
        records.push(record.clone());
        let serialized = serde_json::to_string_pretty(&records)?;
        std::fs::write(&self.path, serialized)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::order::{ItemSpec, Order};

    fn record(id: &str) -> OrderRecord {
        Order::new(id, vec![ItemSpec::new("Pizza", 1).with_unit_price(8.5)], None)
            .unwrap()
            .to_record()
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let journal = OrderJournal::new(dir.path().join("orders.json"));
        assert!(journal.load().unwrap().is_empty());
    }

    #[test]
    fn test_append_accumulates_records() {
        let dir = TempDir::new().unwrap();
        let journal = OrderJournal::new(dir.path().join("orders.json"));

        journal.append(&record("ORD-0001")).unwrap();
        journal.append(&record("ORD-0002")).unwrap();

        let records = journal.load().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "ORD-0001");
        assert_eq!(records[1].id, "ORD-0002");
    }

    #[test]
    fn test_append_resets_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("orders.json");
        std::fs::write(&path, "{broken").unwrap();

        let journal = OrderJournal::new(&path);
        journal.append(&record("ORD-0001")).unwrap();

        let records = journal.load().unwrap();
        assert_eq!(records.len(), 1);
    }
}
