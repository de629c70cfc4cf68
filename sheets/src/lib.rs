// sheets/src/lib.rs
//
// Persistence adapter for the intake service. A `RowStore` is an ordered,
// append-only table of records; the google backend talks to a Sheets
// spreadsheet, the in-memory backend serves tests and local development.

use async_trait::async_trait;
use models::Record;
use tokio::sync::Mutex;

pub mod auth;
pub mod errors;
pub mod gsheets;

pub use errors::{PersistenceError, PersistenceResult};
pub use gsheets::{GoogleSheetsStore, SheetsConfig};

/// The remote-store seam: append one validated record, or read the whole
/// ordered dataset back. Implementations make exactly one attempt per call
/// and never cache reads.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Appends one record as one row. Exactly one new row exists on
    /// success; no partial row is committed on failure.
    async fn append(&self, record: &Record) -> PersistenceResult<()>;

    /// Reads every stored record, header excluded, in insertion order.
    /// Re-fetched fresh on each call.
    async fn fetch_all(&self) -> PersistenceResult<Vec<Record>>;

    /// Prepares the backing table on startup. Default is a no-op.
    async fn ensure_header(&self) -> PersistenceResult<()> {
        Ok(())
    }
}

/// In-memory store used by tests and the `memory` backend.
#[derive(Default)]
pub struct InMemoryRowStore {
    rows: Mutex<Vec<Record>>,
}

impl InMemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RowStore for InMemoryRowStore {
    async fn append(&self, record: &Record) -> PersistenceResult<()> {
        self.rows.lock().await.push(record.clone());
        Ok(())
    }

    async fn fetch_all(&self) -> PersistenceResult<Vec<Record>> {
        Ok(self.rows.lock().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{RawBool, RawRecord};

    fn sample(age: i64) -> Record {
        let raw = RawRecord {
            age: Some(age),
            gender: Some("Male".to_string()),
            species: Some("E. coli".to_string()),
            rectal_cpe_positive: Some(RawBool::Flag(false)),
            clinical_setting: Some("ICU".to_string()),
            acquisition: Some("Hospital".to_string()),
            bsi_source: Some("UTI".to_string()),
            chf: Some(RawBool::Flag(false)),
            ckd: Some(RawBool::Flag(true)),
            tumor: Some(RawBool::Flag(false)),
            diabetes: Some(RawBool::Flag(true)),
            immunosuppressed: Some(RawBool::Flag(false)),
            carbapenem_resistant: Some(RawBool::Flag(false)),
            blbli_resistant: Some(RawBool::Flag(true)),
            fluoroquinolone_resistant: Some(RawBool::Flag(false)),
            third_gen_ceph_resistant: Some(RawBool::Flag(true)),
        };
        Record::validate(&raw).unwrap()
    }

    #[tokio::test]
    async fn append_then_fetch_contains_the_record() {
        let store = InMemoryRowStore::new();
        let record = sample(45);
        store.append(&record).await.unwrap();
        let rows = store.fetch_all().await.unwrap();
        assert!(rows.contains(&record));
    }

    #[tokio::test]
    async fn fetch_all_preserves_insertion_order() {
        let store = InMemoryRowStore::new();
        for age in [30, 45, 72] {
            store.append(&sample(age)).await.unwrap();
        }
        let rows = store.fetch_all().await.unwrap();
        assert_eq!(rows.iter().map(|r| r.age).collect::<Vec<_>>(), vec![30, 45, 72]);
    }

    #[tokio::test]
    async fn fetch_all_is_idempotent_without_appends() {
        let store = InMemoryRowStore::new();
        store.append(&sample(45)).await.unwrap();
        store.append(&sample(60)).await.unwrap();
        let first = store.fetch_all().await.unwrap();
        let second = store.fetch_all().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn ensure_header_is_a_no_op_for_memory() {
        let store = InMemoryRowStore::new();
        store.ensure_header().await.unwrap();
        assert!(store.fetch_all().await.unwrap().is_empty());
    }
}
