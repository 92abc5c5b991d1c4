//! CSV-file tabular store.
//!
//! Two files per clinic under a data directory: `<clinic>-stock.csv` and
//! `<clinic>-dispatch.csv`, each with a header row. The backing format has
//! no partial-update primitive, so every mutation rewrites the whole file
//! (write to a temp file, then rename). Blocking IO runs off the async
//! runtime via `spawn_blocking`.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use medstock_core::{Clinic, DispatchId, LedgerError, LedgerResult};
use medstock_ledger::{DispatchRecord, StockEntry, StockStore};

/// Persistent store over per-clinic CSV files.
#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn stock_path(&self, clinic: &Clinic) -> PathBuf {
        self.dir.join(format!("{}-stock.csv", clinic.as_str()))
    }

    fn dispatch_path(&self, clinic: &Clinic) -> PathBuf {
        self.dir.join(format!("{}-dispatch.csv", clinic.as_str()))
    }

    async fn blocking<T: Send + 'static>(
        &self,
        task: impl FnOnce() -> LedgerResult<T> + Send + 'static,
    ) -> LedgerResult<T> {
        tokio::task::spawn_blocking(task)
            .await
            .map_err(|e| LedgerError::storage_unavailable(format!("blocking task failed: {e}")))?
    }
}

fn unavailable(e: impl core::fmt::Display) -> LedgerError {
    LedgerError::storage_unavailable(e.to_string())
}

/// Read all rows of one table; a missing file is an empty table.
fn read_rows<T: DeserializeOwned>(path: &Path) -> LedgerResult<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(path).map_err(unavailable)?;
    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(unavailable)
}

/// Rewrite one table in full: temp file in the same directory, then rename,
/// so a crash mid-write never leaves a truncated table behind.
fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> LedgerResult<()> {
    let dir = path
        .parent()
        .ok_or_else(|| LedgerError::storage_unavailable("data path has no parent directory"))?;
    fs::create_dir_all(dir).map_err(unavailable)?;

    let tmp = path.with_extension("tmp");
    let mut writer = csv::Writer::from_path(&tmp).map_err(unavailable)?;
    for row in rows {
        writer.serialize(row).map_err(unavailable)?;
    }
    writer.flush().map_err(unavailable)?;
    drop(writer);

    fs::rename(&tmp, path).map_err(unavailable)
}

#[async_trait]
impl StockStore for CsvStore {
    async fn read_stock_table(&self, clinic: &Clinic) -> LedgerResult<Vec<StockEntry>> {
        let path = self.stock_path(clinic);
        self.blocking(move || read_rows(&path)).await
    }

    async fn write_stock_entry(
        &self,
        clinic: &Clinic,
        name: &str,
        quantity: u32,
    ) -> LedgerResult<()> {
        let path = self.stock_path(clinic);
        let name = name.to_string();
        self.blocking(move || {
            let mut rows: Vec<StockEntry> = read_rows(&path)?;
            match rows.iter_mut().find(|e| e.name == name) {
                Some(entry) => entry.quantity = quantity,
                None => rows.push(StockEntry::new(name, quantity)),
            }
            write_rows(&path, &rows)
        })
        .await
    }

    async fn remove_stock_entry(&self, clinic: &Clinic, name: &str) -> LedgerResult<bool> {
        let path = self.stock_path(clinic);
        let name = name.to_string();
        self.blocking(move || {
            let mut rows: Vec<StockEntry> = read_rows(&path)?;
            let before = rows.len();
            rows.retain(|e| e.name != name);
            if rows.len() == before {
                return Ok(false);
            }
            write_rows(&path, &rows)?;
            Ok(true)
        })
        .await
    }

    async fn replace_stock_table(
        &self,
        clinic: &Clinic,
        entries: Vec<StockEntry>,
    ) -> LedgerResult<()> {
        let path = self.stock_path(clinic);
        self.blocking(move || write_rows(&path, &entries)).await
    }

    async fn read_dispatch_log(&self, clinic: &Clinic) -> LedgerResult<Vec<DispatchRecord>> {
        let path = self.dispatch_path(clinic);
        self.blocking(move || read_rows(&path)).await
    }

    async fn append_dispatch_record(
        &self,
        clinic: &Clinic,
        record: DispatchRecord,
    ) -> LedgerResult<()> {
        let path = self.dispatch_path(clinic);
        self.blocking(move || {
            let mut rows: Vec<DispatchRecord> = read_rows(&path)?;
            rows.push(record);
            write_rows(&path, &rows)
        })
        .await
    }

    async fn remove_dispatch_record(&self, clinic: &Clinic, id: DispatchId) -> LedgerResult<bool> {
        let path = self.dispatch_path(clinic);
        self.blocking(move || {
            let mut rows: Vec<DispatchRecord> = read_rows(&path)?;
            let before = rows.len();
            rows.retain(|r| r.id != id);
            if rows.len() == before {
                return Ok(false);
            }
            write_rows(&path, &rows)?;
            Ok(true)
        })
        .await
    }
}
