//! Storage interface consumed by the ledger.

use async_trait::async_trait;

use medstock_core::{Clinic, DispatchId, LedgerResult};

use crate::dispatch::DispatchRecord;
use crate::stock::StockEntry;

/// Backing tabular store for per-clinic stock tables and dispatch logs.
///
/// Implementations may be any persistent tabular store (spreadsheet, CSV
/// files, a database); the ledger never depends on the wire format. Every
/// method maps backend failures into `LedgerError::StorageUnavailable`.
/// Ordering contract: both tables preserve insertion order across reads.
#[async_trait]
pub trait StockStore: Send + Sync {
    /// Read a clinic's full stock table, in storage order.
    async fn read_stock_table(&self, clinic: &Clinic) -> LedgerResult<Vec<StockEntry>>;

    /// Upsert a single stock entry (exact name match; creates when absent).
    async fn write_stock_entry(
        &self,
        clinic: &Clinic,
        name: &str,
        quantity: u32,
    ) -> LedgerResult<()>;

    /// Remove the entry with exactly this name. Returns `false` when nothing
    /// matched (callers decide whether that is an error).
    async fn remove_stock_entry(&self, clinic: &Clinic, name: &str) -> LedgerResult<bool>;

    /// Replace the clinic's entire stock table with `entries`.
    async fn replace_stock_table(
        &self,
        clinic: &Clinic,
        entries: Vec<StockEntry>,
    ) -> LedgerResult<()>;

    /// Read a clinic's full dispatch log, in insertion order.
    async fn read_dispatch_log(&self, clinic: &Clinic) -> LedgerResult<Vec<DispatchRecord>>;

    /// Append one dispatch record to the log.
    async fn append_dispatch_record(
        &self,
        clinic: &Clinic,
        record: DispatchRecord,
    ) -> LedgerResult<()>;

    /// Remove the record with this id. Returns `false` when nothing matched.
    async fn remove_dispatch_record(&self, clinic: &Clinic, id: DispatchId) -> LedgerResult<bool>;
}
