use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use medstock_core::{Clinic, DispatchId, LedgerError, LedgerResult};
use medstock_ledger::{DispatchRecord, StockEntry, StockStore};

#[derive(Debug, Default)]
struct ClinicTables {
    stock: Vec<StockEntry>,
    dispatch: Vec<DispatchRecord>,
}

/// In-memory tabular store.
///
/// Intended for tests/dev. Insertion order is preserved in both tables,
/// matching the ordering contract of the persistent backends.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<Clinic, ClinicTables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(
        &self,
        clinic: &Clinic,
        f: impl FnOnce(Option<&ClinicTables>) -> T,
    ) -> LedgerResult<T> {
        let tables = self
            .tables
            .read()
            .map_err(|_| LedgerError::storage_unavailable("store lock poisoned"))?;
        Ok(f(tables.get(clinic)))
    }

    fn write<T>(&self, clinic: &Clinic, f: impl FnOnce(&mut ClinicTables) -> T) -> LedgerResult<T> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| LedgerError::storage_unavailable("store lock poisoned"))?;
        Ok(f(tables.entry(clinic.clone()).or_default()))
    }
}

#[async_trait]
impl StockStore for MemoryStore {
    async fn read_stock_table(&self, clinic: &Clinic) -> LedgerResult<Vec<StockEntry>> {
        self.read(clinic, |t| t.map(|t| t.stock.clone()).unwrap_or_default())
    }

    async fn write_stock_entry(
        &self,
        clinic: &Clinic,
        name: &str,
        quantity: u32,
    ) -> LedgerResult<()> {
        self.write(clinic, |t| {
            match t.stock.iter_mut().find(|e| e.name == name) {
                Some(entry) => entry.quantity = quantity,
                None => t.stock.push(StockEntry::new(name, quantity)),
            }
        })
    }

    async fn remove_stock_entry(&self, clinic: &Clinic, name: &str) -> LedgerResult<bool> {
        self.write(clinic, |t| {
            let before = t.stock.len();
            t.stock.retain(|e| e.name != name);
            t.stock.len() != before
        })
    }

    async fn replace_stock_table(
        &self,
        clinic: &Clinic,
        entries: Vec<StockEntry>,
    ) -> LedgerResult<()> {
        self.write(clinic, |t| t.stock = entries)
    }

    async fn read_dispatch_log(&self, clinic: &Clinic) -> LedgerResult<Vec<DispatchRecord>> {
        self.read(clinic, |t| t.map(|t| t.dispatch.clone()).unwrap_or_default())
    }

    async fn append_dispatch_record(
        &self,
        clinic: &Clinic,
        record: DispatchRecord,
    ) -> LedgerResult<()> {
        self.write(clinic, |t| t.dispatch.push(record))
    }

    async fn remove_dispatch_record(&self, clinic: &Clinic, id: DispatchId) -> LedgerResult<bool> {
        self.write(clinic, |t| {
            let before = t.dispatch.len();
            t.dispatch.retain(|r| r.id != id);
            t.dispatch.len() != before
        })
    }
}
