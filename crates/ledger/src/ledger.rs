//! Stock/dispatch consistency rules.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use medstock_core::{Clinic, DispatchId, LedgerError, LedgerResult};

use crate::dispatch::{DispatchRecord, MonthFilter};
use crate::report::{MonthlyReportRow, monthly_report};
use crate::stock::{StockEntry, dispatch_name_matches};
use crate::store::StockStore;

/// Upper bound on any single backing-store call.
const STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of a stock delete.
///
/// Deleting a name that is not present is a reported no-op, never an error:
/// the table ends up in the requested state either way.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    Deleted,
    Missing,
}

/// The inventory ledger: per-clinic stock table + dispatch log semantics
/// over an injected [`StockStore`].
///
/// The backing store offers no transactions or locking, so all mutating
/// operations serialize per clinic behind an in-process async mutex; without
/// it two overlapping dispatches against the same medicine could both read
/// the same quantity and lose one subtraction. Reads run unserialized.
pub struct Ledger {
    store: Arc<dyn StockStore>,
    locks: Mutex<HashMap<Clinic, Arc<Mutex<()>>>>,
}

impl Ledger {
    /// Build a ledger over a storage client. The client is constructed once
    /// at process start and injected here; the ledger never creates its own.
    pub fn new(store: Arc<dyn StockStore>) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Set `name`'s quantity to exactly `quantity`, creating the entry when
    /// absent. Absolute replace, not additive; idempotent for equal values.
    pub async fn upsert_stock(
        &self,
        clinic: &Clinic,
        name: &str,
        quantity: u32,
    ) -> LedgerResult<()> {
        let lock = self.clinic_lock(clinic).await;
        let _guard = lock.lock().await;

        self.store_call(self.store.write_stock_entry(clinic, name, quantity))
            .await
    }

    /// Remove the entry matching `name` exactly. A missing name is reported
    /// as [`DeleteOutcome::Missing`] and logged, not failed.
    pub async fn delete_stock(&self, clinic: &Clinic, name: &str) -> LedgerResult<DeleteOutcome> {
        let lock = self.clinic_lock(clinic).await;
        let _guard = lock.lock().await;

        let removed = self
            .store_call(self.store.remove_stock_entry(clinic, name))
            .await?;

        if removed {
            Ok(DeleteOutcome::Deleted)
        } else {
            tracing::info!(clinic = %clinic, name, "delete of unknown stock entry, no-op");
            Ok(DeleteOutcome::Missing)
        }
    }

    /// Replace the clinic's whole stock table (bulk CSV upload path).
    ///
    /// Duplicate names within `entries` collapse to the last occurrence so
    /// the one-entry-per-name invariant survives arbitrary uploads.
    pub async fn replace_stock_table(
        &self,
        clinic: &Clinic,
        entries: Vec<StockEntry>,
    ) -> LedgerResult<()> {
        let mut deduped: Vec<StockEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            if let Some(existing) = deduped.iter_mut().find(|e| e.name == entry.name) {
                existing.quantity = entry.quantity;
            } else {
                deduped.push(entry);
            }
        }

        let lock = self.clinic_lock(clinic).await;
        let _guard = lock.lock().await;

        self.store_call(self.store.replace_stock_table(clinic, deduped))
            .await
    }

    /// Record a dispatch: validate against current stock, append the log
    /// record, subtract the count (clamped at zero).
    ///
    /// The validation chain is ordered: unknown medicine, then exhausted
    /// (quantity zero), then insufficient (quantity < count). A rejected
    /// dispatch leaves both tables untouched. The stored record carries the
    /// stock table's canonical name, not the request spelling.
    pub async fn record_dispatch(
        &self,
        clinic: &Clinic,
        transaction_number: &str,
        medicine_name: &str,
        count: u32,
        now: DateTime<Utc>,
    ) -> LedgerResult<DispatchRecord> {
        if count == 0 {
            return Err(LedgerError::invalid_quantity(
                "dispatch count must be positive",
            ));
        }

        let lock = self.clinic_lock(clinic).await;
        let _guard = lock.lock().await;

        let stock = self.read_stock(clinic).await?;
        let entry = stock
            .iter()
            .find(|e| dispatch_name_matches(&e.name, medicine_name))
            .ok_or_else(|| LedgerError::medicine_not_found(medicine_name.trim()))?;

        if entry.quantity == 0 {
            return Err(LedgerError::stock_exhausted(entry.name.clone()));
        }
        if entry.quantity < count {
            return Err(LedgerError::InsufficientStock {
                name: entry.name.clone(),
                requested: count,
                available: entry.quantity,
            });
        }

        let record = DispatchRecord {
            id: DispatchId::new(),
            transaction_number: transaction_number.to_string(),
            medicine_name: entry.name.clone(),
            count,
            dispatched_at: now,
        };

        self.store_call(self.store.append_dispatch_record(clinic, record.clone()))
            .await?;
        self.store_call(self.store.write_stock_entry(
            clinic,
            &record.medicine_name,
            entry.quantity.saturating_sub(count),
        ))
        .await?;

        tracing::info!(
            clinic = %clinic,
            medicine = %record.medicine_name,
            count,
            "dispatch recorded"
        );

        Ok(record)
    }

    /// Reverse a dispatch: add the record's count back onto the referenced
    /// stock entry, then remove the record.
    ///
    /// Restore runs first so a failure between the two writes errs on the
    /// side of over-counted stock rather than a vanished record; the store
    /// has no transaction spanning both writes, and that gap is accepted.
    /// If the medicine has since been deleted from stock the restore is
    /// skipped and logged.
    pub async fn reverse_dispatch(
        &self,
        clinic: &Clinic,
        id: DispatchId,
    ) -> LedgerResult<DispatchRecord> {
        let lock = self.clinic_lock(clinic).await;
        let _guard = lock.lock().await;

        let log = self.read_log(clinic).await?;
        let record = log
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| LedgerError::record_not_found(id.to_string()))?;

        let stock = self.read_stock(clinic).await?;
        match stock
            .iter()
            .find(|e| dispatch_name_matches(&e.name, &record.medicine_name))
        {
            Some(entry) => {
                self.store_call(self.store.write_stock_entry(
                    clinic,
                    &entry.name,
                    entry.quantity.saturating_add(record.count),
                ))
                .await?;
            }
            None => {
                tracing::warn!(
                    clinic = %clinic,
                    medicine = %record.medicine_name,
                    "medicine gone from stock, skipping restore on reversal"
                );
            }
        }

        let removed = self
            .store_call(self.store.remove_dispatch_record(clinic, id))
            .await?;
        if !removed {
            return Err(LedgerError::record_not_found(id.to_string()));
        }

        Ok(record)
    }

    /// Read-only projection of the clinic's stock table.
    pub async fn list_stock(&self, clinic: &Clinic) -> LedgerResult<Vec<StockEntry>> {
        self.read_stock(clinic).await
    }

    /// Read-only projection of the dispatch log, optionally restricted to
    /// one calendar month.
    pub async fn list_dispatch_log(
        &self,
        clinic: &Clinic,
        filter: Option<MonthFilter>,
    ) -> LedgerResult<Vec<DispatchRecord>> {
        let log = self.read_log(clinic).await?;
        Ok(match filter {
            Some(f) => log
                .into_iter()
                .filter(|r| f.matches(&r.dispatched_at))
                .collect(),
            None => log,
        })
    }

    /// Per-medicine, per-month dispatch totals. Row order is documented on
    /// [`monthly_report`].
    pub async fn build_monthly_report(
        &self,
        clinic: &Clinic,
    ) -> LedgerResult<Vec<MonthlyReportRow>> {
        let log = self.read_log(clinic).await?;
        Ok(monthly_report(&log))
    }

    async fn clinic_lock(&self, clinic: &Clinic) -> Arc<Mutex<()>> {
        let mut table = self.locks.lock().await;
        table.entry(clinic.clone()).or_default().clone()
    }

    /// Apply the storage timeout to one backing-store call.
    async fn store_call<T>(
        &self,
        call: impl Future<Output = LedgerResult<T>>,
    ) -> LedgerResult<T> {
        match tokio::time::timeout(STORE_TIMEOUT, call).await {
            Ok(result) => result,
            Err(_) => Err(LedgerError::storage_unavailable(format!(
                "store call exceeded {STORE_TIMEOUT:?}"
            ))),
        }
    }

    /// Stock read with a single bounded retry (reads are idempotent).
    async fn read_stock(&self, clinic: &Clinic) -> LedgerResult<Vec<StockEntry>> {
        match self.store_call(self.store.read_stock_table(clinic)).await {
            Err(e) if e.is_transient() => {
                tracing::warn!(clinic = %clinic, error = %e, "stock read failed, retrying once");
                self.store_call(self.store.read_stock_table(clinic)).await
            }
            other => other,
        }
    }

    /// Dispatch-log read with a single bounded retry.
    async fn read_log(&self, clinic: &Clinic) -> LedgerResult<Vec<DispatchRecord>> {
        match self.store_call(self.store.read_dispatch_log(clinic)).await {
            Err(e) if e.is_transient() => {
                tracing::warn!(clinic = %clinic, error = %e, "dispatch log read failed, retrying once");
                self.store_call(self.store.read_dispatch_log(clinic)).await
            }
            other => other,
        }
    }
}
