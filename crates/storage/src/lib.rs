//! Storage backends for the inventory ledger.
//!
//! Two [`medstock_ledger::StockStore`] implementations: an in-memory store
//! for tests and development, and a CSV-file tabular store for persistence.
//! Spreadsheet concerns (header rows, row ordering) stay in here; the ledger
//! never sees them.

pub mod csv_file;
pub mod memory;

pub use csv_file::CsvStore;
pub use memory::MemoryStore;
