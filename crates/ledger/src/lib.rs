//! Inventory ledger for clinic medicine stock.
//!
//! The ledger enforces the stock/dispatch consistency rules over an external
//! tabular store it does not own: one stock table and one append-mostly
//! dispatch log per clinic. Every rule that must hold regardless of caller —
//! dispatch validation, clamp-at-zero, compensating restore on reversal —
//! lives here; HTTP, sessions and file encodings live elsewhere.

pub mod dispatch;
pub mod ledger;
pub mod report;
pub mod stock;
pub mod store;

pub use dispatch::{DispatchRecord, MonthFilter};
pub use ledger::{DeleteOutcome, Ledger};
pub use report::{MonthlyReportRow, monthly_report};
pub use stock::{StockEntry, dispatch_name_matches};
pub use store::StockStore;
