//! `medstock-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no IO, no HTTP, no storage
//! concerns): the clinic partition key, stable identifiers, and the ledger
//! error model.

pub mod clinic;
pub mod error;
pub mod id;

pub use clinic::Clinic;
pub use error::{LedgerError, LedgerResult};
pub use id::DispatchId;
