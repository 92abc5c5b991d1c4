use serde::{Deserialize, Serialize};

/// One row of a clinic's stock table: medicine name → quantity on hand.
///
/// At most one entry exists per (clinic, name) pair. The name keeps the
/// casing it was stored with; dispatch-time matching is case-insensitive
/// over trimmed names (see [`dispatch_name_matches`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    pub name: String,
    pub quantity: u32,
}

impl StockEntry {
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

/// Dispatch-time name match: trimmed, case-insensitive.
///
/// `upsert`/`delete` use exact names; dispatch is deliberately lenient so a
/// request for "paracetamol " still finds the entry stored as "Paracetamol".
pub fn dispatch_name_matches(stored: &str, requested: &str) -> bool {
    stored.trim().eq_ignore_ascii_case(requested.trim())
}
