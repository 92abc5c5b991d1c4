//! Request/response DTOs and input validation.
//!
//! Quantities arrive as signed integers so a negative value reaches our
//! validation (and gets the `invalid_quantity` envelope) instead of dying
//! in deserialization.

use serde::{Deserialize, Serialize};

use medstock_core::{LedgerError, LedgerResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct UpsertStockRequest {
    pub name: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStockRequest {
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct RecordDispatchRequest {
    pub transaction_number: String,
    pub medicine_name: String,
    pub count: i64,
}

#[derive(Debug, Deserialize)]
pub struct DispatchLogQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// A stock quantity: any non-negative integer that fits the table.
pub fn validate_quantity(raw: i64) -> LedgerResult<u32> {
    u32::try_from(raw).map_err(|_| {
        LedgerError::invalid_quantity(format!(
            "quantity must be a non-negative integer, got {raw}"
        ))
    })
}

/// A dispatch count: a positive integer.
pub fn validate_count(raw: i64) -> LedgerResult<u32> {
    match u32::try_from(raw) {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(LedgerError::invalid_quantity(format!(
            "count must be a positive integer, got {raw}"
        ))),
    }
}
