use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use medstock_core::LedgerError;

/// Map a ledger error onto the HTTP surface.
///
/// Dispatch validation failures are user-visible non-fatal conditions
/// (422), never 500s; only `StorageUnavailable` reports a server-side
/// problem.
pub fn ledger_error_to_response(err: LedgerError) -> axum::response::Response {
    match err {
        LedgerError::InvalidQuantity(msg) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_quantity", msg)
        }
        LedgerError::MedicineNotFound(name) => json_error(
            StatusCode::NOT_FOUND,
            "medicine_not_found",
            format!("no stock entry for '{name}'"),
        ),
        LedgerError::StockExhausted(name) => json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "stock_exhausted",
            format!("'{name}' has no stock left"),
        ),
        err @ LedgerError::InsufficientStock { .. } => json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "insufficient_stock",
            err.to_string(),
        ),
        LedgerError::StorageUnavailable(msg) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "storage_unavailable", msg)
        }
        LedgerError::RecordNotFound(id) => json_error(
            StatusCode::NOT_FOUND,
            "record_not_found",
            format!("no dispatch record '{id}'"),
        ),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
