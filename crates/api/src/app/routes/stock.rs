use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};

use medstock_auth::Permission;
use medstock_core::Clinic;
use medstock_export::parse_stock_csv;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::PrincipalContext;

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(clinic): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::new("stock.read")) {
        return resp;
    }

    let clinic = Clinic::new(clinic);
    match services.ledger().list_stock(&clinic).await {
        Ok(stock) => (StatusCode::OK, Json(stock)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn upsert(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(clinic): Path<String>,
    Json(body): Json<dto::UpsertStockRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::new("stock.upsert")) {
        return resp;
    }

    let quantity = match dto::validate_quantity(body.quantity) {
        Ok(q) => q,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    let clinic = Clinic::new(clinic);
    match services
        .ledger()
        .upsert_stock(&clinic, &body.name, quantity)
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "name": body.name, "quantity": quantity })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

/// Absolute update of an existing entry. Unlike `upsert`, an unknown name
/// is a 404: the admin edit form must not silently create rows.
pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path((clinic, name)): Path<(String, String)>,
    Json(body): Json<dto::UpdateStockRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::new("stock.update")) {
        return resp;
    }

    let quantity = match dto::validate_quantity(body.quantity) {
        Ok(q) => q,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    let clinic = Clinic::new(clinic);
    let exists = match services.ledger().list_stock(&clinic).await {
        Ok(stock) => stock.iter().any(|e| e.name == name),
        Err(e) => return errors::ledger_error_to_response(e),
    };
    if !exists {
        return errors::json_error(
            StatusCode::NOT_FOUND,
            "medicine_not_found",
            format!("no stock entry for '{name}'"),
        );
    }

    match services.ledger().upsert_stock(&clinic, &name, quantity).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "name": name, "quantity": quantity })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn remove(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path((clinic, name)): Path<(String, String)>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::new("stock.delete")) {
        return resp;
    }

    let clinic = Clinic::new(clinic);
    match services.ledger().delete_stock(&clinic, &name).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(serde_json::json!({ "name": name, "outcome": outcome })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

/// Bulk CSV upload: replaces the clinic's entire stock table.
pub async fn upload(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(clinic): Path<String>,
    body: String,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::new("stock.upload")) {
        return resp;
    }

    let entries = match parse_stock_csv(&body) {
        Ok(entries) => entries,
        Err(e) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_upload", e.to_string());
        }
    };

    let clinic = Clinic::new(clinic);
    let replaced = entries.len();
    match services.ledger().replace_stock_table(&clinic, entries).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "entries": replaced })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
