use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use medstock_auth::Permission;
use medstock_core::{Clinic, DispatchId};
use medstock_ledger::MonthFilter;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::PrincipalContext;

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(clinic): Path<String>,
    Query(query): Query<dto::DispatchLogQuery>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::new("dispatch.read")) {
        return resp;
    }

    let filter = match month_filter(&query) {
        Ok(filter) => filter,
        Err(resp) => return resp,
    };

    let clinic = Clinic::new(clinic);
    match services.ledger().list_dispatch_log(&clinic, filter).await {
        Ok(log) => (StatusCode::OK, Json(log)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn record(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(clinic): Path<String>,
    Json(body): Json<dto::RecordDispatchRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::new("dispatch.record")) {
        return resp;
    }

    let count = match dto::validate_count(body.count) {
        Ok(count) => count,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    let clinic = Clinic::new(clinic);
    match services
        .ledger()
        .record_dispatch(
            &clinic,
            &body.transaction_number,
            &body.medicine_name,
            count,
            Utc::now(),
        )
        .await
    {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn reverse(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path((clinic, id)): Path<(String, String)>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::new("dispatch.reverse")) {
        return resp;
    }

    let id: DispatchId = match id.parse() {
        Ok(id) => id,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "invalid dispatch record id",
            );
        }
    };

    let clinic = Clinic::new(clinic);
    match services.ledger().reverse_dispatch(&clinic, id).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

fn month_filter(
    query: &dto::DispatchLogQuery,
) -> Result<Option<MonthFilter>, axum::response::Response> {
    match (query.year, query.month) {
        (None, None) => Ok(None),
        (Some(year), Some(month)) if (1..=12).contains(&month) => {
            Ok(Some(MonthFilter::new(year, month)))
        }
        (Some(_), Some(month)) => Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_filter",
            format!("month must be 1-12, got {month}"),
        )),
        _ => Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_filter",
            "year and month must be provided together",
        )),
    }
}
