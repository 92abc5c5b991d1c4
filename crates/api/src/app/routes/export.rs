use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{StatusCode, header},
    response::IntoResponse,
};

use medstock_auth::Permission;
use medstock_core::Clinic;
use medstock_export::{dispatch_log_to_csv, report_to_csv, stock_to_csv, workbook_bytes};

use crate::app::errors;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub async fn stock_csv(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(clinic): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::new("export.read")) {
        return resp;
    }

    let clinic = Clinic::new(clinic);
    let stock = match services.ledger().list_stock(&clinic).await {
        Ok(stock) => stock,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    match stock_to_csv(&stock) {
        Ok(csv) => csv_download(&clinic, "stock.csv", csv),
        Err(e) => errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "export_failed", e.to_string()),
    }
}

pub async fn dispatch_csv(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(clinic): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::new("export.read")) {
        return resp;
    }

    let clinic = Clinic::new(clinic);
    let log = match services.ledger().list_dispatch_log(&clinic, None).await {
        Ok(log) => log,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    match dispatch_log_to_csv(&log) {
        Ok(csv) => csv_download(&clinic, "dispatch.csv", csv),
        Err(e) => errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "export_failed", e.to_string()),
    }
}

pub async fn report_csv(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(clinic): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::new("export.read")) {
        return resp;
    }

    let clinic = Clinic::new(clinic);
    let report = match services.ledger().build_monthly_report(&clinic).await {
        Ok(report) => report,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    match report_to_csv(&report) {
        Ok(csv) => csv_download(&clinic, "report.csv", csv),
        Err(e) => errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "export_failed", e.to_string()),
    }
}

/// Full workbook: Stock, DispatchLog and MonthlyReport sheets.
pub async fn workbook(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(clinic): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::new("export.read")) {
        return resp;
    }

    let clinic = Clinic::new(clinic);
    let ledger = services.ledger();

    let stock = match ledger.list_stock(&clinic).await {
        Ok(stock) => stock,
        Err(e) => return errors::ledger_error_to_response(e),
    };
    let log = match ledger.list_dispatch_log(&clinic, None).await {
        Ok(log) => log,
        Err(e) => return errors::ledger_error_to_response(e),
    };
    let report = match ledger.build_monthly_report(&clinic).await {
        Ok(report) => report,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    match workbook_bytes(&stock, &log, &report) {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    attachment(&clinic, "workbook.xlsx"),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "export_failed", e.to_string()),
    }
}

fn csv_download(clinic: &Clinic, filename: &str, csv: String) -> axum::response::Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, attachment(clinic, filename)),
        ],
        csv,
    )
        .into_response()
}

fn attachment(clinic: &Clinic, filename: &str) -> String {
    format!("attachment; filename=\"{}-{filename}\"", clinic.as_str())
}
