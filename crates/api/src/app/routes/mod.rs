use axum::{
    Router,
    routing::{delete, get, post, put},
};

pub mod auth;
pub mod dispatch;
pub mod export;
pub mod stock;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/clinics/:clinic", clinic_router())
}

/// Per-clinic routes; the clinic path segment is the partition key.
fn clinic_router() -> Router {
    Router::new()
        .route("/stock", get(stock::list).post(stock::upsert))
        .route("/stock/upload", post(stock::upload))
        .route("/stock/:name", put(stock::update).delete(stock::remove))
        .route("/dispatch", get(dispatch::list).post(dispatch::record))
        .route("/dispatch/:id", delete(dispatch::reverse))
        .route("/export/stock.csv", get(export::stock_csv))
        .route("/export/dispatch.csv", get(export::dispatch_csv))
        .route("/export/report.csv", get(export::report_csv))
        .route("/export/workbook.xlsx", get(export::workbook))
}
