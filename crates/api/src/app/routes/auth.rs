use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use chrono::Utc;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    match services.auth().login(&body.username, &body.password, Utc::now()) {
        Some(token) => (StatusCode::OK, Json(dto::LoginResponse { token })).into_response(),
        None => {
            tracing::info!(username = %body.username, "rejected login");
            errors::json_error(
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "username or password incorrect",
            )
        }
    }
}
