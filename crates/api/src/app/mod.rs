//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection, ledger construction, login service
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and input validation
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get, routing::post};

use medstock_auth::Hs256Jwt;

use crate::config::Config;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: Config) -> Router {
    let jwt = Arc::new(Hs256Jwt::new(config.jwt_secret.as_bytes()));
    let auth_state = middleware::AuthState { jwt: jwt.clone() };

    let services = Arc::new(services::build_services(&config, jwt));

    // Protected routes: require a valid bearer token.
    let protected = routes::router()
        .layer(Extension(services.clone()))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/auth/login", post(routes::auth::login))
        .layer(Extension(services))
        .merge(protected)
}
