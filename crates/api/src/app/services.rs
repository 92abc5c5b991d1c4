//! Service wiring: store selection, ledger construction, login service.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use medstock_auth::{Hs256Jwt, JwtClaims, PrincipalId};
use medstock_ledger::{Ledger, StockStore};
use medstock_storage::{CsvStore, MemoryStore};

use crate::config::{Config, UserConfig};

/// Token lifetime for a login session.
const SESSION_TTL_MINUTES: i64 = 8 * 60;

pub struct AppServices {
    ledger: Ledger,
    auth: AuthService,
}

impl AppServices {
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }
}

/// Build all services from configuration.
///
/// The storage client is constructed exactly once here and injected into
/// the ledger; it lives for the process lifetime.
pub fn build_services(config: &Config, jwt: Arc<Hs256Jwt>) -> AppServices {
    let store: Arc<dyn StockStore> = match &config.data_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "using CSV store");
            Arc::new(CsvStore::new(dir))
        }
        None => {
            tracing::warn!("MEDSTOCK_DATA_DIR not set; using in-memory store (data is not persisted)");
            Arc::new(MemoryStore::new())
        }
    };

    AppServices {
        ledger: Ledger::new(store),
        auth: AuthService {
            users: config.users.clone(),
            jwt,
        },
    }
}

/// Login verification + token minting.
pub struct AuthService {
    users: Vec<UserConfig>,
    jwt: Arc<Hs256Jwt>,
}

impl AuthService {
    /// Verify credentials and mint a session token. `None` means the
    /// credentials did not match any account; the caller answers 401
    /// without distinguishing unknown user from wrong password.
    pub fn login(&self, username: &str, password: &str, now: DateTime<Utc>) -> Option<String> {
        let user = self
            .users
            .iter()
            .find(|u| u.username == username && u.password == password)?;

        let claims = JwtClaims {
            sub: PrincipalId::new(),
            username: user.username.clone(),
            roles: vec![user.role.clone()],
            issued_at: now,
            expires_at: now + Duration::minutes(SESSION_TTL_MINUTES),
        };

        match self.jwt.encode(&claims) {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::error!(error = %e, "failed to encode session token");
                None
            }
        }
    }
}
