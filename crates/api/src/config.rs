//! Environment-driven process configuration, read once at startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

use medstock_auth::Role;

/// One login account. Accounts are fixed configuration, not data: the
/// upstream system is a small clinic gate with a handful of users.
#[derive(Debug, Clone)]
pub struct UserConfig {
    pub username: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: SocketAddr,
    pub jwt_secret: String,
    /// Directory for the CSV store; unset means in-memory (dev/tests).
    pub data_dir: Option<PathBuf>,
    pub users: Vec<UserConfig>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let bind = std::env::var("MEDSTOCK_BIND")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("MEDSTOCK_BIND is not a valid socket address")?;

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let data_dir = std::env::var("MEDSTOCK_DATA_DIR").ok().map(PathBuf::from);

        let users = match std::env::var("MEDSTOCK_USERS") {
            Ok(raw) => parse_users(&raw)?,
            Err(_) => {
                tracing::warn!("MEDSTOCK_USERS not set; using insecure dev accounts");
                vec![
                    UserConfig {
                        username: "staff".to_string(),
                        password: "staff".to_string(),
                        role: Role::staff(),
                    },
                    UserConfig {
                        username: "admin".to_string(),
                        password: "admin".to_string(),
                        role: Role::admin(),
                    },
                ]
            }
        };

        Ok(Self {
            bind,
            jwt_secret,
            data_dir,
            users,
        })
    }
}

/// Parse `user:password:role` entries separated by commas.
fn parse_users(raw: &str) -> anyhow::Result<Vec<UserConfig>> {
    let mut users = Vec::new();

    for entry in raw.split(',').filter(|e| !e.trim().is_empty()) {
        let mut parts = entry.trim().splitn(3, ':');
        let (username, password, role) = match (parts.next(), parts.next(), parts.next()) {
            (Some(u), Some(p), Some(r)) if !u.is_empty() && !p.is_empty() => (u, p, r),
            _ => anyhow::bail!("MEDSTOCK_USERS entry '{entry}' is not user:password:role"),
        };

        let role = match role {
            "staff" => Role::staff(),
            "admin" => Role::admin(),
            other => anyhow::bail!("MEDSTOCK_USERS entry '{entry}' has unknown role '{other}'"),
        };

        users.push(UserConfig {
            username: username.to_string(),
            password: password.to_string(),
            role,
        });
    }

    if users.is_empty() {
        anyhow::bail!("MEDSTOCK_USERS is set but contains no accounts");
    }

    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_user_list() {
        let users = parse_users("alice:secret:admin, bob:pw:staff").unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "alice");
        assert_eq!(users[0].role, Role::admin());
        assert_eq!(users[1].role, Role::staff());
    }

    #[test]
    fn rejects_unknown_role() {
        assert!(parse_users("alice:secret:superuser").is_err());
    }

    #[test]
    fn rejects_malformed_entry() {
        assert!(parse_users("alice").is_err());
        assert!(parse_users(":pw:staff").is_err());
    }
}
