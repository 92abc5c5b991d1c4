//! Request-layer authorization.
//!
//! The role→permission policy lives here, not in the ledger: ledger
//! operations accept a pre-authorized caller and never re-check identity.

use axum::http::StatusCode;

use medstock_auth::{Permission, Principal, Role, authorize};

use crate::app::errors;
use crate::context::PrincipalContext;

/// Map roles to granted permissions.
///
/// `admin` gets the wildcard. `staff` can read everything and perform the
/// day-to-day writes (stock upsert, dispatch record); update, delete,
/// upload and reversal stay admin-only.
pub fn permissions_from_roles(roles: &[Role]) -> Vec<Permission> {
    let mut perms = Vec::new();

    for role in roles {
        match role.as_str() {
            "admin" => return vec![Permission::new("*")],
            "staff" => perms.extend([
                Permission::new("stock.read"),
                Permission::new("stock.upsert"),
                Permission::new("dispatch.read"),
                Permission::new("dispatch.record"),
                Permission::new("export.read"),
            ]),
            _ => {}
        }
    }

    perms
}

/// Check the current request's principal for a required permission.
///
/// Returns the ready-to-send 403 response on denial so handlers can
/// early-return with `?`-free match syntax.
pub fn require(
    principal: &PrincipalContext,
    required: Permission,
) -> Result<(), axum::response::Response> {
    let resolved = Principal {
        principal_id: principal.principal_id(),
        roles: principal.roles().to_vec(),
        permissions: permissions_from_roles(principal.roles()),
    };

    authorize(&resolved, &required)
        .map_err(|e| errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string()))
}
