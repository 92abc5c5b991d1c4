use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier used for the request-layer gate.
///
/// Roles are opaque strings at this layer; mapping roles to permissions is
/// done by the caller/policy layer. The system ships with two well-known
/// roles, `staff` and `admin`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The read/record role.
    pub fn staff() -> Self {
        Self(Cow::Borrowed("staff"))
    }

    /// The role allowed to update, delete and reverse.
    pub fn admin() -> Self {
        Self(Cow::Borrowed("admin"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
