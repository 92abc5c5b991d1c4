//! Clinic partition key.

use serde::{Deserialize, Serialize};

/// A named partition of stock and dispatch data (e.g. `"Boys"`, `"Girls"`).
///
/// Stock table and dispatch log are fully independent across clinics. The
/// name is stored exactly as given; any transport decoding (percent-encoded
/// path segments) happens once at the HTTP boundary, never here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Clinic(String);

impl Clinic {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Clinic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Clinic {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Clinic {
    fn from(value: String) -> Self {
        Self(value)
    }
}
