//! Part identifiers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a part document.
///
/// Freshly generated ids are UUIDv7 text (time-ordered), but lookups accept any
/// non-empty string so ids written by other tools still resolve.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartId(String);

impl PartId {
    /// Generate a new identifier. Only the store should call this.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Validate an identifier received from a caller.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        raw.parse()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl core::fmt::Display for PartId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PartId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(DomainError::invalid_id("PartId: must not be empty"));
        }
        Ok(Self(s.to_string()))
    }
}

impl AsRef<str> for PartId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
