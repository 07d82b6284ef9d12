//! Typed ID wrappers for domain entities.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::num::ParseIntError;
use std::str::FromStr;

/// A strongly-typed wrapper for user IDs.
///
/// User IDs are assigned by the record store on insert and never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct UserId(pub u64);

impl UserId {
    /// Creates a user ID from a raw store value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Parses a user ID from a string.
    pub fn parse(s: &str) -> Result<Self, ParseIntError> {
        s.trim().parse::<u64>().map(Self)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn into_inner(self) -> u64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<UserId> for u64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}
