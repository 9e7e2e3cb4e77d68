//! Operator permission tiers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Permission tier a command source runs with (0 = regular player, 4 = owner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PermissionLevel(u8);

/// Raised when a tier outside `0..=4` is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("permission level {0} is out of range (0..=4)")]
pub struct PermissionLevelError(pub u8);

impl PermissionLevel {
    /// No elevated rights.
    pub const ALL: Self = Self(0);
    /// May bypass spawn protection.
    pub const MODERATOR: Self = Self(1);
    /// May run world-editing commands; command computers default to this tier.
    pub const GAME_MASTER: Self = Self(2);
    /// May run player management commands.
    pub const ADMIN: Self = Self(3);
    /// Unrestricted.
    pub const OWNER: Self = Self(4);

    /// Build a level from its numeric tier.
    pub fn new(level: u8) -> Result<Self, PermissionLevelError> {
        if level > Self::OWNER.0 {
            return Err(PermissionLevelError(level));
        }
        Ok(Self(level))
    }

    /// Numeric tier.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Whether this tier satisfies `required`.
    pub fn allows(self, required: PermissionLevel) -> bool {
        self >= required
    }
}

impl Default for PermissionLevel {
    fn default() -> Self {
        Self::GAME_MASTER
    }
}

impl TryFrom<u8> for PermissionLevel {
    type Error = PermissionLevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PermissionLevel> for u8 {
    fn from(level: PermissionLevel) -> Self {
        level.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_levels_above_owner() {
        assert_eq!(PermissionLevel::new(5), Err(PermissionLevelError(5)));
        assert_eq!(PermissionLevel::new(4), Ok(PermissionLevel::OWNER));
    }

    #[test]
    fn higher_tiers_allow_lower_requirements() {
        assert!(PermissionLevel::ADMIN.allows(PermissionLevel::GAME_MASTER));
        assert!(!PermissionLevel::MODERATOR.allows(PermissionLevel::GAME_MASTER));
    }
}
