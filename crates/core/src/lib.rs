#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod permission;
pub mod position;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use permission::{PermissionLevel, PermissionLevelError};
pub use position::{BlockPos, Rotation, Vec3};

/// Fixed tick type (20 TPS => 50 ms per tick).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick in any deterministic timeline.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}
