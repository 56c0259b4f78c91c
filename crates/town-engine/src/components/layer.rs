use std::ops::BitOr;

use serde::{Deserialize, Serialize};

/// Collision layer bitmask tagged onto every dynamic entity.
///
/// Layers are recorded and reported (debug views, the web bridge) but the
/// collision queries do not filter on them: every enabled entity blocks
/// every other enabled entity regardless of layer.
/// Default layer is `NPC`, since most registered bodies are townsfolk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollisionLayer(u8);

impl CollisionLayer {
    pub const NONE: Self = Self(0);
    pub const STATIC: Self = Self(1 << 0);
    pub const PLAYER: Self = Self(1 << 1);
    pub const NPC: Self = Self(1 << 2);
    pub const BOUNDARY: Self = Self(1 << 3);
}

impl Default for CollisionLayer {
    fn default() -> Self {
        Self::NPC
    }
}

impl BitOr for CollisionLayer {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
