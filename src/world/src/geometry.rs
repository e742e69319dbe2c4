//! Axis-aligned boxes and collision layers.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::ops::BitOr;

/// Axis-aligned bounding box anchored at its minimum corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub size: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size * 0.5,
            size,
        }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Strict overlap; boxes that only share an edge do not overlap
    pub fn overlaps(&self, other: &Bounds) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x <= max.x && point.y >= self.min.y && point.y <= max.y
    }
}

/// Collision layer bit set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const PLAYER: LayerMask = LayerMask(1 << 0);
    pub const NPC: LayerMask = LayerMask(1 << 1);
    pub const PROP: LayerMask = LayerMask(1 << 2);
    pub const ITEM: LayerMask = LayerMask(1 << 3);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for LayerMask {
    type Output = LayerMask;

    fn bitor(self, rhs: LayerMask) -> LayerMask {
        LayerMask(self.0 | rhs.0)
    }
}

/// Closed set of actor kinds living in a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    Player,
    Npc,
    Prop,
}

impl ActorKind {
    /// Only player-capable actors pick up items and drive puzzles
    pub fn is_player_capable(self) -> bool {
        matches!(self, ActorKind::Player)
    }

    pub fn layer(self) -> LayerMask {
        match self {
            ActorKind::Player => LayerMask::PLAYER,
            ActorKind::Npc => LayerMask::NPC,
            ActorKind::Prop => LayerMask::PROP,
        }
    }
}
