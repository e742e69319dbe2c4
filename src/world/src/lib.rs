//! Scene world boundary for the progression registries.
//!
//! Holds the identities, geometry and collaborator traits that the item and
//! puzzle registries consume, plus a hecs-backed [`SceneWorld`] implementing
//! them.

pub mod geometry;
pub mod host;
pub mod ids;
pub mod scene_world;

pub use geometry::{ActorKind, Bounds, LayerMask};
pub use host::{ActorRoster, CollisionRegistrar, PlayerState, SceneHost};
pub use ids::{ActorId, ColliderHandle, ItemId, PuzzleId};
pub use scene_world::{Actor, Health, Inventory, SceneWorld, Transform};

pub use glam::Vec2;
