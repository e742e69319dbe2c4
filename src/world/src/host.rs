//! Boundary traits the registries consume.
//!
//! Registries never own these collaborators. They are lent per call, so the
//! borrow checker bounds every use by the owner's lifetime.

use glam::Vec2;

use crate::geometry::{Bounds, LayerMask};
use crate::ids::{ActorId, ColliderHandle, ItemId};

/// Transform and health of a player-capable actor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerState {
    pub position: Vec2,
    pub health: f32,
}

/// Collision box registration and the single overlap query pickups need
pub trait CollisionRegistrar {
    fn register_bounds(&mut self, bounds: Bounds, layer: LayerMask, owner: Option<ActorId>) -> ColliderHandle;

    fn update_bounds(&mut self, handle: ColliderHandle, bounds: Bounds);

    /// Returns false if the handle was unknown
    fn unregister_bounds(&mut self, handle: ColliderHandle) -> bool;

    /// First actor-owned collider on `mask` overlapping `bounds`, skipping `exclude`
    fn first_collider_for_bounds(
        &self,
        bounds: &Bounds,
        exclude: Option<ColliderHandle>,
        mask: LayerMask,
    ) -> Option<ActorId>;
}

/// Actor lookups: capability checks, inventories and player transforms
pub trait ActorRoster {
    fn is_player_capable(&self, actor: ActorId) -> bool;

    /// Player-capable actors in ascending id order
    fn player_actors(&self) -> Vec<ActorId>;

    /// Hand an item to the actor's inventory; false when the actor has none
    fn receive_item(&mut self, actor: ActorId, item: ItemId) -> bool;

    fn player_state(&self, actor: ActorId) -> Option<PlayerState>;

    fn set_player_state(&mut self, actor: ActorId, state: PlayerState) -> bool;
}

/// Everything a registry may need from the scene it runs in
pub trait SceneHost: CollisionRegistrar + ActorRoster {}

impl<T: CollisionRegistrar + ActorRoster + ?Sized> SceneHost for T {}
