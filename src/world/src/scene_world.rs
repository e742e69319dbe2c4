//! hecs-backed scene world: actors plus a collider table.

use glam::Vec2;
use hecs::{Entity, World};
use std::collections::{BTreeMap, HashMap};

use crate::geometry::{ActorKind, Bounds, LayerMask};
use crate::host::{ActorRoster, CollisionRegistrar, PlayerState};
use crate::ids::{ActorId, ColliderHandle, ItemId};

/// Identity component
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: ActorId,
    pub kind: ActorKind,
    pub name: String,
}

#[derive(Debug, Clone, Copy)]
pub struct Transform {
    pub position: Vec2,
    pub size: Vec2,
}

impl Transform {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.position, self.size)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Inventory {
    pub items: Vec<ItemId>,
}

/// Collider the actor's transform is mirrored into
#[derive(Debug, Clone, Copy)]
struct ColliderRef(ColliderHandle);

#[derive(Debug, Clone, Copy)]
struct Collider {
    bounds: Bounds,
    layer: LayerMask,
    owner: Option<ActorId>,
}

/// Actors and collision boxes of one scene
pub struct SceneWorld {
    world: World,
    actors: HashMap<ActorId, Entity>,
    colliders: BTreeMap<ColliderHandle, Collider>,
    next_actor: u32,
    next_collider: u32,
}

impl Default for SceneWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneWorld {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            actors: HashMap::new(),
            colliders: BTreeMap::new(),
            next_actor: 1,
            next_collider: 1,
        }
    }

    /// Spawn an actor with a collider matching its kind's layer
    pub fn spawn_actor(
        &mut self,
        kind: ActorKind,
        name: impl Into<String>,
        position: Vec2,
        size: Vec2,
        health: f32,
    ) -> ActorId {
        let id = ActorId(self.next_actor);
        self.next_actor += 1;

        let transform = Transform { position, size };
        let collider = self.register_bounds(transform.bounds(), kind.layer(), Some(id));
        let entity = self.world.spawn((
            Actor {
                id,
                kind,
                name: name.into(),
            },
            transform,
            Health {
                current: health,
                max: health,
            },
            Inventory::default(),
            ColliderRef(collider),
        ));
        self.actors.insert(id, entity);

        log::debug!("Spawned {:?} {}", kind, id);
        id
    }

    pub fn despawn_actor(&mut self, id: ActorId) -> bool {
        let Some(entity) = self.actors.remove(&id) else {
            return false;
        };
        if let Ok(collider) = self.world.get::<&ColliderRef>(entity).map(|c| c.0) {
            self.unregister_bounds(collider);
        }
        self.world.despawn(entity).is_ok()
    }

    /// Move an actor, keeping its collider in sync
    pub fn move_actor(&mut self, id: ActorId, position: Vec2) -> bool {
        let Some(&entity) = self.actors.get(&id) else {
            return false;
        };

        let (bounds, collider) = {
            let Ok(mut transform) = self.world.get::<&mut Transform>(entity) else {
                return false;
            };
            transform.position = position;
            let bounds = transform.bounds();
            let collider = self.world.get::<&ColliderRef>(entity).ok().map(|c| c.0);
            (bounds, collider)
        };

        if let Some(handle) = collider {
            self.update_bounds(handle, bounds);
        }
        true
    }

    pub fn actor_kind(&self, id: ActorId) -> Option<ActorKind> {
        let entity = *self.actors.get(&id)?;
        self.world.get::<&Actor>(entity).ok().map(|a| a.kind)
    }

    pub fn actor_position(&self, id: ActorId) -> Option<Vec2> {
        let entity = *self.actors.get(&id)?;
        self.world.get::<&Transform>(entity).ok().map(|t| t.position)
    }

    pub fn health(&self, id: ActorId) -> Option<Health> {
        let entity = *self.actors.get(&id)?;
        self.world.get::<&Health>(entity).ok().map(|h| *h)
    }

    pub fn inventory(&self, id: ActorId) -> Option<Vec<ItemId>> {
        let entity = *self.actors.get(&id)?;
        self.world.get::<&Inventory>(entity).ok().map(|i| i.items.clone())
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    pub fn collider_bounds(&self, handle: ColliderHandle) -> Option<Bounds> {
        self.colliders.get(&handle).map(|c| c.bounds)
    }
}

impl CollisionRegistrar for SceneWorld {
    fn register_bounds(&mut self, bounds: Bounds, layer: LayerMask, owner: Option<ActorId>) -> ColliderHandle {
        let handle = ColliderHandle(self.next_collider);
        self.next_collider += 1;
        self.colliders.insert(
            handle,
            Collider {
                bounds,
                layer,
                owner,
            },
        );
        handle
    }

    fn update_bounds(&mut self, handle: ColliderHandle, bounds: Bounds) {
        if let Some(collider) = self.colliders.get_mut(&handle) {
            collider.bounds = bounds;
        }
    }

    fn unregister_bounds(&mut self, handle: ColliderHandle) -> bool {
        self.colliders.remove(&handle).is_some()
    }

    fn first_collider_for_bounds(
        &self,
        bounds: &Bounds,
        exclude: Option<ColliderHandle>,
        mask: LayerMask,
    ) -> Option<ActorId> {
        self.colliders
            .iter()
            .filter(|(handle, _)| Some(**handle) != exclude)
            .filter(|(_, c)| c.layer.intersects(mask) && c.bounds.overlaps(bounds))
            .find_map(|(_, c)| c.owner)
    }
}

impl ActorRoster for SceneWorld {
    fn is_player_capable(&self, actor: ActorId) -> bool {
        self.actor_kind(actor).is_some_and(ActorKind::is_player_capable)
    }

    fn player_actors(&self) -> Vec<ActorId> {
        let mut players: Vec<ActorId> = self
            .world
            .query::<&Actor>()
            .iter()
            .filter(|(_, actor)| actor.kind.is_player_capable())
            .map(|(_, actor)| actor.id)
            .collect();
        players.sort();
        players
    }

    fn receive_item(&mut self, actor: ActorId, item: ItemId) -> bool {
        let Some(&entity) = self.actors.get(&actor) else {
            return false;
        };
        match self.world.get::<&mut Inventory>(entity) {
            Ok(mut inventory) => {
                inventory.items.push(item);
                true
            }
            Err(_) => false,
        }
    }

    fn player_state(&self, actor: ActorId) -> Option<PlayerState> {
        if !self.is_player_capable(actor) {
            return None;
        }
        let position = self.actor_position(actor)?;
        let health = self.health(actor)?;
        Some(PlayerState {
            position,
            health: health.current,
        })
    }

    fn set_player_state(&mut self, actor: ActorId, state: PlayerState) -> bool {
        if !self.is_player_capable(actor) || !self.move_actor(actor, state.position) {
            return false;
        }
        let Some(&entity) = self.actors.get(&actor) else {
            return false;
        };
        match self.world.get::<&mut Health>(entity) {
            Ok(mut health) => {
                health.current = state.health.min(health.max);
                true
            }
            Err(_) => false,
        }
    }
}
