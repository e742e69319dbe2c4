//! Item entity model

use glam::Vec2;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumCount, EnumIter};
use world::{ActorId, Bounds, ColliderHandle, ItemId, LayerMask, SceneHost};

/// Item category
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumCount,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum ItemKind {
    Key,
    Tool,
    Collectible,
}

impl ItemKind {
    /// Slot in per-category statistics
    pub fn index(self) -> usize {
        u8::from(self) as usize
    }
}

impl From<ItemKind> for u8 {
    fn from(kind: ItemKind) -> u8 {
        match kind {
            ItemKind::Key => 0,
            ItemKind::Tool => 1,
            ItemKind::Collectible => 2,
        }
    }
}

impl TryFrom<u8> for ItemKind {
    type Error = String;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(ItemKind::Key),
            1 => Ok(ItemKind::Tool),
            2 => Ok(ItemKind::Collectible),
            other => Err(format!("unknown item type {}", other)),
        }
    }
}

/// A collectible item placed in the scene
#[derive(Debug, Clone)]
pub struct Item {
    id: ItemId,
    name: String,
    kind: ItemKind,
    position: Vec2,
    size: Vec2,
    collected: bool,
    disabled: bool,
    collider: Option<ColliderHandle>,
    holder: Option<ActorId>,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, kind: ItemKind, position: Vec2, size: Vec2) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            position,
            size,
            collected: false,
            disabled: false,
            collider: None,
            holder: None,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.position, self.size)
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Temporarily suppress pickup detection
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Eligible for proximity pickup this frame
    pub fn is_collectable(&self) -> bool {
        !self.collected && !self.disabled
    }

    pub fn holder(&self) -> Option<ActorId> {
        self.holder
    }

    pub fn collider(&self) -> Option<ColliderHandle> {
        self.collider
    }

    /// Register or refresh this item's box at its current position
    pub fn sync_collider(&mut self, host: &mut dyn SceneHost) {
        let bounds = self.bounds();
        match self.collider {
            Some(handle) => host.update_bounds(handle, bounds),
            None => self.collider = Some(host.register_bounds(bounds, LayerMask::ITEM, None)),
        }
    }

    pub fn detach_collider(&mut self, host: &mut dyn SceneHost) {
        if let Some(handle) = self.collider.take() {
            host.unregister_bounds(handle);
        }
    }

    /// Transition to collected. Returns false if already collected.
    pub fn pickup(&mut self, actor: ActorId, host: Option<&mut (dyn SceneHost + '_)>) -> bool {
        if self.collected {
            return false;
        }

        self.collected = true;
        self.holder = Some(actor);

        if let Some(host) = host {
            self.detach_collider(&mut *host);
            if !host.receive_item(actor, self.id) {
                log::debug!("{} has no inventory to receive {}", actor, self.id);
            }
        }

        log::info!("{} picked up {} \"{}\" ({})", actor, self.id, self.name, self.kind);
        true
    }

    /// Mark collected from saved progress: releases the box but does not touch
    /// inventories. Returns false if already collected.
    pub(crate) fn restore_collected(&mut self, host: Option<&mut (dyn SceneHost + '_)>) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        if let Some(host) = host {
            self.detach_collider(host);
        }
        true
    }

    /// Rebuild a persisted item without firing pickup side effects
    pub(crate) fn restored(
        id: ItemId,
        name: String,
        kind: ItemKind,
        position: Vec2,
        size: Vec2,
        collected: bool,
        disabled: bool,
    ) -> Self {
        Self {
            collected,
            disabled,
            ..Self::new(id, name, kind, position, size)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::{EnumCount, IntoEnumIterator};
    use world::{ActorKind, SceneWorld};

    fn key() -> Item {
        Item::new(ItemId(10), "brass key", ItemKind::Key, Vec2::new(5.0, 5.0), Vec2::splat(2.0))
    }

    #[test]
    fn pickup_is_monotonic_and_idempotent() {
        let mut item = key();
        assert!(item.pickup(ActorId(1), None));
        assert!(item.is_collected());
        assert_eq!(item.holder(), Some(ActorId(1)));

        assert!(!item.pickup(ActorId(2), None));
        assert_eq!(item.holder(), Some(ActorId(1)));
    }

    #[test]
    fn pickup_releases_collider_and_fills_inventory() {
        let mut world = SceneWorld::new();
        let player = world.spawn_actor(ActorKind::Player, "hero", Vec2::ZERO, Vec2::ONE, 10.0);
        let mut item = key();
        item.sync_collider(&mut world);
        assert_eq!(world.collider_count(), 2);

        assert!(item.pickup(player, Some(&mut world)));
        assert_eq!(world.collider_count(), 1);
        assert!(item.collider().is_none());
        assert_eq!(world.inventory(player), Some(vec![ItemId(10)]));
    }

    #[test]
    fn sync_collider_follows_position() {
        let mut world = SceneWorld::new();
        let mut item = key();
        item.sync_collider(&mut world);
        let handle = item.collider().unwrap();

        item.set_position(Vec2::new(40.0, 1.0));
        item.sync_collider(&mut world);
        assert_eq!(item.collider(), Some(handle));
        assert_eq!(world.collider_bounds(handle).unwrap().min, Vec2::new(40.0, 1.0));
    }

    #[test]
    fn disabled_items_are_not_collectable() {
        let mut item = key();
        item.set_disabled(true);
        assert!(!item.is_collectable());
        assert!(!item.is_collected());
        item.set_disabled(false);
        assert!(item.is_collectable());
    }

    #[test]
    fn kinds_serialize_as_integers_and_index_statistics() {
        assert_eq!(ItemKind::COUNT, 3);
        for (expected, kind) in ItemKind::iter().enumerate() {
            assert_eq!(kind.index(), expected);
            assert_eq!(serde_json::to_string(&kind).unwrap(), expected.to_string());
        }
        assert!(serde_json::from_str::<ItemKind>("3").is_err());
    }
}
